use criterion::{black_box, criterion_group, criterion_main, Criterion};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use force_layout::layout::Layout;
use force_layout::models::{Body, Spring, Vector2D};
use force_layout::spatial::{accumulate_forces, BodySample, ForceParams, QuadTree};
use force_layout::utils::LayoutConfig;

fn random_samples(count: usize) -> Vec<BodySample> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            let position = Vector2D::new(rng.random_range(-500.0..500.0), rng.random_range(-500.0..500.0));
            BodySample::new(position, Vector2D::ZERO, 1.0)
        })
        .collect()
}

pub fn bench_quadtree(c: &mut Criterion) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut group = c.benchmark_group("quadtree");
    group.measurement_time(std::time::Duration::from_secs(5));
    group.sample_size(50);

    let samples = random_samples(5_000);
    let params = ForceParams::from(&LayoutConfig::default());

    // Rebuilding reuses the same pool, so this measures insertion rather than allocation.
    let mut tree = QuadTree::new(1);
    group.bench_function("rebuild_5000", |b| b.iter(|| {
        let mut bodies = samples.clone();
        tree.rebuild(&mut bodies);
        black_box(tree.root());
    }));

    let mut bodies = samples.clone();
    tree.rebuild(&mut bodies);
    debug!("benchmark tree holds {} nodes", tree.pool().in_use());
    group.bench_function("forces_5000", |b| b.iter(|| {
        black_box(accumulate_forces(&tree, &bodies, 0..bodies.len(), &params));
    }));

    group.finish();
}

pub fn bench_layout_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    group.sample_size(30);

    let samples = random_samples(2_000);
    let bodies: Vec<Body> = samples
        .iter()
        .enumerate()
        .filter_map(|(i, s)| Body::new(format!("n{}", i), s.position, 1.0).ok())
        .collect();
    let springs: Vec<Spring> = (1..bodies.len())
        .filter_map(|i| Spring::new(format!("s{}", i), format!("n{}", i - 1), format!("n{}", i), 0.0015, 80.0, 1.0).ok())
        .collect();

    let mut layout = match Layout::new(bodies, springs, LayoutConfig::default()) {
        Ok(layout) => layout,
        Err(e) => panic!("Failed to build layout: {}", e),
    };
    group.bench_function("step_2000", |b| b.iter(|| {
        if let Err(e) = layout.step() {
            panic!("step failed: {}", e);
        }
    }));

    group.finish();
}

criterion_group!(benches, bench_quadtree, bench_layout_step);
criterion_main!(benches);
