use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::Vector2D;
use crate::spatial::{accumulate_forces, pair_force, BodySample, ForceParams, QuadTree};
use crate::utils::LayoutConfig;

fn params(theta: f64, drag_coefficient: f64) -> ForceParams {
    ForceParams { gravity: -1.0, theta, drag_coefficient }
}

fn sample(x: f64, y: f64, mass: f64) -> BodySample {
    BodySample::new(Vector2D::new(x, y), Vector2D::ZERO, mass)
}

fn exact_force(bodies: &[BodySample], source: usize, gravity: f64) -> Vector2D {
    let b = bodies[source];
    bodies
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != source)
        .fold(Vector2D::ZERO, |acc, (_, o)| acc + pair_force(b.position, b.mass, o.position, o.mass, gravity))
}

#[test]
fn test_params_from_config() {
    let config = LayoutConfig::new(Some(-3.0), Some(0.5), Some(0.1), None);
    let p = ForceParams::from(&config);
    assert_eq!(p, ForceParams { gravity: -3.0, theta: 0.5, drag_coefficient: 0.1 });
}

#[test]
fn test_two_body_repulsion_magnitude() {
    let mut bodies = vec![sample(0.0, 0.0, 1.0), sample(10.0, 0.0, 1.0)];
    let mut tree = QuadTree::new(1);
    tree.rebuild(&mut bodies);
    let forces = accumulate_forces(&tree, &bodies, 0..2, &params(0.8, 0.02));

    // |g| * m1 * m2 / r^2, pushing the bodies apart along x.
    assert_relative_eq!(forces[0].x, -0.01, epsilon = 1e-9);
    assert_relative_eq!(forces[0].y, 0.0, epsilon = 1e-12);
    assert_relative_eq!(forces[1].x, 0.01, epsilon = 1e-9);
    assert_relative_eq!(forces[0].length(), 0.01, epsilon = 1e-9);
}

#[test]
fn test_two_body_reciprocity() {
    let mut bodies = vec![sample(-3.0, 7.0, 2.0), sample(5.0, -1.5, 0.5)];
    let mut tree = QuadTree::new(1);
    tree.rebuild(&mut bodies);
    let forces = accumulate_forces(&tree, &bodies, 0..2, &params(0.8, 0.0));
    assert_eq!(forces[0], -forces[1]);
}

#[test]
fn test_drag_opposes_velocity() {
    let mut bodies = vec![BodySample::new(Vector2D::new(0.0, 0.0), Vector2D::new(0.5, -1.0), 1.0)];
    let mut tree = QuadTree::new(1);
    tree.rebuild(&mut bodies);
    let forces = accumulate_forces(&tree, &bodies, 0..1, &params(0.8, 0.1));
    // A lone body feels only drag.
    assert_relative_eq!(forces[0].x, -0.05, epsilon = 1e-12);
    assert_relative_eq!(forces[0].y, 0.1, epsilon = 1e-12);
}

#[test]
fn test_zero_theta_is_exact() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut bodies: Vec<_> = (0..64)
        .map(|_| sample(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0), 1.0))
        .collect();
    let mut tree = QuadTree::new(1);
    tree.rebuild(&mut bodies);
    let forces = accumulate_forces(&tree, &bodies, 0..bodies.len(), &params(0.0, 0.0));
    for (i, f) in forces.iter().enumerate() {
        let exact = exact_force(&bodies, i, -1.0);
        assert_relative_eq!(f.x, exact.x, epsilon = 1e-9);
        assert_relative_eq!(f.y, exact.y, epsilon = 1e-9);
    }
}

#[test]
fn test_far_cluster_is_approximated() {
    // A tight cluster far from the source collapses into one pseudo-body.
    let mut bodies = vec![
        sample(0.0, 0.0, 1.0),
        sample(1000.0, 1000.0, 1.0),
        sample(1001.0, 1000.0, 1.0),
        sample(1000.0, 1001.0, 1.0),
        sample(1001.0, 1001.0, 1.0),
    ];
    let mut tree = QuadTree::new(1);
    tree.rebuild(&mut bodies);
    let approx = accumulate_forces(&tree, &bodies, 0..1, &params(0.8, 0.0))[0];
    let exact = exact_force(&bodies, 0, -1.0);
    assert!(approx.x < 0.0 && approx.y < 0.0, "source should be pushed away from the cluster");
    let error = (approx - exact).length() / exact.length();
    assert!(error < 0.05, "relative error {} too large", error);
}

#[test]
fn test_approximation_error_shrinks_with_theta() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut bodies: Vec<_> = (0..400)
        .map(|_| sample(rng.random_range(-500.0..500.0), rng.random_range(-500.0..500.0), 1.0))
        .collect();
    let mut tree = QuadTree::new(1);
    tree.rebuild(&mut bodies);

    let total_error = |theta: f64| -> f64 {
        let forces = accumulate_forces(&tree, &bodies, 0..50, &params(theta, 0.0));
        forces
            .iter()
            .enumerate()
            .map(|(i, f)| (*f - exact_force(&bodies, i, -1.0)).length())
            .sum()
    };
    let coarse = total_error(1.2);
    let fine = total_error(0.3);
    assert!(fine <= coarse, "fine {} should not exceed coarse {}", fine, coarse);
}

#[test]
fn test_coincident_bodies_do_not_divide_by_zero() {
    let a = pair_force(Vector2D::new(1.0, 1.0), 1.0, Vector2D::new(1.0, 1.0), 1.0, -1.0);
    assert!(a.x.is_finite() && a.y.is_finite());
    assert_eq!(a, Vector2D::ZERO);
}

#[test]
fn test_partial_range_matches_full_pass() {
    let mut rng = StdRng::seed_from_u64(15);
    let mut bodies: Vec<_> = (0..100)
        .map(|_| sample(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0), 1.0))
        .collect();
    let mut tree = QuadTree::new(1);
    tree.rebuild(&mut bodies);
    let p = params(0.8, 0.02);
    let full = accumulate_forces(&tree, &bodies, 0..100, &p);
    let head = accumulate_forces(&tree, &bodies, 0..37, &p);
    let tail = accumulate_forces(&tree, &bodies, 37..100, &p);
    assert_eq!(full[..37], head[..]);
    assert_eq!(full[37..], tail[..]);
}
