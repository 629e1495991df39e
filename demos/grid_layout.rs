// demos/grid_layout.rs

use force_layout::layout::Layout;
use force_layout::models::{Body, Spring, Vector2D};
use force_layout::utils::{LayoutConfig, LayoutError};

const SIDE: usize = 5;

fn main() -> Result<(), LayoutError> {
    env_logger::init();

    // A SIDE x SIDE grid, all bodies starting bunched up near the origin.
    let mut bodies = Vec::new();
    let mut springs = Vec::new();
    for row in 0..SIDE {
        for col in 0..SIDE {
            let id = format!("{}-{}", row, col);
            bodies.push(Body::new(id.as_str(), Vector2D::new(col as f64, row as f64), 1.0)?);
            if col > 0 {
                let left = format!("{}-{}", row, col - 1);
                springs.push(Spring::new(format!("{}>{}", left, id), left, id.as_str(), 0.0015, 80.0, 1.0)?);
            }
            if row > 0 {
                let up = format!("{}-{}", row - 1, col);
                springs.push(Spring::new(format!("{}>{}", up, id), up, id.as_str(), 0.0015, 80.0, 1.0)?);
            }
        }
    }

    let mut layout = Layout::new(bodies, springs, LayoutConfig::default())?;
    println!("Layout with {} bodies and {} springs", layout.body_count(), layout.spring_count());

    for round in 0..5 {
        layout.simulate(100)?;
        let (top_left, bottom_right) = layout.graph_rect();
        println!(
            "After {} steps: graph spans ({:.1}, {:.1}) to ({:.1}, {:.1})",
            (round + 1) * 100,
            top_left.x,
            top_left.y,
            bottom_right.x,
            bottom_right.y
        );
    }

    println!("\nFinal positions:");
    for (id, position) in layout.positions() {
        println!("{}: ({:.2}, {:.2})", id, position.x, position.y);
    }

    Ok(())
}
