use std::ops::Range;

use crate::models::Vector2D;
use crate::spatial::{BodySample, NodeHandle, QuadTree};
use crate::utils::{LayoutConfig, DISTANCE_EPSILON};

/// The subset of [`LayoutConfig`] the force pass needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
    pub gravity: f64,
    pub theta: f64,
    pub drag_coefficient: f64,
}

impl From<&LayoutConfig> for ForceParams {
    fn from(config: &LayoutConfig) -> Self {
        ForceParams {
            gravity: config.gravity,
            theta: config.theta,
            drag_coefficient: config.drag_coefficient,
        }
    }
}

/// Inverse-square interaction between a source and another mass.
///
/// Returns the force on the source. A negative `gravity` pushes the source away.
///
/// # Examples
///
/// ```
/// use force_layout::models::Vector2D;
/// use force_layout::spatial::pair_force;
///
/// let f = pair_force(Vector2D::new(0.0, 0.0), 1.0, Vector2D::new(10.0, 0.0), 1.0, -1.0);
/// assert!((f.x + 0.01).abs() < 1e-9);
/// assert_eq!(f.y, 0.0);
/// ```
pub fn pair_force(source: Vector2D, source_mass: f64, other: Vector2D, other_mass: f64, gravity: f64) -> Vector2D {
    let d = other - source;
    let r = d.length() + DISTANCE_EPSILON;
    d * (gravity * other_mass * source_mass / (r * r * r))
}

impl QuadTree {
    /// Repulsion on `bodies[source]` from every other body in the tree.
    ///
    /// Leaves are resolved exactly. An internal node whose side over distance to its
    /// centroid is below `theta` stands in for its whole subtree. `stack` is scratch
    /// space reused across calls.
    pub fn body_force(
        &self,
        bodies: &[BodySample],
        source: usize,
        params: &ForceParams,
        stack: &mut Vec<NodeHandle>,
    ) -> Vector2D {
        let body = bodies[source];
        let mut force = Vector2D::ZERO;
        stack.clear();
        stack.extend(self.root());

        while let Some(handle) = stack.pop() {
            let node = self.node(handle);
            match node.body {
                Some(other) if other == source => {}
                Some(other) => {
                    let other = bodies[other];
                    force += pair_force(body.position, body.mass, other.position, other.mass, params.gravity);
                }
                None if node.mass <= 0.0 => {}
                None => {
                    let d = node.centroid() - body.position;
                    let r = d.length() + DISTANCE_EPSILON;
                    if node.region.side() / r < params.theta {
                        force += d * (params.gravity * node.mass * body.mass / (r * r * r));
                    } else {
                        stack.extend(node.children.iter().flatten().copied());
                    }
                }
            }
        }
        force
    }
}

/// Resets and accumulates the force on every body in `range`, drag included.
///
/// Returns one force per slot of `range`, in order.
pub fn accumulate_forces(
    tree: &QuadTree,
    bodies: &[BodySample],
    range: Range<usize>,
    params: &ForceParams,
) -> Vec<Vector2D> {
    let mut stack = Vec::with_capacity(64);
    range
        .map(|slot| {
            let force = tree.body_force(bodies, slot, params, &mut stack);
            force - bodies[slot].velocity * params.drag_coefficient
        })
        .collect()
}
