use std::ops::Range;

use crate::layout::RangeJob;
use crate::models::{Body, Vector2D};
use crate::spatial::{accumulate_forces, BodySample, ForceParams, QuadTree};

/// Everything one round of force accumulation reads: the body snapshot in ordered
/// index order and the tree built over it.
///
/// A frame is frozen while workers hold it and is recycled by the layout once the
/// round has been harvested, so its node pool and snapshot buffer are reused.
#[derive(Debug)]
pub struct Frame {
    tree: QuadTree,
    bodies: Vec<BodySample>,
    params: ForceParams,
}

impl Frame {
    pub fn new(params: ForceParams, seed: u64) -> Self {
        Frame {
            tree: QuadTree::new(seed),
            bodies: Vec::new(),
            params,
        }
    }

    /// Replaces the snapshot with `bodies` and rebuilds the tree over it.
    pub fn rebuild<'a>(&mut self, bodies: impl Iterator<Item = &'a Body>) {
        self.bodies.clear();
        self.bodies
            .extend(bodies.map(|b| BodySample::new(b.position, b.velocity, b.mass)));
        self.tree.rebuild(&mut self.bodies);
    }

    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }

    /// Snapshot position of `slot`, which differs from the source body only if the
    /// tree build jittered it.
    pub fn position(&self, slot: usize) -> Option<Vector2D> {
        self.bodies.get(slot).map(|b| b.position)
    }
}

impl RangeJob for Frame {
    type Output = Vec<Vector2D>;

    fn run(&self, range: Range<usize>) -> Vec<Vector2D> {
        accumulate_forces(&self.tree, &self.bodies, range, &self.params)
    }
}
