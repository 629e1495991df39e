use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::Vector2D;
use crate::spatial::{NodeHandle, NodePool, QuadNode, Region};
use crate::utils::{JITTER_RETRIES, MAX_TREE_DEPTH, MIN_ROOT_SIDE, SAME_POSITION_EPSILON};

/// The per-body data the spatial index and the force pass read.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodySample {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub mass: f64,
}

impl BodySample {
    pub fn new(position: Vector2D, velocity: Vector2D, mass: f64) -> Self {
        BodySample { position, velocity, mass }
    }
}

/// Result of inserting one body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The body could not be separated from a resident body and was left out.
    Dropped,
}

/// Barnes-Hut quadtree over a slice of [`BodySample`]s.
///
/// Leaves refer to bodies by their index in that slice, so the slice a tree was
/// built from must be the one handed to the force pass.
///
/// # Examples
///
/// ```
/// use force_layout::models::Vector2D;
/// use force_layout::spatial::{BodySample, QuadTree};
///
/// let mut bodies = vec![
///     BodySample::new(Vector2D::new(0.0, 0.0), Vector2D::ZERO, 1.0),
///     BodySample::new(Vector2D::new(4.0, 0.0), Vector2D::ZERO, 1.0),
///     BodySample::new(Vector2D::new(4.0, 4.0), Vector2D::ZERO, 2.0),
/// ];
/// let mut tree = QuadTree::new(7);
/// tree.rebuild(&mut bodies);
///
/// let root = tree.node(tree.root().expect("tree has a root"));
/// assert_eq!(root.mass, 4.0);
/// assert_eq!(tree.leaf_slots().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct QuadTree {
    pool: NodePool,
    root: Option<NodeHandle>,
    stack: Vec<(NodeHandle, usize, u32)>,
    path: Vec<NodeHandle>,
    rng: StdRng,
    dropped: usize,
}

impl QuadTree {
    pub fn new(seed: u64) -> Self {
        QuadTree::with_pool(NodePool::new(), seed)
    }

    pub fn with_pool(pool: NodePool, seed: u64) -> Self {
        QuadTree {
            pool,
            root: None,
            stack: Vec::with_capacity(64),
            path: Vec::with_capacity(64),
            rng: StdRng::seed_from_u64(seed),
            dropped: 0,
        }
    }

    pub fn root(&self) -> Option<NodeHandle> {
        self.root
    }

    pub fn node(&self, handle: NodeHandle) -> &QuadNode {
        self.pool.get(handle)
    }

    pub fn pool(&self) -> &NodePool {
        &self.pool
    }

    /// Insertions dropped by the last [`QuadTree::rebuild`].
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Returns every node of the current tree to the pool.
    pub fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            self.pool.release_tree(root);
        }
        self.dropped = 0;
    }

    /// Smallest square with its top-left corner at the minimum corner of `bodies`
    /// that covers every position. The shorter side is extended to make it square.
    pub fn bounding_square(bodies: &[BodySample]) -> Option<Region> {
        let first = bodies.first()?.position;
        let (mut min, mut max) = (first, first);
        for body in &bodies[1..] {
            let p = body.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        let side = (max.x - min.x).max(max.y - min.y).max(MIN_ROOT_SIDE);
        Some(Region::square(min.x, min.y, side))
    }

    /// Discards the previous tree and builds a new one over `bodies`.
    ///
    /// Coincident bodies may be jittered, which writes new positions into `bodies`.
    pub fn rebuild(&mut self, bodies: &mut [BodySample]) {
        self.clear();
        let Some(region) = QuadTree::bounding_square(bodies) else {
            return;
        };
        let root = self.pool.acquire(region);
        self.root = Some(root);
        for slot in 0..bodies.len() {
            if self.insert(bodies, slot, root) == InsertOutcome::Dropped {
                self.dropped += 1;
            }
        }
        trace!(
            "rebuilt quadtree: {} bodies, {} nodes, {} dropped",
            bodies.len(),
            self.pool.in_use(),
            self.dropped
        );
    }

    /// Inserts `bodies[slot]` below `start` without recursion.
    ///
    /// Every node the body passes through accumulates its mass. A leaf collision
    /// demotes the leaf to an internal node and sends both bodies down again. If the
    /// two bodies share a position, the resident one is jittered inside the leaf's
    /// square up to [`JITTER_RETRIES`] times before the insertion is dropped.
    pub fn insert(&mut self, bodies: &mut [BodySample], slot: usize, start: NodeHandle) -> InsertOutcome {
        self.stack.clear();
        self.path.clear();
        self.stack.push((start, slot, 0));

        while let Some((handle, incoming, depth)) = self.stack.pop() {
            let sample = bodies[incoming];
            let node = self.pool.get(handle);
            match node.body {
                None if node.is_unused() => {
                    let node = self.pool.get_mut(handle);
                    node.body = Some(incoming);
                    node.set_single(sample.position, sample.mass);
                }
                None => {
                    self.pool.get_mut(handle).accumulate(sample.position, sample.mass);
                    if incoming == slot {
                        self.path.push(handle);
                    }
                    let child = self.child_for(handle, sample.position);
                    self.stack.push((child, incoming, depth + 1));
                }
                Some(resident) if resident == incoming => {
                    // Already in the tree; undo what this pass added on the way down.
                    for &ancestor in &self.path {
                        self.pool.get_mut(ancestor).retract(sample.position, sample.mass);
                    }
                }
                Some(resident) => {
                    let region = node.region;
                    let before = bodies[resident].position;
                    let separated = self.separate(bodies, resident, incoming, &region);
                    let after = bodies[resident].position;
                    let resident_mass = bodies[resident].mass;
                    if after != before {
                        // Ancestors already hold the resident at its old position.
                        for &ancestor in &self.path {
                            let ancestor = self.pool.get_mut(ancestor);
                            ancestor.retract(before, resident_mass);
                            ancestor.accumulate(after, resident_mass);
                        }
                    }
                    self.pool.get_mut(handle).set_single(after, resident_mass);

                    if !separated || depth >= MAX_TREE_DEPTH {
                        trace!("dropping body {} at depth {}: coincident with body {}", incoming, depth, resident);
                        for &ancestor in &self.path {
                            self.pool.get_mut(ancestor).retract(sample.position, sample.mass);
                        }
                        return InsertOutcome::Dropped;
                    }

                    self.pool.get_mut(handle).body = None;
                    let child = self.child_for(handle, after);
                    // The resident is popped first and lands in a fresh child.
                    self.stack.push((handle, incoming, depth));
                    self.stack.push((child, resident, depth + 1));
                }
            }
        }
        InsertOutcome::Inserted
    }

    /// Body slots of every leaf, in traversal order.
    pub fn leaf_slots(&self) -> Vec<usize> {
        let mut slots = Vec::new();
        let mut stack: Vec<NodeHandle> = self.root.into_iter().collect();
        while let Some(handle) = stack.pop() {
            let node = self.pool.get(handle);
            if let Some(slot) = node.body {
                slots.push(slot);
            }
            stack.extend(node.children.iter().flatten().copied());
        }
        slots
    }

    /// Child of `parent` for the quadrant containing `position`, created on demand.
    fn child_for(&mut self, parent: NodeHandle, position: Vector2D) -> NodeHandle {
        let region = self.pool.get(parent).region;
        let quadrant = region.quadrant(position);
        if let Some(child) = self.pool.get(parent).children[quadrant] {
            return child;
        }
        let child = self.pool.acquire(region.child(quadrant));
        self.pool.get_mut(parent).children[quadrant] = Some(child);
        child
    }

    /// Moves `resident` to a random point of `region` while it shares a position
    /// with `incoming`. Returns true once the two are apart.
    fn separate(&mut self, bodies: &mut [BodySample], resident: usize, incoming: usize, region: &Region) -> bool {
        let target = bodies[incoming].position;
        let mut retries = JITTER_RETRIES;
        while retries > 0 && bodies[resident].position.approx_eq(&target, SAME_POSITION_EPSILON) {
            retries -= 1;
            let dx = (region.right - region.left) * self.rng.random::<f64>();
            let dy = (region.bottom - region.top) * self.rng.random::<f64>();
            bodies[resident].position = Vector2D::new(region.left + dx, region.top + dy);
        }
        !bodies[resident].position.approx_eq(&target, SAME_POSITION_EPSILON)
    }
}

impl Default for QuadTree {
    fn default() -> Self {
        QuadTree::new(0)
    }
}
