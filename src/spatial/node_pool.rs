use crate::models::Vector2D;
use crate::utils::NODE_POOL_PREALLOCATION;

/// Axis-aligned square region of a quadtree node.
///
/// `y` grows downward, so `top <= bottom`. Quadrants are numbered
/// 0 = top-left, 1 = top-right, 2 = bottom-left, 3 = bottom-right.
///
/// # Examples
///
/// ```
/// use force_layout::models::Vector2D;
/// use force_layout::spatial::Region;
///
/// let region = Region::square(0.0, 0.0, 2.0);
/// assert_eq!(region.quadrant(Vector2D::new(0.5, 0.5)), 0);
/// assert_eq!(region.quadrant(Vector2D::new(1.5, 1.5)), 3);
///
/// let child = region.child(1);
/// assert_eq!((child.left, child.right, child.top, child.bottom), (1.0, 2.0, 0.0, 1.0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Region {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Region {
    pub fn square(left: f64, top: f64, side: f64) -> Self {
        Region {
            left,
            right: left + side,
            top,
            bottom: top + side,
        }
    }

    pub fn side(&self) -> f64 {
        self.right - self.left
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Inclusive on every edge.
    pub fn contains(&self, p: Vector2D) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Index of the quadrant `p` falls into. Points on a bisector go to the lower index.
    pub fn quadrant(&self, p: Vector2D) -> usize {
        let mid = self.center();
        let mut index = 0;
        if p.x > mid.x {
            index += 1;
        }
        if p.y > mid.y {
            index += 2;
        }
        index
    }

    /// The sub-square for quadrant `index`.
    pub fn child(&self, index: usize) -> Region {
        let mid = self.center();
        let (left, right) = if index & 1 == 0 { (self.left, mid.x) } else { (mid.x, self.right) };
        let (top, bottom) = if index & 2 == 0 { (self.top, mid.y) } else { (mid.y, self.bottom) };
        Region { left, right, top, bottom }
    }
}

/// Handle to a node owned by a [`NodePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

impl NodeHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A quadtree node.
///
/// A leaf holds exactly one body slot. An internal node has at least one child and
/// never holds a body. An unused node has neither.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuadNode {
    pub region: Region,
    /// Total mass of every body in this subtree.
    pub mass: f64,
    /// Mass-weighted sum of x positions in this subtree.
    pub mass_x: f64,
    /// Mass-weighted sum of y positions in this subtree.
    pub mass_y: f64,
    pub children: [Option<NodeHandle>; 4],
    /// Index into the body snapshot the tree was built from.
    pub body: Option<usize>,
}

impl QuadNode {
    fn reset(&mut self, region: Region) {
        *self = QuadNode {
            region,
            ..QuadNode::default()
        };
    }

    pub fn is_unused(&self) -> bool {
        self.body.is_none() && !self.has_children()
    }

    pub fn is_leaf(&self) -> bool {
        self.body.is_some()
    }

    pub fn has_children(&self) -> bool {
        self.children.iter().any(Option::is_some)
    }

    /// Mass-weighted average position. Falls back to the region center when empty.
    pub fn centroid(&self) -> Vector2D {
        if self.mass > 0.0 {
            Vector2D::new(self.mass_x / self.mass, self.mass_y / self.mass)
        } else {
            self.region.center()
        }
    }

    pub(crate) fn accumulate(&mut self, position: Vector2D, mass: f64) {
        self.mass += mass;
        self.mass_x += mass * position.x;
        self.mass_y += mass * position.y;
    }

    pub(crate) fn retract(&mut self, position: Vector2D, mass: f64) {
        self.mass -= mass;
        self.mass_x -= mass * position.x;
        self.mass_y -= mass * position.y;
    }

    /// Replaces the aggregate with a single body's contribution.
    pub(crate) fn set_single(&mut self, position: Vector2D, mass: f64) {
        self.mass = 0.0;
        self.mass_x = 0.0;
        self.mass_y = 0.0;
        self.accumulate(position, mass);
    }
}

/// Arena of quadtree nodes with a free list.
///
/// Nodes are never deallocated while the pool lives; releasing a tree pushes its
/// handles back onto the free list for the next build.
///
/// # Examples
///
/// ```
/// use force_layout::spatial::{NodePool, Region};
///
/// let mut pool = NodePool::with_capacity(4);
/// let root = pool.acquire(Region::square(0.0, 0.0, 1.0));
/// let child = pool.acquire(Region::square(0.0, 0.0, 0.5));
/// pool.get_mut(root).children[0] = Some(child);
/// assert_eq!(pool.in_use(), 2);
///
/// pool.release_tree(root);
/// assert_eq!(pool.in_use(), 0);
/// assert_eq!(pool.allocated(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct NodePool {
    nodes: Vec<QuadNode>,
    free: Vec<NodeHandle>,
    scratch: Vec<NodeHandle>,
}

impl Default for NodePool {
    fn default() -> Self {
        NodePool::new()
    }
}

impl NodePool {
    pub fn new() -> Self {
        NodePool::with_capacity(NODE_POOL_PREALLOCATION)
    }

    /// Creates a pool with `capacity` nodes already on the free list.
    pub fn with_capacity(capacity: usize) -> Self {
        NodePool {
            nodes: vec![QuadNode::default(); capacity],
            free: (0..capacity).rev().map(NodeHandle).collect(),
            scratch: Vec::new(),
        }
    }

    /// Takes a node from the free list, growing the arena if it is empty.
    /// The node comes back reset to `region` with no body, children or mass.
    pub fn acquire(&mut self, region: Region) -> NodeHandle {
        let handle = match self.free.pop() {
            Some(handle) => handle,
            None => {
                self.nodes.push(QuadNode::default());
                NodeHandle(self.nodes.len() - 1)
            }
        };
        self.nodes[handle.0].reset(region);
        handle
    }

    /// Returns `root` and every node below it to the free list.
    pub fn release_tree(&mut self, root: NodeHandle) {
        self.scratch.clear();
        self.scratch.push(root);
        while let Some(handle) = self.scratch.pop() {
            let node = &mut self.nodes[handle.0];
            for child in node.children.iter_mut() {
                if let Some(child) = child.take() {
                    self.scratch.push(child);
                }
            }
            node.body = None;
            self.free.push(handle);
        }
    }

    pub fn get(&self, handle: NodeHandle) -> &QuadNode {
        &self.nodes[handle.0]
    }

    pub fn get_mut(&mut self, handle: NodeHandle) -> &mut QuadNode {
        &mut self.nodes[handle.0]
    }

    /// Total nodes ever allocated by this pool.
    pub fn allocated(&self) -> usize {
        self.nodes.len()
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn in_use(&self) -> usize {
        self.nodes.len() - self.free.len()
    }
}
