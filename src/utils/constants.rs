use crate::utils::{LayoutConfig, SpringDefaults};

/// Small offset added to every distance before it is used as a divisor.
pub const DISTANCE_EPSILON: f64 = 1e-9;

/// Two positions closer than this on both axes are treated as coincident by the quadtree.
pub const SAME_POSITION_EPSILON: f64 = 1e-8;

/// Number of times a coincident resident body is jittered before an insertion is dropped.
pub const JITTER_RETRIES: usize = 3;

/// Subdivision depth past which an insertion is dropped instead of splitting further.
pub const MAX_TREE_DEPTH: u32 = 64;

/// Side length given to a root square that would otherwise be a single point.
pub const MIN_ROOT_SIDE: f64 = 1.0;

/// Nodes allocated up front by a fresh node pool.
pub const NODE_POOL_PREALLOCATION: usize = 1024;

/// Speed above which integrated velocities are rescaled.
pub const MAX_SPEED: f64 = 1.0;

/// Half extent of the square used to place bodies added without a position.
pub const RANDOM_PLACEMENT_EXTENT: f64 = 500.0;

pub const DEFAULT_SPRING_DEFAULTS: SpringDefaults = SpringDefaults {
    rest_length: 80.0,
    stiffness: 0.0015,
    weight: 1.0,
};

pub const DEFAULT_LAYOUT_CONFIG: LayoutConfig = LayoutConfig {
    gravity: -1.0,
    theta: 0.8,
    drag_coefficient: 0.02,
    timestep: 20.0,
    worker_count: 4,
    seed: 0x5EED,
    springs: DEFAULT_SPRING_DEFAULTS,
};
