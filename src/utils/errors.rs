use std::fmt;
use std::error::Error;

/// Represents errors that can occur while building or stepping a layout.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Indicates an invalid mass value (negative, zero or not finite).
    InvalidMass,
    /// Indicates an invalid integration timestep (must be positive and finite).
    InvalidTimestep,
    /// Indicates an invalid Barnes-Hut opening angle (must be non-negative).
    InvalidTheta,
    /// Indicates an invalid coefficient (e.g. a negative drag or a zero spring weight).
    InvalidCoefficient,
    /// Indicates that the worker pool was configured with no workers.
    InvalidWorkerCount,
    /// Indicates an empty body or spring id, which is reserved for the "not found" sentinel.
    InvalidId,
    /// A worker thread could not be started.
    WorkerSpawn(String),
    /// A worker thread stopped before reporting its result.
    WorkerDisconnected(usize),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LayoutError::InvalidMass => write!(f, "Invalid mass value"),
            LayoutError::InvalidTimestep => write!(f, "Invalid timestep value"),
            LayoutError::InvalidTheta => write!(f, "Invalid opening angle value"),
            LayoutError::InvalidCoefficient => write!(f, "Invalid coefficient value"),
            LayoutError::InvalidWorkerCount => write!(f, "Worker count must be at least one"),
            LayoutError::InvalidId => write!(f, "Ids must not be empty"),
            LayoutError::WorkerSpawn(msg) => write!(f, "Failed to spawn worker: {}", msg),
            LayoutError::WorkerDisconnected(id) => write!(f, "Worker {} disconnected", id),
        }
    }
}

impl Error for LayoutError {}
