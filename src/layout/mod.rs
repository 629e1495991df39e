mod workers;
mod frame;
mod buffers;
mod bounds;
mod simulation;
#[cfg(feature = "graph-changes")]
mod changes;

pub use workers::*;
pub use frame::*;
pub use buffers::*;
pub use bounds::*;
pub use simulation::*;
#[cfg(feature = "graph-changes")]
pub use changes::*;
