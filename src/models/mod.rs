mod vector;
mod body;
mod spring;

pub use vector::*;
pub use body::*;
pub use spring::*;
