//! Barnes-Hut spatial index.
//!
//! A [`QuadTree`] is rebuilt from scratch every step over a snapshot of body
//! positions ([`BodySample`]). Its nodes live in a [`NodePool`] arena and are
//! addressed by [`NodeHandle`]; rebuilding returns every handle of the previous
//! tree to the pool's free list before the new tree takes any.
mod node_pool;
mod quadtree;
mod barnes_hut;

pub use node_pool::*;
pub use quadtree::*;
pub use barnes_hut::*;

#[cfg(test)]
mod node_pool_tests;
#[cfg(test)]
mod barnes_hut_tests;
