//! Barnes-Hut force-directed graph layout.
//!
//! Bodies repel each other, springs pull linked bodies toward a rest length, and
//! positions are integrated in discrete steps. Repulsion is approximated with a
//! quadtree rebuilt every step and computed on a fixed pool of worker threads one
//! step ahead of integration.
//!
//! # Example
//!
//! ```
//! use force_layout::layout::Layout;
//! use force_layout::models::{Body, Spring, Vector2D};
//! use force_layout::utils::LayoutConfig;
//!
//! let bodies = vec![
//!     Body::new("a", Vector2D::new(0.0, 0.0), 1.0).expect("valid body"),
//!     Body::new("b", Vector2D::new(30.0, 0.0), 1.0).expect("valid body"),
//! ];
//! let springs = vec![Spring::new("ab", "a", "b", 0.0015, 80.0, 1.0).expect("valid spring")];
//! let mut layout = Layout::new(bodies, springs, LayoutConfig::default()).expect("valid layout");
//!
//! // The first step reports the starting positions.
//! layout.step().expect("step failed");
//! assert_eq!(layout.positions_x(), &[0.0, 30.0]);
//!
//! for _ in 0..10 {
//!     layout.step().expect("step failed");
//! }
//! assert!(layout.positions_x()[1] - layout.positions_x()[0] > 30.0);
//! ```
pub mod utils;
pub mod models;
pub mod spatial;
pub mod layout;
