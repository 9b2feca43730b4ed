//! quadtree-core - Point quadtree for square-window spatial queries
//!
//! Stores a growing set of 2D points, each tagged with an integer id, inside
//! a fixed square region and answers two kinds of queries:
//!
//! - **Range query**: which points lie inside an axis-aligned square window
//!   around a center (`|p - c| < r` on both axes)
//! - **Self-query**: for every stored point, which other points lie inside
//!   the square window of a given cutoff around it
//!
//! Leaves hold up to a fixed capacity of points and split into four
//! quadrants when they overflow. Both queries prune subtrees whose region
//! cannot reach the window; the self-query walks pairs of nodes so that
//! far-apart regions are never compared point by point.
//!
//! # Example
//!
//! ```
//! use quadtree_core::QuadTree;
//!
//! let mut tree = QuadTree::new([0.5, 0.5], 0.5001)?;
//! tree.insert([0.5, 0.5], None)?;
//! tree.insert_points(&[[0.55, 0.45], [0.9, 0.9]])?;
//!
//! let near = tree.query([0.5, 0.5], 0.1001);
//! assert_eq!(near.len(), 2);
//!
//! let groups = tree.query_self(0.1);
//! assert_eq!(groups[0].len(), 1);
//! # Ok::<(), quadtree_core::QuadTreeError>(())
//! ```

pub mod config;
pub mod error;
pub mod ffi;
pub mod geometry;
pub mod neighbors;
mod node;
pub mod query;
pub mod tree;

pub use config::{NeighborStrategy, OutOfBoundsPolicy, QuadTreeConfig};
pub use error::{QuadTreeError, QuadTreeResult};
pub use ffi::{QuadTreeErrorFfi, QuadTreeHandle};
pub use geometry::{Point, Quadrant, Region};
pub use neighbors::NeighborGroup;
pub use node::PointRecord;
pub use query::QueryResult;
pub use tree::{QuadTree, TreeStats};

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
