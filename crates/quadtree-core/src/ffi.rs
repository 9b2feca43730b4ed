//! FFI bindings for the quadtree.
//!
//! This module provides UniFFI-compatible wrappers around [`QuadTree`] for
//! use from host languages. Array conversion happens on the host side; the
//! handle only sees points, ids and plain numbers.

use std::sync::{Arc, RwLock};

use crate::error::QuadTreeError;
use crate::geometry::Point;
use crate::query::QueryResult;
use crate::tree::QuadTree;

/// FFI-safe error type for quadtree operations.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum QuadTreeErrorFfi {
    /// Invalid tree geometry or configuration
    InvalidConfig { message: String },

    /// Points and ids of different lengths
    LengthMismatch { points: u64, ids: u64 },

    /// Point outside the tree region
    OutOfBounds { x: f64, y: f64 },

    /// Point with NaN or infinite coordinates
    InvalidCoordinate { x: f64, y: f64 },

    /// JSON serialization error
    JsonError { message: String },

    /// Internal lock error (tree was poisoned)
    LockError { message: String },
}

impl std::fmt::Display for QuadTreeErrorFfi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuadTreeErrorFfi::InvalidConfig { message } => {
                write!(f, "Invalid configuration: {}", message)
            }
            QuadTreeErrorFfi::LengthMismatch { points, ids } => {
                write!(f, "Length mismatch: {} points but {} ids", points, ids)
            }
            QuadTreeErrorFfi::OutOfBounds { x, y } => {
                write!(f, "Point ({}, {}) lies outside the tree region", x, y)
            }
            QuadTreeErrorFfi::InvalidCoordinate { x, y } => {
                write!(f, "Point ({}, {}) has non-finite coordinates", x, y)
            }
            QuadTreeErrorFfi::JsonError { message } => write!(f, "JSON error: {}", message),
            QuadTreeErrorFfi::LockError { message } => write!(f, "Lock error: {}", message),
        }
    }
}

impl std::error::Error for QuadTreeErrorFfi {}

impl From<QuadTreeError> for QuadTreeErrorFfi {
    fn from(err: QuadTreeError) -> Self {
        match err {
            QuadTreeError::InvalidConfig(message) | QuadTreeError::ConfigParse(message) => {
                QuadTreeErrorFfi::InvalidConfig { message }
            }
            QuadTreeError::LengthMismatch { points, ids } => QuadTreeErrorFfi::LengthMismatch {
                points: points as u64,
                ids: ids as u64,
            },
            QuadTreeError::OutOfBounds { x, y } => QuadTreeErrorFfi::OutOfBounds { x, y },
            QuadTreeError::InvalidCoordinate { x, y } => {
                QuadTreeErrorFfi::InvalidCoordinate { x, y }
            }
        }
    }
}

/// Thread-safe handle to a quadtree.
///
/// The host builds the tree through this handle and then queries it. Writes
/// take the lock exclusively, so concurrent inserts are serialized.
#[cfg_attr(feature = "uniffi", derive(uniffi::Object))]
pub struct QuadTreeHandle {
    tree: RwLock<QuadTree>,
}

impl QuadTreeHandle {
    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, QuadTree>, QuadTreeErrorFfi> {
        self.tree.read().map_err(|e| QuadTreeErrorFfi::LockError {
            message: format!("Failed to acquire tree lock: {}", e),
        })
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, QuadTree>, QuadTreeErrorFfi> {
        self.tree.write().map_err(|e| QuadTreeErrorFfi::LockError {
            message: format!("Failed to acquire tree lock: {}", e),
        })
    }
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
impl QuadTreeHandle {
    /// Create a tree over the square of `half_width` around `center`.
    #[cfg_attr(feature = "uniffi", uniffi::constructor)]
    pub fn new(
        center: Point,
        half_width: f64,
        capacity: Option<u32>,
    ) -> Result<Arc<Self>, QuadTreeErrorFfi> {
        let tree = match capacity {
            Some(capacity) => QuadTree::with_capacity(center, half_width, capacity as usize)?,
            None => QuadTree::new(center, half_width)?,
        };
        Ok(Arc::new(Self {
            tree: RwLock::new(tree),
        }))
    }

    /// Insert one point, with an automatic id when `id` is absent.
    pub fn insert(&self, point: Point, id: Option<i64>) -> Result<(), QuadTreeErrorFfi> {
        self.write()?.insert(point, id)?;
        Ok(())
    }

    /// Insert a batch of points with automatic ids.
    pub fn insert_points(&self, points: Vec<Point>) -> Result<(), QuadTreeErrorFfi> {
        self.write()?.insert_points(&points)?;
        Ok(())
    }

    /// Insert a batch of points, `ids[i]` belonging to `points[i]`.
    pub fn insert_points_with_ids(
        &self,
        points: Vec<Point>,
        ids: Vec<i64>,
    ) -> Result<(), QuadTreeErrorFfi> {
        self.write()?.insert_points_with_ids(&points, &ids)?;
        Ok(())
    }

    /// Points inside the square window; `ids` is empty unless requested.
    pub fn query(
        &self,
        center: Point,
        half_width: f64,
        return_ids: bool,
    ) -> Result<QueryResult, QuadTreeErrorFfi> {
        let tree = self.read()?;
        if return_ids {
            Ok(tree.query_with_ids(center, half_width))
        } else {
            Ok(QueryResult {
                points: tree.query(center, half_width),
                ids: Vec::new(),
            })
        }
    }

    /// Neighbour points of every stored point, in insertion order.
    pub fn query_self(&self, cutoff: f64) -> Result<Vec<Vec<Point>>, QuadTreeErrorFfi> {
        Ok(self.read()?.query_self(cutoff))
    }

    /// Number of stored points.
    pub fn len(&self) -> Result<u64, QuadTreeErrorFfi> {
        Ok(self.read()?.len() as u64)
    }

    /// Whether the tree holds no points.
    pub fn is_empty(&self) -> Result<bool, QuadTreeErrorFfi> {
        Ok(self.read()?.is_empty())
    }

    /// Structural statistics as JSON.
    pub fn stats_json(&self) -> Result<String, QuadTreeErrorFfi> {
        let stats = self.read()?.stats();
        serde_json::to_string(&stats).map_err(|e| QuadTreeErrorFfi::JsonError {
            message: e.to_string(),
        })
    }
}
