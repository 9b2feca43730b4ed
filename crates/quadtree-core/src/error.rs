//! Error types for quadtree-core
//!
//! Construction fails on an unusable configuration; insertion fails on
//! malformed batches and on points the tree cannot store. Queries never fail.

use thiserror::Error;

/// Main error type for quadtree operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuadTreeError {
    /// Invalid tree geometry or configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Batch insertion with a different number of ids than points
    #[error("Length mismatch: {points} points but {ids} ids")]
    LengthMismatch { points: usize, ids: usize },

    /// Point outside the root region (only under the reject policy)
    #[error("Point ({x}, {y}) lies outside the tree region")]
    OutOfBounds { x: f64, y: f64 },

    /// NaN or infinite coordinates
    #[error("Point ({x}, {y}) has non-finite coordinates")]
    InvalidCoordinate { x: f64, y: f64 },
}

/// Result type alias for quadtree operations
pub type QuadTreeResult<T> = Result<T, QuadTreeError>;

/// Validation utilities
pub mod validation {
    use super::*;
    use crate::geometry::Point;

    /// Validate the root region of a new tree
    pub fn validate_region(center: &Point, half_width: f64) -> QuadTreeResult<()> {
        if !center.is_finite() {
            return Err(QuadTreeError::InvalidConfig(format!(
                "center ({}, {}) must be finite",
                center.x, center.y
            )));
        }
        if !half_width.is_finite() || half_width <= 0.0 {
            return Err(QuadTreeError::InvalidConfig(format!(
                "half-width {} must be finite and positive",
                half_width
            )));
        }
        Ok(())
    }

    /// Validate that a batch of ids lines up with its points
    pub fn validate_batch_lengths(points: usize, ids: usize) -> QuadTreeResult<()> {
        if points != ids {
            return Err(QuadTreeError::LengthMismatch { points, ids });
        }
        Ok(())
    }

    /// Validate point coordinates
    pub fn validate_coordinates(point: &Point) -> QuadTreeResult<()> {
        if !point.is_finite() {
            return Err(QuadTreeError::InvalidCoordinate {
                x: point.x,
                y: point.y,
            });
        }
        Ok(())
    }
}
