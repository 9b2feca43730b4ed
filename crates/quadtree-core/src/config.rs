//! Configuration for quadtree-core
//!
//! Tree-wide parameters fixed at construction: leaf capacity, subdivision
//! depth limit, what to do with points outside the root region and which
//! neighbour-search algorithm `query_self` uses.
//!
//! Configurations can be written as TOML:
//!
//! ```toml
//! capacity = 8
//! max_depth = 20
//! out_of_bounds = "clamp"
//! neighbor_strategy = "per_point"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{QuadTreeError, QuadTreeResult};

/// Default number of points a leaf holds before subdividing
pub const DEFAULT_CAPACITY: usize = 4;

/// Default subdivision depth limit
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Largest accepted subdivision depth limit
pub const MAX_DEPTH_LIMIT: usize = 64;

/// What happens when a point outside the root region is inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfBoundsPolicy {
    /// Fail with `QuadTreeError::OutOfBounds`
    #[default]
    Reject,
    /// Drop the point without error
    Ignore,
    /// Move the point onto the nearest location inside the region
    Clamp,
}

/// Algorithm used by `QuadTree::query_self`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborStrategy {
    /// Walk pairs of nodes that are within reach of each other
    #[default]
    DualTree,
    /// Run one range query per stored point
    PerPoint,
}

/// Tree-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuadTreeConfig {
    /// Maximum points per leaf before it subdivides
    pub capacity: usize,
    /// Depth at which leaves stop subdividing (root is depth 0)
    pub max_depth: usize,
    /// Policy for points outside the root region
    pub out_of_bounds: OutOfBoundsPolicy,
    /// Self-query algorithm
    pub neighbor_strategy: NeighborStrategy,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            out_of_bounds: OutOfBoundsPolicy::default(),
            neighbor_strategy: NeighborStrategy::default(),
        }
    }
}

impl QuadTreeConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_out_of_bounds(mut self, policy: OutOfBoundsPolicy) -> Self {
        self.out_of_bounds = policy;
        self
    }

    pub fn with_neighbor_strategy(mut self, strategy: NeighborStrategy) -> Self {
        self.neighbor_strategy = strategy;
        self
    }

    /// Check that the configuration can drive a tree
    pub fn validate(&self) -> QuadTreeResult<()> {
        if self.capacity == 0 {
            return Err(QuadTreeError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(QuadTreeError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(QuadTreeError::InvalidConfig(format!(
                "max_depth must be at most {}, got {}",
                MAX_DEPTH_LIMIT, self.max_depth
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML configuration; missing keys take defaults
    pub fn from_toml_str(text: &str) -> QuadTreeResult<Self> {
        let config: QuadTreeConfig =
            toml::from_str(text).map_err(|e| QuadTreeError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
