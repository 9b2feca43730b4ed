//! The quadtree and its insertion engine
//!
//! A [`QuadTree`] owns the root node, the tree-wide configuration and the
//! counter that hands out automatic identifiers. Points are only ever added;
//! the tree is built once and then queried.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{OutOfBoundsPolicy, QuadTreeConfig};
use crate::error::{validation, QuadTreeError, QuadTreeResult};
use crate::geometry::{Point, Region};
use crate::node::{Node, NodeStats, PointRecord};

/// Structural summary of a tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Stored point records
    pub points: usize,
    /// Total nodes, leaves included
    pub nodes: usize,
    /// Leaf nodes
    pub leaves: usize,
    /// Deepest level reached (root is 0)
    pub max_depth: usize,
    /// Most records held by a single leaf
    pub largest_leaf: usize,
}

/// Point quadtree over a fixed square region
#[derive(Debug)]
pub struct QuadTree {
    pub(crate) root: Node,
    config: QuadTreeConfig,
    len: usize,
}

impl QuadTree {
    /// Create a tree with the default configuration
    pub fn new(center: impl Into<Point>, half_width: f64) -> QuadTreeResult<Self> {
        Self::with_config(center, half_width, QuadTreeConfig::default())
    }

    /// Create a tree with a custom leaf capacity
    pub fn with_capacity(
        center: impl Into<Point>,
        half_width: f64,
        capacity: usize,
    ) -> QuadTreeResult<Self> {
        Self::with_config(
            center,
            half_width,
            QuadTreeConfig::default().with_capacity(capacity),
        )
    }

    /// Create a tree with a full configuration
    pub fn with_config(
        center: impl Into<Point>,
        half_width: f64,
        config: QuadTreeConfig,
    ) -> QuadTreeResult<Self> {
        let center = center.into();
        validation::validate_region(&center, half_width)?;
        config.validate()?;

        debug!(
            center_x = center.x,
            center_y = center.y,
            half_width,
            capacity = config.capacity,
            "creating quadtree"
        );

        Ok(Self {
            root: Node::leaf(Region::new(center, half_width)),
            config,
            len: 0,
        })
    }

    /// Insert a single point
    ///
    /// Without an explicit `id` the record gets the next value of the tree's
    /// insertion sequence. Returns the id the point was stored under, or
    /// `None` when the out-of-bounds policy dropped it.
    pub fn insert(
        &mut self,
        point: impl Into<Point>,
        id: Option<i64>,
    ) -> QuadTreeResult<Option<i64>> {
        Ok(self.admit(point.into())?.map(|p| self.store(p, id)))
    }

    /// Insert a batch of points with automatic ids
    ///
    /// The batch is validated up front; on error nothing is inserted.
    /// Returns the ids of the stored points (dropped points have none).
    pub fn insert_points<P>(&mut self, points: &[P]) -> QuadTreeResult<Vec<i64>>
    where
        P: Into<Point> + Copy,
    {
        let admitted = self.admit_all(points)?;
        Ok(admitted
            .into_iter()
            .flatten()
            .map(|p| self.store(p, None))
            .collect())
    }

    /// Insert a batch of points with caller-supplied ids
    ///
    /// `ids[i]` belongs to `points[i]`. Ids are not checked for uniqueness.
    /// Mismatched lengths or any invalid point leave the tree unchanged.
    pub fn insert_points_with_ids<P>(
        &mut self,
        points: &[P],
        ids: &[i64],
    ) -> QuadTreeResult<Vec<i64>>
    where
        P: Into<Point> + Copy,
    {
        validation::validate_batch_lengths(points.len(), ids.len())?;
        let admitted = self.admit_all(points)?;
        Ok(admitted
            .into_iter()
            .zip(ids)
            .filter_map(|(p, &id)| p.map(|p| self.store(p, Some(id))))
            .collect())
    }

    /// Apply the coordinate check and out-of-bounds policy to one point
    fn admit(&self, point: Point) -> QuadTreeResult<Option<Point>> {
        validation::validate_coordinates(&point)?;
        let region = self.root.region();
        if region.contains(&point) {
            return Ok(Some(point));
        }

        match self.config.out_of_bounds {
            OutOfBoundsPolicy::Reject => Err(QuadTreeError::OutOfBounds {
                x: point.x,
                y: point.y,
            }),
            OutOfBoundsPolicy::Ignore => {
                debug!(x = point.x, y = point.y, "dropping point outside quadtree region");
                Ok(None)
            }
            OutOfBoundsPolicy::Clamp => {
                let clamped = region.clamp(&point);
                debug!(
                    x = point.x,
                    y = point.y,
                    clamped_x = clamped.x,
                    clamped_y = clamped.y,
                    "clamping point into quadtree region"
                );
                Ok(Some(clamped))
            }
        }
    }

    fn admit_all<P>(&self, points: &[P]) -> QuadTreeResult<Vec<Option<Point>>>
    where
        P: Into<Point> + Copy,
    {
        points.iter().map(|&p| self.admit(p.into())).collect()
    }

    fn store(&mut self, point: Point, id: Option<i64>) -> i64 {
        let seq = self.len;
        let id = id.unwrap_or(seq as i64);
        self.root
            .insert(PointRecord::new(point, id, seq), 0, &self.config);
        self.len += 1;
        id
    }

    /// Number of stored points
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root region
    pub fn region(&self) -> Region {
        *self.root.region()
    }

    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Whether a point falls inside the root region (edges included)
    pub fn contains(&self, point: impl Into<Point>) -> bool {
        self.root.region().contains(&point.into())
    }

    /// All stored records in insertion order
    pub fn records(&self) -> Vec<PointRecord> {
        self.records_in_order().into_iter().copied().collect()
    }

    /// References to all records, indexed by insertion sequence
    pub(crate) fn records_in_order(&self) -> Vec<&PointRecord> {
        let mut records = Vec::with_capacity(self.len);
        self.root.for_each_record(&mut |r| records.push(r));
        records.sort_unstable_by_key(|r| r.seq);
        records
    }

    /// Structural statistics
    pub fn stats(&self) -> TreeStats {
        let mut stats = NodeStats::default();
        self.root.collect_stats(0, &mut stats);
        TreeStats {
            points: self.len,
            nodes: stats.nodes,
            leaves: stats.leaves,
            max_depth: stats.max_depth,
            largest_leaf: stats.largest_leaf,
        }
    }

    /// Indented listing of the non-empty nodes and their points
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        self.root.dump(0, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_tree() -> QuadTree {
        QuadTree::new([0.5, 0.5], 0.5).unwrap()
    }

    #[test]
    fn test_new_tree_is_empty() {
        let tree = unit_tree();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.capacity(), 4);
        assert_eq!(tree.region().half_width(), 0.5);
        assert_eq!(tree.debug_dump(), "");
    }

    #[test]
    fn test_invalid_construction() {
        assert!(QuadTree::new([0.0, 0.0], 0.0).is_err());
        assert!(QuadTree::new([0.0, 0.0], f64::NAN).is_err());
        assert!(QuadTree::new([f64::INFINITY, 0.0], 1.0).is_err());
        assert!(QuadTree::with_capacity([0.0, 0.0], 1.0, 0).is_err());
    }

    #[test]
    fn test_auto_ids_follow_insertion_order() {
        let mut tree = unit_tree();
        assert_eq!(tree.insert([0.1, 0.1], None).unwrap(), Some(0));
        assert_eq!(tree.insert([0.2, 0.2], Some(42)).unwrap(), Some(42));
        assert_eq!(tree.insert([0.3, 0.3], None).unwrap(), Some(2));
        assert_eq!(
            tree.insert_points(&[[0.4, 0.4], [0.5, 0.5]]).unwrap(),
            vec![3, 4]
        );
        let ids: Vec<i64> = tree.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 42, 2, 3, 4]);
    }

    #[test]
    fn test_reject_policy() {
        let mut tree = unit_tree();
        assert_eq!(
            tree.insert([1.5, 0.5], None),
            Err(QuadTreeError::OutOfBounds { x: 1.5, y: 0.5 })
        );
        assert!(tree.is_empty());
    }

    #[test]
    fn test_edges_are_inside() {
        let mut tree = unit_tree();
        for p in [[0.0, 0.0], [1.0, 1.0], [0.0, 1.0], [1.0, 0.0]] {
            assert!(tree.contains(p));
            assert!(tree.insert(p, None).unwrap().is_some());
        }
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_ignore_policy_drops_without_consuming_ids() {
        let config = QuadTreeConfig::default().with_out_of_bounds(OutOfBoundsPolicy::Ignore);
        let mut tree = QuadTree::with_config([0.5, 0.5], 0.5, config).unwrap();
        assert_eq!(tree.insert([2.0, 2.0], None).unwrap(), None);
        assert_eq!(tree.insert([0.2, 0.2], None).unwrap(), Some(0));
        assert_eq!(
            tree.insert_points(&[[0.3, 0.3], [-1.0, 0.3], [0.4, 0.4]])
                .unwrap(),
            vec![1, 2]
        );
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_clamp_policy() {
        let config = QuadTreeConfig::default().with_out_of_bounds(OutOfBoundsPolicy::Clamp);
        let mut tree = QuadTree::with_config([0.5, 0.5], 0.5, config).unwrap();
        tree.insert([1.5, -0.25], Some(7)).unwrap();
        let records = tree.records();
        assert_eq!(records[0].point, Point::new(1.0, 0.0));
        assert_eq!(records[0].id, 7);
    }

    #[test]
    fn test_non_finite_always_rejected() {
        let config = QuadTreeConfig::default().with_out_of_bounds(OutOfBoundsPolicy::Clamp);
        let mut tree = QuadTree::with_config([0.5, 0.5], 0.5, config).unwrap();
        assert!(matches!(
            tree.insert([f64::NAN, 0.5], None),
            Err(QuadTreeError::InvalidCoordinate { .. })
        ));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut tree = unit_tree();
        let err = tree.insert_points(&[[0.1, 0.1], [0.2, 0.2], [3.0, 0.2]]);
        assert!(matches!(err, Err(QuadTreeError::OutOfBounds { .. })));
        assert!(tree.is_empty());

        let err = tree.insert_points_with_ids(&[[0.1, 0.1], [0.2, 0.2]], &[1]);
        assert_eq!(err, Err(QuadTreeError::LengthMismatch { points: 2, ids: 1 }));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_insert_points_with_ids() {
        let mut tree = unit_tree();
        let ids = tree
            .insert_points_with_ids(&[(0.1, 0.1), (0.9, 0.9)], &[100, 200])
            .unwrap();
        assert_eq!(ids, vec![100, 200]);
        let records = tree.records();
        assert_eq!(records[0].point, Point::new(0.1, 0.1));
        assert_eq!(records[0].id, 100);
        assert_eq!(records[1].id, 200);
        assert_eq!(records[1].sequence(), 1);
    }

    #[test]
    fn test_stats() {
        let mut tree = QuadTree::with_capacity([0.5, 0.5], 0.5, 1).unwrap();
        tree.insert_points(&[[0.25, 0.25], [0.75, 0.75]]).unwrap();
        let stats = tree.stats();
        assert_eq!(stats.points, 2);
        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.leaves, 4);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.largest_leaf, 1);
    }
}
