//! Range queries
//!
//! Collects the stored points inside an open square window. Subtrees whose
//! region cannot reach the window are pruned; leaves that can are scanned
//! point by point with the same strict per-axis test.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::node::{Node, PointRecord};
use crate::tree::QuadTree;

/// Points matching a window, with their ids in the same order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct QueryResult {
    pub points: Vec<Point>,
    pub ids: Vec<i64>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<PointRecord> for QueryResult {
    fn from_iter<I: IntoIterator<Item = PointRecord>>(iter: I) -> Self {
        let (points, ids) = iter.into_iter().map(|r| (r.point, r.id)).unzip();
        Self { points, ids }
    }
}

impl QuadTree {
    /// Points with `|p - center| < half_width` on both axes
    ///
    /// No ordering guarantee; each matching point appears once.
    pub fn query(&self, center: impl Into<Point>, half_width: f64) -> Vec<Point> {
        let center = center.into();
        let mut found = Vec::new();
        collect_window(&self.root, &center, half_width, &mut found);
        found.into_iter().map(|r| r.point).collect()
    }

    /// Like [`QuadTree::query`], also returning the ids of the matches
    pub fn query_with_ids(&self, center: impl Into<Point>, half_width: f64) -> QueryResult {
        self.query_records(center, half_width).into_iter().collect()
    }

    /// Matching records, point and id together
    pub fn query_records(&self, center: impl Into<Point>, half_width: f64) -> Vec<PointRecord> {
        let center = center.into();
        let mut found = Vec::new();
        collect_window(&self.root, &center, half_width, &mut found);
        found.into_iter().copied().collect()
    }
}

/// Push every record under `node` that lies inside the window
pub(crate) fn collect_window<'a>(
    node: &'a Node,
    center: &Point,
    half_width: f64,
    out: &mut Vec<&'a PointRecord>,
) {
    if !node.region().intersects_window(center, half_width) {
        return;
    }

    match node {
        Node::Leaf { records, .. } => {
            out.extend(records.iter().filter(|r| r.point.within(center, half_width)));
        }
        Node::Internal { children, .. } => {
            for child in children.iter() {
                collect_window(child, center, half_width, out);
            }
        }
    }
}
