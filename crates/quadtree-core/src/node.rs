//! Quadtree nodes
//!
//! A node is a closed square [`Region`]. It is either a leaf holding point
//! records or an internal node owning exactly four children, one per
//! quadrant. A leaf turns into an internal node once, when an insertion
//! pushes it past the tree's capacity; nodes never merge back.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::config::QuadTreeConfig;
use crate::geometry::{Point, Quadrant, Region};

/// A stored point with its identifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub point: Point,
    pub id: i64,
    /// Position in the tree's insertion sequence
    pub(crate) seq: usize,
}

impl PointRecord {
    pub(crate) fn new(point: Point, id: i64, seq: usize) -> Self {
        Self { point, id, seq }
    }

    /// Zero-based insertion position of this record
    pub fn sequence(&self) -> usize {
        self.seq
    }
}

/// A node in the quadtree
#[derive(Debug)]
pub(crate) enum Node {
    Leaf {
        region: Region,
        records: Vec<PointRecord>,
    },
    Internal {
        region: Region,
        children: Box<[Node; 4]>,
    },
}

impl Node {
    pub(crate) fn leaf(region: Region) -> Self {
        Node::Leaf {
            region,
            records: Vec::new(),
        }
    }

    pub(crate) fn region(&self) -> &Region {
        match self {
            Node::Leaf { region, .. } => region,
            Node::Internal { region, .. } => region,
        }
    }

    /// Place a record in the leaf covering its point, subdividing on overflow
    ///
    /// The record must already lie inside this node's region.
    pub(crate) fn insert(&mut self, record: PointRecord, depth: usize, config: &QuadTreeConfig) {
        let overflowing = match self {
            Node::Internal { region, children } => {
                let quadrant = region.quadrant_of(&record.point);
                children[quadrant.index()].insert(record, depth + 1, config);
                return;
            }
            Node::Leaf { records, .. } => {
                records.push(record);
                records.len() > config.capacity
            }
        };

        if overflowing {
            self.subdivide(depth, config);
        }
    }

    /// Turn an overflowing leaf into an internal node
    ///
    /// Every record moves into the child covering it. A child that still
    /// overflows subdivides in turn, down to `max_depth`.
    fn subdivide(&mut self, depth: usize, config: &QuadTreeConfig) {
        let Node::Leaf { region, records } = self else {
            return;
        };

        // Halving a tiny region can underflow to a zero-width child
        if depth >= config.max_depth || region.half_width() / 2.0 == 0.0 {
            if records.len() == config.capacity + 1 {
                warn!(
                    depth,
                    center_x = region.center().x,
                    center_y = region.center().y,
                    "quadtree leaf at max depth exceeds capacity {}",
                    config.capacity
                );
            }
            return;
        }

        let region = *region;
        let records = std::mem::take(records);
        trace!(
            depth,
            center_x = region.center().x,
            center_y = region.center().y,
            half_width = region.half_width(),
            moved = records.len(),
            "subdividing quadtree leaf"
        );

        let mut children = Box::new(Quadrant::ALL.map(|q| Node::leaf(region.quadrant(q))));
        for record in records {
            let quadrant = region.quadrant_of(&record.point);
            children[quadrant.index()].insert(record, depth + 1, config);
        }

        *self = Node::Internal { region, children };
    }

    /// Number of records in this subtree
    pub(crate) fn count(&self) -> usize {
        match self {
            Node::Leaf { records, .. } => records.len(),
            Node::Internal { children, .. } => children.iter().map(Node::count).sum(),
        }
    }

    /// Visit every record in this subtree
    pub(crate) fn for_each_record<'a>(&'a self, f: &mut impl FnMut(&'a PointRecord)) {
        match self {
            Node::Leaf { records, .. } => records.iter().for_each(|r| f(r)),
            Node::Internal { children, .. } => {
                for child in children.iter() {
                    child.for_each_record(f);
                }
            }
        }
    }

    /// Accumulate structural statistics for this subtree
    pub(crate) fn collect_stats(&self, depth: usize, stats: &mut NodeStats) {
        stats.nodes += 1;
        stats.max_depth = stats.max_depth.max(depth);
        match self {
            Node::Leaf { records, .. } => {
                stats.leaves += 1;
                stats.largest_leaf = stats.largest_leaf.max(records.len());
            }
            Node::Internal { children, .. } => {
                for child in children.iter() {
                    child.collect_stats(depth + 1, stats);
                }
            }
        }
    }

    /// Write an indented listing of non-empty nodes and their points
    pub(crate) fn dump(&self, level: usize, out: &mut String) {
        if self.count() == 0 {
            return;
        }
        let indent = "  ".repeat(level);
        let region = self.region();
        out.push_str(&format!(
            "{}({:.6}, {:.6}) {:.6}\n",
            indent,
            region.center().x,
            region.center().y,
            region.half_width()
        ));
        match self {
            Node::Leaf { records, .. } => {
                for record in records {
                    out.push_str(&format!(
                        "{}  {:.6} {:.6} [{}]\n",
                        indent, record.point.x, record.point.y, record.id
                    ));
                }
            }
            Node::Internal { children, .. } => {
                for child in children.iter() {
                    child.dump(level + 1, out);
                }
            }
        }
    }
}

/// Raw counters gathered by a stats walk
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NodeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub max_depth: usize,
    pub largest_leaf: usize,
}
