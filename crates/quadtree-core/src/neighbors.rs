//! Self-queries: the neighbours of every stored point
//!
//! For a cutoff `r`, the neighbours of a record `p` are all other records `q`
//! with `|q - p| < r` on both axes. Two algorithms produce the same answer:
//!
//! - **Dual tree**: walks pairs of nodes whose regions are within reach of
//!   each other and compares only the records of those pairs. Each unordered
//!   neighbour pair is found exactly once.
//! - **Per point**: one pruned range query per stored record. With the
//!   `parallel` feature the queries run on the rayon thread pool.
//!
//! `query_self` returns one group per stored record, in insertion order, with
//! each group's members also in insertion order. Groups are not deduplicated.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::NeighborStrategy;
use crate::geometry::Point;
use crate::node::{Node, PointRecord};
use crate::query::collect_window;
use crate::tree::QuadTree;

/// The neighbours of one stored point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct NeighborGroup {
    pub id: i64,
    pub point: Point,
    pub neighbor_ids: Vec<i64>,
    pub neighbors: Vec<Point>,
}

impl QuadTree {
    /// Neighbour points of every stored point, in insertion order
    pub fn query_self(&self, cutoff: f64) -> Vec<Vec<Point>> {
        let records = self.records_in_order();
        self.adjacency(&records, cutoff)
            .into_iter()
            .map(|members| members.into_iter().map(|i| records[i].point).collect())
            .collect()
    }

    /// Neighbour groups with ids, in insertion order
    pub fn query_self_with_ids(&self, cutoff: f64) -> Vec<NeighborGroup> {
        let records = self.records_in_order();
        self.adjacency(&records, cutoff)
            .into_iter()
            .zip(&records)
            .map(|(members, owner)| NeighborGroup {
                id: owner.id,
                point: owner.point,
                neighbor_ids: members.iter().map(|&i| records[i].id).collect(),
                neighbors: members.iter().map(|&i| records[i].point).collect(),
            })
            .collect()
    }

    /// Every unordered pair of records closer than `cutoff`, once each
    ///
    /// Within a pair the earlier-inserted record comes first; pairs are
    /// sorted by insertion order.
    pub fn neighbor_pairs(&self, cutoff: f64) -> Vec<(PointRecord, PointRecord)> {
        let mut pairs = Vec::new();
        self_pairs(&self.root, cutoff, &mut pairs);
        let mut pairs: Vec<(PointRecord, PointRecord)> = pairs
            .into_iter()
            .map(|(a, b)| if a.seq <= b.seq { (*a, *b) } else { (*b, *a) })
            .collect();
        pairs.sort_unstable_by_key(|(a, b)| (a.seq, b.seq));
        pairs
    }

    /// Neighbour indices (into `records`) for each record
    fn adjacency(&self, records: &[&PointRecord], cutoff: f64) -> Vec<Vec<usize>> {
        let mut adjacency = match self.config().neighbor_strategy {
            NeighborStrategy::DualTree => {
                let mut pairs = Vec::new();
                self_pairs(&self.root, cutoff, &mut pairs);
                let mut adjacency = vec![Vec::new(); records.len()];
                for (a, b) in pairs {
                    adjacency[a.seq].push(b.seq);
                    adjacency[b.seq].push(a.seq);
                }
                adjacency
            }
            NeighborStrategy::PerPoint => self.per_point_adjacency(records, cutoff),
        };
        for members in &mut adjacency {
            members.sort_unstable();
        }
        adjacency
    }

    #[cfg(not(feature = "parallel"))]
    fn per_point_adjacency(&self, records: &[&PointRecord], cutoff: f64) -> Vec<Vec<usize>> {
        records
            .iter()
            .map(|owner| self.neighbors_of(owner, cutoff))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn per_point_adjacency(&self, records: &[&PointRecord], cutoff: f64) -> Vec<Vec<usize>> {
        records
            .par_iter()
            .map(|owner| self.neighbors_of(owner, cutoff))
            .collect()
    }

    fn neighbors_of(&self, owner: &PointRecord, cutoff: f64) -> Vec<usize> {
        let mut found = Vec::new();
        collect_window(&self.root, &owner.point, cutoff, &mut found);
        found
            .into_iter()
            .filter(|r| r.seq != owner.seq)
            .map(|r| r.seq)
            .collect()
    }
}

/// Neighbour pairs with both records under `node`
fn self_pairs<'a>(node: &'a Node, cutoff: f64, out: &mut Vec<(&'a PointRecord, &'a PointRecord)>) {
    match node {
        Node::Leaf { records, .. } => {
            for (i, a) in records.iter().enumerate() {
                for b in &records[i + 1..] {
                    if b.point.within(&a.point, cutoff) {
                        out.push((a, b));
                    }
                }
            }
        }
        Node::Internal { children, .. } => {
            for (i, child) in children.iter().enumerate() {
                self_pairs(child, cutoff, out);
                for other in &children[i + 1..] {
                    cross_pairs(child, other, cutoff, out);
                }
            }
        }
    }
}

/// Neighbour pairs with one record under `a` and the other under `b`
///
/// `a` and `b` must be disjoint subtrees.
fn cross_pairs<'a>(
    a: &'a Node,
    b: &'a Node,
    cutoff: f64,
    out: &mut Vec<(&'a PointRecord, &'a PointRecord)>,
) {
    if !a.region().within_reach(b.region(), cutoff) {
        return;
    }

    match (a, b) {
        (Node::Leaf { records: ra, .. }, Node::Leaf { records: rb, .. }) => {
            for p in ra {
                for q in rb {
                    if q.point.within(&p.point, cutoff) {
                        out.push((p, q));
                    }
                }
            }
        }
        (Node::Internal { children, .. }, Node::Leaf { .. }) => {
            for child in children.iter() {
                cross_pairs(child, b, cutoff, out);
            }
        }
        (Node::Leaf { .. }, Node::Internal { children, .. }) => {
            for child in children.iter() {
                cross_pairs(a, child, cutoff, out);
            }
        }
        (
            Node::Internal {
                region: region_a,
                children: children_a,
            },
            Node::Internal {
                region: region_b,
                children: children_b,
            },
        ) => {
            // Split the larger node
            if region_a.half_width() >= region_b.half_width() {
                for child in children_a.iter() {
                    cross_pairs(child, b, cutoff, out);
                }
            } else {
                for child in children_b.iter() {
                    cross_pairs(a, child, cutoff, out);
                }
            }
        }
    }
}
