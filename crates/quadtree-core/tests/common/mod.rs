//! Shared fixtures: seeded point clouds and brute-force reference answers

#![allow(dead_code)]

use quadtree_core::{Point, QuadTree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// `count` points uniform in [0, 1) x [0, 1)
pub fn uniform_points(count: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Point::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect()
}

/// The unit-square tree used throughout: centered at (0.5, 0.5), half-width
/// 0.5001, first half inserted one by one, second half as a batch
pub fn unit_tree(points: &[Point], capacity: usize) -> QuadTree {
    let mut tree = QuadTree::with_capacity([0.5, 0.5], 0.5001, capacity).unwrap();
    let half = points.len() / 2;
    for &p in &points[..half] {
        tree.insert(p, None).unwrap();
    }
    tree.insert_points(&points[half..]).unwrap();
    tree
}

/// Bit-exact key so points can live in ordered sets
pub fn key(p: &Point) -> (u64, u64) {
    (p.x.to_bits(), p.y.to_bits())
}

pub fn key_set(points: &[Point]) -> BTreeSet<(u64, u64)> {
    points.iter().map(key).collect()
}

/// Per-axis filter over the raw point list
pub fn brute_force_query(points: &[Point], center: Point, half_width: f64) -> Vec<Point> {
    points
        .iter()
        .copied()
        .filter(|p| (p.x - center.x).abs() < half_width && (p.y - center.y).abs() < half_width)
        .collect()
}

/// Neighbour indices of every point, excluding the point itself
pub fn brute_force_neighbors(points: &[Point], cutoff: f64) -> Vec<Vec<usize>> {
    (0..points.len())
        .map(|i| {
            (0..points.len())
                .filter(|&j| {
                    j != i
                        && (points[j].x - points[i].x).abs() < cutoff
                        && (points[j].y - points[i].y).abs() < cutoff
                })
                .collect()
        })
        .collect()
}

/// Distinct neighbour groups, each as a set of point keys
pub fn distinct_groups(groups: &[Vec<Point>]) -> BTreeSet<BTreeSet<(u64, u64)>> {
    groups.iter().map(|g| key_set(g)).collect()
}
