//! Geometric primitives for the quadtree
//!
//! Everything here works with square, axis-aligned windows. Distances are
//! per-axis (Chebyshev): a point is inside a window of half-width `r` around
//! `c` when `|p.x - c.x| < r` and `|p.y - c.y| < r`.
//!
//! A [`Region`] is the closed square a node is responsible for. Its bounds are
//! stored explicitly so that children split exactly at the parent's center and
//! every routed point lies inside its child's bounds, with no rounding gap.

use serde::{Deserialize, Serialize};

/// A 2D point with `f64` coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Both coordinates are finite (no NaN, no infinity)
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Square-window test: `|self - center| < half_width` on both axes
    ///
    /// The inequality is strict, so a zero, negative or NaN half-width
    /// matches nothing.
    #[inline]
    pub fn within(&self, center: &Point, half_width: f64) -> bool {
        (self.x - center.x).abs() < half_width && (self.y - center.y).abs() < half_width
    }
}

impl From<[f64; 2]> for Point {
    fn from(arr: [f64; 2]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// One of the four children of an internal node
///
/// The discriminant is the child slot: bit 0 set for the east half,
/// bit 1 set for the north half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    SouthWest = 0,
    SouthEast = 1,
    NorthWest = 2,
    NorthEast = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::SouthWest,
        Quadrant::SouthEast,
        Quadrant::NorthWest,
        Quadrant::NorthEast,
    ];

    /// Child slot index (0..4)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_east(self) -> bool {
        matches!(self, Quadrant::SouthEast | Quadrant::NorthEast)
    }

    pub fn is_north(self) -> bool {
        matches!(self, Quadrant::NorthWest | Quadrant::NorthEast)
    }
}

/// A closed, axis-aligned square region
///
/// Defined by a center and a half-width. All points stored under a node with
/// this region satisfy `min <= p <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    center: Point,
    half_width: f64,
    min: Point,
    max: Point,
}

impl Region {
    /// Create a region from its center and half-width
    pub fn new(center: Point, half_width: f64) -> Self {
        Self {
            center,
            half_width,
            min: Point::new(center.x - half_width, center.y - half_width),
            max: Point::new(center.x + half_width, center.y + half_width),
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Lower-left corner
    pub fn min(&self) -> Point {
        self.min
    }

    /// Upper-right corner
    pub fn max(&self) -> Point {
        self.max
    }

    /// Inclusive containment test on both axes
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Pull a point onto the closest location inside the region
    pub fn clamp(&self, point: &Point) -> Point {
        Point::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Does any point of this (closed) region fall inside the open square
    /// window of `half_width` around `center`?
    ///
    /// Tests the region's closest point to `center` with the same predicate
    /// the query applies to stored points, so pruning agrees exactly with
    /// the per-point test.
    pub fn intersects_window(&self, center: &Point, half_width: f64) -> bool {
        self.clamp(center).within(center, half_width)
    }

    /// Window overlap between two regions, the second taken as an open window
    pub fn intersects(&self, window: &Region) -> bool {
        self.intersects_window(&window.center, window.half_width)
    }

    /// Could a point of `self` and a point of `other` lie strictly closer than
    /// `cutoff` on both axes?
    pub fn within_reach(&self, other: &Region, cutoff: f64) -> bool {
        let gap_x = gap(self.min.x, self.max.x, other.min.x, other.max.x);
        let gap_y = gap(self.min.y, self.max.y, other.min.y, other.max.y);
        gap_x < cutoff && gap_y < cutoff
    }

    /// Which child a point belongs to
    ///
    /// A coordinate equal to the center goes to the east / north side.
    pub fn quadrant_of(&self, point: &Point) -> Quadrant {
        let east = point.x >= self.center.x;
        let north = point.y >= self.center.y;
        match (north, east) {
            (false, false) => Quadrant::SouthWest,
            (false, true) => Quadrant::SouthEast,
            (true, false) => Quadrant::NorthWest,
            (true, true) => Quadrant::NorthEast,
        }
    }

    /// The region covering one quarter of this one
    ///
    /// Bounds are split at this region's center, so siblings share their
    /// edges exactly.
    pub fn quadrant(&self, quadrant: Quadrant) -> Region {
        let (min_x, max_x) = if quadrant.is_east() {
            (self.center.x, self.max.x)
        } else {
            (self.min.x, self.center.x)
        };
        let (min_y, max_y) = if quadrant.is_north() {
            (self.center.y, self.max.y)
        } else {
            (self.min.y, self.center.y)
        };
        Region {
            center: Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
            half_width: self.half_width / 2.0,
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        }
    }
}

/// Distance between two closed intervals, zero when they overlap
fn gap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    if b_min > a_max {
        b_min - a_max
    } else if a_min > b_max {
        a_min - b_max
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_within_is_strict() {
        let c = Point::new(0.0, 0.0);
        assert!(Point::new(0.5, -0.5).within(&c, 1.0));
        assert!(!Point::new(1.0, 0.0).within(&c, 1.0));
        assert!(!Point::new(0.0, -1.0).within(&c, 1.0));
        assert!(!c.within(&c, 0.0));
        assert!(!c.within(&c, f64::NAN));
    }

    #[test]
    fn test_region_contains_is_inclusive() {
        let r = Region::new(Point::new(0.5, 0.5), 0.5);
        assert!(r.contains(&Point::new(0.0, 0.0)));
        assert!(r.contains(&Point::new(1.0, 1.0)));
        assert!(r.contains(&Point::new(0.5, 1.0)));
        assert!(!r.contains(&Point::new(1.0001, 0.5)));
        assert!(!r.contains(&Point::new(f64::NAN, 0.5)));
    }

    #[test]
    fn test_quadrant_tie_break() {
        let r = Region::new(Point::new(0.0, 0.0), 1.0);
        assert_eq!(r.quadrant_of(&Point::new(0.0, 0.0)), Quadrant::NorthEast);
        assert_eq!(r.quadrant_of(&Point::new(-0.1, 0.0)), Quadrant::NorthWest);
        assert_eq!(r.quadrant_of(&Point::new(0.0, -0.1)), Quadrant::SouthEast);
        assert_eq!(r.quadrant_of(&Point::new(-0.1, -0.1)), Quadrant::SouthWest);
    }

    #[test]
    fn test_quadrant_regions_tile_parent() {
        let r = Region::new(Point::new(0.3, 0.7), 0.25);
        for q in Quadrant::ALL {
            let child = r.quadrant(q);
            assert_eq!(child.half_width(), 0.125);
            assert!(r.contains(&child.min()));
            assert!(r.contains(&child.max()));
        }
        assert_eq!(r.quadrant(Quadrant::SouthWest).max(), r.center());
        assert_eq!(r.quadrant(Quadrant::NorthEast).min(), r.center());
        assert_eq!(r.quadrant(Quadrant::NorthEast).max(), r.max());
    }

    #[test]
    fn test_routed_point_lies_in_child() {
        let r = Region::new(Point::new(0.5, 0.5), 0.25);
        let points = [
            Point::new(0.5, 0.5),
            Point::new(0.25, 0.75),
            Point::new(0.75, 0.25),
            Point::new(0.5, 0.25),
        ];
        for p in points {
            let child = r.quadrant(r.quadrant_of(&p));
            assert!(child.contains(&p), "{:?} not in {:?}", p, child);
        }
    }

    #[test]
    fn test_intersects_window() {
        let r = Region::new(Point::new(0.0, 0.0), 1.0);
        assert!(r.intersects_window(&Point::new(1.5, 0.0), 0.6));
        // Edge at x = 1.0, window reaches (1.0, 2.0): touching only
        assert!(!r.intersects_window(&Point::new(1.5, 0.0), 0.5));
        assert!(!r.intersects_window(&Point::new(0.0, 3.0), 1.0));
        assert!(r.intersects(&Region::new(Point::new(0.0, 0.0), 0.1)));
    }

    #[test]
    fn test_within_reach() {
        let a = Region::new(Point::new(0.0, 0.0), 1.0);
        let b = Region::new(Point::new(3.0, 0.0), 1.0);
        assert!(!a.within_reach(&b, 1.0));
        assert!(a.within_reach(&b, 1.01));
        assert!(a.within_reach(&a, 0.01));
    }

    #[test]
    fn test_clamp() {
        let r = Region::new(Point::new(0.0, 0.0), 1.0);
        assert_eq!(r.clamp(&Point::new(5.0, -5.0)), Point::new(1.0, -1.0));
        assert_eq!(r.clamp(&Point::new(0.2, 0.3)), Point::new(0.2, 0.3));
    }
}
