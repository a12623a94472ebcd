//! Core geometry types for survey-grid.
//!
//! ## Rust Lesson #2: Structs & Derives
//!
//! In JS you'd write: `const point = { lat: 1.0, lng: 2.0 }`
//! In Rust, we define a `struct` with explicit types.
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = like console.log, lets you print with `{:?}`
//! - `Clone` = can duplicate the value (like spread: `{...obj}`)
//! - `Copy` = can copy implicitly (small stack values only)
//! - `PartialEq` = can compare with `==`
//! - `Serialize`/`Deserialize` = serde can turn it into JSON/YAML and back

use serde::{Deserialize, Serialize};

use crate::geo;

/// A geographic point in degrees.
///
/// Planar helpers in this crate treat `lng` as x and `lat` as y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

/// A line segment defined by two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// An open polygon boundary: the closing edge from the last vertex back to
/// the first is implicit and never stored.
///
/// ## Rust Lesson #3: Ownership & Vec
///
/// `Vec<Point>` is like a JS array `Point[]` - a growable list.
/// This struct OWNS its points. Functions that only look at them take
/// `&VertexRing` or `&[Point]` (a borrowed, read-only view).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexRing {
    points: Vec<Point>,
}

/// Minimum number of vertices for a usable survey polygon.
pub const MIN_RING_VERTICES: usize = 3;

// ============================================================================
// IMPLEMENTATIONS (methods)
// ============================================================================

impl Point {
    /// Called as: `Point::new(lat, lng)` (like a static method)
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build a point from a `[lat, lng]` pair.
    #[inline]
    pub fn from_pair(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }

    #[inline]
    pub fn to_pair(self) -> [f64; 2] {
        [self.lat, self.lng]
    }

    /// Shift by a raw degree delta.
    #[inline]
    pub fn offset(self, dlat: f64, dlng: f64) -> Self {
        Self::new(self.lat + dlat, self.lng + dlng)
    }

    /// Planar midpoint in degree space.
    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.lat + other.lat) / 2.0, (self.lng + other.lng) / 2.0)
    }
}

impl Segment {
    #[inline]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Great-circle length in meters.
    #[inline]
    pub fn length_m(&self) -> f64 {
        geo::distance_m(self.start, self.end)
    }

    /// Length in degree space, used to spot degenerate chords.
    #[inline]
    pub fn planar_length(&self) -> f64 {
        let dx = self.end.lng - self.start.lng;
        let dy = self.end.lat - self.start.lat;
        (dx * dx + dy * dy).sqrt()
    }
}

impl VertexRing {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Import a closed coordinate list (`[lat, lng]` pairs, first point
    /// repeated at the end). The trailing duplicate is stripped; a list that
    /// is not closed is taken as-is.
    pub fn from_closed_coordinates(coords: &[[f64; 2]]) -> Self {
        let mut points: Vec<Point> = coords.iter().copied().map(Point::from_pair).collect();
        if points.len() >= 2 && points.first() == points.last() {
            points.pop();
        }
        Self { points }
    }

    /// Export as a closed coordinate list with the first point re-appended.
    pub fn to_closed_coordinates(&self) -> Vec<[f64; 2]> {
        self.closed_points().into_iter().map(Point::to_pair).collect()
    }

    /// A square of side `side_m` centered on `anchor`, used when a project
    /// has no saved survey area yet.
    pub fn default_square(anchor: Point, side_m: f64) -> Self {
        let half_diagonal = side_m * std::f64::consts::SQRT_2 / 2.0;
        // Clockwise from the north-east corner.
        let points = [45.0, 135.0, 225.0, 315.0]
            .iter()
            .map(|&bearing| geo::destination(anchor, half_diagonal, bearing))
            .collect();
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the ring has enough vertices to enclose an area.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.points.len() >= MIN_RING_VERTICES
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Edge `index` runs from vertex `index` to vertex `(index + 1) % len`.
    ///
    /// ## Rust Lesson #4: Option<T>
    ///
    /// Rust has no `null` or `undefined`. Instead, we use `Option<T>`:
    /// - `Some(value)` = we have a value
    /// - `None` = no value (here: fewer than two vertices, or a bad index)
    pub fn edge(&self, index: usize) -> Option<Segment> {
        let n = self.points.len();
        if n < 2 || index >= n {
            return None;
        }
        Some(Segment::new(self.points[index], self.points[(index + 1) % n]))
    }

    /// All edges including the implicit closing one.
    pub fn edges(&self) -> Vec<Segment> {
        (0..self.points.len()).filter_map(|i| self.edge(i)).collect()
    }

    /// Vertices with the first one appended again, i.e. the boundary as a
    /// closed polyline.
    pub fn closed_points(&self) -> Vec<Point> {
        let mut closed = self.points.clone();
        if let Some(&first) = self.points.first() {
            closed.push(first);
        }
        closed
    }

    /// Bounding box as (min_lng, min_lat, max_lng, max_lat).
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        geo::bounding_box(&self.points)
    }

    pub(crate) fn points_mut(&mut self) -> &mut Vec<Point> {
        &mut self.points
    }
}

impl From<Vec<Point>> for VertexRing {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

// ============================================================================
// TESTS
// ============================================================================
