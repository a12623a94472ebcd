//! Great-circle math on a spherical Earth.
//!
//! Everything here is a pure function of its inputs. Bearings are degrees
//! clockwise from north, distances are meters unless a [`LengthUnit`] says
//! otherwise.

use crate::geometry::{Point, Segment};

/// Mean Earth radius in meters, used for every spherical formula.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Meters per degree of latitude, used to turn a line spacing into degrees.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Units accepted by [`distance`] and [`point_to_line_distance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthUnit {
    #[default]
    Meters,
    Kilometers,
    Feet,
    Miles,
}

impl LengthUnit {
    /// Meters in one of this unit.
    pub fn meters(&self) -> f64 {
        match self {
            LengthUnit::Meters => 1.0,
            LengthUnit::Kilometers => 1000.0,
            LengthUnit::Feet => 0.3048,
            LengthUnit::Miles => 1609.344,
        }
    }

    #[inline]
    pub fn from_meters(&self, meters: f64) -> f64 {
        meters / self.meters()
    }

    #[inline]
    pub fn to_meters(&self, value: f64) -> f64 {
        value * self.meters()
    }
}

/// Initial bearing from `a` to `b`, in `[0, 360)`.
pub fn bearing(a: Point, b: Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    let bearing = y.atan2(x).to_degrees();
    (bearing + 360.0) % 360.0
}

/// Haversine distance in meters.
pub fn distance_m(a: Point, b: Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Haversine distance in the requested unit.
#[inline]
pub fn distance(a: Point, b: Point, unit: LengthUnit) -> f64 {
    unit.from_meters(distance_m(a, b))
}

/// Point reached by travelling `distance_m` meters from `origin` along the
/// great circle with initial `bearing_deg`.
pub fn destination(origin: Point, distance_m: f64, bearing_deg: f64) -> Point {
    let lat1 = origin.lat.to_radians();
    let lng1 = origin.lng.to_radians();
    let bearing = bearing_deg.to_radians();
    let angular = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    Point::new(lat2.to_degrees(), lng2.to_degrees())
}

/// Fold an angle into `(-180, 180]`.
///
/// Used wherever two bearings are compared, so that 359° and 1° come out
/// 2° apart instead of 358°.
pub fn normalize_angle(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Vertex-mean center of a point set. `None` when there are no points.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let sum_lat: f64 = points.iter().map(|p| p.lat).sum();
    let sum_lng: f64 = points.iter().map(|p| p.lng).sum();
    Some(Point::new(sum_lat / n, sum_lng / n))
}

/// Bounding box as (min_lng, min_lat, max_lng, max_lat).
pub fn bounding_box(points: &[Point]) -> Option<(f64, f64, f64, f64)> {
    if points.is_empty() {
        return None;
    }

    let min_lng = points.iter().map(|p| p.lng).fold(f64::INFINITY, f64::min);
    let min_lat = points.iter().map(|p| p.lat).fold(f64::INFINITY, f64::min);
    let max_lng = points.iter().map(|p| p.lng).fold(f64::NEG_INFINITY, f64::max);
    let max_lat = points.iter().map(|p| p.lat).fold(f64::NEG_INFINITY, f64::max);

    Some((min_lng, min_lat, max_lng, max_lat))
}

/// Area enclosed by an open ring, in square meters.
///
/// Spherical-excess approximation summed over the ring's edges; winding
/// does not matter. Fewer than three points enclose nothing.
pub fn area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..n {
        let lower = points[i];
        let middle = points[(i + 1) % n];
        let upper = points[(i + 2) % n];
        total += (upper.lng.to_radians() - lower.lng.to_radians()) * middle.lat.to_radians().sin();
    }

    (total * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs()
}

/// Rotate every point about `pivot` by `angle_deg` (clockwise, like a
/// bearing), keeping its great-circle distance to the pivot.
pub fn rotate_points(points: &[Point], pivot: Point, angle_deg: f64) -> Vec<Point> {
    points
        .iter()
        .map(|&p| {
            let d = distance_m(pivot, p);
            let b = bearing(pivot, p);
            destination(pivot, d, b + angle_deg)
        })
        .collect()
}

// ============================================================================
// PROJECTION ONTO LINES
// ============================================================================

/// Result of projecting a point onto a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPoint {
    /// Closest location on the polyline.
    pub point: Point,
    /// Index of the segment `(index, index + 1)` the location falls on.
    pub segment_index: usize,
    /// Position along that segment, 0 at its start and 1 at its end.
    pub fraction: f64,
    /// Great-circle distance from the query point, meters.
    pub distance_m: f64,
}

impl NearestPoint {
    /// Segment index plus the position within it, e.g. `2.25` is a quarter
    /// of the way along the third segment.
    #[inline]
    pub fn fractional_index(&self) -> f64 {
        self.segment_index as f64 + self.fraction
    }
}

/// Project `point` onto one segment.
///
/// Works in a local equirectangular frame centered on the query point,
/// where longitude differences are scaled by cos(lat). Good for the few
/// kilometers a survey polygon spans.
fn project_onto_segment(segment: &Segment, point: Point) -> (Point, f64) {
    let k = point.lat.to_radians().cos();
    let ax = (segment.start.lng - point.lng) * k;
    let ay = segment.start.lat - point.lat;
    let bx = (segment.end.lng - point.lng) * k;
    let by = segment.end.lat - point.lat;

    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq == 0.0 {
        0.0
    } else {
        (-(ax * dx + ay * dy) / len_sq).clamp(0.0, 1.0)
    };

    let projected = Point::new(
        segment.start.lat + t * (segment.end.lat - segment.start.lat),
        segment.start.lng + t * (segment.end.lng - segment.start.lng),
    );
    (projected, t)
}

/// Closest point on the polyline `line` to `point`.
///
/// Returns `None` for an empty line. A single-point line projects onto that
/// point. Ties keep the earliest segment.
pub fn nearest_point_on_line(line: &[Point], point: Point) -> Option<NearestPoint> {
    match line {
        [] => None,
        [only] => Some(NearestPoint {
            point: *only,
            segment_index: 0,
            fraction: 0.0,
            distance_m: distance_m(*only, point),
        }),
        _ => {
            let mut best: Option<NearestPoint> = None;
            for (i, pair) in line.windows(2).enumerate() {
                let segment = Segment::new(pair[0], pair[1]);
                let (projected, fraction) = project_onto_segment(&segment, point);
                let d = distance_m(projected, point);
                if best.is_none_or(|b| d < b.distance_m) {
                    best = Some(NearestPoint {
                        point: projected,
                        segment_index: i,
                        fraction,
                        distance_m: d,
                    });
                }
            }
            best
        }
    }
}

/// Shortest distance from `point` to `segment`, in the requested unit.
pub fn point_to_line_distance(point: Point, segment: &Segment, unit: LengthUnit) -> f64 {
    let (projected, _) = project_onto_segment(segment, point);
    distance(point, projected, unit)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bearing_cardinal_directions() {
        let origin = Point::new(0.0, 0.0);
        assert_relative_eq!(bearing(origin, Point::new(1.0, 0.0)), 0.0, epsilon = 1e-9);
        assert_relative_eq!(bearing(origin, Point::new(0.0, 1.0)), 90.0, epsilon = 1e-9);
        assert_relative_eq!(bearing(origin, Point::new(-1.0, 0.0)), 180.0, epsilon = 1e-9);
        assert_relative_eq!(bearing(origin, Point::new(0.0, -1.0)), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = distance_m(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert_relative_eq!(d, 111_195.08, epsilon = 1.0);
        assert_relative_eq!(
            distance(Point::new(0.0, 0.0), Point::new(1.0, 0.0), LengthUnit::Kilometers),
            111.195,
            epsilon = 0.01
        );
    }

    #[test]
    fn destination_inverts_distance_and_bearing() {
        let origin = Point::new(47.3769, 8.5417);
        let target = destination(origin, 1500.0, 63.0);
        assert_relative_eq!(distance_m(origin, target), 1500.0, epsilon = 1e-6);
        assert_relative_eq!(bearing(origin, target), 63.0, epsilon = 1e-6);
    }

    #[test]
    fn normalize_angle_range() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
        assert_relative_eq!(normalize_angle(359.0), -1.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_angle(-190.0), 170.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_angle(180.0), 180.0);
        assert_relative_eq!(normalize_angle(-180.0), 180.0);
        assert_relative_eq!(normalize_angle(540.0), 180.0);
    }

    #[test]
    fn centroid_of_square() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 0.0),
        ];
        assert_eq!(centroid(&pts), Some(Point::new(1.0, 1.0)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn area_of_small_square() {
        // ~111.2 m on each side at the equator
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.001),
            Point::new(0.001, 0.001),
            Point::new(0.001, 0.0),
        ];
        let side = distance_m(pts[0], pts[1]);
        assert_relative_eq!(area(&pts), side * side, max_relative = 1e-3);
        assert_eq!(area(&pts[..2]), 0.0);
    }

    #[test]
    fn area_ignores_winding() {
        let mut pts = vec![
            Point::new(10.0, 10.0),
            Point::new(10.0, 10.01),
            Point::new(10.01, 10.01),
        ];
        let forward = area(&pts);
        pts.reverse();
        assert_relative_eq!(forward, area(&pts), max_relative = 1e-12);
    }

    #[test]
    fn nearest_point_reports_fractional_index() {
        let line = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.001),
            Point::new(0.001, 0.001),
        ];
        let hit = nearest_point_on_line(&line, Point::new(0.00025, 0.0012)).unwrap();
        assert_eq!(hit.segment_index, 1);
        assert_relative_eq!(hit.fraction, 0.25, epsilon = 1e-6);
        assert_relative_eq!(hit.fractional_index(), 1.25, epsilon = 1e-6);
        assert_relative_eq!(hit.point.lng, 0.001, epsilon = 1e-12);
    }

    #[test]
    fn nearest_point_clamps_to_segment_ends() {
        let line = [Point::new(0.0, 0.0), Point::new(0.0, 0.001)];
        let hit = nearest_point_on_line(&line, Point::new(0.0, 0.005)).unwrap();
        assert_eq!(hit.fraction, 1.0);
        assert_eq!(hit.point, line[1]);
        assert!(nearest_point_on_line(&[], Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn point_to_line_distance_perpendicular() {
        let seg = Segment::new(Point::new(0.0, 0.0), Point::new(0.0, 0.01));
        let p = destination(Point::new(0.0, 0.005), 50.0, 0.0);
        assert_relative_eq!(
            point_to_line_distance(p, &seg, LengthUnit::Meters),
            50.0,
            epsilon = 0.01
        );
        assert_relative_eq!(
            point_to_line_distance(p, &seg, LengthUnit::Feet),
            50.0 / 0.3048,
            epsilon = 0.05
        );
    }

    #[test]
    fn rotate_points_keeps_distance_to_pivot() {
        let pivot = Point::new(46.0, 7.0);
        let pts = [destination(pivot, 120.0, 10.0), destination(pivot, 80.0, 200.0)];
        let rotated = rotate_points(&pts, pivot, 33.0);
        for (before, after) in pts.iter().zip(&rotated) {
            assert_relative_eq!(distance_m(pivot, *before), distance_m(pivot, *after), epsilon = 1e-6);
        }
        assert_relative_eq!(bearing(pivot, rotated[0]), 43.0, epsilon = 1e-6);
    }
}
