//! Line clipping against the survey polygon.
//!
//! This is the HOT PATH of grid planning - every probe line of every
//! recomputation goes through here. Work happens in degree space with
//! `lng` as x and `lat` as y; callers rotate the ring first so that probes
//! are axis-aligned.

use crate::geometry::{Point, Segment};

/// Intersections closer than this (degrees) along a probe are the same
/// crossing hit twice, e.g. a probe passing exactly through a vertex.
const MERGE_EPSILON: f64 = 1e-12;

// ============================================================================
// POINT IN POLYGON (Ray Casting Algorithm)
// ============================================================================
//
// ## Rust Lesson #5: References & Slices
//
// `&[Point]` is a "slice" - a borrowed view into a contiguous sequence.
// It works with Vec<Point>, arrays, or `VertexRing::points()`.

/// Test if a point is inside an open ring using ray casting.
///
/// Casts a ray towards increasing longitude and counts edge crossings.
/// Odd crossings = inside, even = outside.
#[inline]
pub fn point_in_polygon(point: Point, ring: &[Point]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = (ring[i].lng, ring[i].lat);
        let (xj, yj) = (ring[j].lng, ring[j].lat);

        if ((yi > point.lat) != (yj > point.lat))
            && (point.lng < (xj - xi) * (point.lat - yi) / (yj - yi) + xi)
        {
            inside = !inside;
        }

        j = i;
    }

    inside
}

// ============================================================================
// LINE-LINE INTERSECTION
// ============================================================================

/// Result of a segment-segment intersection test.
///
/// ## Rust Lesson #6: Enums (Sum Types)
///
/// Unlike TypeScript's union types, Rust enums can carry data!
/// The compiler ensures you handle ALL variants (exhaustive matching).
#[derive(Debug, Clone, Copy)]
pub enum Intersection {
    None,
    Point { point: Point, t: f64 },
}

/// Find the intersection point between two segments.
///
/// `t` is the parameter along the first segment (0 at its start, 1 at its
/// end). Parallel and collinear segments report no intersection.
#[inline]
pub fn segment_intersection(a: &Segment, b: &Segment) -> Intersection {
    let (x1, y1, x2, y2) = (a.start.lng, a.start.lat, a.end.lng, a.end.lat);
    let (x3, y3, x4, y4) = (b.start.lng, b.start.lat, b.end.lng, b.end.lat);

    let denom = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
    if denom == 0.0 {
        return Intersection::None;
    }

    let ua = ((x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3)) / denom;
    let ub = ((x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3)) / denom;

    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        let point = Point::new(y1 + ua * (y2 - y1), x1 + ua * (x2 - x1));
        Intersection::Point { point, t: ua }
    } else {
        Intersection::None
    }
}

// ============================================================================
// LINE-POLYGON CLIPPING
// ============================================================================

/// All crossings between a probe segment and the ring boundary, sorted by
/// position along the probe, with duplicate hits merged.
pub fn line_polygon_intersections(probe: &Segment, ring: &[Point]) -> Vec<(Point, f64)> {
    let n = ring.len();
    if n < 3 {
        return Vec::new();
    }

    let mut hits = Vec::with_capacity(n / 2 + 1);
    for i in 0..n {
        let edge = Segment::new(ring[i], ring[(i + 1) % n]);
        if let Intersection::Point { point, t } = segment_intersection(probe, &edge) {
            hits.push((point, t));
        }
    }

    hits.sort_by(|a, b| a.1.total_cmp(&b.1));

    let probe_len = probe.planar_length();
    hits.dedup_by(|later, earlier| (later.1 - earlier.1).abs() * probe_len < MERGE_EPSILON);
    hits
}

/// Clip a probe segment to the ring.
///
/// Returns the interior chords ordered along the probe. Chords shorter than
/// the merge tolerance are dropped.
pub fn clip_line_to_polygon(probe: Segment, ring: &[Point]) -> Vec<Segment> {
    if ring.len() < 3 {
        return Vec::new();
    }

    let start_inside = point_in_polygon(probe.start, ring);
    let end_inside = point_in_polygon(probe.end, ring);

    // Build all candidate breakpoints along the probe
    let mut stops: Vec<Point> = Vec::new();
    if start_inside {
        stops.push(probe.start);
    }
    stops.extend(line_polygon_intersections(&probe, ring).into_iter().map(|(p, _)| p));
    if end_inside {
        stops.push(probe.end);
    }

    // ## Rust Lesson #7: Iterators & Collecting
    //
    // .windows(2) gives sliding windows of size 2: [a,b], [b,c], [c,d], ...
    // .filter_map() combines filter + map: return Some(x) to keep, None to skip
    // .collect() gathers results into a Vec

    stops
        .windows(2)
        .filter_map(|pair| {
            let chord = Segment::new(pair[0], pair[1]);
            if chord.planar_length() < MERGE_EPSILON {
                return None;
            }
            // Keep the piece if its midpoint is inside
            point_in_polygon(chord.midpoint(), ring).then_some(chord)
        })
        .collect()
}

/// Clip many probes at once, keeping probe order.
pub fn clip_lines_to_polygon(probes: &[Segment], ring: &[Point]) -> Vec<Vec<Segment>> {
    probes
        .iter()
        .map(|probe| clip_line_to_polygon(*probe, ring))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
