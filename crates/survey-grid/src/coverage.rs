//! Coverage grid planning.
//!
//! Generates parallel scan lines at a given angle and spacing, clips them to
//! the survey polygon and stitches them into a single back-and-forth
//! ("lawnmower") flight path. Cross-hatch mode adds a second family rotated
//! 90 degrees as an overlay.
//!
//! ## How the scan lines are built
//!
//! 1. Rotate the ring by `-angle` about its centroid so scan lines become
//!    lines of constant latitude.
//! 2. Lay horizontal probes across the rotated bounding box, one every
//!    `spacing`, offset half a spacing from the bottom edge.
//! 3. Clip each probe to the rotated ring.
//! 4. Rotate the surviving chords back by `+angle`.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::clip::clip_lines_to_polygon;
use crate::geo::{self, METERS_PER_DEGREE_LAT};
use crate::geometry::{Point, Segment, VertexRing};

/// Probes overshoot the bounding box by this fraction of its width on each
/// side, so chords touching the box edge are never cut short.
const PROBE_OVERSHOOT: f64 = 0.01;

/// Single pass or a second orthogonal pass.
///
/// ## Rust Lesson #8: Copy enums as configuration
///
/// A fieldless enum is just a tag - it is `Copy`, costs one byte, and a
/// `match` on it must cover every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageMode {
    /// One family of parallel passes.
    #[default]
    Single,
    /// Two orthogonal families, for better 3D reconstruction.
    #[serde(alias = "cross-hatch", alias = "enhanced3d")]
    CrossHatch,
}

impl CoverageMode {
    /// Get mode name as string.
    pub fn name(&self) -> &'static str {
        match self {
            CoverageMode::Single => "single",
            CoverageMode::CrossHatch => "crosshatch",
        }
    }

    /// Parse mode from string.
    pub fn from_name(name: &str) -> Option<CoverageMode> {
        match name.to_lowercase().as_str() {
            "single" | "standard" | "grid" => Some(CoverageMode::Single),
            "crosshatch" | "cross-hatch" | "enhanced3d" | "enhanced_3d" => {
                Some(CoverageMode::CrossHatch)
            }
            _ => None,
        }
    }

    /// All available modes.
    pub fn all() -> &'static [CoverageMode] {
        &[CoverageMode::Single, CoverageMode::CrossHatch]
    }

    /// Number of flight passes over the area.
    pub fn passes(&self) -> u32 {
        match self {
            CoverageMode::Single => 1,
            CoverageMode::CrossHatch => 2,
        }
    }

    #[inline]
    pub fn is_cross_hatch(&self) -> bool {
        matches!(self, CoverageMode::CrossHatch)
    }
}

/// One clipped chord of a scan-line family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanLine {
    /// Position in the family; odd lines are flown in reverse.
    pub index: usize,
    pub points: Vec<Point>,
}

impl ScanLine {
    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Great-circle length in meters.
    pub fn length_m(&self) -> f64 {
        path_length_m(&self.points)
    }
}

/// Everything derived from a ring, angle, spacing and mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoveragePlan {
    /// Scan lines at the requested angle.
    pub primary_lines: Vec<ScanLine>,
    /// Orthogonal overlay lines; empty unless cross-hatching.
    pub secondary_lines: Vec<ScanLine>,
    /// The primary family stitched into one back-and-forth route.
    pub path: Vec<Point>,
}

impl CoveragePlan {
    pub fn is_empty(&self) -> bool {
        self.primary_lines.is_empty() && self.path.is_empty()
    }

    /// Number of rendered lines across both families.
    pub fn line_count(&self) -> usize {
        self.primary_lines.len() + self.secondary_lines.len()
    }

    /// Length of the stitched path in meters, including the connecting legs
    /// between passes.
    pub fn path_length_m(&self) -> f64 {
        path_length_m(&self.path)
    }
}

/// Total great-circle length of a polyline, meters.
pub fn path_length_m(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|pair| geo::distance_m(pair[0], pair[1]))
        .sum()
}

/// Convert a ground spacing to degrees of latitude.
#[inline]
pub fn spacing_to_degrees(spacing_m: f64) -> f64 {
    spacing_m / METERS_PER_DEGREE_LAT
}

/// Horizontal probes across a bounding box, bottom to top.
pub fn generate_scan_probes(bbox: (f64, f64, f64, f64), spacing_deg: f64) -> Vec<Segment> {
    let (min_lng, min_lat, max_lng, max_lat) = bbox;
    if !(spacing_deg > 0.0) {
        return Vec::new();
    }

    let overshoot = (max_lng - min_lng) * PROBE_OVERSHOOT;
    let west = min_lng - overshoot;
    let east = max_lng + overshoot;

    let mut probes = Vec::new();
    let mut k = 0usize;
    loop {
        let lat = min_lat + (k as f64 + 0.5) * spacing_deg;
        if lat >= max_lat {
            break;
        }
        probes.push(Segment::new(Point::new(lat, west), Point::new(lat, east)));
        k += 1;
    }
    probes
}

/// One family of scan lines at `angle_deg`, clipped to the ring.
///
/// Fewer than three vertices, or a non-positive spacing, yield no lines.
pub fn generate_scan_lines(ring: &VertexRing, angle_deg: f64, spacing_m: f64) -> Vec<ScanLine> {
    if !ring.is_valid() || !(spacing_m > 0.0) || !spacing_m.is_finite() {
        return Vec::new();
    }
    let Some(pivot) = geo::centroid(ring.points()) else {
        return Vec::new();
    };

    let rotated = geo::rotate_points(ring.points(), pivot, -angle_deg);
    let Some(bbox) = geo::bounding_box(&rotated) else {
        return Vec::new();
    };

    let probes = generate_scan_probes(bbox, spacing_to_degrees(spacing_m));
    let chords: Vec<Segment> = clip_lines_to_polygon(&probes, &rotated)
        .into_iter()
        .flatten()
        .collect();

    debug!(
        "angle {:.1}: {} probes -> {} chords",
        angle_deg,
        probes.len(),
        chords.len()
    );

    chords
        .into_iter()
        .enumerate()
        .map(|(index, chord)| ScanLine {
            index,
            points: geo::rotate_points(&[chord.start, chord.end], pivot, angle_deg),
        })
        .collect()
}

/// Stitch a family into one route, reversing every odd-indexed line.
pub fn stitch_boustrophedon(lines: &[ScanLine]) -> Vec<Point> {
    let mut path = Vec::with_capacity(lines.len() * 2);
    for line in lines {
        if line.index % 2 == 0 {
            path.extend(line.points.iter().copied());
        } else {
            path.extend(line.points.iter().rev().copied());
        }
    }
    path
}

/// Plan the coverage of a ring.
///
/// This is the main entry point: it is cheap enough to call on every ring,
/// angle, spacing or mode change.
pub fn plan_coverage(
    ring: &VertexRing,
    angle_deg: f64,
    spacing_m: f64,
    mode: CoverageMode,
) -> CoveragePlan {
    if !ring.is_valid() {
        return CoveragePlan::default();
    }
    if !(spacing_m > 0.0) || !spacing_m.is_finite() {
        warn!("Line spacing must be a positive length, got {}", spacing_m);
        return CoveragePlan::default();
    }

    let primary_lines = generate_scan_lines(ring, angle_deg, spacing_m);
    let path = stitch_boustrophedon(&primary_lines);

    let secondary_lines = if mode.is_cross_hatch() {
        generate_scan_lines(ring, angle_deg + 90.0, spacing_m)
    } else {
        Vec::new()
    };

    CoveragePlan {
        primary_lines,
        secondary_lines,
        path,
    }
}

// ============================================================================
// TESTS
// ============================================================================
