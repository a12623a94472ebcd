//! Drag gestures on the survey ring: move, rotate and edge resize.
//!
//! Every gesture starts by capturing a [`DragSnapshot`]. Each pointer-move
//! event then computes a fresh ring from that snapshot and the live pointer
//! position, never from the previous frame's output. A long drag therefore
//! cannot accumulate rounding error, and dropping or reordering intermediate
//! events only changes how smooth the preview looks.
//!
//! ## Rust Lesson #9: Values instead of hidden state
//!
//! In an event-callback UI it is tempting to stash "where the drag started"
//! in mutable fields. Here the start state is an immutable value that the
//! caller owns for the length of the gesture and passes to pure functions.
//! Dropping the value is how a gesture gets cancelled.

use crate::geo;
use crate::geometry::{Point, VertexRing};

/// Half-length of the probe line used to constrain edge dragging, meters.
const RESIZE_PROBE_HALF_LENGTH_M: f64 = 10_000.0;

/// Spacing of the probe's sample points. A straight chord in degree space
/// sags off the great circle over long distances, so the probe is a
/// polyline rather than a single segment.
const RESIZE_PROBE_STEP_M: f64 = 100.0;

/// Edge offsets below this are treated as "pointer still on the edge".
const RESIZE_NOOP_M: f64 = 1e-3;

/// What the gesture does, plus any state it captured at the start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragKind {
    Move,
    Rotate {
        centroid: Point,
        /// Bearing from the centroid to the rotate handle at gesture start.
        start_bearing: f64,
    },
    EdgeResize {
        /// The dragged edge runs from vertex `edge` to `(edge + 1) % len`.
        edge: usize,
    },
}

/// Immutable start state of one drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSnapshot {
    ring: VertexRing,
    pointer_start: Point,
    kind: DragKind,
}

impl DragSnapshot {
    /// Start dragging the whole ring.
    pub fn begin_move(ring: &VertexRing, pointer: Point) -> Self {
        Self {
            ring: ring.clone(),
            pointer_start: pointer,
            kind: DragKind::Move,
        }
    }

    /// Start rotating about the ring's centroid with the handle at `handle`.
    ///
    /// Returns `None` for an empty ring, which has nothing to rotate about.
    pub fn begin_rotate(ring: &VertexRing, handle: Point) -> Option<Self> {
        let centroid = geo::centroid(ring.points())?;
        Some(Self {
            ring: ring.clone(),
            pointer_start: handle,
            kind: DragKind::Rotate {
                centroid,
                start_bearing: geo::bearing(centroid, handle),
            },
        })
    }

    /// Start dragging edge `edge` perpendicular to itself.
    ///
    /// Returns `None` when the ring has no such edge.
    pub fn begin_edge_resize(ring: &VertexRing, edge: usize, pointer: Point) -> Option<Self> {
        ring.edge(edge)?;
        Some(Self {
            ring: ring.clone(),
            pointer_start: pointer,
            kind: DragKind::EdgeResize { edge },
        })
    }

    /// The ring as it was when the gesture started.
    pub fn ring(&self) -> &VertexRing {
        &self.ring
    }

    pub fn pointer_start(&self) -> Point {
        self.pointer_start
    }

    pub fn kind(&self) -> DragKind {
        self.kind
    }

    /// Ring for the live pointer position, whatever the gesture kind.
    pub fn apply(&self, pointer: Point) -> VertexRing {
        match self.kind {
            DragKind::Move => apply_move(self, pointer),
            DragKind::Rotate { .. } => apply_rotate(self, pointer),
            DragKind::EdgeResize { .. } => apply_edge_resize(self, pointer),
        }
    }
}

/// Shift every vertex by the same raw degree delta.
pub fn translate(ring: &VertexRing, dlat: f64, dlng: f64) -> VertexRing {
    ring.points().iter().map(|p| p.offset(dlat, dlng)).collect::<Vec<_>>().into()
}

/// Move: every snapshot vertex shifted by `pointer - pointer_start`.
///
/// Shape and orientation are untouched; only position changes.
pub fn apply_move(snapshot: &DragSnapshot, pointer: Point) -> VertexRing {
    let dlat = pointer.lat - snapshot.pointer_start.lat;
    let dlng = pointer.lng - snapshot.pointer_start.lng;
    translate(&snapshot.ring, dlat, dlng)
}

/// Rotate: every snapshot vertex turned about the snapshot centroid by the
/// change in the handle's bearing.
///
/// Distances to the centroid are preserved, so this never scales. A
/// snapshot that was not started as a rotation is returned unchanged.
pub fn apply_rotate(snapshot: &DragSnapshot, pointer: Point) -> VertexRing {
    let DragKind::Rotate { centroid, start_bearing } = snapshot.kind else {
        return snapshot.ring.clone();
    };

    let angle_delta = geo::bearing(centroid, pointer) - start_bearing;
    geo::rotate_points(snapshot.ring.points(), centroid, angle_delta).into()
}

/// Edge resize: slide the dragged edge along its normal.
///
/// The pointer is projected onto a probe line through the edge midpoint
/// along the normal, so sideways motion along the edge does nothing. Both
/// edge endpoints move by the signed offset; every other vertex is copied
/// from the snapshot untouched.
pub fn apply_edge_resize(snapshot: &DragSnapshot, pointer: Point) -> VertexRing {
    let DragKind::EdgeResize { edge } = snapshot.kind else {
        return snapshot.ring.clone();
    };
    let Some(segment) = snapshot.ring.edge(edge) else {
        return snapshot.ring.clone();
    };
    // Coincident endpoints have no bearing, hence no normal to slide along
    if segment.length_m() < RESIZE_NOOP_M {
        return snapshot.ring.clone();
    }

    let edge_bearing = geo::bearing(segment.start, segment.end);
    let normal = edge_bearing + 90.0;
    let mid = segment.midpoint();

    let probe = normal_probe(mid, normal);
    let Some(projected) = geo::nearest_point_on_line(&probe, pointer) else {
        return snapshot.ring.clone();
    };

    let offset = geo::distance_m(mid, projected.point);
    if offset < RESIZE_NOOP_M {
        return snapshot.ring.clone();
    }

    let outward = geo::normalize_angle(geo::bearing(mid, projected.point) - normal).abs() < 90.0;
    let direction = if outward { normal } else { normal + 180.0 };

    let mut resized = snapshot.ring.clone();
    let n = resized.len();
    let points = resized.points_mut();
    points[edge] = geo::destination(points[edge], offset, direction);
    let next = (edge + 1) % n;
    points[next] = geo::destination(points[next], offset, direction);
    resized
}

/// Polyline through `mid` along `normal`, running from the inward end to
/// the outward end. `mid` itself is one of the samples.
fn normal_probe(mid: Point, normal: f64) -> Vec<Point> {
    let steps = (RESIZE_PROBE_HALF_LENGTH_M / RESIZE_PROBE_STEP_M) as i32;
    (-steps..=steps)
        .map(|k| match k.cmp(&0) {
            std::cmp::Ordering::Less => {
                geo::destination(mid, -k as f64 * RESIZE_PROBE_STEP_M, normal + 180.0)
            }
            std::cmp::Ordering::Equal => mid,
            std::cmp::Ordering::Greater => {
                geo::destination(mid, k as f64 * RESIZE_PROBE_STEP_M, normal)
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
