//! Adding and removing ring vertices.

use log::warn;

use crate::error::{Result, SurveyError};
use crate::geo;
use crate::geometry::{MIN_RING_VERTICES, Point, VertexRing};

/// Insert a vertex where `click` projects onto the ring boundary.
///
/// The boundary includes the closing edge, so clicking near the edge from
/// the last vertex back to the first appends the new vertex at the end.
/// Returns the new ring and the index the vertex landed at.
pub fn insert_vertex(ring: &VertexRing, click: Point) -> Result<(VertexRing, usize)> {
    if ring.len() < 2 {
        return Err(SurveyError::TooFewVertices { len: ring.len() });
    }

    let closed = ring.closed_points();
    let nearest = geo::nearest_point_on_line(&closed, click)
        .ok_or(SurveyError::TooFewVertices { len: ring.len() })?;

    let index = nearest.segment_index + 1;
    let mut points = ring.points().to_vec();
    points.insert(index, nearest.point);
    Ok((VertexRing::new(points), index))
}

/// Remove vertex `index`, refusing to go below the minimum ring size.
pub fn remove_vertex(ring: &VertexRing, index: usize) -> Result<VertexRing> {
    if ring.len() <= MIN_RING_VERTICES {
        warn!(
            "Cannot remove vertex {}: a survey polygon needs at least {} vertices",
            index, MIN_RING_VERTICES
        );
        return Err(SurveyError::MinimumVertices);
    }
    if index >= ring.len() {
        return Err(SurveyError::VertexIndexOutOfRange { index, len: ring.len() });
    }

    let mut points = ring.points().to_vec();
    points.remove(index);
    Ok(VertexRing::new(points))
}

// ============================================================================
// TESTS
// ============================================================================
