//! An editing session: the committed ring plus at most one gesture in
//! flight.
//!
//! The host calls `begin_*` on pointer-down, `drag_to` on every pointer
//! move (rendering whatever it returns), then either `end_gesture` to
//! commit or `cancel_gesture` to throw the drag away. Nothing touches the
//! committed ring until `end_gesture`.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::coverage::{CoverageMode, CoveragePlan, plan_coverage};
use crate::error::Result;
use crate::geo;
use crate::geometry::{Point, VertexRing};
use crate::mission::{MissionItem, build_mission};
use crate::stats::{MissionStats, StatsModel};
use crate::topology;
use crate::transform::DragSnapshot;

/// Survey parameters the operator picks next to the polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveySettings {
    /// Scan line bearing offset; 0 flies east-west passes.
    pub angle_deg: f64,
    pub spacing_m: f64,
    pub mode: CoverageMode,
    pub altitude_m: f64,
}

impl Default for SurveySettings {
    fn default() -> Self {
        Self {
            angle_deg: 0.0,
            spacing_m: 20.0,
            mode: CoverageMode::Single,
            altitude_m: 30.0,
        }
    }
}

/// Owns the survey ring for one editing session.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    ring: VertexRing,
    gesture: Option<DragSnapshot>,
}

impl EditSession {
    pub fn new(ring: VertexRing) -> Self {
        Self { ring, gesture: None }
    }

    /// Session seeded with the default square around a project anchor.
    pub fn around_anchor(anchor: Point, side_m: f64) -> Self {
        Self::new(VertexRing::default_square(anchor, side_m))
    }

    /// The committed ring. During a drag this is still the pre-drag ring.
    pub fn ring(&self) -> &VertexRing {
        &self.ring
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn begin_move(&mut self, pointer: Point) {
        self.gesture = Some(DragSnapshot::begin_move(&self.ring, pointer));
    }

    /// Returns `false` for an empty ring. A gesture already in flight is
    /// only replaced when the new one starts.
    pub fn begin_rotate(&mut self, handle: Point) -> bool {
        self.start(DragSnapshot::begin_rotate(&self.ring, handle))
    }

    /// Returns `false` when `edge` does not exist, leaving any gesture in
    /// flight alone.
    pub fn begin_edge_resize(&mut self, edge: usize, pointer: Point) -> bool {
        self.start(DragSnapshot::begin_edge_resize(&self.ring, edge, pointer))
    }

    fn start(&mut self, snapshot: Option<DragSnapshot>) -> bool {
        match snapshot {
            Some(snapshot) => {
                self.gesture = Some(snapshot);
                true
            }
            None => false,
        }
    }

    /// Preview ring for the live pointer. `None` when no gesture is active.
    pub fn drag_to(&self, pointer: Point) -> Option<VertexRing> {
        self.gesture.as_ref().map(|snapshot| snapshot.apply(pointer))
    }

    /// Commit the gesture at its final pointer position.
    ///
    /// Returns `false` if there was no gesture to end.
    pub fn end_gesture(&mut self, pointer: Point) -> bool {
        match self.gesture.take() {
            Some(snapshot) => {
                self.ring = snapshot.apply(pointer);
                true
            }
            None => false,
        }
    }

    pub fn cancel_gesture(&mut self) {
        if self.gesture.take().is_some() {
            debug!("Gesture cancelled, ring unchanged");
        }
    }

    /// Insert a vertex nearest `click`; returns its index.
    ///
    /// Any gesture in flight is discarded first.
    pub fn insert_vertex(&mut self, click: Point) -> Result<usize> {
        self.cancel_gesture();
        let (ring, index) = topology::insert_vertex(&self.ring, click)?;
        self.ring = ring;
        Ok(index)
    }

    /// Remove vertex `index`. On error the ring is left as it was.
    pub fn remove_vertex(&mut self, index: usize) -> Result<()> {
        self.cancel_gesture();
        self.ring = topology::remove_vertex(&self.ring, index)?;
        Ok(())
    }

    /// Swap in a whole new ring, e.g. after loading a saved mission.
    pub fn replace_ring(&mut self, ring: VertexRing) {
        self.gesture = None;
        self.ring = ring;
    }

    /// Area of the committed ring, m².
    pub fn area_m2(&self) -> f64 {
        geo::area(self.ring.points())
    }

    pub fn plan(&self, settings: &SurveySettings) -> CoveragePlan {
        plan_coverage(&self.ring, settings.angle_deg, settings.spacing_m, settings.mode)
    }

    /// Statistics for the committed ring, counting the flown path too.
    pub fn stats(&self, settings: &SurveySettings, model: &StatsModel) -> MissionStats {
        let plan = self.plan(settings);
        model.estimate_with_path(
            self.area_m2(),
            settings.altitude_m,
            settings.mode,
            plan.path_length_m(),
        )
    }

    pub fn mission(&self, settings: &SurveySettings) -> Vec<MissionItem> {
        build_mission(&self.plan(settings).path, settings.altitude_m)
    }
}

// ============================================================================
// TESTS
// ============================================================================
