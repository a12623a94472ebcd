//! Turning a coverage path into a flight controller mission.
//!
//! The item list mirrors what an autopilot upload looks like: climb to the
//! survey altitude, fly every path point at that altitude, then return to
//! launch.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

const METERS_PER_FOOT: f64 = 0.3048;

/// Operators enter altitude in feet; the autopilot wants meters.
#[inline]
pub fn feet_to_meters(feet: f64) -> f64 {
    feet * METERS_PER_FOOT
}

#[inline]
pub fn meters_to_feet(meters: f64) -> f64 {
    meters / METERS_PER_FOOT
}

/// One command in the uploaded mission.
///
/// ## Rust Lesson #11: Tagged enums in serde
///
/// `#[serde(tag = "type")]` turns `Waypoint { lat, lng, .. }` into
/// `{ "type": "waypoint", "lat": .., "lng": .. }` - the same shape you'd
/// hand-build for a JS discriminated union.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MissionItem {
    Takeoff { altitude_m: f64 },
    Waypoint { lat: f64, lng: f64, altitude_m: f64 },
    ReturnToLaunch,
}

impl MissionItem {
    /// MAVLink command number for this item.
    pub fn command_id(&self) -> u16 {
        match self {
            MissionItem::Takeoff { .. } => 22,
            MissionItem::Waypoint { .. } => 16,
            MissionItem::ReturnToLaunch => 20,
        }
    }
}

/// Takeoff, one waypoint per path point, return to launch.
///
/// An empty path has nothing to fly, so it yields an empty mission rather
/// than a takeoff straight into RTL.
pub fn build_mission(path: &[Point], altitude_m: f64) -> Vec<MissionItem> {
    if path.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::with_capacity(path.len() + 2);
    items.push(MissionItem::Takeoff { altitude_m });
    items.extend(path.iter().map(|p| MissionItem::Waypoint {
        lat: p.lat,
        lng: p.lng,
        altitude_m,
    }));
    items.push(MissionItem::ReturnToLaunch);
    items
}

// ============================================================================
// TESTS
// ============================================================================
