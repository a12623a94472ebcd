//! # survey-grid
//!
//! Survey polygon editing and coverage planning for aerial imaging
//! missions.
//!
//! An operator outlines a field; this crate reshapes that outline through
//! drag gestures, turns it into a back-and-forth ("lawnmower") flight path,
//! and estimates how many images, minutes and batteries the flight takes.
//!
//! ## Rust Lesson #1: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Unlike Node.js, you must explicitly declare every module.

pub mod clip;
pub mod coverage;
pub mod error;
pub mod export;
pub mod geo;
pub mod geometry;
pub mod mission;
pub mod session;
pub mod stats;
pub mod topology;
pub mod transform;

// Re-export common types at crate root for convenience.
pub use clip::{clip_line_to_polygon, clip_lines_to_polygon, point_in_polygon};
pub use coverage::{CoverageMode, CoveragePlan, ScanLine, plan_coverage};
pub use error::{Result, SurveyError};
pub use geo::{LengthUnit, NearestPoint};
pub use geometry::{MIN_RING_VERTICES, Point, Segment, VertexRing};
pub use mission::{MissionItem, build_mission, feet_to_meters, meters_to_feet};
pub use session::{EditSession, SurveySettings};
pub use stats::{MissionStats, StatsModel, estimate_stats};
pub use topology::{insert_vertex, remove_vertex};
pub use transform::{DragKind, DragSnapshot, apply_edge_resize, apply_move, apply_rotate};
