//! CLI command implementations.
//!
//! This module contains the implementations for the various CLI subcommands:
//! - `plan` - Plan coverage for a mission file (JSON, KML or SVG)
//! - `stats` - Print capture statistics for a mission file
//! - `preview` - Rasterize the planned survey to PNG
//! - `benchmark` - Time coverage planning
//! - `example` - Print an example mission file

pub mod benchmark;
pub mod common;
pub mod mission_file;
pub mod plan;
pub mod preview;
pub mod stats;

pub use benchmark::cmd_benchmark;
pub use mission_file::print_example;
pub use plan::cmd_plan;
pub use preview::cmd_preview;
pub use stats::cmd_stats;
