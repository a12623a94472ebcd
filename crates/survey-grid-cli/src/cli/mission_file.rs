//! Mission files: a survey area and its flight settings in YAML.
//!
//! A mission names its polygon directly as a closed `[lat, lng]` list, or
//! just an anchor point, in which case the default square is laid out
//! around it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use survey_grid::{
    CoverageMode, Point, StatsModel, SurveySettings, VertexRing, feet_to_meters,
};

/// A complete mission definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionFile {
    /// Mission name/title
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Project location, used when no polygon was saved yet
    #[serde(default)]
    pub anchor: Option<Point>,

    /// Closed ring of `[lat, lng]` pairs (first point repeated at the end)
    #[serde(default)]
    pub polygon: Option<Vec<[f64; 2]>>,

    /// Side of the default square around the anchor, meters
    #[serde(default = "default_side_m")]
    pub default_side_m: f64,

    #[serde(default)]
    pub survey: SurveyConfig,

    /// Overrides for the statistics model
    #[serde(default)]
    pub stats: StatsModel,
}

fn default_side_m() -> f64 {
    200.0
}

/// Flight settings as an operator writes them (altitude in feet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(default)]
    pub angle_deg: f64,

    #[serde(default = "default_spacing_m")]
    pub spacing_m: f64,

    #[serde(default)]
    pub mode: CoverageMode,

    #[serde(default = "default_altitude_ft")]
    pub altitude_ft: f64,
}

fn default_spacing_m() -> f64 {
    20.0
}

fn default_altitude_ft() -> f64 {
    100.0
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            angle_deg: 0.0,
            spacing_m: default_spacing_m(),
            mode: CoverageMode::Single,
            altitude_ft: default_altitude_ft(),
        }
    }
}

/// Command-line overrides for the survey block.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurveyOverrides {
    pub angle_deg: Option<f64>,
    pub spacing_m: Option<f64>,
    pub mode: Option<CoverageMode>,
    pub altitude_ft: Option<f64>,
}

impl SurveyOverrides {
    /// Try to consume the flag at `args[*i]` (and its value).
    ///
    /// Returns `Ok(false)` when the flag is not a survey override, leaving
    /// `i` untouched.
    pub fn parse_flag(&mut self, args: &[String], i: &mut usize) -> Result<bool> {
        match args[*i].as_str() {
            "-a" | "--angle" => self.angle_deg = Some(take_number(args, i)?),
            "-s" | "--spacing" => self.spacing_m = Some(take_number(args, i)?),
            "--altitude-ft" => self.altitude_ft = Some(take_number(args, i)?),
            "--crosshatch" => self.mode = Some(CoverageMode::CrossHatch),
            "--single" => self.mode = Some(CoverageMode::Single),
            "-m" | "--mode" => {
                let name = take_value(args, i)?;
                let mode = CoverageMode::from_name(name)
                    .with_context(|| format!("Unknown mode: {}. Use 'single' or 'crosshatch'.", name))?;
                self.mode = Some(mode);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Value following the flag at `args[*i]`; advances `i` past it.
pub fn take_value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .with_context(|| format!("Missing value for {}", flag))
}

pub fn take_number(args: &[String], i: &mut usize) -> Result<f64> {
    let flag = args[*i].clone();
    let raw = take_value(args, i)?;
    raw.parse()
        .with_context(|| format!("Invalid number for {}: {}", flag, raw))
}

impl MissionFile {
    /// Load a mission from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read mission file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse mission file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// The survey ring: the saved polygon, or the default square around the
    /// anchor.
    pub fn ring(&self) -> Result<VertexRing> {
        if let Some(coords) = &self.polygon {
            let ring = VertexRing::from_closed_coordinates(coords);
            if !ring.is_valid() {
                log::warn!(
                    "Mission '{}' polygon has only {} vertices; nothing will be planned",
                    self.name,
                    ring.len()
                );
            }
            return Ok(ring);
        }

        match self.anchor {
            Some(anchor) => {
                log::info!(
                    "No polygon saved, using a {} m square around {:.6}, {:.6}",
                    self.default_side_m,
                    anchor.lat,
                    anchor.lng
                );
                Ok(VertexRing::default_square(anchor, self.default_side_m))
            }
            None => bail!("Mission '{}' has neither a polygon nor an anchor", self.name),
        }
    }

    /// Flight settings with command-line overrides applied, altitude in
    /// meters.
    pub fn settings(&self, overrides: &SurveyOverrides) -> SurveySettings {
        let altitude_ft = overrides.altitude_ft.unwrap_or(self.survey.altitude_ft);
        SurveySettings {
            angle_deg: overrides.angle_deg.unwrap_or(self.survey.angle_deg),
            spacing_m: overrides.spacing_m.unwrap_or(self.survey.spacing_m),
            mode: overrides.mode.unwrap_or(self.survey.mode),
            altitude_m: feet_to_meters(altitude_ft),
        }
    }
}

/// Everything a command needs, loaded from a path and flags.
pub struct LoadedMission {
    pub file: MissionFile,
    pub ring: VertexRing,
    pub settings: SurveySettings,
}

impl LoadedMission {
    pub fn load(path: &str, overrides: &SurveyOverrides) -> Result<Self> {
        log::info!("Loading mission: {}", path);
        let file = MissionFile::load(path)?;
        let ring = file.ring()?;
        let settings = file.settings(overrides);
        log::info!(
            "Mission '{}': {} vertices, {} mode, {:.0}° at {} m spacing, {:.1} m altitude",
            file.name,
            ring.len(),
            settings.mode.name(),
            settings.angle_deg,
            settings.spacing_m,
            settings.altitude_m
        );
        Ok(Self { file, ring, settings })
    }
}

/// Print an example mission YAML.
pub fn print_example() {
    println!("{}", EXAMPLE_MISSION);
}

pub const EXAMPLE_MISSION: &str = r##"# Example survey-grid mission
name: "North pasture"
description: "Orthomosaic of the north pasture before haymaking"

# Project location. Used to lay out a default square when no polygon
# has been drawn yet.
anchor: { lat: 47.3769, lng: 8.5417 }
default_side_m: 200

# Closed ring of [lat, lng] pairs, first point repeated at the end.
polygon:
  - [47.37750, 8.54050]
  - [47.37790, 8.54290]
  - [47.37640, 8.54340]
  - [47.37590, 8.54120]
  - [47.37750, 8.54050]

survey:
  angle_deg: 30       # scan line rotation, clockwise from east-west
  spacing_m: 20       # distance between passes
  mode: single        # single | crosshatch
  altitude_ft: 100

# Optional overrides for the capture model
stats:
  overlap: 0.7
  seconds_per_image: 2.0
  battery_endurance_seconds: 1200
"##;

// ============================================================================
// TESTS
// ============================================================================
