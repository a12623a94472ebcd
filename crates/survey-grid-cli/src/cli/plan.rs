//! Plan command implementation.

use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use survey_grid::{
    CoveragePlan, MissionItem, MissionStats, Point, ScanLine, SurveySettings, build_mission, export, geo,
    plan_coverage,
};

use super::common::{OutputFormat, plan_to_svg, write_output};
use super::mission_file::{LoadedMission, SurveyOverrides, take_value};

/// SVG canvas size for `--svg` output.
const SVG_WIDTH: u32 = 1200;
const SVG_HEIGHT: u32 = 900;

/// A mission item in JSON output, with its autopilot command number.
#[derive(Serialize)]
struct JsonMissionItem {
    command: u16,
    #[serde(flatten)]
    item: MissionItem,
}

/// JSON output of a planned survey.
#[derive(Serialize)]
struct JsonPlan<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    generated_at: String,
    settings: SurveySettings,
    /// Closed ring, `[lat, lng]` pairs
    polygon: Vec<[f64; 2]>,
    area_m2: f64,
    primary_lines: &'a [ScanLine],
    secondary_lines: &'a [ScanLine],
    path: &'a [Point],
    path_length_m: f64,
    mission: Vec<JsonMissionItem>,
    stats: MissionStats,
}

/// Plan a mission: everything the other commands print, computed once.
pub struct PlannedMission {
    pub mission: LoadedMission,
    pub plan: CoveragePlan,
    pub area_m2: f64,
    pub stats: MissionStats,
}

impl PlannedMission {
    pub fn compute(mission: LoadedMission) -> PlannedMission {
        let start = Instant::now();
        let settings = mission.settings;
        let plan = plan_coverage(&mission.ring, settings.angle_deg, settings.spacing_m, settings.mode);
        let area_m2 = geo::area(mission.ring.points());
        let stats = mission.file.stats.estimate_with_path(
            area_m2,
            settings.altitude_m,
            settings.mode,
            plan.path_length_m(),
        );

        log::info!(
            "Planned {} lines ({} waypoints) in {:?}",
            plan.line_count(),
            plan.path.len(),
            start.elapsed()
        );
        if plan.is_empty() {
            log::warn!("Nothing to fly: the polygon produced no scan lines");
        }

        PlannedMission { mission, plan, area_m2, stats }
    }

    pub fn to_json(&self) -> Result<String> {
        let settings = self.mission.settings;
        let mission = build_mission(&self.plan.path, settings.altitude_m)
            .into_iter()
            .map(|item| JsonMissionItem { command: item.command_id(), item })
            .collect();

        let output = JsonPlan {
            name: &self.mission.file.name,
            description: self.mission.file.description.as_deref(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            settings,
            polygon: self.mission.ring.to_closed_coordinates(),
            area_m2: self.area_m2,
            primary_lines: &self.plan.primary_lines,
            secondary_lines: &self.plan.secondary_lines,
            path: &self.plan.path,
            path_length_m: self.plan.path_length_m(),
            mission,
            stats: self.stats,
        };
        serde_json::to_string_pretty(&output).context("Failed to serialize JSON")
    }

    pub fn to_kml(&self) -> Result<String> {
        Ok(export::to_kml(&self.mission.file.name, &self.mission.ring, &self.plan)?)
    }

    pub fn to_svg(&self, width: u32, height: u32) -> String {
        plan_to_svg(&self.mission.file.name, &self.mission.ring, &self.plan, width, height)
    }
}

/// Execute the plan command.
pub fn cmd_plan(args: &[String]) -> Result<()> {
    let mut mission_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut format = OutputFormat::Json;
    let mut overrides = SurveyOverrides::default();

    let mut i = 0;
    while i < args.len() {
        if overrides.parse_flag(args, &mut i)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "-o" | "--output" => {
                output_path = Some(take_value(args, &mut i)?);
            }
            "-f" | "--format" => {
                let name = take_value(args, &mut i)?;
                format = OutputFormat::from_name(name)
                    .with_context(|| format!("Unknown format: {}. Use 'json', 'kml' or 'svg'.", name))?;
            }
            "--json" => format = OutputFormat::Json,
            "--kml" => format = OutputFormat::Kml,
            "--svg" => format = OutputFormat::Svg,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            path if !path.starts_with('-') => {
                if mission_path.is_none() {
                    mission_path = Some(path);
                }
            }
            unknown => bail!("Unknown option: {}", unknown),
        }
        i += 1;
    }

    let Some(mission_path) = mission_path else {
        print_usage();
        bail!("Mission file required");
    };

    let planned = PlannedMission::compute(LoadedMission::load(mission_path, &overrides)?);

    let output = match format {
        OutputFormat::Json => planned.to_json()?,
        OutputFormat::Kml => planned.to_kml()?,
        OutputFormat::Svg => planned.to_svg(SVG_WIDTH, SVG_HEIGHT),
    };

    write_output(output_path, &output)
}

fn print_usage() {
    eprintln!("Usage: survey-grid plan <mission.yaml> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>     Output file (default: stdout)");
    eprintln!("  -f, --format <fmt>      json, kml or svg (default: json)");
    eprintln!("  --json | --kml | --svg  Shorthand for --format");
    eprintln!("  -a, --angle <deg>       Scan line angle (overrides mission file)");
    eprintln!("  -s, --spacing <m>       Line spacing in meters");
    eprintln!("  -m, --mode <mode>       single or crosshatch");
    eprintln!("  --crosshatch | --single Shorthand for --mode");
    eprintln!("  --altitude-ft <ft>      Flight altitude in feet");
}
