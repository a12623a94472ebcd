//! Stats command implementation.

use anyhow::{Context, Result, bail};
use serde::Serialize;

use survey_grid::meters_to_feet;

use super::mission_file::{LoadedMission, SurveyOverrides};
use super::plan::PlannedMission;

/// Summary numbers in JSON output.
#[derive(Serialize)]
struct JsonStats<'a> {
    name: &'a str,
    mode: &'static str,
    vertices: usize,
    area_m2: f64,
    lines: usize,
    waypoints: usize,
    path_length_m: f64,
    altitude_m: f64,
    images: u64,
    duration_seconds: f64,
    batteries: u32,
}

/// Execute the stats command.
pub fn cmd_stats(args: &[String]) -> Result<()> {
    let mut mission_path: Option<&str> = None;
    let mut json = false;
    let mut overrides = SurveyOverrides::default();

    let mut i = 0;
    while i < args.len() {
        if overrides.parse_flag(args, &mut i)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "--json" => json = true,
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
    let settings = planned.mission.settings;
    let stats = planned.stats;

    if json {
        let output = JsonStats {
            name: &planned.mission.file.name,
            mode: settings.mode.name(),
            vertices: planned.mission.ring.len(),
            area_m2: planned.area_m2,
            lines: planned.plan.line_count(),
            waypoints: planned.plan.path.len(),
            path_length_m: planned.plan.path_length_m(),
            altitude_m: settings.altitude_m,
            images: stats.images,
            duration_seconds: stats.duration_seconds,
            batteries: stats.batteries,
        };
        println!("{}", serde_json::to_string_pretty(&output).context("Failed to serialize JSON")?);
        return Ok(());
    }

    println!("═══════════════════════════════════════════════");
    println!("  SURVEY: {}", planned.mission.file.name);
    println!("═══════════════════════════════════════════════");
    println!("  Mode:          {}", settings.mode.name());
    println!("  Vertices:      {}", planned.mission.ring.len());
    println!("  Area:          {:.0} m² ({:.2} ha)", planned.area_m2, planned.area_m2 / 10_000.0);
    println!("  Lines:         {}", planned.plan.line_count());
    println!("  Waypoints:     {}", planned.plan.path.len());
    println!("  Path length:   {:.0} m", planned.plan.path_length_m());
    println!("  Altitude:      {:.1} m ({:.0} ft)", settings.altitude_m, meters_to_feet(settings.altitude_m));
    println!("  Images:        {}", stats.images);
    println!("  Duration:      {:.0} s (~{} min)", stats.duration_seconds, stats.duration_minutes());
    println!("  Batteries:     {}", stats.batteries);
    println!("═══════════════════════════════════════════════");
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: survey-grid stats <mission.yaml> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --json                  Output as JSON");
    eprintln!("  -a, --angle <deg>       Scan line angle");
    eprintln!("  -s, --spacing <m>       Line spacing in meters");
    eprintln!("  --crosshatch | --single Coverage mode");
    eprintln!("  --altitude-ft <ft>      Flight altitude in feet");
}
