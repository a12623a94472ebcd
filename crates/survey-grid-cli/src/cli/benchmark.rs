//! Benchmark command implementation.

use std::time::Instant;

use anyhow::{Context, Result, bail};

use survey_grid::{CoverageMode, DragSnapshot, plan_coverage};

use super::mission_file::{LoadedMission, SurveyOverrides, take_value};

const DEFAULT_ITERATIONS: u32 = 200;

/// Execute the benchmark command.
pub fn cmd_benchmark(args: &[String]) -> Result<()> {
    let mut mission_path: Option<&str> = None;
    let mut iterations = DEFAULT_ITERATIONS;
    let mut overrides = SurveyOverrides::default();

    let mut i = 0;
    while i < args.len() {
        if overrides.parse_flag(args, &mut i)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "-n" | "--iterations" => {
                let raw = take_value(args, &mut i)?;
                iterations = raw
                    .parse()
                    .with_context(|| format!("Invalid iteration count: {}", raw))?;
            }
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
    let iterations = iterations.max(1);

    let start_load = Instant::now();
    let mission = LoadedMission::load(mission_path, &overrides)?;
    println!("Loaded '{}' ({} vertices) in {:?}", mission.file.name, mission.ring.len(), start_load.elapsed());

    let settings = mission.settings;
    let ring = &mission.ring;

    println!("\nPlanning {} times...", iterations);
    let mut results = Vec::new();
    for mode in CoverageMode::all() {
        let start = Instant::now();
        let mut lines = 0;
        for _ in 0..iterations {
            lines = plan_coverage(ring, settings.angle_deg, settings.spacing_m, *mode).line_count();
        }
        results.push((mode.name(), lines, start.elapsed()));
    }

    // A drag frame: rotate from the snapshot, then replan
    let drag_time = match ring.points().first().and_then(|&handle| DragSnapshot::begin_rotate(ring, handle)) {
        Some(snapshot) => {
            let start = Instant::now();
            for k in 0..iterations {
                let pointer = survey_grid::geo::destination(snapshot.pointer_start(), 1.0, k as f64);
                let preview = snapshot.apply(pointer);
                plan_coverage(&preview, settings.angle_deg, settings.spacing_m, settings.mode);
            }
            Some(start.elapsed())
        }
        None => None,
    };

    println!();
    println!("═══════════════════════════════════════════════");
    println!("  RUST BENCHMARK: {}", mission.file.name.to_uppercase());
    println!("═══════════════════════════════════════════════");
    println!("  Iterations: {}", iterations);
    for (name, lines, elapsed) in &results {
        println!("  {:<11} {} lines, {:.3}ms per plan", name, lines, elapsed.as_secs_f64() * 1000.0 / iterations as f64);
    }
    if let Some(elapsed) = drag_time {
        println!("  drag frame  {:.3}ms per rotate + replan", elapsed.as_secs_f64() * 1000.0 / iterations as f64);
    }
    println!("═══════════════════════════════════════════════");
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: survey-grid benchmark <mission.yaml> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -n, --iterations <n>    Plans per mode (default: {})", DEFAULT_ITERATIONS);
    eprintln!("  -s, --spacing <m>       Line spacing in meters");
    eprintln!();
    eprintln!("Times coverage planning for every mode, plus a rotate-and-replan drag frame.");
}
