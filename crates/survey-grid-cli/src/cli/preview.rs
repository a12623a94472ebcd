//! Preview command: rasterize the planned survey to a PNG.

use anyhow::{Context, Result, bail};
use resvg::usvg;
use tiny_skia::Pixmap;

use super::mission_file::{LoadedMission, SurveyOverrides, take_value};
use super::plan::PlannedMission;

const DEFAULT_WIDTH: u32 = 1600;
const DEFAULT_HEIGHT: u32 = 1200;

/// Render an SVG document to a pixmap using resvg.
pub fn render_svg(svg: &str, width: u32, height: u32) -> Result<Pixmap> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options).context("Failed to parse generated SVG")?;

    let mut pixmap = Pixmap::new(width, height).context("Failed to create pixmap")?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Execute the preview command.
pub fn cmd_preview(args: &[String]) -> Result<()> {
    let mut mission_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut width = DEFAULT_WIDTH;
    let mut height = DEFAULT_HEIGHT;
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
            "--width" => {
                let raw = take_value(args, &mut i)?;
                width = raw.parse().with_context(|| format!("Invalid width: {}", raw))?;
            }
            "--height" => {
                let raw = take_value(args, &mut i)?;
                height = raw.parse().with_context(|| format!("Invalid height: {}", raw))?;
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

    let (Some(mission_path), Some(output_path)) = (mission_path, output_path) else {
        print_usage();
        bail!("Mission file and -o <file.png> are required");
    };
    if width == 0 || height == 0 {
        bail!("Preview size must be non-zero, got {}x{}", width, height);
    }

    let planned = PlannedMission::compute(LoadedMission::load(mission_path, &overrides)?);
    let svg = planned.to_svg(width, height);
    let pixmap = render_svg(&svg, width, height)?;
    pixmap
        .save_png(output_path)
        .with_context(|| format!("Failed to write {}", output_path))?;

    log::info!("Wrote {}x{} preview: {}", width, height, output_path);
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: survey-grid preview <mission.yaml> -o <file.png> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>     PNG file to write (required)");
    eprintln!("  --width <px>            Image width (default: {})", DEFAULT_WIDTH);
    eprintln!("  --height <px>           Image height (default: {})", DEFAULT_HEIGHT);
    eprintln!("  -a, --angle <deg>       Scan line angle");
    eprintln!("  -s, --spacing <m>       Line spacing in meters");
    eprintln!("  --crosshatch | --single Coverage mode");
}

// ============================================================================
// TESTS
// ============================================================================
