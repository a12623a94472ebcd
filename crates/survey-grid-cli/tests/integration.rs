//! Integration tests for survey-grid CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::path::PathBuf;
use std::process::{Command, Output};

/// Get the path to the survey-grid binary.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_survey-grid"))
}

/// Get the path to a mission file under test_assets.
fn test_asset(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // Go up from survey-grid-cli to crates
    path.pop(); // Go up from crates to repo root
    path.push("test_assets");
    path.push(name);
    path
}

/// A scratch file path unique to this test process.
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("survey-grid-{}-{}", std::process::id(), name))
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute command")
}

fn run_on(command: &str, asset: &str, extra: &[&str]) -> Output {
    let path = test_asset(asset);
    let mut args = vec![command, path.to_str().unwrap()];
    args.extend_from_slice(extra);
    run(&args)
}

fn plan_json(asset: &str, extra: &[&str]) -> serde_json::Value {
    let output = run_on("plan", asset, extra);
    assert!(output.status.success(), "plan failed: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("plan output should be JSON")
}

#[test]
fn plan_outputs_json_by_default() {
    let json = plan_json("north_pasture.yaml", &[]);

    assert_eq!(json["name"], "North pasture");
    assert!(json["generated_at"].as_str().is_some_and(|s| !s.is_empty()));
    assert_eq!(json["settings"]["mode"], "single");

    let lines = json["primary_lines"].as_array().unwrap();
    let path = json["path"].as_array().unwrap();
    assert!(!lines.is_empty());
    assert_eq!(path.len(), lines.len() * 2, "path should visit both ends of every line");
    assert!(json["secondary_lines"].as_array().unwrap().is_empty());

    // Closed polygon on output
    let polygon = json["polygon"].as_array().unwrap();
    assert_eq!(polygon.len(), 5);
    assert_eq!(polygon[0], polygon[4]);
}

#[test]
fn plan_mission_brackets_path() {
    let json = plan_json("north_pasture.yaml", &[]);
    let mission = json["mission"].as_array().unwrap();
    let path = json["path"].as_array().unwrap();

    assert_eq!(mission.len(), path.len() + 2);
    assert_eq!(mission[0]["type"], "takeoff");
    assert_eq!(mission[0]["command"], 22);
    assert_eq!(mission[1]["command"], 16);
    assert_eq!(mission[mission.len() - 1]["type"], "return_to_launch");
    assert_eq!(mission[mission.len() - 1]["command"], 20);

    // 100 ft survey altitude
    let altitude = mission[0]["altitude_m"].as_f64().unwrap();
    assert!((altitude - 30.48).abs() < 1e-9);
}

#[test]
fn crosshatch_flag_adds_secondary_lines_and_doubles_images() {
    let single = plan_json("north_pasture.yaml", &[]);
    let cross = plan_json("north_pasture.yaml", &["--crosshatch"]);

    assert!(!cross["secondary_lines"].as_array().unwrap().is_empty());
    assert_eq!(cross["settings"]["mode"], "crosshatch");
    assert_eq!(
        cross["stats"]["images"].as_u64().unwrap(),
        2 * single["stats"]["images"].as_u64().unwrap()
    );
    let single_s = single["stats"]["duration_seconds"].as_f64().unwrap();
    let cross_s = cross["stats"]["duration_seconds"].as_f64().unwrap();
    assert!((cross_s - 2.0 * single_s).abs() < 1e-6, "{} vs 2 x {}", cross_s, single_s);
}

#[test]
fn spacing_override_changes_line_count() {
    let dense = plan_json("north_pasture.yaml", &["-s", "10"]);
    let sparse = plan_json("north_pasture.yaml", &["-s", "40"]);
    assert!(
        dense["primary_lines"].as_array().unwrap().len()
            > sparse["primary_lines"].as_array().unwrap().len()
    );
}

#[test]
fn anchor_only_mission_uses_default_square() {
    let json = plan_json("anchor_only.yaml", &[]);
    assert_eq!(json["polygon"].as_array().unwrap().len(), 5);
    assert_eq!(json["settings"]["mode"], "crosshatch");
    assert!(!json["path"].as_array().unwrap().is_empty());
}

#[test]
fn plan_kml_output() {
    let output = run_on("plan", "north_pasture.yaml", &["--kml"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("<?xml"), "Should have XML declaration");
    assert!(stdout.contains("<kml"), "Should have kml root");
    assert!(stdout.contains("<Polygon>"), "Should have survey polygon");
    assert!(stdout.contains("<LineString>"), "Should have flight path");
}

#[test]
fn plan_svg_to_file() {
    let out = temp_path("plan.svg");
    let output = run_on("plan", "north_pasture.yaml", &["--svg", "-o", out.to_str().unwrap()]);
    assert!(output.status.success());

    let svg = std::fs::read_to_string(&out).expect("SVG should be written");
    let _ = std::fs::remove_file(&out);
    assert!(svg.contains("<svg"));
    assert!(svg.contains("<polygon"));
    assert!(svg.contains("id=\"path\""));
}

#[test]
fn stats_prints_summary() {
    let output = run_on("stats", "north_pasture.yaml", &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Images:"));
    assert!(stdout.contains("Batteries:"));
    assert!(stdout.contains("North pasture"));
    assert!(stdout.contains("(100 ft)"), "altitude should echo the file's feet: {}", stdout);
}

#[test]
fn stats_json() {
    let output = run_on("stats", "north_pasture.yaml", &["--json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["images"].as_u64().unwrap() > 0);
    assert!(json["batteries"].as_u64().unwrap() >= 1);
    assert!(json["area_m2"].as_f64().unwrap() > 10_000.0);
}

#[test]
fn preview_writes_png() {
    let out = temp_path("preview.png");
    let output = run_on(
        "preview",
        "north_pasture.yaml",
        &["-o", out.to_str().unwrap(), "--width", "320", "--height", "240"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let bytes = std::fs::read(&out).expect("PNG should be written");
    let _ = std::fs::remove_file(&out);
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn benchmark_runs() {
    let output = run_on("benchmark", "north_pasture.yaml", &["-n", "3"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RUST BENCHMARK"));
    assert!(stdout.contains("crosshatch"));
}

#[test]
fn unknown_options_are_rejected_everywhere() {
    for command in ["plan", "stats", "preview", "benchmark"] {
        let output = run_on(command, "north_pasture.yaml", &["--frobnicate"]);
        assert!(!output.status.success(), "{} accepted an unknown option", command);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Unknown option: --frobnicate"), "{}: {}", command, stderr);
    }
}

#[test]
fn example_is_a_valid_mission() {
    let output = run(&["example"]);
    assert!(output.status.success());

    let path = temp_path("example.yaml");
    std::fs::write(&path, &output.stdout).unwrap();
    let planned = run(&["plan", path.to_str().unwrap()]);
    let _ = std::fs::remove_file(&path);
    assert!(planned.status.success(), "{}", String::from_utf8_lossy(&planned.stderr));
}

#[test]
fn mission_without_location_fails() {
    let output = run_on("plan", "no_location.yaml", &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("neither a polygon nor an anchor"), "stderr: {}", stderr);
}

#[test]
fn missing_file_fails_with_context() {
    let output = run(&["plan", "does/not/exist.yaml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read mission file"), "stderr: {}", stderr);
}

#[test]
fn bad_number_is_rejected() {
    let output = run_on("plan", "north_pasture.yaml", &["-s", "wide"]);
    assert!(!output.status.success());
}

#[test]
fn unknown_command_fails() {
    let output = run(&["launch"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown command"));
}
