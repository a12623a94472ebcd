//! survey-grid - coverage planning for aerial survey missions
//!
//! Usage:
//!   survey-grid plan <mission.yaml>          Plan and print the coverage path
//!   survey-grid stats <mission.yaml>         Capture statistics
//!   survey-grid preview <mission.yaml> -o f  Render a PNG preview
//!   survey-grid benchmark <mission.yaml>     Time coverage planning
//!   survey-grid example                      Print an example mission file

use std::env;

mod cli;

use cli::{cmd_benchmark, cmd_plan, cmd_preview, cmd_stats, print_example};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("survey-grid");

    let Some(command) = args.get(1) else {
        print_usage(prog);
        std::process::exit(1);
    };

    let result = match command.as_str() {
        "plan" => cmd_plan(&args[2..]),
        "stats" => cmd_stats(&args[2..]),
        "preview" => cmd_preview(&args[2..]),
        "benchmark" => cmd_benchmark(&args[2..]),
        "example" => {
            print_example();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage(prog);
            Ok(())
        }
        "--version" | "-V" => {
            println!("survey-grid {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_usage(prog);
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_usage(prog: &str) {
    eprintln!("survey-grid - coverage planning for aerial survey missions");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} plan <mission.yaml> [options]", prog);
    eprintln!("  {} stats <mission.yaml> [options]", prog);
    eprintln!("  {} preview <mission.yaml> -o <file.png> [options]", prog);
    eprintln!("  {} benchmark <mission.yaml> [-n <iterations>]", prog);
    eprintln!("  {} example", prog);
    eprintln!();
    eprintln!("Plan options:");
    eprintln!("  -o, --output <file>    Output file (- for stdout, default: stdout)");
    eprintln!("  -f, --format <fmt>     Output format: json, kml, svg (default: json)");
    eprintln!();
    eprintln!("Survey overrides (all commands):");
    eprintln!("  -a, --angle <deg>      Scan line angle, clockwise from east-west");
    eprintln!("  -s, --spacing <m>      Distance between passes in meters");
    eprintln!("  -m, --mode <mode>      single or crosshatch");
    eprintln!("  --crosshatch           Add a second pass at 90 degrees");
    eprintln!("  --altitude-ft <ft>     Flight altitude in feet");
    eprintln!();
    eprintln!("Logging goes to stderr; set RUST_LOG=debug for planner diagnostics.");
    eprintln!();
    eprintln!("Start from the example:");
    eprintln!("  {} example > field.yaml && {} stats field.yaml", prog, prog);
}
