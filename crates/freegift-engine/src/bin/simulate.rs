//! # Evaluation Pass Simulator
//!
//! Runs one evaluation pass over a JSON scenario and prints the resulting
//! cart, its totals and the pass report.
//!
//! ## Usage
//! ```bash
//! cargo run -p freegift-engine --bin simulate -- scenario.json
//!
//! # With an explicit config file
//! cargo run -p freegift-engine --bin simulate -- scenario.json --config ./engine.toml
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use freegift_engine::{init_tracing, EngineConfig, EngineResult, Scenario};

fn print_help() {
    println!("Free-gift evaluation pass simulator");
    println!();
    println!("Usage: simulate <SCENARIO.json> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>   Engine config file (default: platform config dir)");
    println!("  -h, --help            Show this help message");
}

fn run(scenario_path: PathBuf, config_path: Option<PathBuf>) -> EngineResult<()> {
    let config = EngineConfig::load(config_path)?;
    init_tracing(&config.logging)?;

    let scenario = Scenario::load(&scenario_path)?;
    let outcome = scenario.run(&config)?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let mut scenario_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            other => {
                scenario_path = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    let Some(scenario_path) = scenario_path else {
        print_help();
        return ExitCode::from(2);
    };

    match run(scenario_path, config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("simulate: {}", e);
            ExitCode::FAILURE
        }
    }
}
