//! Command-line interface for DruidSim
//!
//! Headless-only: every run is a JSON-configured scenario.

use clap::Parser;
use std::path::PathBuf;

/// Druid rotation engine scenario runner
#[derive(Parser, Debug)]
#[command(name = "druidsim")]
#[command(about = "Druid rotation engine scenario runner")]
#[command(version)]
pub struct Args {
    /// JSON scenario configuration file
    #[arg(value_name = "SCENARIO_FILE")]
    pub scenario: PathBuf,

    /// Output path for the run summary (overrides the scenario's own)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Random seed override for deterministic reproduction
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum scenario duration in seconds (overrides the scenario's own)
    #[arg(long)]
    pub max_duration: Option<f32>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
