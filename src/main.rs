//! DruidSim - Druid Specialization Combat Controller
//!
//! Entry point for the headless scenario runner.

use tracing_subscriber::EnvFilter;

use druidsim::cli;
use druidsim::headless::{config::ScenarioConfig, runner};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = cli::parse_args();

    let mut config = match ScenarioConfig::load_from_file(&args.scenario) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading scenario: {e}");
            std::process::exit(1);
        }
    };
    if let Some(output) = args.output {
        config.output_path = Some(output.display().to_string());
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if let Some(max_duration) = args.max_duration {
        config.duration_secs = max_duration;
    }

    match runner::run_scenario(&config) {
        Ok(result) => {
            println!(
                "{} ran {} ticks ({}ms): {} casts, {} rejected, druid at {:.0} health, {} enemies alive",
                result.specialization,
                result.ticks,
                result.elapsed_ms,
                result.casts.len(),
                result.rejected_casts,
                result.druid_final_health,
                result.enemies_alive,
            );
        }
        Err(e) => {
            eprintln!("Scenario failed: {e}");
            std::process::exit(1);
        }
    }
}
