//! Headless scenario execution
//!
//! Runs the rotation engine against a simulated host without any renderer,
//! suitable for automated testing and tuning runs.

pub mod config;
pub mod runner;
pub mod world;

pub use config::ScenarioConfig;
pub use runner::{run_scenario, ScenarioResult};
pub use world::{GameRng, SimWorld};
