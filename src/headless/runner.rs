//! Headless scenario execution
//!
//! Drives the druid bot against the simulated world tick by tick and
//! collects a run summary for automated analysis.

use serde::Serialize;
use tracing::info;

use crate::host::HostAdapter;
use crate::rotation::DruidBot;
use crate::spellbook::{SpellBook, SpellbookError};

use super::config::ScenarioConfig;
use super::world::SimWorld;

/// Result of a completed headless scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Specialization the bot ran with
    pub specialization: String,
    /// Ticks executed
    pub ticks: u64,
    /// Simulated milliseconds elapsed
    pub elapsed_ms: u64,
    /// Every accepted cast, in order
    pub casts: Vec<String>,
    /// Cast requests the world refused
    pub rejected_casts: u32,
    /// Druid health at scenario end
    pub druid_final_health: f32,
    /// Living enemies at scenario end
    pub enemies_alive: usize,
    /// Lowest ally health percent seen during the run
    pub lowest_ally_pct: f32,
    /// Combo points lost to the cap
    pub wasted_combo_points: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("invalid scenario: {0}")]
    Config(String),
    #[error(transparent)]
    Spellbook(#[from] SpellbookError),
    #[error("failed to write summary to {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Run one scenario to completion.
pub fn run_scenario(config: &ScenarioConfig) -> Result<ScenarioResult, RunnerError> {
    config.validate().map_err(RunnerError::Config)?;
    let spellbook = SpellBook::load_default()?;
    let mut world = SimWorld::from_config(config, spellbook.clone());
    let druid = world.druid();

    let mut bot = match config.specialization {
        Some(spec) => DruidBot::with_spec(druid, spellbook, spec),
        None => {
            let spec = crate::rotation::detect_specialization(&world, druid);
            DruidBot::with_spec(druid, spellbook, spec)
        }
    };
    info!("Running scenario as {}", bot.specialization());

    let duration_ms = (config.duration_secs * 1000.0) as u64;
    let mut elapsed = 0u64;
    let mut ticks = 0u64;
    let mut lowest_ally_pct = 100.0f32;
    let mut was_in_combat = false;

    while elapsed < duration_ms {
        let events = world.advance(config.tick_ms);
        for (unit, damage) in events {
            if unit == druid {
                bot.note_damage_taken(&mut world, damage);
            }
        }

        let in_combat = world.in_combat(druid);
        if in_combat && !was_in_combat {
            bot.on_combat_start();
        } else if !in_combat && was_in_combat {
            bot.on_combat_end();
        }
        was_in_combat = in_combat;

        if in_combat {
            let target = world.first_enemy();
            bot.update_rotation(&mut world, target);
        } else {
            bot.update_buffs(&mut world);
            let target = world.first_enemy();
            bot.update_rotation(&mut world, target);
        }

        for member in world.group_members(druid) {
            if world.is_alive(member) {
                lowest_ally_pct = lowest_ally_pct.min(world.health_pct(member));
            }
        }

        elapsed += config.tick_ms;
        ticks += 1;
        if !world.is_alive(druid) {
            info!("Druid died at {elapsed}ms");
            break;
        }
    }

    let result = ScenarioResult {
        specialization: bot.specialization().to_string(),
        ticks,
        elapsed_ms: elapsed,
        casts: bot
            .combat_log()
            .casts()
            .iter()
            .map(|s| s.to_string())
            .collect(),
        rejected_casts: bot.combat_log().rejected_casts(),
        druid_final_health: world.health(druid),
        enemies_alive: world.hostiles_within(druid, f32::MAX / 2.0).len(),
        lowest_ally_pct,
        wasted_combo_points: bot.context().combo.wasted(),
    };

    if let Some(path) = &config.output_path {
        let json = serde_json::to_string_pretty(&result).unwrap_or_default();
        std::fs::write(path, json).map_err(|source| RunnerError::Output {
            path: path.clone(),
            source,
        })?;
        info!("Wrote scenario summary to {path}");
    }

    Ok(result)
}
