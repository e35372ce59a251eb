//! JSON configuration parsing for headless mode
//!
//! Describes one scenario: the druid under test, its group, the enemies,
//! and the scripted damage pressure on each unit.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::rotation::Specialization;
use crate::spellbook::Spell;

/// Headless scenario configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// The druid being driven by the engine
    pub druid: UnitConfig,
    /// Friendly group members (the druid is added implicitly)
    #[serde(default)]
    pub allies: Vec<UnitConfig>,
    /// Hostile units
    #[serde(default)]
    pub enemies: Vec<UnitConfig>,
    /// Force a specialization instead of detecting one
    #[serde(default)]
    pub specialization: Option<Specialization>,
    /// Scenario length in seconds (default: 60)
    #[serde(default = "default_duration")]
    pub duration_secs: f32,
    /// Milliseconds between host ticks (default: 500)
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Random seed for deterministic runs
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for the run summary
    #[serde(default)]
    pub output_path: Option<String>,
}

/// One unit in the scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitConfig {
    #[serde(default = "default_health")]
    pub max_health: f32,
    /// Starting health; defaults to full
    #[serde(default)]
    pub health: Option<f32>,
    #[serde(default = "default_mana")]
    pub max_mana: f32,
    /// World position
    #[serde(default)]
    pub position: (f32, f32),
    /// Spells this unit knows (drives specialization detection)
    #[serde(default)]
    pub spells: Vec<Spell>,
    /// Scripted incoming damage per second, applied while in combat
    #[serde(default)]
    pub incoming_dps: f32,
    /// Marks an ally as the group's tank
    #[serde(default)]
    pub tank: bool,
}

fn default_duration() -> f32 {
    60.0
}

fn default_tick_ms() -> u64 {
    500
}

fn default_health() -> f32 {
    5000.0
}

fn default_mana() -> f32 {
    100.0
}

impl ScenarioConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: ScenarioConfig =
            serde_json::from_str(&contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.duration_secs <= 0.0 {
            return Err("duration_secs must be positive".to_string());
        }
        if self.tick_ms == 0 {
            return Err("tick_ms must be positive".to_string());
        }
        if self.druid.max_health <= 0.0 {
            return Err("druid max_health must be positive".to_string());
        }
        if self.druid.spells.is_empty() && self.specialization.is_none() {
            return Err(
                "druid must know at least one spell or specialization must be set".to_string(),
            );
        }
        for (i, unit) in self.allies.iter().chain(self.enemies.iter()).enumerate() {
            if unit.max_health <= 0.0 {
                return Err(format!("unit {} max_health must be positive", i));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let json = r#"{
            "druid": { "spells": ["CatForm", "Rip", "Shred", "TigersFury"] },
            "enemies": [{ "max_health": 10000 }]
        }"#;
        let config: ScenarioConfig = serde_json::from_str(json).expect("should parse");
        assert!(config.validate().is_ok());
        assert_eq!(config.duration_secs, 60.0);
        assert_eq!(config.tick_ms, 500);
        assert_eq!(config.enemies.len(), 1);
        assert!(config.druid.spells.contains(&Spell::Rip));
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        let json = r#"{
            "druid": { "spells": ["Wrath"] },
            "duration_secs": 0.0
        }"#;
        let config: ScenarioConfig = serde_json::from_str(json).expect("should parse");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_spell_names_must_be_known() {
        let json = r#"{ "druid": { "spells": ["Fireball"] } }"#;
        assert!(serde_json::from_str::<ScenarioConfig>(json).is_err());
    }
}
