//! Spell Book
//!
//! Data-driven spell definitions loaded from RON. Costs, ranges, cooldowns,
//! and durations live in `assets/config/spells.ron` so numbers can be tuned
//! without recompiling; the `Spell` enum stays the compile-time contract.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::constants::{DEFAULT_DOT_DURATION_MS, DEFAULT_SPELL_RANGE};
use crate::host::PowerKind;

/// Damage/heal school, used for logging and immunity checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellSchool {
    Physical,
    Nature,
    Arcane,
    #[default]
    None,
}

/// Every spell the engine can request from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spell {
    // Shapeshifts
    BearForm,
    CatForm,
    MoonkinForm,
    TreeOfLife,
    AquaticForm,
    TravelForm,
    FlightForm,
    // Balance
    Wrath,
    Starfire,
    Starsurge,
    Moonfire,
    ShootingStars,
    // Feral (cat)
    Prowl,
    Ravage,
    Rake,
    Rip,
    FerociousBite,
    SavageRoar,
    Shred,
    Mangle,
    TigersFury,
    Berserk,
    ApexPredator,
    // Guardian (bear)
    MangleBear,
    Lacerate,
    Thrash,
    Swipe,
    Maul,
    FrenziedRegeneration,
    SurvivalInstincts,
    Barkskin,
    // Restoration
    Rejuvenation,
    Lifebloom,
    Regrowth,
    HealingTouch,
    Swiftmend,
    WildGrowth,
    Tranquility,
    NaturesSwiftness,
    Ironbark,
}

impl Spell {
    /// True for spells that change the caster's form.
    pub fn is_form_shift(self) -> bool {
        matches!(
            self,
            Spell::BearForm
                | Spell::CatForm
                | Spell::MoonkinForm
                | Spell::TreeOfLife
                | Spell::AquaticForm
                | Spell::TravelForm
                | Spell::FlightForm
        )
    }
}

impl std::fmt::Display for Spell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

fn default_school_none() -> SpellSchool {
    SpellSchool::None
}

fn default_power_mana() -> PowerKind {
    PowerKind::Mana
}

fn default_true() -> bool {
    true
}

fn default_one() -> u8 {
    1
}

/// Tunable numbers for one spell.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpellConfig {
    pub name: String,
    #[serde(default = "default_school_none")]
    pub school: SpellSchool,
    #[serde(default = "default_power_mana")]
    pub power: PowerKind,
    #[serde(default)]
    pub cost: f32,
    #[serde(default)]
    pub range: f32,
    #[serde(default)]
    pub cast_time_ms: u64,
    #[serde(default)]
    pub cooldown_ms: u64,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default = "default_true")]
    pub triggers_gcd: bool,
    #[serde(default = "default_one")]
    pub max_stacks: u8,
}

impl SpellConfig {
    /// True when the spell leaves a timed aura (DoT, HoT, or buff).
    pub fn has_timed_effect(&self) -> bool {
        self.duration_ms > 0
    }
}

/// On-disk shape of the spell definitions file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpellsConfig {
    pub spells: HashMap<Spell, SpellConfig>,
}

#[derive(Debug, Error)]
pub enum SpellbookError {
    #[error("failed to read spell definitions from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse spell definitions from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("spell definitions are missing entries for: {0:?}")]
    Missing(Vec<Spell>),
}

/// All spells the rotations reference. Load-time validation fails fast on a
/// definitions file that would otherwise surface as silent fallback values.
const EXPECTED_SPELLS: &[Spell] = &[
    Spell::BearForm,
    Spell::CatForm,
    Spell::MoonkinForm,
    Spell::TreeOfLife,
    Spell::Wrath,
    Spell::Starfire,
    Spell::Starsurge,
    Spell::Moonfire,
    Spell::ShootingStars,
    Spell::Prowl,
    Spell::Ravage,
    Spell::Rake,
    Spell::Rip,
    Spell::FerociousBite,
    Spell::SavageRoar,
    Spell::Shred,
    Spell::Mangle,
    Spell::TigersFury,
    Spell::Berserk,
    Spell::MangleBear,
    Spell::Lacerate,
    Spell::Thrash,
    Spell::Swipe,
    Spell::Maul,
    Spell::FrenziedRegeneration,
    Spell::SurvivalInstincts,
    Spell::Barkskin,
    Spell::Rejuvenation,
    Spell::Lifebloom,
    Spell::Regrowth,
    Spell::HealingTouch,
    Spell::Swiftmend,
    Spell::WildGrowth,
    Spell::Tranquility,
    Spell::NaturesSwiftness,
    Spell::Ironbark,
];

/// Runtime lookup over the loaded spell definitions.
///
/// Every accessor tolerates a missing entry and falls back to a safe
/// default, so a definitions file trimmed for a test scenario can't panic
/// the engine mid-rotation.
#[derive(Clone, Debug)]
pub struct SpellBook {
    definitions: SpellsConfig,
}

impl SpellBook {
    pub fn new(definitions: SpellsConfig) -> Self {
        Self { definitions }
    }

    /// Load from the default asset path.
    pub fn load_default() -> Result<Self, SpellbookError> {
        Self::load_from_file(Path::new("assets/config/spells.ron"))
    }

    pub fn load_from_file(path: &Path) -> Result<Self, SpellbookError> {
        let text = std::fs::read_to_string(path).map_err(|source| SpellbookError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let definitions: SpellsConfig =
            ron::from_str(&text).map_err(|source| SpellbookError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        let book = Self::new(definitions);
        book.validate()?;
        info!(
            "Loaded {} spell definitions from {}",
            book.definitions.spells.len(),
            path.display()
        );
        Ok(book)
    }

    pub fn get(&self, spell: Spell) -> Option<&SpellConfig> {
        self.definitions.spells.get(&spell)
    }

    /// Power pool and cost. Unknown spells cost nothing.
    pub fn cost(&self, spell: Spell) -> (PowerKind, f32) {
        self.get(spell)
            .map(|c| (c.power, c.cost))
            .unwrap_or((PowerKind::Mana, 0.0))
    }

    /// Maximum cast range. Zero means self/melee-locked per the definition;
    /// absent entries fall back to the default ranged distance.
    pub fn max_range(&self, spell: Spell) -> f32 {
        self.get(spell).map(|c| c.range).unwrap_or(DEFAULT_SPELL_RANGE)
    }

    /// Base aura duration for timed effects.
    pub fn duration_ms(&self, spell: Spell) -> u64 {
        self.get(spell)
            .map(|c| c.duration_ms)
            .filter(|&d| d > 0)
            .unwrap_or(DEFAULT_DOT_DURATION_MS)
    }

    pub fn cooldown_ms(&self, spell: Spell) -> u64 {
        self.get(spell).map(|c| c.cooldown_ms).unwrap_or(0)
    }

    /// Verify every rotation-referenced spell has a definition.
    pub fn validate(&self) -> Result<(), SpellbookError> {
        let missing: Vec<Spell> = EXPECTED_SPELLS
            .iter()
            .copied()
            .filter(|s| !self.definitions.spells.contains_key(s))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SpellbookError::Missing(missing))
        }
    }

    pub fn spells(&self) -> impl Iterator<Item = (&Spell, &SpellConfig)> {
        self.definitions.spells.iter()
    }
}
