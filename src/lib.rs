//! DruidSim - Druid Specialization Combat Controller
//!
//! A decision engine that drives an NPC druid through one of four
//! specialization rotations (Balance, Feral, Guardian, Restoration) over a
//! narrow host adapter, plus a headless scenario runner for automated
//! testing.
//!
//! This library exposes the core engine modules for testing and reuse.

pub mod cli;
pub mod clock;
pub mod combat;
pub mod constants;
pub mod headless;
pub mod host;
pub mod rotation;
pub mod spellbook;
pub mod substrate;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use headless::ScenarioConfig;
pub use host::{HostAdapter, PowerKind, UnitId};
pub use rotation::{detect_specialization, DruidBot, Specialization};
pub use spellbook::{Spell, SpellBook};
