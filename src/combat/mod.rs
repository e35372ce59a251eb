//! Combat bookkeeping shared across specializations.

pub mod log;

pub use log::{CombatLog, CombatLogEntry, CombatLogEventType};
