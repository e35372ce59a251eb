//! Combat Log
//!
//! Ordered record of engine decisions. The headless runner prints it and
//! the integration tests assert rotation order against it.

use crate::spellbook::Spell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatLogEventType {
    /// A cast request the host accepted.
    Cast,
    /// Shapeshift transitions.
    FormShift,
    /// Proc consumption (Shooting Stars, Apex Predator, Nature's Swiftness).
    Proc,
    /// Healer triage decisions.
    Triage,
    /// Engine-level events (specialization detection, tick elision, target loss).
    Engine,
}

#[derive(Clone, Debug)]
pub struct CombatLogEntry {
    pub timestamp_ms: u64,
    pub event_type: CombatLogEventType,
    pub spell: Option<Spell>,
    pub message: String,
}

/// Append-only decision log.
#[derive(Debug, Default)]
pub struct CombatLog {
    entries: Vec<CombatLogEntry>,
    rejected_casts: u32,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.rejected_casts = 0;
    }

    pub fn log(&mut self, timestamp_ms: u64, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp_ms,
            event_type,
            spell: None,
            message,
        });
    }

    pub fn log_cast(&mut self, timestamp_ms: u64, spell: Spell, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp_ms,
            event_type: CombatLogEventType::Cast,
            spell: Some(spell),
            message,
        });
    }

    /// Count a cast request the host refused.
    pub fn note_rejected_cast(&mut self) {
        self.rejected_casts += 1;
    }

    pub fn rejected_casts(&self) -> u32 {
        self.rejected_casts
    }

    pub fn entries(&self) -> &[CombatLogEntry] {
        &self.entries
    }

    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Accepted casts in chronological order.
    pub fn casts(&self) -> Vec<Spell> {
        self.entries
            .iter()
            .filter(|e| e.event_type == CombatLogEventType::Cast)
            .filter_map(|e| e.spell)
            .collect()
    }

    /// Last `count` entries in chronological order.
    pub fn recent(&self, count: usize) -> &[CombatLogEntry] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_casts_are_returned_in_order() {
        let mut log = CombatLog::new();
        log.log_cast(0, Spell::Rake, "opener".into());
        log.log(500, CombatLogEventType::Engine, "tick".into());
        log.log_cast(1500, Spell::Shred, "builder".into());
        log.log_cast(3000, Spell::Rip, "finisher".into());
        assert_eq!(log.casts(), vec![Spell::Rake, Spell::Shred, Spell::Rip]);
        assert_eq!(log.filter_by_type(CombatLogEventType::Engine).len(), 1);
    }

    #[test]
    fn test_recent_returns_tail() {
        let mut log = CombatLog::new();
        for i in 0..10 {
            log.log(i * 100, CombatLogEventType::Engine, format!("tick {i}"));
        }
        let tail = log.recent(3);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[0].timestamp_ms, 700);
        assert_eq!(tail[2].timestamp_ms, 900);
    }
}
