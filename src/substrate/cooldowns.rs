//! Cooldown Map
//!
//! Per-spell cooldowns plus the shared global cooldown, counted down in
//! engine time. A spell with no entry is ready.

use std::collections::HashMap;

use crate::constants::GCD_MS;
use crate::spellbook::Spell;

#[derive(Debug, Clone, Default)]
pub struct CooldownMap {
    remaining: HashMap<Spell, u64>,
    gcd_remaining: u64,
}

impl CooldownMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every tracked cooldown down by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u64) {
        self.gcd_remaining = self.gcd_remaining.saturating_sub(elapsed_ms);
        for value in self.remaining.values_mut() {
            *value = value.saturating_sub(elapsed_ms);
        }
        self.remaining.retain(|_, v| *v > 0);
    }

    pub fn ready(&self, spell: Spell) -> bool {
        !self.remaining.contains_key(&spell)
    }

    pub fn remaining_ms(&self, spell: Spell) -> u64 {
        self.remaining.get(&spell).copied().unwrap_or(0)
    }

    /// Start a cooldown. Zero-length cooldowns are not tracked.
    pub fn arm(&mut self, spell: Spell, duration_ms: u64) {
        if duration_ms > 0 {
            self.remaining.insert(spell, duration_ms);
        }
    }

    pub fn clear(&mut self, spell: Spell) {
        self.remaining.remove(&spell);
    }

    pub fn gcd_ready(&self) -> bool {
        self.gcd_remaining == 0
    }

    pub fn trigger_gcd(&mut self) {
        self.gcd_remaining = GCD_MS;
    }
}
