//! Resource Ledger
//!
//! Tracks the three druid power pools. Mana is host-authoritative and only
//! mirrored here; energy and rage are engine-authoritative and pushed back
//! to the host after every mutation by the dispatcher.

use crate::constants::{
    BERSERK_ENERGY_MULTIPLIER, ENERGY_MAX, ENERGY_REGEN_PER_SEC, RAGE_DECAY_PER_SEC, RAGE_MAX,
};
use crate::host::PowerKind;

#[derive(Debug, Clone)]
pub struct ResourceLedger {
    mana: f32,
    max_mana: f32,
    energy: f32,
    energy_modifier: f32,
    rage: f32,
    spent_mana: f32,
    spent_energy: f32,
    spent_rage: f32,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self {
            mana: 0.0,
            max_mana: 0.0,
            energy: ENERGY_MAX,
            energy_modifier: 1.0,
            rage: 0.0,
            spent_mana: 0.0,
            spent_energy: 0.0,
            spent_rage: 0.0,
        }
    }
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror the host's mana pool. Called once per tick before any spend.
    pub fn sync_mana(&mut self, current: f32, max: f32) {
        self.max_mana = max.max(0.0);
        self.mana = current.clamp(0.0, self.max_mana);
    }

    /// Advance regeneration and decay by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u64, in_combat: bool) {
        let secs = elapsed_ms as f32 / 1000.0;
        self.energy =
            (self.energy + ENERGY_REGEN_PER_SEC * self.energy_modifier * secs).min(ENERGY_MAX);
        if !in_combat {
            self.rage = (self.rage - RAGE_DECAY_PER_SEC * secs).max(0.0);
        }
    }

    /// Toggle the doubled energy regeneration of Berserk.
    pub fn set_berserk(&mut self, active: bool) {
        self.energy_modifier = if active { BERSERK_ENERGY_MULTIPLIER } else { 1.0 };
    }

    pub fn current(&self, kind: PowerKind) -> f32 {
        match kind {
            PowerKind::Mana => self.mana,
            PowerKind::Energy => self.energy,
            PowerKind::Rage => self.rage,
        }
    }

    pub fn max(&self, kind: PowerKind) -> f32 {
        match kind {
            PowerKind::Mana => self.max_mana,
            PowerKind::Energy => ENERGY_MAX,
            PowerKind::Rage => RAGE_MAX,
        }
    }

    pub fn can_afford(&self, kind: PowerKind, cost: f32) -> bool {
        cost <= 0.0 || self.current(kind) >= cost
    }

    /// Deduct `cost` from the pool. Fails without mutation when the pool is
    /// short.
    pub fn spend(&mut self, kind: PowerKind, cost: f32) -> bool {
        if cost <= 0.0 {
            return true;
        }
        if !self.can_afford(kind, cost) {
            return false;
        }
        match kind {
            PowerKind::Mana => {
                self.mana -= cost;
                self.spent_mana += cost;
            }
            PowerKind::Energy => {
                self.energy -= cost;
                self.spent_energy += cost;
            }
            PowerKind::Rage => {
                self.rage -= cost;
                self.spent_rage += cost;
            }
        }
        true
    }

    /// Add to a pool, clamped at its cap.
    pub fn gain(&mut self, kind: PowerKind, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        match kind {
            PowerKind::Mana => self.mana = (self.mana + amount).min(self.max_mana),
            PowerKind::Energy => self.energy = (self.energy + amount).min(ENERGY_MAX),
            PowerKind::Rage => self.rage = (self.rage + amount).min(RAGE_MAX),
        }
    }

    /// Projected energy after `ms` of regeneration at the current rate.
    pub fn energy_in(&self, ms: u64) -> f32 {
        let secs = ms as f32 / 1000.0;
        (self.energy + ENERGY_REGEN_PER_SEC * self.energy_modifier * secs).min(ENERGY_MAX)
    }

    /// Lifetime totals (mana, energy, rage) spent through this ledger.
    pub fn spent_totals(&self) -> (f32, f32, f32) {
        (self.spent_mana, self.spent_energy, self.spent_rage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_regenerates_at_base_rate() {
        let mut ledger = ResourceLedger::new();
        assert!(ledger.spend(PowerKind::Energy, 100.0));
        ledger.tick(2000, true);
        assert!((ledger.current(PowerKind::Energy) - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_berserk_doubles_energy_regen() {
        let mut ledger = ResourceLedger::new();
        assert!(ledger.spend(PowerKind::Energy, 100.0));
        ledger.set_berserk(true);
        ledger.tick(1000, true);
        assert!((ledger.current(PowerKind::Energy) - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_energy_caps_at_max() {
        let mut ledger = ResourceLedger::new();
        ledger.tick(10_000, true);
        assert_eq!(ledger.current(PowerKind::Energy), ENERGY_MAX);
    }

    #[test]
    fn test_rage_decays_only_out_of_combat() {
        let mut ledger = ResourceLedger::new();
        ledger.gain(PowerKind::Rage, 10.0);
        ledger.tick(1000, true);
        assert!((ledger.current(PowerKind::Rage) - 10.0).abs() < 0.001);
        ledger.tick(1000, false);
        assert!((ledger.current(PowerKind::Rage) - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_rage_decay_floors_at_zero() {
        let mut ledger = ResourceLedger::new();
        ledger.gain(PowerKind::Rage, 1.0);
        ledger.tick(10_000, false);
        assert_eq!(ledger.current(PowerKind::Rage), 0.0);
    }

    #[test]
    fn test_rage_caps_at_max() {
        let mut ledger = ResourceLedger::new();
        ledger.gain(PowerKind::Rage, 500.0);
        assert_eq!(ledger.current(PowerKind::Rage), RAGE_MAX);
    }

    #[test]
    fn test_insufficient_mana_spend_fails_without_mutation() {
        let mut ledger = ResourceLedger::new();
        ledger.sync_mana(20.0, 100.0);
        assert!(!ledger.spend(PowerKind::Mana, 30.0));
        assert_eq!(ledger.current(PowerKind::Mana), 20.0);
        assert!(ledger.spend(PowerKind::Mana, 15.0));
        assert_eq!(ledger.current(PowerKind::Mana), 5.0);
    }

    #[test]
    fn test_energy_projection() {
        let mut ledger = ResourceLedger::new();
        assert!(ledger.spend(PowerKind::Energy, 60.0));
        assert!((ledger.energy_in(1500) - 55.0).abs() < 0.001);
        assert_eq!(ledger.energy_in(60_000), ENERGY_MAX);
    }
}
