//! Combo Point Ledger
//!
//! Combo points are bound to a single target. Switching targets discards
//! the stored points; overflow past the cap is counted as waste so the
//! headless summary can surface sloppy rotations.

use crate::constants::MAX_COMBO_POINTS;
use crate::host::UnitId;

#[derive(Debug, Clone, Default)]
pub struct ComboPointLedger {
    target: Option<UnitId>,
    points: u8,
    wasted: u32,
    crit_talent: bool,
}

impl ComboPointLedger {
    pub fn new(crit_talent: bool) -> Self {
        Self {
            crit_talent,
            ..Self::default()
        }
    }

    /// Points stored against `target`. Any other unit reads zero.
    pub fn points(&self, target: UnitId) -> u8 {
        if self.target == Some(target) {
            self.points
        } else {
            0
        }
    }

    pub fn stored_target(&self) -> Option<UnitId> {
        self.target
    }

    /// Award points from a generator hit. A target switch zeroes the ledger
    /// first; a critical hit awards two with the talent.
    pub fn generate(&mut self, target: UnitId, was_crit: bool) {
        if self.target != Some(target) {
            self.target = Some(target);
            self.points = 0;
        }
        let gain: u8 = if was_crit && self.crit_talent { 2 } else { 1 };
        let capped = (self.points + gain).min(MAX_COMBO_POINTS);
        self.wasted += u32::from(self.points + gain - capped);
        self.points = capped;
    }

    /// Consume all stored points for a finisher. Returns the amount spent.
    pub fn spend(&mut self) -> u8 {
        let spent = self.points;
        self.points = 0;
        spent
    }

    pub fn reset(&mut self) {
        self.target = None;
        self.points = 0;
    }

    /// Lifetime points lost to the cap.
    pub fn wasted(&self) -> u32 {
        self.wasted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_accumulate_and_cap() {
        let mut combo = ComboPointLedger::new(false);
        let target = UnitId(5);
        for _ in 0..7 {
            combo.generate(target, false);
        }
        assert_eq!(combo.points(target), MAX_COMBO_POINTS);
        assert_eq!(combo.wasted(), 2);
    }

    #[test]
    fn test_target_switch_discards_points() {
        let mut combo = ComboPointLedger::new(false);
        combo.generate(UnitId(1), false);
        combo.generate(UnitId(1), false);
        combo.generate(UnitId(2), false);
        assert_eq!(combo.points(UnitId(1)), 0);
        assert_eq!(combo.points(UnitId(2)), 1);
    }

    #[test]
    fn test_crit_talent_awards_double() {
        let mut combo = ComboPointLedger::new(true);
        let target = UnitId(5);
        combo.generate(target, true);
        assert_eq!(combo.points(target), 2);
        let mut no_talent = ComboPointLedger::new(false);
        no_talent.generate(target, true);
        assert_eq!(no_talent.points(target), 1);
    }

    #[test]
    fn test_spend_zeroes_the_ledger() {
        let mut combo = ComboPointLedger::new(false);
        let target = UnitId(5);
        for _ in 0..4 {
            combo.generate(target, false);
        }
        assert_eq!(combo.spend(), 4);
        assert_eq!(combo.points(target), 0);
    }
}
