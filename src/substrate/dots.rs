//! DoT / HoT Tracker
//!
//! Engine-side view of the timed effects this druid has applied. Refresh
//! policy is the pandemic rule: re-apply only when the remaining duration
//! has fallen to 30% of the base duration or less, and a refresh always
//! resets to the full base duration, never accumulates.

use std::collections::HashMap;

use crate::constants::{MAX_HOT_STACKS, PANDEMIC_FRACTION};
use crate::host::UnitId;
use crate::spellbook::Spell;

#[derive(Debug, Clone, Copy)]
struct Instance {
    expires_ms: u64,
    stacks: u8,
}

#[derive(Debug, Clone, Default)]
pub struct DotHotTracker {
    instances: HashMap<(UnitId, Spell), Instance>,
}

impl DotHotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an application. Refreshing sets expiry to `now + duration`
    /// and increments stacks up to the stacking cap.
    pub fn apply(&mut self, now_ms: u64, target: UnitId, spell: Spell, duration_ms: u64) {
        self.instances
            .entry((target, spell))
            .and_modify(|i| {
                i.expires_ms = now_ms + duration_ms;
                i.stacks = (i.stacks + 1).min(MAX_HOT_STACKS);
            })
            .or_insert(Instance {
                expires_ms: now_ms + duration_ms,
                stacks: 1,
            });
    }

    pub fn present(&self, now_ms: u64, target: UnitId, spell: Spell) -> bool {
        self.remaining_ms(now_ms, target, spell) > 0
    }

    pub fn remaining_ms(&self, now_ms: u64, target: UnitId, spell: Spell) -> u64 {
        self.instances
            .get(&(target, spell))
            .map(|i| i.expires_ms.saturating_sub(now_ms))
            .unwrap_or(0)
    }

    pub fn stacks(&self, now_ms: u64, target: UnitId, spell: Spell) -> u8 {
        self.instances
            .get(&(target, spell))
            .filter(|i| i.expires_ms > now_ms)
            .map(|i| i.stacks)
            .unwrap_or(0)
    }

    /// Pandemic check: refresh when absent or when remaining duration is
    /// inside the 30% window (inclusive).
    pub fn should_refresh(
        &self,
        now_ms: u64,
        target: UnitId,
        spell: Spell,
        base_duration_ms: u64,
    ) -> bool {
        let remaining = self.remaining_ms(now_ms, target, spell);
        remaining <= (base_duration_ms as f32 * PANDEMIC_FRACTION) as u64
    }

    /// Drop one instance, consumed by a spell like Swiftmend.
    pub fn remove(&mut self, target: UnitId, spell: Spell) {
        self.instances.remove(&(target, spell));
    }

    /// Drop expired instances.
    pub fn prune(&mut self, now_ms: u64) {
        self.instances.retain(|_, i| i.expires_ms > now_ms);
    }

    /// Drop everything on a dead or despawned target.
    pub fn forget_target(&mut self, target: UnitId) {
        self.instances.retain(|(unit, _), _| *unit != target);
    }

    /// Number of targets currently carrying `spell`.
    pub fn active_count(&self, now_ms: u64, spell: Spell) -> usize {
        self.instances
            .iter()
            .filter(|((_, s), i)| *s == spell && i.expires_ms > now_ms)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pandemic_window_boundary() {
        let mut dots = DotHotTracker::new();
        let target = UnitId(7);
        dots.apply(0, target, Spell::Rake, 15_000);
        // 30% of 15000 is 4500ms remaining, i.e. now = 10500.
        assert!(!dots.should_refresh(10_499, target, Spell::Rake, 15_000));
        assert!(dots.should_refresh(10_500, target, Spell::Rake, 15_000));
        assert!(dots.should_refresh(10_501, target, Spell::Rake, 15_000));
    }

    #[test]
    fn test_refresh_resets_to_base_never_accumulates() {
        let mut dots = DotHotTracker::new();
        let target = UnitId(7);
        dots.apply(0, target, Spell::Moonfire, 18_000);
        dots.apply(14_000, target, Spell::Moonfire, 18_000);
        assert_eq!(dots.remaining_ms(14_000, target, Spell::Moonfire), 18_000);
    }

    #[test]
    fn test_absent_effect_should_refresh() {
        let dots = DotHotTracker::new();
        assert!(dots.should_refresh(0, UnitId(1), Spell::Rip, 16_000));
    }

    #[test]
    fn test_stacks_cap_at_three() {
        let mut dots = DotHotTracker::new();
        let tank = UnitId(2);
        for i in 0..5 {
            dots.apply(i * 1000, tank, Spell::Lifebloom, 10_000);
        }
        assert_eq!(dots.stacks(5000, tank, Spell::Lifebloom), 3);
    }

    #[test]
    fn test_expired_effect_reports_zero_stacks() {
        let mut dots = DotHotTracker::new();
        let tank = UnitId(2);
        dots.apply(0, tank, Spell::Lacerate, 15_000);
        assert_eq!(dots.stacks(14_999, tank, Spell::Lacerate), 1);
        assert_eq!(dots.stacks(15_000, tank, Spell::Lacerate), 0);
        assert!(!dots.present(15_000, tank, Spell::Lacerate));
    }

    #[test]
    fn test_prune_drops_expired_instances() {
        let mut dots = DotHotTracker::new();
        dots.apply(0, UnitId(1), Spell::Rake, 15_000);
        dots.apply(0, UnitId(2), Spell::Rake, 15_000);
        dots.prune(20_000);
        assert_eq!(dots.active_count(20_000, Spell::Rake), 0);
    }

    #[test]
    fn test_forget_target_clears_all_effects() {
        let mut dots = DotHotTracker::new();
        let dead = UnitId(9);
        dots.apply(0, dead, Spell::Rake, 15_000);
        dots.apply(0, dead, Spell::Rip, 16_000);
        dots.apply(0, UnitId(3), Spell::Rake, 15_000);
        dots.forget_target(dead);
        assert!(!dots.present(1, dead, Spell::Rake));
        assert!(!dots.present(1, dead, Spell::Rip));
        assert!(dots.present(1, UnitId(3), Spell::Rake));
    }

    #[test]
    fn test_active_count_per_spell() {
        let mut dots = DotHotTracker::new();
        for n in 0..4 {
            dots.apply(0, UnitId(n), Spell::Rejuvenation, 12_000);
        }
        dots.apply(0, UnitId(0), Spell::Lifebloom, 10_000);
        assert_eq!(dots.active_count(6000, Spell::Rejuvenation), 4);
        assert_eq!(dots.active_count(6000, Spell::Lifebloom), 1);
        assert_eq!(dots.active_count(13_000, Spell::Rejuvenation), 0);
    }
}
