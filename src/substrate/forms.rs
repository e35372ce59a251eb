//! Shapeshift State Machine
//!
//! Tracks the druid's current form, gates transitions, and enforces the
//! per-form ability allow-lists. Any form can shift directly to any other
//! form (passing through humanoid implicitly); the gates are the transition
//! cooldown and the mana cost.

use tracing::debug;

use crate::constants::{GCD_MS, SHAPESHIFT_MANA_FRACTION};
use crate::host::{HostAdapter, PowerKind, UnitId};
use crate::spellbook::Spell;
use crate::substrate::resources::ResourceLedger;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Form {
    #[default]
    Humanoid,
    Bear,
    Cat,
    Aquatic,
    Travel,
    Moonkin,
    TreeOfLife,
    Flight,
}

impl Form {
    /// Spell that enters this form. Humanoid is entered by cancelling the
    /// current form, not by a cast.
    pub fn shift_spell(self) -> Option<Spell> {
        match self {
            Form::Humanoid => None,
            Form::Bear => Some(Spell::BearForm),
            Form::Cat => Some(Spell::CatForm),
            Form::Aquatic => Some(Spell::AquaticForm),
            Form::Travel => Some(Spell::TravelForm),
            Form::Moonkin => Some(Spell::MoonkinForm),
            Form::TreeOfLife => Some(Spell::TreeOfLife),
            Form::Flight => Some(Spell::FlightForm),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormTracker {
    current: Form,
    previous: Form,
    last_shift_ms: Option<u64>,
}

impl FormTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Form {
        self.current
    }

    pub fn previous(&self) -> Form {
        self.previous
    }

    /// Absorb a host-reported form change (dispel, external polymorph).
    pub fn observe(&mut self, form: Form) {
        if form != self.current {
            self.previous = self.current;
            self.current = form;
        }
    }

    /// Attempt a shift. Gates: already in the form, transition cooldown,
    /// spell known, and mana cost (a fraction of base mana). Shifting to
    /// humanoid is free and needs no spell.
    pub fn shift_to(
        &mut self,
        host: &mut dyn HostAdapter,
        resources: &mut ResourceLedger,
        now_ms: u64,
        me: UnitId,
        form: Form,
    ) -> bool {
        if form == self.current {
            return false;
        }
        if let Some(last) = self.last_shift_ms {
            if now_ms.saturating_sub(last) < GCD_MS {
                return false;
            }
        }
        if let Some(spell) = form.shift_spell() {
            if !host.knows_spell(me, spell) {
                return false;
            }
            let cost = resources.max(PowerKind::Mana) * SHAPESHIFT_MANA_FRACTION;
            if !resources.can_afford(PowerKind::Mana, cost) {
                return false;
            }
            if !host.cast(me, me, spell) {
                return false;
            }
            resources.spend(PowerKind::Mana, cost);
        }
        debug!("Form shift: {:?} -> {:?}", self.current, form);
        self.previous = self.current;
        self.current = form;
        self.last_shift_ms = Some(now_ms);
        true
    }

    /// True when the current form permits casting `spell`.
    pub fn permits(&self, spell: Spell) -> bool {
        if spell.is_form_shift() {
            return true;
        }
        match self.current {
            Form::Bear => matches!(
                spell,
                Spell::Lacerate
                    | Spell::Thrash
                    | Spell::Swipe
                    | Spell::Maul
                    | Spell::MangleBear
                    | Spell::FrenziedRegeneration
                    | Spell::SurvivalInstincts
                    | Spell::Barkskin
            ),
            Form::Cat => matches!(
                spell,
                Spell::Prowl
                    | Spell::Ravage
                    | Spell::Rake
                    | Spell::Rip
                    | Spell::FerociousBite
                    | Spell::SavageRoar
                    | Spell::Shred
                    | Spell::Mangle
                    | Spell::TigersFury
                    | Spell::Berserk
                    | Spell::SurvivalInstincts
            ),
            Form::Moonkin => matches!(
                spell,
                Spell::Wrath
                    | Spell::Starfire
                    | Spell::Starsurge
                    | Spell::Moonfire
                    | Spell::Barkskin
            ),
            Form::TreeOfLife => matches!(
                spell,
                Spell::Rejuvenation
                    | Spell::Lifebloom
                    | Spell::Regrowth
                    | Spell::HealingTouch
                    | Spell::Swiftmend
                    | Spell::WildGrowth
                    | Spell::Tranquility
                    | Spell::NaturesSwiftness
                    | Spell::Ironbark
            ),
            Form::Aquatic | Form::Travel | Form::Flight => false,
            // Caster form can use everything except the physical form kits.
            Form::Humanoid => !matches!(
                spell,
                Spell::Lacerate
                    | Spell::MangleBear
                    | Spell::Thrash
                    | Spell::Swipe
                    | Spell::Maul
                    | Spell::Ravage
                    | Spell::Rake
                    | Spell::Rip
                    | Spell::FerociousBite
                    | Spell::SavageRoar
                    | Spell::Shred
                    | Spell::Mangle
                    | Spell::Prowl
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct StubHost {
        now: u64,
        known: HashSet<Spell>,
        casts: Vec<Spell>,
        accept: bool,
    }

    impl StubHost {
        fn new() -> Self {
            let mut known = HashSet::new();
            known.insert(Spell::BearForm);
            known.insert(Spell::CatForm);
            known.insert(Spell::MoonkinForm);
            Self {
                now: 0,
                known,
                casts: Vec::new(),
                accept: true,
            }
        }
    }

    impl HostAdapter for StubHost {
        fn now_ms(&self) -> u64 {
            self.now
        }
        fn health(&self, _: UnitId) -> f32 {
            100.0
        }
        fn max_health(&self, _: UnitId) -> f32 {
            100.0
        }
        fn power(&self, _: UnitId, _: PowerKind) -> f32 {
            100.0
        }
        fn max_power(&self, _: UnitId, _: PowerKind) -> f32 {
            100.0
        }
        fn has_aura(&self, _: UnitId, _: Spell) -> bool {
            false
        }
        fn aura_remaining_ms(&self, _: UnitId, _: Spell) -> u64 {
            0
        }
        fn aura_stacks(&self, _: UnitId, _: Spell) -> u8 {
            0
        }
        fn knows_spell(&self, _: UnitId, spell: Spell) -> bool {
            self.known.contains(&spell)
        }
        fn in_combat(&self, _: UnitId) -> bool {
            true
        }
        fn creature_type(&self, _: UnitId) -> crate::host::CreatureType {
            crate::host::CreatureType::Humanoid
        }
        fn distance(&self, _: UnitId, _: UnitId) -> f32 {
            0.0
        }
        fn is_hostile(&self, _: UnitId, _: UnitId) -> bool {
            false
        }
        fn is_behind(&self, _: UnitId, _: UnitId) -> bool {
            false
        }
        fn in_arc(&self, _: UnitId, _: UnitId, _: f32) -> bool {
            true
        }
        fn selected_target(&self, _: UnitId) -> Option<UnitId> {
            None
        }
        fn group_members(&self, _: UnitId) -> Vec<UnitId> {
            Vec::new()
        }
        fn hostiles_within(&self, _: UnitId, _: f32) -> Vec<UnitId> {
            Vec::new()
        }
        fn cast(&mut self, _: UnitId, _: UnitId, spell: Spell) -> bool {
            if self.accept {
                self.casts.push(spell);
            }
            self.accept
        }
        fn set_power(&mut self, _: UnitId, _: PowerKind, _: f32) {}
    }

    fn ledger() -> ResourceLedger {
        let mut r = ResourceLedger::new();
        r.sync_mana(100.0, 100.0);
        r
    }

    #[test]
    fn test_shift_casts_spell_and_spends_mana() {
        let mut host = StubHost::new();
        let mut resources = ledger();
        let mut forms = FormTracker::new();
        let me = UnitId(1);
        assert!(forms.shift_to(&mut host, &mut resources, 2000, me, Form::Bear));
        assert_eq!(forms.current(), Form::Bear);
        assert_eq!(host.casts, vec![Spell::BearForm]);
        assert!((resources.current(PowerKind::Mana) - 95.0).abs() < 0.001);
    }

    #[test]
    fn test_shift_to_current_form_is_noop() {
        let mut host = StubHost::new();
        let mut resources = ledger();
        let mut forms = FormTracker::new();
        let me = UnitId(1);
        assert!(forms.shift_to(&mut host, &mut resources, 2000, me, Form::Cat));
        assert!(!forms.shift_to(&mut host, &mut resources, 10_000, me, Form::Cat));
        assert_eq!(host.casts.len(), 1);
    }

    #[test]
    fn test_rapid_shifts_are_rate_limited() {
        let mut host = StubHost::new();
        let mut resources = ledger();
        let mut forms = FormTracker::new();
        let me = UnitId(1);
        assert!(forms.shift_to(&mut host, &mut resources, 2000, me, Form::Bear));
        assert!(!forms.shift_to(&mut host, &mut resources, 2500, me, Form::Cat));
        assert!(forms.shift_to(&mut host, &mut resources, 3600, me, Form::Cat));
    }

    #[test]
    fn test_shift_at_time_zero_is_rate_limited() {
        let mut host = StubHost::new();
        let mut resources = ledger();
        let mut forms = FormTracker::new();
        let me = UnitId(1);
        assert!(forms.shift_to(&mut host, &mut resources, 0, me, Form::Bear));
        assert!(
            !forms.shift_to(&mut host, &mut resources, 500, me, Form::Cat),
            "a shift at t=0 still arms the transition cooldown"
        );
        assert!(forms.shift_to(&mut host, &mut resources, 1500, me, Form::Cat));
    }

    #[test]
    fn test_unknown_form_spell_blocks_shift() {
        let mut host = StubHost::new();
        host.known.remove(&Spell::BearForm);
        let mut resources = ledger();
        let mut forms = FormTracker::new();
        assert!(!forms.shift_to(&mut host, &mut resources, 2000, UnitId(1), Form::Bear));
        assert_eq!(forms.current(), Form::Humanoid);
    }

    #[test]
    fn test_insufficient_mana_blocks_shift() {
        let mut host = StubHost::new();
        let mut resources = ResourceLedger::new();
        resources.sync_mana(1.0, 100.0);
        let mut forms = FormTracker::new();
        assert!(!forms.shift_to(&mut host, &mut resources, 2000, UnitId(1), Form::Bear));
    }

    #[test]
    fn test_shift_to_humanoid_is_free() {
        let mut host = StubHost::new();
        let mut resources = ledger();
        let mut forms = FormTracker::new();
        let me = UnitId(1);
        assert!(forms.shift_to(&mut host, &mut resources, 2000, me, Form::Bear));
        assert!(forms.shift_to(&mut host, &mut resources, 4000, me, Form::Humanoid));
        assert_eq!(forms.current(), Form::Humanoid);
        assert!((resources.current(PowerKind::Mana) - 95.0).abs() < 0.001);
    }

    #[test]
    fn test_form_ability_allow_lists() {
        let mut forms = FormTracker::new();
        forms.observe(Form::Cat);
        assert!(forms.permits(Spell::Shred));
        assert!(!forms.permits(Spell::Wrath));
        assert!(forms.permits(Spell::BearForm));
        forms.observe(Form::Bear);
        assert!(forms.permits(Spell::Lacerate));
        assert!(!forms.permits(Spell::Shred));
        forms.observe(Form::Moonkin);
        assert!(forms.permits(Spell::Starfire));
        assert!(!forms.permits(Spell::HealingTouch));
        forms.observe(Form::Humanoid);
        assert!(forms.permits(Spell::HealingTouch));
        assert!(forms.permits(Spell::Wrath));
        assert!(!forms.permits(Spell::Shred));
    }
}
