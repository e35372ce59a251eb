//! Guardian Rotation
//!
//! Rage-fueled tanking in Bear Form: survive first, hold a pack second,
//! and dump spare rage into damage last.
//!
//! ## Priority Order
//! 1. Frenzied Regeneration (off-GCD) below 30% health
//! 2. Survival Instincts (off-GCD) below 40% health
//! 3. Bear Form (stay shifted)
//! 4. Multi-target threat with 2+ enemies in reach: Thrash, then Swipe
//! 5. Lacerate upkeep (stacks to 3, pandemic refresh)
//! 6. Mangle on cooldown
//! 7. Maul as a rage dump

use crate::constants::{
    FRENZIED_REGEN_PCT, MAUL_RAGE_FLOOR, MAX_HOT_STACKS, SURVIVAL_INSTINCTS_PCT, THREAT_RANGE,
};
use crate::host::{HostAdapter, PowerKind, UnitId};
use crate::spellbook::Spell;
use crate::substrate::Form;

use super::{ClassRotation, CombatContext, Specialization};

pub struct GuardianRotation;

impl GuardianRotation {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GuardianRotation {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRotation for GuardianRotation {
    fn specialization(&self) -> Specialization {
        Specialization::Guardian
    }

    fn home_form(&self) -> Option<Form> {
        Some(Form::Bear)
    }

    fn run(
        &mut self,
        host: &mut dyn HostAdapter,
        ctx: &mut CombatContext,
        me: UnitId,
        target: Option<UnitId>,
    ) -> bool {
        // Priority 3 evaluated early: the whole kit needs Bear Form.
        if ctx.forms.current() != Form::Bear {
            return ctx.shift_form(host, me, Form::Bear);
        }

        // Priority 1: Frenzied Regeneration (off-GCD)
        if host.health_pct(me) < FRENZIED_REGEN_PCT
            && ctx.try_cast(host, me, me, Spell::FrenziedRegeneration)
        {
            return true;
        }

        // Priority 2: Survival Instincts (off-GCD)
        if host.health_pct(me) < SURVIVAL_INSTINCTS_PCT
            && ctx.try_cast(host, me, me, Spell::SurvivalInstincts)
        {
            return true;
        }

        let Some(target) = target else {
            return false;
        };
        if !host.is_hostile(me, target) {
            return false;
        }

        // Priority 4: Multi-target threat
        if host.hostiles_within(me, THREAT_RANGE).len() >= 2 {
            if try_thrash(host, ctx, me, target) {
                return true;
            }
            if ctx.try_cast(host, me, target, Spell::Swipe) {
                return true;
            }
        }

        // Priority 5: Lacerate upkeep
        if try_lacerate(host, ctx, me, target) {
            return true;
        }

        // Priority 6: Mangle on cooldown
        if ctx.try_cast(host, me, target, Spell::MangleBear) {
            return true;
        }

        // Priority 7: Rage dump
        if ctx.resources.current(PowerKind::Rage) >= MAUL_RAGE_FLOOR
            && ctx.try_cast(host, me, target, Spell::Maul)
        {
            return true;
        }

        false
    }
}

/// Thrash leaves a bleed on everything in reach.
fn try_thrash(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    target: UnitId,
) -> bool {
    if !ctx.try_cast(host, me, target, Spell::Thrash) {
        return false;
    }
    let base = ctx.spellbook.duration_ms(Spell::Thrash);
    let now = ctx.now();
    for enemy in host.hostiles_within(me, THREAT_RANGE) {
        ctx.dots.apply(now, enemy, Spell::Thrash, base);
    }
    true
}

/// Lacerate until the bleed sits at full stacks, then only pandemic
/// refreshes.
fn try_lacerate(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    target: UnitId,
) -> bool {
    let base = ctx.spellbook.duration_ms(Spell::Lacerate);
    let now = ctx.now();
    let stacks = ctx.dots.stacks(now, target, Spell::Lacerate);
    let needs_refresh = ctx.dots.should_refresh(now, target, Spell::Lacerate, base);
    if stacks >= MAX_HOT_STACKS && !needs_refresh {
        return false;
    }
    if !ctx.try_cast(host, me, target, Spell::Lacerate) {
        return false;
    }
    ctx.dots.apply(now, target, Spell::Lacerate, base);
    true
}
