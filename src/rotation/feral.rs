//! Feral Rotation
//!
//! Energy and combo point melee dps in Cat Form: open from stealth,
//! maintain bleeds under the pandemic rule, spend combo points on
//! finishers, and pool energy when a finisher is close.
//!
//! ## Priority Order (Stealthed)
//! 1. Ravage (opener, awards a combo point)
//!
//! ## Priority Order (In Combat)
//! 1. Tiger's Fury (off-GCD) when energy runs dry
//! 2. Berserk (off-GCD) on a healthy target
//! 3. Cat Form (stay shifted)
//! 4. Savage Roar refresh at 2+ combo points
//! 5. Rake (pandemic refresh, awards a combo point)
//! 6. Finisher at 4+ combo points: Ferocious Bite on an execute target,
//!    an Apex Predator proc, or capped points over a healthy Rip;
//!    otherwise Rip (pandemic refresh, duration scales with points)
//! 7. Pool energy at 3+ combo points
//! 8. Shred from behind, Mangle otherwise (award a combo point)

use tracing::debug;

use crate::combat::log::CombatLogEventType;
use crate::constants::{
    EXECUTE_PCT, FINISHER_COMBO_POINTS, MAX_COMBO_POINTS, MELEE_RANGE, POOLING_COMBO_POINTS,
    POOLING_ENERGY_CEILING, SAVAGE_ROAR_REFRESH_MS, STEALTH_APPROACH_RANGE,
    TIGERS_FURY_ENERGY_FLOOR, TIGERS_FURY_ENERGY_GAIN,
};
use crate::host::{HostAdapter, PowerKind, UnitId};
use crate::spellbook::Spell;
use crate::substrate::Form;

use super::{ClassRotation, CombatContext, Specialization};

/// Target health percent above which Berserk is worth committing.
const BERSERK_TARGET_PCT: f32 = 50.0;

pub struct FeralRotation;

impl FeralRotation {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FeralRotation {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRotation for FeralRotation {
    fn specialization(&self) -> Specialization {
        Specialization::Feral
    }

    fn home_form(&self) -> Option<Form> {
        Some(Form::Cat)
    }

    fn run(
        &mut self,
        host: &mut dyn HostAdapter,
        ctx: &mut CombatContext,
        me: UnitId,
        target: Option<UnitId>,
    ) -> bool {
        let Some(target) = target else {
            return false;
        };
        if !host.is_hostile(me, target) {
            return false;
        }

        // Priority 3 evaluated early: nothing below works out of form.
        if ctx.forms.current() != Form::Cat {
            return ctx.shift_form(host, me, Form::Cat);
        }

        if host.has_aura(me, Spell::Prowl) {
            return try_stealth_opener(host, ctx, me, target);
        }

        if !host.in_combat(me) && try_prowl(host, ctx, me, target) {
            return true;
        }

        // Priority 1: Tiger's Fury (off-GCD, does not consume the tick)
        try_tigers_fury(host, ctx, me);

        // Priority 2: Berserk (off-GCD)
        try_berserk(host, ctx, me, target);

        // Priority 4: Savage Roar
        if try_savage_roar(host, ctx, me, target) {
            return true;
        }

        // Priority 5: Rake upkeep outranks spending the points.
        if try_rake(host, ctx, me, target) {
            return true;
        }

        // Priority 6: Finishers
        if ctx.combo.points(target) >= FINISHER_COMBO_POINTS {
            if try_ferocious_bite(host, ctx, me, target) {
                return true;
            }
            if try_rip(host, ctx, me, target) {
                return true;
            }
        }

        // Priority 7: Pool for the next finisher
        if should_pool(ctx, target) {
            debug!("Pooling energy at {} combo points", ctx.combo.points(target));
            return false;
        }

        // Priority 8: Builders
        try_builder(host, ctx, me, target)
    }
}

/// Enter stealth for the approach when a fight has not started yet.
fn try_prowl(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    target: UnitId,
) -> bool {
    if host.distance(me, target) > STEALTH_APPROACH_RANGE {
        return false;
    }
    ctx.try_cast(host, me, me, Spell::Prowl)
}

/// Stealthed: Ravage from melee, awards the opener combo point.
fn try_stealth_opener(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    target: UnitId,
) -> bool {
    if host.distance(me, target) > MELEE_RANGE {
        return false;
    }
    if !ctx.try_cast(host, me, target, Spell::Ravage) {
        return false;
    }
    ctx.combo.generate(target, false);
    true
}

fn try_tigers_fury(host: &mut dyn HostAdapter, ctx: &mut CombatContext, me: UnitId) -> bool {
    if ctx.resources.current(PowerKind::Energy) >= TIGERS_FURY_ENERGY_FLOOR {
        return false;
    }
    if !ctx.try_cast(host, me, me, Spell::TigersFury) {
        return false;
    }
    ctx.resources.gain(PowerKind::Energy, TIGERS_FURY_ENERGY_GAIN);
    true
}

/// Commit Berserk only when the target will live long enough to use it.
fn try_berserk(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    target: UnitId,
) -> bool {
    if host.health_pct(target) <= BERSERK_TARGET_PCT {
        return false;
    }
    ctx.try_cast(host, me, me, Spell::Berserk)
}

fn try_savage_roar(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    target: UnitId,
) -> bool {
    if ctx.combo.points(target) < 2 {
        return false;
    }
    if host.aura_remaining_ms(me, Spell::SavageRoar) >= SAVAGE_ROAR_REFRESH_MS {
        return false;
    }
    if !ctx.try_cast(host, me, me, Spell::SavageRoar) {
        return false;
    }
    ctx.combo.spend();
    true
}

/// Ferocious Bite when the points are better spent on direct damage: an
/// execute target, a free Apex Predator proc, or capped points while Rip
/// is still healthy.
fn try_ferocious_bite(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    target: UnitId,
) -> bool {
    let rip_base = ctx.spellbook.duration_ms(Spell::Rip);
    let rip_healthy = !ctx
        .dots
        .should_refresh(ctx.now(), target, Spell::Rip, rip_base);
    let apex = host.has_aura(me, Spell::ApexPredator);
    let execute = host.health_pct(target) < EXECUTE_PCT;
    let capped = ctx.combo.points(target) >= MAX_COMBO_POINTS && rip_healthy;
    if !execute && !apex && !capped {
        return false;
    }
    if !ctx.try_cast(host, me, target, Spell::FerociousBite) {
        return false;
    }
    if apex {
        let now = ctx.now();
        ctx.log.log(
            now,
            CombatLogEventType::Proc,
            format!("{me} consumes Apex Predator"),
        );
    }
    ctx.combo.spend();
    true
}

/// Rip under the pandemic rule. Duration scales with the points spent.
fn try_rip(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    target: UnitId,
) -> bool {
    let base = ctx.spellbook.duration_ms(Spell::Rip);
    if !ctx.dots.should_refresh(ctx.now(), target, Spell::Rip, base) {
        return false;
    }
    if !ctx.try_cast(host, me, target, Spell::Rip) {
        return false;
    }
    let points = ctx.combo.spend();
    let duration = base * u64::from(points) / u64::from(MAX_COMBO_POINTS);
    let now = ctx.now();
    ctx.dots.apply(now, target, Spell::Rip, duration);
    true
}

/// Rake under the pandemic rule, awarding a combo point.
fn try_rake(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    target: UnitId,
) -> bool {
    let base = ctx.spellbook.duration_ms(Spell::Rake);
    if !ctx.dots.should_refresh(ctx.now(), target, Spell::Rake, base) {
        return false;
    }
    if !ctx.try_cast(host, me, target, Spell::Rake) {
        return false;
    }
    let now = ctx.now();
    ctx.dots.apply(now, target, Spell::Rake, base);
    ctx.combo.generate(target, false);
    true
}

/// Hold builders when a finisher is close and energy is low, so the
/// finisher lands the moment the last point arrives.
fn should_pool(ctx: &CombatContext, target: UnitId) -> bool {
    ctx.combo.points(target) >= POOLING_COMBO_POINTS
        && ctx.combo.points(target) < MAX_COMBO_POINTS
        && ctx.resources.current(PowerKind::Energy) < POOLING_ENERGY_CEILING
}

fn try_builder(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    target: UnitId,
) -> bool {
    let spell = if host.is_behind(me, target) {
        Spell::Shred
    } else {
        Spell::Mangle
    };
    if !ctx.try_cast(host, me, target, spell) {
        return false;
    }
    ctx.combo.generate(target, false);
    true
}
