//! Balance Rotation
//!
//! Caster dps built around the eclipse oscillator: Wrath fills the solar
//! bar, Starfire fills the lunar bar, and a full bar locks in a damage
//! window during which the matching filler is spammed.
//!
//! ## Priority Order
//! 1. Moonkin Form (stay shifted)
//! 2. Moonfire spread on 3+ clustered enemies
//! 3. Starsurge (on cooldown)
//! 4. Starsurge via Shooting Stars proc (consumed once, ignores the cooldown)
//! 5. Eclipse filler: Wrath in solar, Starfire in lunar
//! 6. Moonfire on the kill target (pandemic refresh)
//! 7. Build toward the closer eclipse: Wrath for solar, Starfire for lunar

use tracing::debug;

use crate::combat::log::CombatLogEventType;
use crate::constants::MOONFIRE_SPREAD_RANGE;
use crate::host::{HostAdapter, UnitId};
use crate::spellbook::Spell;
use crate::substrate::{EclipseSide, EclipseState, Form};

use super::{ClassRotation, CombatContext, Specialization};

/// Minimum clustered enemies before Moonfire is spread instead of focused.
const AOE_TARGET_COUNT: usize = 3;

pub struct BalanceRotation {
    shooting_stars_armed: bool,
}

impl BalanceRotation {
    pub fn new() -> Self {
        Self {
            shooting_stars_armed: true,
        }
    }
}

impl Default for BalanceRotation {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRotation for BalanceRotation {
    fn specialization(&self) -> Specialization {
        Specialization::Balance
    }

    fn home_form(&self) -> Option<Form> {
        Some(Form::Moonkin)
    }

    fn run(
        &mut self,
        host: &mut dyn HostAdapter,
        ctx: &mut CombatContext,
        me: UnitId,
        target: Option<UnitId>,
    ) -> bool {
        ctx.eclipse.tick(ctx.now());

        // A consumed proc re-arms only after the host aura has dropped.
        if !host.has_aura(me, Spell::ShootingStars) {
            self.shooting_stars_armed = true;
        }

        // Priority 1: Moonkin Form
        if ctx.forms.current() != Form::Moonkin && ctx.shift_form(host, me, Form::Moonkin) {
            return true;
        }

        let Some(target) = target else {
            return false;
        };
        if !host.is_hostile(me, target) {
            return false;
        }

        // Priority 2: Moonfire spread on a cluster
        if try_moonfire_spread(host, ctx, me) {
            return true;
        }

        // Priority 3: Starsurge on cooldown
        if ctx.try_cast(host, me, target, Spell::Starsurge) {
            return true;
        }

        // Priority 4: Shooting Stars proc overrides the Starsurge cooldown
        if self.shooting_stars_armed && try_shooting_stars(host, ctx, me, target) {
            self.shooting_stars_armed = false;
            return true;
        }

        // Priority 5: Eclipse filler
        match ctx.eclipse.state() {
            EclipseState::Solar => {
                if ctx.try_cast(host, me, target, Spell::Wrath) {
                    return true;
                }
            }
            EclipseState::Lunar => {
                if ctx.try_cast(host, me, target, Spell::Starfire) {
                    return true;
                }
            }
            EclipseState::None => {}
        }

        // Priority 6: Moonfire upkeep on the kill target
        if try_moonfire(host, ctx, me, target) {
            return true;
        }

        // Priority 7: Build toward the closer eclipse
        match ctx.eclipse.recommended_next_eclipse() {
            EclipseSide::Solar => {
                if ctx.try_cast(host, me, target, Spell::Wrath) {
                    ctx.eclipse.gain_solar_default();
                    return true;
                }
            }
            EclipseSide::Lunar => {
                if ctx.try_cast(host, me, target, Spell::Starfire) {
                    ctx.eclipse.gain_lunar_default();
                    return true;
                }
            }
        }

        false
    }
}

/// Spread Moonfire when enough enemies are clustered: pick the first one
/// inside the pandemic window.
fn try_moonfire_spread(host: &mut dyn HostAdapter, ctx: &mut CombatContext, me: UnitId) -> bool {
    let hostiles = host.hostiles_within(me, MOONFIRE_SPREAD_RANGE);
    if hostiles.len() < AOE_TARGET_COUNT {
        return false;
    }
    let base = ctx.spellbook.duration_ms(Spell::Moonfire);
    let now = ctx.now();
    for enemy in hostiles {
        if ctx.dots.should_refresh(now, enemy, Spell::Moonfire, base)
            && try_moonfire(host, ctx, me, enemy)
        {
            debug!("Spreading Moonfire to {enemy}");
            return true;
        }
    }
    false
}

/// Moonfire with the pandemic refresh gate.
fn try_moonfire(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    target: UnitId,
) -> bool {
    let base = ctx.spellbook.duration_ms(Spell::Moonfire);
    if !ctx.dots.should_refresh(ctx.now(), target, Spell::Moonfire, base) {
        return false;
    }
    if !ctx.try_cast(host, me, target, Spell::Moonfire) {
        return false;
    }
    let now = ctx.now();
    ctx.dots.apply(now, target, Spell::Moonfire, base);
    true
}

/// Consume a Shooting Stars proc for an off-cooldown Starsurge.
fn try_shooting_stars(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    target: UnitId,
) -> bool {
    if !host.has_aura(me, Spell::ShootingStars) {
        return false;
    }
    if !ctx.try_cast_ignoring_cooldown(host, me, target, Spell::Starsurge) {
        return false;
    }
    let now = ctx.now();
    ctx.log.log(
        now,
        CombatLogEventType::Proc,
        format!("{me} consumes Shooting Stars"),
    );
    true
}
