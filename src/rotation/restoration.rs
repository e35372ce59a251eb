//! Restoration Rotation
//!
//! Group healer: scans the group every tick, predicts where health is
//! heading from recent damage, and works a triage queue from most to
//! least urgent. HoTs carry the steady state; cast-time heals and
//! cooldowns cover the spikes.
//!
//! ## Priority Order
//! 1. Tranquility when 3+ allies are below half health
//! 2. Tree of Life when 2+ allies are critical
//! 3. Nature's Swiftness (off-GCD) plus Healing Touch on an emergency
//! 4. Ironbark on a tank in danger
//! 5. Lifebloom stacks on the tank (pandemic refresh)
//! 6. Rejuvenation spread across the queue (capped at 4 targets)
//! 7. Wild Growth when 3+ allies are injured
//! 8. Swiftmend, consuming one of my HoTs
//! 9. Direct heal on the queue head: Healing Touch deep, Regrowth shallow
//! 10. Nothing to heal: Moonfire the kill target

use tracing::debug;

use crate::combat::log::CombatLogEventType;
use crate::constants::{
    GROUP_EMERGENCY_COUNT, HEALING_RANGE, MAX_HOT_STACKS, MAX_REJUVENATION_TARGETS,
    TANK_PROTECT_PCT, TRIAGE_CRITICAL_PCT, TRIAGE_MODERATE_PCT, WILD_GROWTH_COUNT,
    WILD_GROWTH_PCT,
};
use crate::host::{HostAdapter, UnitId};
use crate::spellbook::Spell;
use crate::substrate::{DamageTracker, Form, TriageBucket, TriageQueue};

use super::{ClassRotation, CombatContext, Specialization};

pub struct RestorationRotation {
    damage: DamageTracker,
}

impl RestorationRotation {
    pub fn new() -> Self {
        Self {
            damage: DamageTracker::new(),
        }
    }
}

impl Default for RestorationRotation {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRotation for RestorationRotation {
    fn specialization(&self) -> Specialization {
        Specialization::Restoration
    }

    fn run(
        &mut self,
        host: &mut dyn HostAdapter,
        ctx: &mut CombatContext,
        me: UnitId,
        target: Option<UnitId>,
    ) -> bool {
        // Healing kit is locked out of the feral and moonkin forms.
        if matches!(ctx.forms.current(), Form::Bear | Form::Cat | Form::Moonkin) {
            return ctx.shift_form(host, me, Form::Humanoid);
        }

        let roster = scan_group(host, me, &mut self.damage);
        let queue = TriageQueue::build(roster.iter().copied(), &self.damage);
        let below_half = roster
            .iter()
            .filter(|&&(_, health, max)| max > 0.0 && health / max * 100.0 < TANK_PROTECT_PCT)
            .count();

        // Priority 1: Tranquility on a group-wide emergency
        if below_half >= GROUP_EMERGENCY_COUNT && ctx.try_cast(host, me, me, Spell::Tranquility) {
            let now = ctx.now();
            ctx.log.log(
                now,
                CombatLogEventType::Triage,
                format!("Tranquility with {below_half} allies below half"),
            );
            return true;
        }

        // Priority 2: Tree of Life on a sustained emergency
        if queue.count_at_or_worse(TriageBucket::Critical) >= 2
            && ctx.forms.current() != Form::TreeOfLife
            && ctx.cooldowns.ready(Spell::TreeOfLife)
            && ctx.shift_form(host, me, Form::TreeOfLife)
        {
            let cooldown = ctx.spellbook.cooldown_ms(Spell::TreeOfLife);
            ctx.cooldowns.arm(Spell::TreeOfLife, cooldown);
            return true;
        }

        // Priority 3: emergency single-target save
        if let Some(entry) = queue
            .iter()
            .find(|e| e.bucket == TriageBucket::Emergency)
            .copied()
        {
            // Nature's Swiftness is off-GCD; the Healing Touch it makes
            // instant still lands this tick.
            ctx.try_cast(host, me, me, Spell::NaturesSwiftness);
            if ctx.try_cast(host, me, entry.unit, Spell::HealingTouch) {
                return true;
            }
        }

        let tank = identify_tank(host, me);

        // Priority 4: Ironbark on a tank in danger
        if let Some(tank) = tank {
            if host.health_pct(tank) < TANK_PROTECT_PCT
                && ctx.try_cast(host, me, tank, Spell::Ironbark)
            {
                return true;
            }
        }

        // Priority 5: Lifebloom upkeep on the tank
        if let Some(tank) = tank {
            if try_lifebloom(host, ctx, me, tank) {
                return true;
            }
        }

        // Priority 6: Rejuvenation spread
        if try_rejuvenation(host, ctx, me, &queue) {
            return true;
        }

        // Priority 7: Wild Growth on a spread-damage group
        let injured = roster
            .iter()
            .filter(|&&(_, health, max)| max > 0.0 && health / max * 100.0 < WILD_GROWTH_PCT)
            .count();
        if injured >= WILD_GROWTH_COUNT && ctx.try_cast(host, me, me, Spell::WildGrowth) {
            return true;
        }

        // Priority 8: Swiftmend
        if try_swiftmend(host, ctx, me, &queue) {
            return true;
        }

        // Priority 9: direct heal on the queue head
        if let Some(entry) = queue.peek().copied() {
            let spell = if entry.predicted_pct < TRIAGE_CRITICAL_PCT {
                Spell::HealingTouch
            } else {
                Spell::Regrowth
            };
            if ctx.try_cast(host, me, entry.unit, spell) {
                if spell == Spell::Regrowth {
                    let base = ctx.spellbook.duration_ms(Spell::Regrowth);
                    let now = ctx.now();
                    ctx.dots.apply(now, entry.unit, Spell::Regrowth, base);
                }
                return true;
            }
        }

        // Priority 10: idle damage
        if let Some(target) = target.filter(|&t| host.is_hostile(me, t)) {
            let base = ctx.spellbook.duration_ms(Spell::Moonfire);
            if ctx.dots.should_refresh(ctx.now(), target, Spell::Moonfire, base)
                && ctx.try_cast(host, me, target, Spell::Moonfire)
            {
                let now = ctx.now();
                ctx.dots.apply(now, target, Spell::Moonfire, base);
                return true;
            }
        }

        false
    }
}

/// Group members in healing range, feeding the damage tracker as a side
/// effect. The roster includes the healer.
fn scan_group(
    host: &dyn HostAdapter,
    me: UnitId,
    damage: &mut DamageTracker,
) -> Vec<(UnitId, f32, f32)> {
    host.group_members(me)
        .into_iter()
        .filter(|&unit| unit == me || host.distance(me, unit) <= HEALING_RANGE)
        .filter(|&unit| host.is_alive(unit))
        .map(|unit| {
            let health = host.health(unit);
            damage.observe(unit, health);
            (unit, health, host.max_health(unit))
        })
        .collect()
}

/// The tank is the member holding Bear Form, falling back to the largest
/// health pool.
fn identify_tank(host: &dyn HostAdapter, me: UnitId) -> Option<UnitId> {
    let members: Vec<UnitId> = host
        .group_members(me)
        .into_iter()
        .filter(|&u| u != me && host.is_alive(u))
        .collect();
    members
        .iter()
        .copied()
        .find(|&u| host.has_aura(u, Spell::BearForm))
        .or_else(|| {
            members
                .iter()
                .copied()
                .max_by(|&a, &b| host.max_health(a).total_cmp(&host.max_health(b)))
        })
}

/// Keep Lifebloom rolling on the tank: build to full stacks, then only
/// pandemic refreshes.
fn try_lifebloom(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    tank: UnitId,
) -> bool {
    let base = ctx.spellbook.duration_ms(Spell::Lifebloom);
    let now = ctx.now();
    let stacks = ctx.dots.stacks(now, tank, Spell::Lifebloom);
    let needs_refresh = ctx.dots.should_refresh(now, tank, Spell::Lifebloom, base);
    if stacks >= MAX_HOT_STACKS && !needs_refresh {
        return false;
    }
    if !ctx.try_cast(host, me, tank, Spell::Lifebloom) {
        return false;
    }
    ctx.dots.apply(now, tank, Spell::Lifebloom, base);
    true
}

/// Rejuvenation on the most urgent queue entry not already covered, up to
/// the concurrent-target cap.
fn try_rejuvenation(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    queue: &TriageQueue,
) -> bool {
    let now = ctx.now();
    if ctx.dots.active_count(now, Spell::Rejuvenation) >= MAX_REJUVENATION_TARGETS {
        return false;
    }
    let base = ctx.spellbook.duration_ms(Spell::Rejuvenation);
    for entry in queue.iter() {
        if ctx.dots.present(now, entry.unit, Spell::Rejuvenation) {
            continue;
        }
        if ctx.try_cast(host, me, entry.unit, Spell::Rejuvenation) {
            ctx.dots.apply(now, entry.unit, Spell::Rejuvenation, base);
            debug!("Rejuvenation on {} ({:?})", entry.unit, entry.bucket);
            return true;
        }
    }
    false
}

/// Swiftmend an ally under the moderate line who carries one of my HoTs.
/// The consumed HoT is removed from tracking.
fn try_swiftmend(
    host: &mut dyn HostAdapter,
    ctx: &mut CombatContext,
    me: UnitId,
    queue: &TriageQueue,
) -> bool {
    let now = ctx.now();
    for entry in queue.iter() {
        if entry.health_pct >= TRIAGE_MODERATE_PCT {
            continue;
        }
        let hot = [Spell::Rejuvenation, Spell::Regrowth]
            .into_iter()
            .find(|&h| ctx.dots.present(now, entry.unit, h));
        let Some(hot) = hot else {
            continue;
        };
        if ctx.try_cast(host, me, entry.unit, Spell::Swiftmend) {
            ctx.dots.remove(entry.unit, hot);
            let now = ctx.now();
            ctx.log.log(
                now,
                CombatLogEventType::Triage,
                format!("Swiftmend consumes {hot} on {}", entry.unit),
            );
            return true;
        }
    }
    false
}
