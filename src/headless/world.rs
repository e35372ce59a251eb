//! Simulated host world
//!
//! A small in-memory arena implementing `HostAdapter`. Damage and heal
//! amounts are rough rolls off the spell cost; the point of the simulation
//! is exercising rotation decisions, not combat math.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::host::{CreatureType, HostAdapter, PowerKind, UnitId};
use crate::spellbook::{Spell, SpellBook};

use super::config::{ScenarioConfig, UnitConfig};

/// Seedable RNG for deterministic scenario reproduction.
pub struct GameRng {
    rng: StdRng,
}

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn roll(&mut self, low: f32, high: f32) -> f32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}

#[derive(Debug, Clone, Copy)]
struct Aura {
    expires_ms: u64,
    stacks: u8,
}

/// One simulated unit.
pub struct SimUnit {
    pub health: f32,
    pub max_health: f32,
    pub mana: f32,
    pub max_mana: f32,
    pub energy: f32,
    pub rage: f32,
    pub position: (f32, f32),
    pub facing: f32,
    pub team: u8,
    pub known: HashSet<Spell>,
    pub incoming_dps: f32,
    pub in_combat: bool,
    auras: HashMap<Spell, Aura>,
}

const MANA_REGEN_PCT_PER_SEC: f32 = 2.0;

/// Simulated arena driving the `HostAdapter` contract.
pub struct SimWorld {
    now_ms: u64,
    units: HashMap<UnitId, SimUnit>,
    order: Vec<UnitId>,
    spellbook: SpellBook,
    rng: GameRng,
    druid: UnitId,
    tank: Option<UnitId>,
    casts: Vec<(u64, UnitId, UnitId, Spell)>,
}

impl SimWorld {
    pub fn from_config(config: &ScenarioConfig, spellbook: SpellBook) -> Self {
        let rng = match config.random_seed {
            Some(seed) => GameRng::from_seed(seed),
            None => GameRng::from_entropy(),
        };
        let mut world = Self {
            now_ms: 0,
            units: HashMap::new(),
            order: Vec::new(),
            spellbook,
            rng,
            druid: UnitId(0),
            tank: None,
            casts: Vec::new(),
        };
        let druid = world.spawn(&config.druid, 1);
        world.druid = druid;
        for ally in &config.allies {
            let id = world.spawn(ally, 1);
            if ally.tank {
                world.tank = Some(id);
                // Tanks sit in Bear Form.
                world.apply_aura(id, Spell::BearForm, u64::MAX, 1);
            }
        }
        for enemy in &config.enemies {
            world.spawn(enemy, 2);
        }
        world
    }

    fn spawn(&mut self, config: &UnitConfig, team: u8) -> UnitId {
        let id = UnitId(self.order.len() as u64 + 1);
        let unit = SimUnit {
            health: config.health.unwrap_or(config.max_health),
            max_health: config.max_health,
            mana: config.max_mana,
            max_mana: config.max_mana,
            energy: 100.0,
            rage: 0.0,
            position: config.position,
            facing: 0.0,
            team,
            known: config.spells.iter().copied().collect(),
            incoming_dps: config.incoming_dps,
            in_combat: false,
            auras: HashMap::new(),
        };
        self.units.insert(id, unit);
        self.order.push(id);
        id
    }

    pub fn druid(&self) -> UnitId {
        self.druid
    }

    pub fn tank(&self) -> Option<UnitId> {
        self.tank
    }

    pub fn unit(&self, id: UnitId) -> Option<&SimUnit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut SimUnit> {
        self.units.get_mut(&id)
    }

    /// First living enemy of the druid, in spawn order.
    pub fn first_enemy(&self) -> Option<UnitId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.is_hostile(self.druid, *id) && self.is_alive(*id))
    }

    /// Every cast the world has accepted, in order.
    pub fn cast_history(&self) -> &[(u64, UnitId, UnitId, Spell)] {
        &self.casts
    }

    pub fn apply_aura(&mut self, unit: UnitId, spell: Spell, expires_ms: u64, stacks: u8) {
        if let Some(u) = self.units.get_mut(&unit) {
            u.auras.insert(spell, Aura { expires_ms, stacks });
        }
    }

    pub fn remove_aura(&mut self, unit: UnitId, spell: Spell) {
        if let Some(u) = self.units.get_mut(&unit) {
            u.auras.remove(&spell);
        }
    }

    /// Script a damage spike outside the per-second pressure.
    pub fn deal_damage(&mut self, unit: UnitId, amount: f32) {
        if let Some(u) = self.units.get_mut(&unit) {
            u.health = (u.health - amount).max(0.0);
            u.in_combat = u.health > 0.0;
        }
    }

    /// Advance world time: expire auras, regenerate mana, and apply the
    /// scripted damage pressure. Returns `(unit, damage)` events so the
    /// caller can feed the druid's rage ledger.
    pub fn advance(&mut self, dt_ms: u64) -> Vec<(UnitId, f32)> {
        self.now_ms += dt_ms;
        let now = self.now_ms;
        let secs = dt_ms as f32 / 1000.0;
        let mut events = Vec::new();
        for id in self.order.clone() {
            let Some(unit) = self.units.get_mut(&id) else {
                continue;
            };
            if unit.health <= 0.0 {
                continue;
            }
            unit.auras.retain(|_, a| a.expires_ms > now);
            unit.mana = (unit.mana + unit.max_mana * MANA_REGEN_PCT_PER_SEC / 100.0 * secs)
                .min(unit.max_mana);
            if unit.incoming_dps > 0.0 {
                let damage = unit.incoming_dps * secs;
                unit.health = (unit.health - damage).max(0.0);
                unit.in_combat = true;
                events.push((id, damage));
            }
        }
        events
    }

    fn is_heal(spell: Spell) -> bool {
        matches!(
            spell,
            Spell::Rejuvenation
                | Spell::Lifebloom
                | Spell::Regrowth
                | Spell::HealingTouch
                | Spell::Swiftmend
                | Spell::WildGrowth
                | Spell::Tranquility
                | Spell::FrenziedRegeneration
        )
    }

    fn is_attack(&self, caster: UnitId, target: UnitId, spell: Spell) -> bool {
        !spell.is_form_shift() && !Self::is_heal(spell) && self.is_hostile(caster, target)
    }

    fn resolve_cast(&mut self, caster: UnitId, target: UnitId, spell: Spell) {
        let config = self.spellbook.get(spell).cloned();
        let (power, cost, duration, max_stacks) = config
            .map(|c| (c.power, c.cost, c.duration_ms, c.max_stacks))
            .unwrap_or((PowerKind::Mana, 0.0, 0, 1));
        let now = self.now_ms;

        // Mana is host-authoritative; energy and rage are mirrored in by
        // the engine instead.
        if power == PowerKind::Mana {
            if let Some(unit) = self.units.get_mut(&caster) {
                unit.mana = (unit.mana - cost).max(0.0);
            }
        }

        if spell.is_form_shift() {
            if let Some(unit) = self.units.get_mut(&caster) {
                unit.auras.retain(|s, _| !s.is_form_shift());
                let expires = if duration > 0 { now + duration } else { u64::MAX };
                unit.auras.insert(
                    spell,
                    Aura {
                        expires_ms: expires,
                        stacks: 1,
                    },
                );
            }
            return;
        }

        if spell == Spell::Prowl {
            if let Some(unit) = self.units.get_mut(&caster) {
                unit.auras.insert(
                    spell,
                    Aura {
                        expires_ms: u64::MAX,
                        stacks: 1,
                    },
                );
            }
            return;
        }

        // Timed effects land as auras; stacking effects build up.
        if duration > 0 {
            if let Some(unit) = self.units.get_mut(&target) {
                unit.auras
                    .entry(spell)
                    .and_modify(|a| {
                        a.expires_ms = now + duration;
                        a.stacks = (a.stacks + 1).min(max_stacks);
                    })
                    .or_insert(Aura {
                        expires_ms: now + duration,
                        stacks: 1,
                    });
            }
        }

        if Self::is_heal(spell) {
            let amount = self.rng.roll(cost * 8.0, cost * 12.0);
            if let Some(unit) = self.units.get_mut(&target) {
                unit.health = (unit.health + amount).min(unit.max_health);
            }
        } else if self.is_attack(caster, target, spell) {
            let amount = self.rng.roll(cost.max(10.0) * 4.0, cost.max(10.0) * 7.0);
            // Attacking breaks stealth.
            if let Some(unit) = self.units.get_mut(&caster) {
                unit.auras.remove(&Spell::Prowl);
                unit.in_combat = true;
            }
            if let Some(unit) = self.units.get_mut(&target) {
                unit.health = (unit.health - amount).max(0.0);
                unit.in_combat = unit.health > 0.0;
            }
            debug!("{caster} hits {target} with {spell} for {amount:.0}");
        }
    }
}

impl HostAdapter for SimWorld {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn health(&self, unit: UnitId) -> f32 {
        self.units.get(&unit).map(|u| u.health).unwrap_or(0.0)
    }

    fn max_health(&self, unit: UnitId) -> f32 {
        self.units.get(&unit).map(|u| u.max_health).unwrap_or(0.0)
    }

    fn power(&self, unit: UnitId, kind: PowerKind) -> f32 {
        self.units
            .get(&unit)
            .map(|u| match kind {
                PowerKind::Mana => u.mana,
                PowerKind::Energy => u.energy,
                PowerKind::Rage => u.rage,
            })
            .unwrap_or(0.0)
    }

    fn max_power(&self, unit: UnitId, kind: PowerKind) -> f32 {
        self.units
            .get(&unit)
            .map(|u| match kind {
                PowerKind::Mana => u.max_mana,
                PowerKind::Energy => 100.0,
                PowerKind::Rage => 100.0,
            })
            .unwrap_or(0.0)
    }

    fn has_aura(&self, unit: UnitId, spell: Spell) -> bool {
        self.aura_remaining_ms(unit, spell) > 0
    }

    fn aura_remaining_ms(&self, unit: UnitId, spell: Spell) -> u64 {
        self.units
            .get(&unit)
            .and_then(|u| u.auras.get(&spell))
            .map(|a| a.expires_ms.saturating_sub(self.now_ms))
            .unwrap_or(0)
    }

    fn aura_stacks(&self, unit: UnitId, spell: Spell) -> u8 {
        self.units
            .get(&unit)
            .and_then(|u| u.auras.get(&spell))
            .filter(|a| a.expires_ms > self.now_ms)
            .map(|a| a.stacks)
            .unwrap_or(0)
    }

    fn knows_spell(&self, unit: UnitId, spell: Spell) -> bool {
        self.units
            .get(&unit)
            .map(|u| u.known.contains(&spell))
            .unwrap_or(false)
    }

    fn in_combat(&self, unit: UnitId) -> bool {
        self.units.get(&unit).map(|u| u.in_combat).unwrap_or(false)
    }

    fn creature_type(&self, _unit: UnitId) -> CreatureType {
        CreatureType::Humanoid
    }

    fn distance(&self, a: UnitId, b: UnitId) -> f32 {
        match (self.units.get(&a), self.units.get(&b)) {
            (Some(ua), Some(ub)) => {
                let dx = ua.position.0 - ub.position.0;
                let dy = ua.position.1 - ub.position.1;
                (dx * dx + dy * dy).sqrt()
            }
            _ => f32::MAX,
        }
    }

    fn is_hostile(&self, a: UnitId, b: UnitId) -> bool {
        match (self.units.get(&a), self.units.get(&b)) {
            (Some(ua), Some(ub)) => ua.team != ub.team,
            _ => false,
        }
    }

    fn is_behind(&self, a: UnitId, b: UnitId) -> bool {
        let (Some(ua), Some(ub)) = (self.units.get(&a), self.units.get(&b)) else {
            return false;
        };
        let to_a = (ua.position.0 - ub.position.0, ua.position.1 - ub.position.1);
        let facing = (ub.facing.cos(), ub.facing.sin());
        to_a.0 * facing.0 + to_a.1 * facing.1 < 0.0
    }

    fn in_arc(&self, a: UnitId, b: UnitId, half_angle: f32) -> bool {
        let (Some(ua), Some(ub)) = (self.units.get(&a), self.units.get(&b)) else {
            return false;
        };
        let to_b = (ub.position.0 - ua.position.0, ub.position.1 - ua.position.1);
        let angle = to_b.1.atan2(to_b.0);
        let mut delta = (angle - ua.facing).abs();
        if delta > std::f32::consts::PI {
            delta = 2.0 * std::f32::consts::PI - delta;
        }
        delta <= half_angle
    }

    fn selected_target(&self, unit: UnitId) -> Option<UnitId> {
        // The sim has no manual targeting; everyone picks the first living
        // enemy in spawn order.
        self.order
            .iter()
            .copied()
            .find(|&id| self.is_hostile(unit, id) && self.is_alive(id))
    }

    fn group_members(&self, unit: UnitId) -> Vec<UnitId> {
        let Some(team) = self.units.get(&unit).map(|u| u.team) else {
            return Vec::new();
        };
        self.order
            .iter()
            .copied()
            .filter(|id| self.units.get(id).map(|u| u.team) == Some(team))
            .collect()
    }

    fn hostiles_within(&self, unit: UnitId, range: f32) -> Vec<UnitId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| {
                self.is_hostile(unit, id) && self.is_alive(id) && self.distance(unit, id) <= range
            })
            .collect()
    }

    fn cast(&mut self, caster: UnitId, target: UnitId, spell: Spell) -> bool {
        if !self.knows_spell(caster, spell) {
            return false;
        }
        if !self.is_alive(caster) || (target != caster && !self.is_alive(target)) {
            return false;
        }
        self.casts.push((self.now_ms, caster, target, spell));
        self.resolve_cast(caster, target, spell);
        true
    }

    fn set_power(&mut self, unit: UnitId, kind: PowerKind, value: f32) {
        if let Some(u) = self.units.get_mut(&unit) {
            match kind {
                PowerKind::Mana => u.mana = value.clamp(0.0, u.max_mana),
                PowerKind::Energy => u.energy = value.clamp(0.0, 100.0),
                PowerKind::Rage => u.rage = value.clamp(0.0, 100.0),
            }
        }
    }
}
