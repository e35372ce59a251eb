//! Host Adapter
//!
//! The narrow read/write contract between the decision engine and the
//! simulation host. Every read is a synchronous query against in-memory
//! world state; the only writes are a cast request and a power mirror.
//! The adapter performs no policy.

use crate::spellbook::Spell;

/// Opaque, host-owned unit identity. The engine never inspects the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u64);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unit:{}", self.0)
    }
}

/// Spendable resource pools a unit can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PowerKind {
    /// Regenerates via the host's own regeneration; the engine only spends.
    Mana,
    /// Regenerates continuously at a fixed rate; caps at 100.
    Energy,
    /// Built by taking and dealing damage; decays out of combat.
    Rage,
}

/// Coarse creature classification, used for target-validity checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatureType {
    Humanoid,
    Beast,
    Undead,
    Elemental,
    Mechanical,
    Other,
}

/// Read/write interface to the simulation host.
///
/// Reads are pure functions of current world state. A missing unit reports
/// zero health / no auras, which the engine treats as "target gone" and
/// turns the tick into a no-op.
pub trait HostAdapter {
    // === Time ===

    /// Monotonic millisecond clock shared with the host's world tick.
    fn now_ms(&self) -> u64;

    // === Unit state reads ===

    fn health(&self, unit: UnitId) -> f32;
    fn max_health(&self, unit: UnitId) -> f32;
    fn power(&self, unit: UnitId, kind: PowerKind) -> f32;
    fn max_power(&self, unit: UnitId, kind: PowerKind) -> f32;
    fn has_aura(&self, unit: UnitId, spell: Spell) -> bool;
    /// Remaining duration of an aura in ms; 0 when absent.
    fn aura_remaining_ms(&self, unit: UnitId, spell: Spell) -> u64;
    fn aura_stacks(&self, unit: UnitId, spell: Spell) -> u8;
    fn knows_spell(&self, unit: UnitId, spell: Spell) -> bool;
    fn in_combat(&self, unit: UnitId) -> bool;
    fn creature_type(&self, unit: UnitId) -> CreatureType;

    // === Positioning reads ===

    fn distance(&self, a: UnitId, b: UnitId) -> f32;
    fn is_hostile(&self, a: UnitId, b: UnitId) -> bool;
    fn is_behind(&self, a: UnitId, b: UnitId) -> bool;
    fn in_arc(&self, a: UnitId, b: UnitId, half_angle: f32) -> bool;

    // === Grouping reads ===

    fn selected_target(&self, unit: UnitId) -> Option<UnitId>;
    /// Group members including the unit itself. Must be re-queried every
    /// tick; the engine never caches the roster.
    fn group_members(&self, unit: UnitId) -> Vec<UnitId>;
    /// Living hostile units within `range` of `unit`.
    fn hostiles_within(&self, unit: UnitId, range: f32) -> Vec<UnitId>;

    // === Writes ===

    /// Request a cast. Returns whether the host accepted the request; a
    /// rejection is not retried within the tick.
    fn cast(&mut self, caster: UnitId, target: UnitId, spell: Spell) -> bool;
    /// Mirror an engine-authoritative power value (energy/rage) to the host.
    fn set_power(&mut self, unit: UnitId, kind: PowerKind, value: f32);

    // === Provided helpers ===

    /// Health as a percentage (0.0 to 100.0).
    fn health_pct(&self, unit: UnitId) -> f32 {
        let max = self.max_health(unit);
        if max > 0.0 {
            self.health(unit) / max * 100.0
        } else {
            0.0
        }
    }

    /// A unit with zero health is dead or gone.
    fn is_alive(&self, unit: UnitId) -> bool {
        self.health(unit) > 0.0
    }
}
