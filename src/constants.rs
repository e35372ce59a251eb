//! Combat Constants
//!
//! Centralized location for magic numbers used throughout the decision
//! engine. This makes it easier to tune behaviour and ensures consistency.

// ============================================================================
// Global Cooldown & Timing
// ============================================================================

/// Standard global cooldown duration in milliseconds (WoW-style 1.5s GCD).
pub const GCD_MS: u64 = 1500;

/// Host tick budget. `update_rotation` calls closer together than this are
/// elided as duplicate ticks.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

// ============================================================================
// Combat Ranges
// ============================================================================

/// Melee attack range in units (~5 yards).
pub const MELEE_RANGE: f32 = 5.0;

/// Range at which a stealth approach is worth starting.
pub const STEALTH_APPROACH_RANGE: f32 = 20.0;

/// Healing spell range for group triage scans.
pub const HEALING_RANGE: f32 = 40.0;

/// Radius of the Balance Moonfire spread scan around the caster.
pub const MOONFIRE_SPREAD_RANGE: f32 = 40.0;

/// Range within which enemies count toward the Guardian threat list.
pub const THREAT_RANGE: f32 = 8.0;

/// Fallback spell range when the spell book has no entry.
pub const DEFAULT_SPELL_RANGE: f32 = 30.0;

// ============================================================================
// DoT / HoT
// ============================================================================

/// Remaining-duration fraction at or below which a DoT/HoT refresh extends
/// by the full base duration ("pandemic" refresh window).
pub const PANDEMIC_FRACTION: f32 = 0.30;

/// Fallback base duration when the spell book has no entry.
pub const DEFAULT_DOT_DURATION_MS: u64 = 12_000;

/// Maximum concurrent stacks for the stacking HoT (Lifebloom).
pub const MAX_HOT_STACKS: u8 = 3;

/// Cap on concurrent cheap-HoT (Rejuvenation) applications.
pub const MAX_REJUVENATION_TARGETS: usize = 4;

// ============================================================================
// Resources
// ============================================================================

/// Energy pool cap.
pub const ENERGY_MAX: f32 = 100.0;

/// Baseline energy regeneration per second.
pub const ENERGY_REGEN_PER_SEC: f32 = 10.0;

/// Energy regeneration multiplier while Berserk is active.
pub const BERSERK_ENERGY_MULTIPLIER: f32 = 2.0;

/// Rage pool cap.
pub const RAGE_MAX: f32 = 100.0;

/// Rage lost per second while out of combat.
pub const RAGE_DECAY_PER_SEC: f32 = 2.0;

/// Rage gained per point of damage taken.
pub const RAGE_PER_DAMAGE_TAKEN: f32 = 0.15;

/// Fraction of base mana a shapeshift costs.
pub const SHAPESHIFT_MANA_FRACTION: f32 = 0.05;

// ============================================================================
// Combo Points
// ============================================================================

/// Combo point cap per target.
pub const MAX_COMBO_POINTS: u8 = 5;

// ============================================================================
// Eclipse
// ============================================================================

/// Solar/lunar energy bar cap.
pub const ECLIPSE_BAR_MAX: f32 = 100.0;

/// Duration of an active eclipse in milliseconds.
pub const ECLIPSE_DURATION_MS: u64 = 15_000;

/// Solar energy granted per Wrath cast.
pub const WRATH_SOLAR_GAIN: f32 = 15.0;

/// Lunar energy granted per Starfire cast.
pub const STARFIRE_LUNAR_GAIN: f32 = 20.0;

// ============================================================================
// Health Thresholds (percentages, 0..100)
// ============================================================================

/// Predicted health below this is an EMERGENCY triage bucket.
pub const TRIAGE_EMERGENCY_PCT: f32 = 20.0;

/// Predicted health below this is a CRITICAL triage bucket.
pub const TRIAGE_CRITICAL_PCT: f32 = 40.0;

/// Predicted health below this is a MODERATE triage bucket.
pub const TRIAGE_MODERATE_PCT: f32 = 70.0;

/// Predicted health below this is a MAINTENANCE triage bucket.
pub const TRIAGE_MAINTENANCE_PCT: f32 = 90.0;

/// Allies above this health percent are not triage candidates at all.
pub const TRIAGE_SCAN_PCT: f32 = 95.0;

/// Guardian: health percent below which Frenzied Regeneration fires.
pub const FRENZIED_REGEN_PCT: f32 = 30.0;

/// Guardian: health percent below which Survival Instincts fires.
pub const SURVIVAL_INSTINCTS_PCT: f32 = 40.0;

/// Feral: target health percent enabling the Ferocious Bite execute.
pub const EXECUTE_PCT: f32 = 25.0;

/// Restoration: tank health percent below which the external damage
/// reduction cooldown is applied.
pub const TANK_PROTECT_PCT: f32 = 50.0;

/// Restoration: ally count below half health that justifies Tranquility.
pub const GROUP_EMERGENCY_COUNT: usize = 3;

/// Number of recent damage events averaged into the triage prediction.
pub const DPS_SAMPLE_WINDOW: usize = 5;

// ============================================================================
// Feral tuning
// ============================================================================

/// Energy floor under which Tiger's Fury is worth casting.
pub const TIGERS_FURY_ENERGY_FLOOR: f32 = 40.0;

/// Energy restored by Tiger's Fury.
pub const TIGERS_FURY_ENERGY_GAIN: f32 = 60.0;

/// Combo points at which finishers are considered.
pub const FINISHER_COMBO_POINTS: u8 = 4;

/// Savage Roar is refreshed when it has less than this many ms left.
pub const SAVAGE_ROAR_REFRESH_MS: u64 = 6_000;

/// Combo points at which pooling (rather than building) becomes attractive.
pub const POOLING_COMBO_POINTS: u8 = 3;

/// Energy below which pooling for a finisher is preferred over building.
pub const POOLING_ENERGY_CEILING: f32 = 60.0;

// ============================================================================
// Guardian / Restoration tuning
// ============================================================================

/// Rage level at which Maul is used as a dump.
pub const MAUL_RAGE_FLOOR: f32 = 50.0;

/// Ally health percent below which Wild Growth counts the ally as injured.
pub const WILD_GROWTH_PCT: f32 = 85.0;

/// Injured-ally count that justifies a Wild Growth cast.
pub const WILD_GROWTH_COUNT: usize = 3;
