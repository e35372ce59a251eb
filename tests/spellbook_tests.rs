//! Unit tests for spell definitions
//!
//! These tests verify that:
//! - The shipped RON file loads and covers every rotation spell
//! - Timed effects, cooldowns, and costs carry sane values
//! - Power pools match each specialization's kit

use druidsim::host::PowerKind;
use druidsim::spellbook::{Spell, SpellBook};

/// Helper to load the shipped spell definitions
fn load_spellbook() -> SpellBook {
    SpellBook::load_default().expect("shipped spell definitions should load")
}

#[test]
fn test_shipped_definitions_validate() {
    let book = load_spellbook();
    assert!(book.validate().is_ok());
}

#[test]
fn test_all_spells_have_names() {
    let book = load_spellbook();
    for (spell, config) in book.spells() {
        assert!(!config.name.is_empty(), "{:?} should have a name", spell);
    }
}

#[test]
fn test_all_spells_have_non_negative_costs() {
    let book = load_spellbook();
    for (spell, config) in book.spells() {
        assert!(
            config.cost >= 0.0,
            "{:?} should have non-negative cost, got {}",
            spell,
            config.cost
        );
        assert!(
            config.range >= 0.0,
            "{:?} should have non-negative range, got {}",
            spell,
            config.range
        );
    }
}

#[test]
fn test_dots_and_hots_have_durations() {
    let book = load_spellbook();
    for spell in [
        Spell::Moonfire,
        Spell::Rake,
        Spell::Rip,
        Spell::Lacerate,
        Spell::Thrash,
        Spell::Rejuvenation,
        Spell::Lifebloom,
        Spell::Regrowth,
        Spell::SavageRoar,
    ] {
        let config = book.get(spell).expect("definition should exist");
        assert!(
            config.duration_ms > 0,
            "{:?} should have a duration",
            spell
        );
    }
}

#[test]
fn test_stacking_effects_cap_at_three() {
    let book = load_spellbook();
    for spell in [Spell::Lifebloom, Spell::Lacerate] {
        let config = book.get(spell).expect("definition should exist");
        assert_eq!(config.max_stacks, 3, "{:?} should stack to 3", spell);
    }
}

#[test]
fn test_power_pools_match_specialization_kits() {
    let book = load_spellbook();
    for spell in [Spell::Shred, Spell::Rip, Spell::FerociousBite, Spell::Rake] {
        assert_eq!(book.cost(spell).0, PowerKind::Energy, "{:?}", spell);
    }
    for spell in [Spell::Lacerate, Spell::Maul, Spell::Swipe, Spell::MangleBear] {
        assert_eq!(book.cost(spell).0, PowerKind::Rage, "{:?}", spell);
    }
    for spell in [Spell::Wrath, Spell::Rejuvenation, Spell::HealingTouch] {
        assert_eq!(book.cost(spell).0, PowerKind::Mana, "{:?}", spell);
    }
}

#[test]
fn test_off_gcd_utilities_do_not_trigger_gcd() {
    let book = load_spellbook();
    for spell in [
        Spell::TigersFury,
        Spell::Berserk,
        Spell::NaturesSwiftness,
        Spell::Ironbark,
        Spell::Barkskin,
        Spell::FrenziedRegeneration,
        Spell::SurvivalInstincts,
    ] {
        let config = book.get(spell).expect("definition should exist");
        assert!(!config.triggers_gcd, "{:?} should be off the GCD", spell);
    }
}

#[test]
fn test_major_cooldowns_are_long() {
    let book = load_spellbook();
    assert!(book.cooldown_ms(Spell::Berserk) >= 120_000);
    assert!(book.cooldown_ms(Spell::Tranquility) >= 180_000);
    assert!(book.cooldown_ms(Spell::TreeOfLife) >= 120_000);
    assert!(book.cooldown_ms(Spell::SurvivalInstincts) >= 120_000);
}
