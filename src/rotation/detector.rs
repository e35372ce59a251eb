//! Specialization Detector
//!
//! Infers a druid's specialization from the spells it knows, with a small
//! nudge from group composition: a group with no tank leans Guardian, a
//! group with no healer leans Restoration. Ties resolve to Balance.

use tracing::info;

use crate::host::{HostAdapter, UnitId};
use crate::spellbook::Spell;

use super::Specialization;

/// Marker spells and their weights per specialization. Capstone spells
/// weigh more than shared kit.
const BALANCE_MARKERS: &[(Spell, u32)] = &[
    (Spell::Starsurge, 3),
    (Spell::MoonkinForm, 2),
    (Spell::Starfire, 1),
    (Spell::ShootingStars, 1),
];

const FERAL_MARKERS: &[(Spell, u32)] = &[
    (Spell::Rip, 3),
    (Spell::Shred, 2),
    (Spell::TigersFury, 2),
    (Spell::Berserk, 1),
];

const GUARDIAN_MARKERS: &[(Spell, u32)] = &[
    (Spell::Lacerate, 3),
    (Spell::MangleBear, 2),
    (Spell::FrenziedRegeneration, 2),
    (Spell::SurvivalInstincts, 1),
];

const RESTORATION_MARKERS: &[(Spell, u32)] = &[
    (Spell::Swiftmend, 3),
    (Spell::WildGrowth, 2),
    (Spell::Lifebloom, 2),
    (Spell::Tranquility, 1),
    (Spell::TreeOfLife, 1),
];

fn score(host: &dyn HostAdapter, me: UnitId, markers: &[(Spell, u32)]) -> u32 {
    markers
        .iter()
        .filter(|(spell, _)| host.knows_spell(me, *spell))
        .map(|&(_, weight)| weight)
        .sum()
}

/// Detect the specialization of `me` from known spells and group needs.
pub fn detect_specialization(host: &dyn HostAdapter, me: UnitId) -> Specialization {
    let others: Vec<UnitId> = host
        .group_members(me)
        .into_iter()
        .filter(|&u| u != me)
        .collect();
    let tank_present = others.iter().any(|&u| host.has_aura(u, Spell::BearForm));
    let healer_present = others.iter().any(|&u| host.knows_spell(u, Spell::Swiftmend));

    let mut guardian = score(host, me, GUARDIAN_MARKERS);
    let mut restoration = score(host, me, RESTORATION_MARKERS);
    if !others.is_empty() {
        if !tank_present {
            guardian += 1;
        }
        if !healer_present {
            restoration += 1;
        }
    }

    // Fixed evaluation order breaks ties toward Balance.
    let scored = [
        (Specialization::Balance, score(host, me, BALANCE_MARKERS)),
        (Specialization::Feral, score(host, me, FERAL_MARKERS)),
        (Specialization::Guardian, guardian),
        (Specialization::Restoration, restoration),
    ];
    let mut best = scored[0];
    for &candidate in &scored[1..] {
        if candidate.1 > best.1 {
            best = candidate;
        }
    }
    info!(
        "Detected {best_spec} for {me} (balance {}, feral {}, guardian {}, restoration {})",
        scored[0].1,
        scored[1].1,
        scored[2].1,
        scored[3].1,
        best_spec = best.0,
    );
    best.0
}
