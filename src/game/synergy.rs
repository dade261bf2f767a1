//! Franchise synergy bonuses
//!
//! Cards sharing a franchise strengthen the whole roster. Each franchise group
//! of `n >= 2` cards contributes `(n - 1) * 5` percent; the roster's total is
//! capped at 25 percent and added to every card's attack and defense once,
//! before the first turn. It is never recomputed when cards die.

use crate::core::{CardSnapshot, Franchise};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Bonus percent granted per card beyond the first in a franchise group
pub const SYNERGY_PERCENT_PER_CARD: u32 = 5;

/// Maximum total roster bonus, in percent
pub const SYNERGY_CAP_PERCENT: u32 = 25;

/// Franchise -> bonus percent contributed by that franchise's group
///
/// BTreeMap keeps serialization order stable.
pub type SynergyMap = BTreeMap<Franchise, u32>;

/// Compute the synergy groups of a roster
///
/// Grouping uses [`Franchise::key`], so spelling variants of one franchise
/// count together; the map reports the first spelling seen. Franchises with
/// a single card and empty tags are absent.
pub fn compute_synergies(roster: &[CardSnapshot]) -> SynergyMap {
    let mut groups: FxHashMap<String, (Franchise, u32)> = FxHashMap::default();
    for card in roster {
        if let Some(key) = card.franchise.key() {
            groups
                .entry(key)
                .or_insert_with(|| (card.franchise.clone(), 0))
                .1 += 1;
        }
    }

    groups
        .into_values()
        .filter(|(_, count)| *count >= 2)
        .map(|(franchise, count)| (franchise, (count - 1) * SYNERGY_PERCENT_PER_CARD))
        .collect()
}

/// Total roster bonus in percent, capped
pub fn total_bonus(synergies: &SynergyMap) -> u32 {
    synergies
        .values()
        .fold(0u32, |acc, pct| acc.saturating_add(*pct))
        .min(SYNERGY_CAP_PERCENT)
}

/// Apply a percent bonus to a stat, rounding up
///
/// Any positive stat with a positive bonus strictly increases.
pub fn apply_bonus(stat: u32, percent: u32) -> u32 {
    let scaled = stat as u64 * (100 + percent as u64);
    let bonused = scaled.div_ceil(100);
    u32::try_from(bonused).unwrap_or(u32::MAX)
}
