//! Damage resolution for a single attack
//!
//! `base = max(1, attack - defense / 2)`, a 10% critical hit multiplies by 1.5,
//! a uniform variance in `[0.8, 1.2]` is applied, and the result is rounded and
//! floored at 1. An independent 5% dodge turns the hit into 0 damage.

use crate::game::rng::CombatRng;
use serde::{Deserialize, Serialize};

/// Probability that an attack is a critical hit
pub const CRIT_CHANCE: f64 = 0.10;

/// Damage multiplier of a critical hit
pub const CRIT_MULTIPLIER: f64 = 1.5;

/// Probability that the defender dodges an attack
pub const DODGE_CHANCE: f64 = 0.05;

/// Lower bound of the damage variance multiplier
pub const VARIANCE_MIN: f64 = 0.8;

/// Upper bound of the damage variance multiplier
pub const VARIANCE_MAX: f64 = 1.2;

/// Result of rolling one attack, before the defender's health floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRoll {
    /// 0 when dodged, otherwise at least 1
    pub damage: u32,
    pub is_critical: bool,
    pub is_dodged: bool,
}

/// Damage before any randomness
pub fn base_damage(attack: u32, defense: u32) -> u32 {
    attack.saturating_sub(defense / 2).max(1)
}

/// Roll one attack of `attack` against `defense`
///
/// Crit, variance and dodge are always drawn in that order so the random
/// stream does not depend on earlier outcomes. A dodged hit is reported as
/// non-critical.
pub fn roll_damage<R: CombatRng + ?Sized>(attack: u32, defense: u32, rng: &mut R) -> DamageRoll {
    let is_critical = rng.roll_critical();
    let variance = rng.roll_variance();
    let is_dodged = rng.roll_dodge();

    if is_dodged {
        return DamageRoll {
            damage: 0,
            is_critical: false,
            is_dodged: true,
        };
    }

    let mut damage = base_damage(attack, defense) as f64;
    if is_critical {
        damage *= CRIT_MULTIPLIER;
    }
    damage *= variance;

    DamageRoll {
        damage: (damage.round() as u32).max(1),
        is_critical,
        is_dodged: false,
    }
}
