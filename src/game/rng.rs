//! Randomness source for battle resolution
//!
//! Every random decision in a battle (target choice, critical hit, damage
//! variance, dodge) goes through [`CombatRng`]. Real battles use
//! [`SeededRng`], whose state serializes so a stored battle resumes on the
//! same random stream. Tests and replays use [`ScriptedRng`] to force outcomes.

use crate::game::combat::{CRIT_CHANCE, DODGE_CHANCE, VARIANCE_MAX, VARIANCE_MIN};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

/// Trait for the random rolls of one battle
pub trait CombatRng {
    /// Whether the next attack is a critical hit
    fn roll_critical(&mut self) -> bool;

    /// Damage variance multiplier in `[VARIANCE_MIN, VARIANCE_MAX]`
    fn roll_variance(&mut self) -> f64;

    /// Whether the defender dodges the next attack
    fn roll_dodge(&mut self) -> bool;

    /// Pick a target index in `[0, candidates)`; `candidates` is never 0
    fn choose_target(&mut self, candidates: usize) -> usize;
}

impl<R: CombatRng + ?Sized> CombatRng for &mut R {
    fn roll_critical(&mut self) -> bool {
        (**self).roll_critical()
    }

    fn roll_variance(&mut self) -> f64 {
        (**self).roll_variance()
    }

    fn roll_dodge(&mut self) -> bool {
        (**self).roll_dodge()
    }

    fn choose_target(&mut self, candidates: usize) -> usize {
        (**self).choose_target(candidates)
    }
}

/// Seeded Xoshiro256++ rolls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeededRng {
    rng: Xoshiro256PlusPlus,
}

impl SeededRng {
    /// Create a deterministic RNG from a seed
    pub fn new(seed: u64) -> Self {
        SeededRng {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Create an RNG seeded from OS entropy
    pub fn from_entropy() -> Self {
        SeededRng {
            rng: Xoshiro256PlusPlus::from_entropy(),
        }
    }
}

impl CombatRng for SeededRng {
    fn roll_critical(&mut self) -> bool {
        self.rng.gen_bool(CRIT_CHANCE)
    }

    fn roll_variance(&mut self) -> f64 {
        self.rng.gen_range(VARIANCE_MIN..=VARIANCE_MAX)
    }

    fn roll_dodge(&mut self) -> bool {
        self.rng.gen_bool(DODGE_CHANCE)
    }

    fn choose_target(&mut self, candidates: usize) -> usize {
        self.rng.gen_range(0..candidates)
    }
}

/// How a [`ScriptedRng`] picks targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPick {
    /// Always the first alive candidate
    #[default]
    First,
    /// Always the last alive candidate
    Last,
    /// A fixed candidate index, clamped to the last candidate
    Index(usize),
}

/// Fixed rolls for deterministic scenarios
///
/// Every attack gets the same critical/dodge flags and variance; targets
/// follow [`TargetPick`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedRng {
    pub critical: bool,
    pub dodge: bool,
    pub variance: f64,
    pub target: TargetPick,
}

impl ScriptedRng {
    /// No crits, no dodges, variance 1.0, first target
    pub fn plain() -> Self {
        ScriptedRng {
            critical: false,
            dodge: false,
            variance: 1.0,
            target: TargetPick::First,
        }
    }

    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    pub fn with_dodge(mut self, dodge: bool) -> Self {
        self.dodge = dodge;
        self
    }

    pub fn with_variance(mut self, variance: f64) -> Self {
        self.variance = variance;
        self
    }

    pub fn with_target(mut self, target: TargetPick) -> Self {
        self.target = target;
        self
    }
}

impl Default for ScriptedRng {
    fn default() -> Self {
        Self::plain()
    }
}

impl CombatRng for ScriptedRng {
    fn roll_critical(&mut self) -> bool {
        self.critical
    }

    fn roll_variance(&mut self) -> f64 {
        self.variance
    }

    fn roll_dodge(&mut self) -> bool {
        self.dodge
    }

    fn choose_target(&mut self, candidates: usize) -> usize {
        match self.target {
            TargetPick::First => 0,
            TargetPick::Last => candidates - 1,
            TargetPick::Index(i) => i.min(candidates - 1),
        }
    }
}
