//! Tournament mode for running many battles in parallel and collecting statistics
//!
//! Every battle pits two generated rosters against each other. Battles run
//! concurrently on rayon's pool; each one derives its roster and combat seeds
//! from the tournament seed and its index, so a tournament is reproducible
//! regardless of scheduling.

use crate::core::Side;
use crate::game::{BattleEngine, SeededRng, DEFAULT_MAX_TURNS};
use crate::loader::{generate_test_roster, CardPool};
use crate::{BattleError, Result};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;
const COMBAT_SEED_SALT: u64 = 0x1234_5678_9ABC_DEF0;

/// Tournament parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourneyConfig {
    pub battles: usize,
    pub seed: u64,
    /// Rating used to level side A's generated roster
    pub rating_a: u32,
    /// Rating used to level side B's generated roster
    pub rating_b: u32,
    pub max_turns: u32,
}

impl Default for TourneyConfig {
    fn default() -> Self {
        TourneyConfig {
            battles: 1000,
            seed: 42,
            rating_a: 1000,
            rating_b: 1000,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

/// Statistics collected during a tournament
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourneyStats {
    pub side_a_wins: usize,
    pub side_b_wins: usize,
    /// Battles stopped by the turn cap
    pub turn_limit_hits: usize,
    /// Battles that failed for any other reason
    pub errors: usize,
    pub total_turns: u64,
    pub longest_battle: u32,
    /// Finished battles where exactly one side had a synergy bonus
    pub synergy_battles: usize,
    /// ...and that side won
    pub synergy_holder_wins: usize,
}

impl TourneyStats {
    pub fn finished(&self) -> usize {
        self.side_a_wins + self.side_b_wins
    }

    pub fn average_turns(&self) -> f64 {
        match self.finished() {
            0 => 0.0,
            n => self.total_turns as f64 / n as f64,
        }
    }
}

/// Tournament result
#[derive(Debug, Clone)]
pub struct TourneyReport {
    pub config: TourneyConfig,
    pub stats: TourneyStats,
    pub elapsed: Duration,
}

impl TourneyReport {
    pub fn battles_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.config.battles as f64 / secs
        } else {
            0.0
        }
    }

    /// Human-readable summary
    pub fn print(&self) {
        let stats = &self.stats;
        let pct = |n: usize, total: usize| {
            if total == 0 {
                0.0
            } else {
                100.0 * n as f64 / total as f64
            }
        };

        println!("=== Tournament Complete ===");
        println!("Total battles: {}", self.config.battles);
        println!("Elapsed time: {:.2}s", self.elapsed.as_secs_f64());
        println!("Battles per second: {:.2}\n", self.battles_per_second());

        println!("=== Side Statistics ===");
        let finished = stats.finished();
        println!("Side A wins: {} ({:.1}%)", stats.side_a_wins, pct(stats.side_a_wins, finished));
        println!("Side B wins: {} ({:.1}%)", stats.side_b_wins, pct(stats.side_b_wins, finished));
        if stats.turn_limit_hits > 0 {
            println!("Turn limit reached: {}", stats.turn_limit_hits);
        }
        if stats.errors > 0 {
            println!("Failed battles: {}", stats.errors);
        }
        println!("Average turns: {:.2} (longest {})", stats.average_turns(), stats.longest_battle);

        println!("\n=== Synergy ===");
        println!(
            "Synergy holder won {}/{} one-sided battles ({:.1}%)",
            stats.synergy_holder_wins,
            stats.synergy_battles,
            pct(stats.synergy_holder_wins, stats.synergy_battles)
        );
    }
}

/// Seeds for battle `index`: (roster seed, combat seed)
fn battle_seeds(seed: u64, index: usize) -> (u64, u64) {
    let roster_seed = seed.wrapping_add((index as u64).wrapping_mul(SEED_STRIDE));
    (roster_seed, roster_seed.wrapping_add(COMBAT_SEED_SALT))
}

/// Run `config.battles` battles between generated rosters
pub fn run_tourney(pool: &CardPool, config: TourneyConfig) -> Result<TourneyReport> {
    if pool.is_empty() {
        return Err(BattleError::InvalidPool("tournament needs a non-empty card pool".to_string()));
    }

    let stats = Arc::new(Mutex::new(TourneyStats::default()));
    let start_time = Instant::now();

    (0..config.battles).into_par_iter().for_each(|index| {
        let (roster_seed, combat_seed) = battle_seeds(config.seed, index);
        let mut roster_rng = Xoshiro256PlusPlus::seed_from_u64(roster_seed);

        let result = (|| {
            let side_a = generate_test_roster(pool, config.rating_a, &mut roster_rng)?;
            let side_b = generate_test_roster(pool, config.rating_b, &mut roster_rng)?;
            let mut engine =
                BattleEngine::new(side_a, side_b, SeededRng::new(combat_seed))?.with_max_turns(config.max_turns);
            engine.resolve_to_completion()?;
            Ok::<_, BattleError>(engine)
        })();

        let mut stats = stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match result {
            Ok(engine) => {
                let Some(winner) = engine.winner() else {
                    return;
                };
                match winner {
                    Side::A => stats.side_a_wins += 1,
                    Side::B => stats.side_b_wins += 1,
                }
                stats.total_turns += engine.turn() as u64;
                stats.longest_battle = stats.longest_battle.max(engine.turn());

                let holder = match (engine.synergy_bonus(Side::A) > 0, engine.synergy_bonus(Side::B) > 0) {
                    (true, false) => Some(Side::A),
                    (false, true) => Some(Side::B),
                    _ => None,
                };
                if let Some(holder) = holder {
                    stats.synergy_battles += 1;
                    if holder == winner {
                        stats.synergy_holder_wins += 1;
                    }
                }
            }
            Err(BattleError::TurnLimitExceeded(_)) => stats.turn_limit_hits += 1,
            Err(e) => {
                eprintln!("Warning: battle {index} failed: {e}");
                stats.errors += 1;
            }
        }
    });

    let elapsed = start_time.elapsed();
    let stats = stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone();

    Ok(TourneyReport { config, stats, elapsed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardId, CardName, Franchise, Rarity};
    use crate::loader::CatalogCard;

    fn pool() -> CardPool {
        let franchises = ["Naruto", "Bleach", "One Piece"];
        CardPool::from_cards((1..=12).map(|i| CatalogCard {
            id: CardId::new(i),
            name: CardName::new(format!("card {i}")),
            rarity: Rarity::ALL[i as usize % Rarity::ALL.len()],
            franchise: Franchise::new(franchises[i as usize % franchises.len()]),
            base_attack: 10 + i,
            base_defense: 8,
            base_health: 100,
        }))
        .unwrap()
    }

    #[test]
    fn test_every_battle_counted() {
        let config = TourneyConfig {
            battles: 64,
            ..TourneyConfig::default()
        };
        let report = run_tourney(&pool(), config).unwrap();
        let stats = &report.stats;

        assert_eq!(stats.finished() + stats.turn_limit_hits + stats.errors, 64);
        assert_eq!(stats.errors, 0);
        assert!(stats.total_turns >= stats.finished() as u64);
        assert!(stats.synergy_holder_wins <= stats.synergy_battles);
    }

    #[test]
    fn test_reproducible() {
        let config = TourneyConfig {
            battles: 32,
            seed: 7,
            ..TourneyConfig::default()
        };
        let first = run_tourney(&pool(), config).unwrap();
        let second = run_tourney(&pool(), config).unwrap();
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn test_empty_pool() {
        assert!(run_tourney(&CardPool::new(), TourneyConfig::default()).is_err());
    }
}
