//! Generated opponents for when no real player is available
//!
//! Picks five distinct pool cards and levels them around a strength derived
//! from the challenger's rating.

use crate::core::CardSnapshot;
use crate::game::MAX_ROSTER_SIZE;
use crate::loader::card_pool::CardPool;
use crate::loader::roster::snapshot_at_level;
use crate::{BattleError, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Rating points per base level of a generated opponent
const RATING_PER_LEVEL: u32 = 150;
const MIN_BASE_LEVEL: u32 = 5;
const MAX_BASE_LEVEL: u32 = 30;
const LEVEL_JITTER: i64 = 3;

/// Lowest rating a generated opponent reports
pub const MIN_OPPONENT_RATING: u32 = 500;
const RATING_JITTER: i64 = 300;

/// Base level of a generated opponent for a challenger rating
pub fn base_level(rating: u32) -> u32 {
    (rating / RATING_PER_LEVEL + 5).clamp(MIN_BASE_LEVEL, MAX_BASE_LEVEL)
}

/// Roster of up to five distinct random pool cards near the rating's level
///
/// Each card's level is the base level plus a jitter of at most 3, never
/// below 1.
pub fn generate_test_roster<R: Rng + ?Sized>(
    pool: &CardPool,
    rating: u32,
    rng: &mut R,
) -> Result<Vec<CardSnapshot>> {
    if pool.is_empty() {
        return Err(BattleError::InvalidPool("cannot generate a roster from an empty pool".to_string()));
    }

    let base = base_level(rating) as i64;
    let roster = pool
        .cards()
        .choose_multiple(rng, MAX_ROSTER_SIZE)
        .collect::<Vec<_>>()
        .into_iter()
        .enumerate()
        .map(|(position, card)| {
            let level = (base + rng.gen_range(-LEVEL_JITTER..=LEVEL_JITTER)).max(1) as u32;
            snapshot_at_level(card, level).at_position(position as u8)
        })
        .collect();
    Ok(roster)
}

/// Rating reported for a generated opponent: the challenger's rating within
/// 300 points, at least 500
pub fn test_opponent_rating<R: Rng + ?Sized>(rating: u32, rng: &mut R) -> u32 {
    let jittered = rating as i64 + rng.gen_range(-RATING_JITTER..=RATING_JITTER);
    jittered.max(MIN_OPPONENT_RATING as i64) as u32
}
