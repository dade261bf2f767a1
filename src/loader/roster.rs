//! Turning owned cards into battle rosters
//!
//! Stats grow with level (health and defense 4% per level, attack 7% per
//! level), then the rarity multiplier is applied. Each step truncates.

use crate::core::{CardId, CardSnapshot};
use crate::game::MAX_ROSTER_SIZE;
use crate::loader::card_pool::{CardPool, CatalogCard};
use crate::{BattleError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const HEALTH_GROWTH_PER_LEVEL: f64 = 0.04;
const ATTACK_GROWTH_PER_LEVEL: f64 = 0.07;
const DEFENSE_GROWTH_PER_LEVEL: f64 = 0.04;

/// A card a player owns, at its current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedCard {
    pub card_id: CardId,
    pub level: u32,
}

impl OwnedCard {
    pub fn new(card_id: CardId, level: u32) -> Self {
        OwnedCard { card_id, level }
    }
}

/// Attack, defense and health of a card at a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeveledStats {
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
}

fn grow(base: u32, level: u32, per_level: f64, rarity_multiplier: f64) -> u32 {
    let levels = level.saturating_sub(1) as f64;
    let leveled = (base as f64 * (1.0 + levels * per_level)).trunc();
    (leveled * rarity_multiplier) as u32
}

/// Stats of `card` at `level` (levels below 1 count as 1)
pub fn leveled_stats(card: &CatalogCard, level: u32) -> LeveledStats {
    let mult = card.rarity.stat_multiplier();
    LeveledStats {
        attack: grow(card.base_attack, level, ATTACK_GROWTH_PER_LEVEL, mult),
        defense: grow(card.base_defense, level, DEFENSE_GROWTH_PER_LEVEL, mult),
        health: grow(card.base_health, level, HEALTH_GROWTH_PER_LEVEL, mult),
    }
}

/// Full-health snapshot of `card` at `level`
pub fn snapshot_at_level(card: &CatalogCard, level: u32) -> CardSnapshot {
    let stats = leveled_stats(card, level);
    CardSnapshot::new(
        card.id,
        card.name.clone(),
        card.rarity,
        card.franchise.clone(),
        stats.attack,
        stats.defense,
        stats.health,
    )
}

/// Build a roster from owned cards, in order
///
/// Only the first five entries are used. Unknown card ids fail with
/// `CardNotFound`; an empty list fails with `InvalidRoster`.
pub fn build_roster(pool: &CardPool, owned: &[OwnedCard]) -> Result<Vec<CardSnapshot>> {
    if owned.is_empty() {
        return Err(BattleError::InvalidRoster("no cards in deck".to_string()));
    }

    owned
        .iter()
        .take(MAX_ROSTER_SIZE)
        .enumerate()
        .map(|(position, entry)| {
            let card = pool
                .get(entry.card_id)
                .ok_or(BattleError::CardNotFound(entry.card_id.as_u32()))?;
            Ok(snapshot_at_level(card, entry.level).at_position(position as u8))
        })
        .collect()
}

/// Two prepared rosters stored as JSON, as used by `arena fight --rosters`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPair {
    pub side_a: Vec<CardSnapshot>,
    pub side_b: Vec<CardSnapshot>,
}

impl RosterPair {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BattleError::InvalidRoster(e.to_string()))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::parse(&json).map_err(|e| match e {
            BattleError::InvalidRoster(msg) => BattleError::InvalidRoster(format!("{}: {msg}", path.display())),
            other => other,
        })
    }
}
