//! Battle card types
//!
//! A `CardSnapshot` is what the caller hands in: one card's stats frozen at
//! battle start. A `BattleCard` is the live combatant the engine mutates.

use crate::core::{CardId, CardName, CombatantId, Franchise, Rarity};
use serde::{Deserialize, Serialize};

/// Caller-supplied card stats for one roster slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    /// Catalog identity of the card
    pub card_id: CardId,

    pub name: CardName,

    pub rarity: Rarity,

    /// Franchise tag used for synergy grouping
    pub franchise: Franchise,

    pub attack: u32,

    pub defense: u32,

    /// Health at battle start (may be below max for pre-damaged cards)
    pub health: u32,

    pub max_health: u32,

    /// Display position within the roster (0-based)
    #[serde(default)]
    pub position: u8,
}

impl CardSnapshot {
    /// Snapshot of an undamaged card
    pub fn new(
        card_id: CardId,
        name: impl Into<CardName>,
        rarity: Rarity,
        franchise: impl Into<Franchise>,
        attack: u32,
        defense: u32,
        max_health: u32,
    ) -> Self {
        CardSnapshot {
            card_id,
            name: name.into(),
            rarity,
            franchise: franchise.into(),
            attack,
            defense,
            health: max_health,
            max_health,
            position: 0,
        }
    }

    pub fn at_position(mut self, position: u8) -> Self {
        self.position = position;
        self
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health;
        self
    }
}

/// A combatant during one battle
///
/// Attack and defense already include the roster's synergy bonus. Health only
/// ever goes down, and never below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleCard {
    pub id: CombatantId,
    pub card_id: CardId,
    pub name: CardName,
    pub rarity: Rarity,
    pub franchise: Franchise,
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
    pub max_health: u32,
    pub position: u8,
}

impl BattleCard {
    /// Seat a snapshot at `id` with the given (already bonused) attack and defense
    pub fn from_snapshot(id: CombatantId, snapshot: CardSnapshot, attack: u32, defense: u32) -> Self {
        BattleCard {
            id,
            card_id: snapshot.card_id,
            name: snapshot.name,
            rarity: snapshot.rarity,
            franchise: snapshot.franchise,
            attack,
            defense,
            health: snapshot.health,
            max_health: snapshot.max_health,
            position: snapshot.position,
        }
    }

    /// Apply damage, returning how much was actually absorbed
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        let actual = damage.min(self.health);
        self.health -= actual;
        actual
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Side;

    fn sample() -> BattleCard {
        let snap = CardSnapshot::new(CardId::new(7), "Mikasa", Rarity::A, "Attack on Titan", 40, 20, 120);
        BattleCard::from_snapshot(CombatantId::new(Side::A, 0), snap, 40, 20)
    }

    #[test]
    fn test_card_creation() {
        let card = sample();
        assert_eq!(card.card_id, CardId::new(7));
        assert_eq!(card.health, 120);
        assert_eq!(card.max_health, 120);
        assert!(card.is_alive());
    }

    #[test]
    fn test_take_damage_floors_at_zero() {
        let mut card = sample();
        assert_eq!(card.take_damage(50), 50);
        assert_eq!(card.health, 70);

        assert_eq!(card.take_damage(500), 70);
        assert_eq!(card.health, 0);
        assert!(!card.is_alive());

        assert_eq!(card.take_damage(10), 0);
        assert_eq!(card.health, 0);
    }

    #[test]
    fn test_snapshot_builders() {
        let snap = CardSnapshot::new(CardId::new(1), "Goku", Rarity::Sss, "Dragon Ball", 90, 30, 300)
            .at_position(3)
            .with_health(120);
        assert_eq!(snap.position, 3);
        assert_eq!(snap.health, 120);
        assert_eq!(snap.max_health, 300);
    }
}
