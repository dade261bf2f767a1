//! Battle snapshots for transmission and stop-and-resume play
//!
//! A snapshot is everything a front-end needs to render the fight and
//! everything the engine needs to continue it: both rosters with current
//! health, the synergy maps, the turn counter, the winner and a bounded tail
//! of the action history. Callers typically store it between turns (keyed by
//! battle id, with a TTL) and rebuild the engine with
//! [`BattleEngine::from_snapshot`](crate::game::BattleEngine::from_snapshot).

use crate::core::{BattleCard, CardId, CardName, CombatantId, Franchise, Rarity, Side};
use crate::game::actions::BattleAction;
use crate::game::engine::{BattleStatus, MAX_ROSTER_SIZE};
use crate::game::synergy::SynergyMap;
use crate::{BattleError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of trailing actions carried by a snapshot
pub const RECENT_ACTIONS_WINDOW: usize = 10;

/// Render-ready state of one card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
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
    pub is_alive: bool,
}

impl From<&BattleCard> for CardView {
    fn from(card: &BattleCard) -> Self {
        CardView {
            id: card.id,
            card_id: card.card_id,
            name: card.name.clone(),
            rarity: card.rarity,
            franchise: card.franchise.clone(),
            attack: card.attack,
            defense: card.defense,
            health: card.health,
            max_health: card.max_health,
            position: card.position,
            is_alive: card.is_alive(),
        }
    }
}

impl CardView {
    pub(crate) fn into_card(self) -> BattleCard {
        BattleCard {
            id: self.id,
            card_id: self.card_id,
            name: self.name,
            rarity: self.rarity,
            franchise: self.franchise,
            attack: self.attack,
            defense: self.defense,
            health: self.health,
            max_health: self.max_health,
            position: self.position,
        }
    }
}

/// Serializable state of a battle at a turn boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub turn: u32,
    pub winner: Option<Side>,
    pub side_a_cards: Vec<CardView>,
    pub side_b_cards: Vec<CardView>,
    pub synergy_a: SynergyMap,
    pub synergy_b: SynergyMap,
    /// Last [`RECENT_ACTIONS_WINDOW`] actions, oldest first
    pub recent_actions: Vec<BattleAction>,
}

impl BattleSnapshot {
    pub(crate) fn capture(
        turn: u32,
        winner: Option<Side>,
        side_a: &[BattleCard],
        side_b: &[BattleCard],
        synergy_a: &SynergyMap,
        synergy_b: &SynergyMap,
        actions: &[BattleAction],
    ) -> Self {
        let tail = actions.len().saturating_sub(RECENT_ACTIONS_WINDOW);
        BattleSnapshot {
            turn,
            winner,
            side_a_cards: side_a.iter().map(CardView::from).collect(),
            side_b_cards: side_b.iter().map(CardView::from).collect(),
            synergy_a: synergy_a.clone(),
            synergy_b: synergy_b.clone(),
            recent_actions: actions[tail..].to_vec(),
        }
    }

    pub fn cards(&self, side: Side) -> &[CardView] {
        match side {
            Side::A => &self.side_a_cards,
            Side::B => &self.side_b_cards,
        }
    }

    pub fn status(&self) -> BattleStatus {
        self.winner
            .map(BattleStatus::won_by)
            .unwrap_or(BattleStatus::InProgress)
    }

    /// Encode as compact JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| BattleError::SerializationError(e.to_string()))
    }

    /// Encode as indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| BattleError::SerializationError(e.to_string()))
    }

    /// Decode from JSON and check structural consistency
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: BattleSnapshot =
            serde_json::from_str(json).map_err(|e| BattleError::SnapshotDecode(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Save this snapshot to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Load a snapshot from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Check that the snapshot describes a state the engine could have produced
    pub fn validate(&self) -> Result<()> {
        for side in [Side::A, Side::B] {
            let cards = self.cards(side);
            if cards.is_empty() || cards.len() > MAX_ROSTER_SIZE {
                return Err(corrupt(format!("side {side} has {} cards", cards.len())));
            }
            for (slot, card) in cards.iter().enumerate() {
                if card.id != CombatantId::new(side, slot as u8) {
                    return Err(corrupt(format!("card in side {side} slot {slot} has id {}", card.id)));
                }
                if card.health > card.max_health {
                    return Err(corrupt(format!(
                        "{} has health {} above max {}",
                        card.id, card.health, card.max_health
                    )));
                }
                if card.is_alive != (card.health > 0) {
                    return Err(corrupt(format!("{} alive flag disagrees with health", card.id)));
                }
            }
        }

        if let Some(winner) = self.winner {
            let a_alive = self.side_a_cards.iter().any(|c| c.is_alive);
            let b_alive = self.side_b_cards.iter().any(|c| c.is_alive);
            if BattleStatus::from_survivors(a_alive, b_alive) != BattleStatus::won_by(winner) {
                return Err(corrupt(format!("winner {winner} contradicts card health")));
            }
        }

        if self.recent_actions.len() > RECENT_ACTIONS_WINDOW {
            return Err(corrupt(format!("{} recent actions", self.recent_actions.len())));
        }
        for action in &self.recent_actions {
            for id in [action.attacker_id, action.defender_id] {
                if id.index() >= self.cards(id.side).len() {
                    return Err(corrupt(format!("action references unknown combatant {id}")));
                }
            }
            if action.turn == 0 || action.turn > self.turn {
                return Err(corrupt(format!("action from turn {} at turn {}", action.turn, self.turn)));
            }
        }

        Ok(())
    }
}

fn corrupt(detail: String) -> BattleError {
    BattleError::SnapshotDecode(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardSnapshot;
    use crate::game::engine::BattleEngine;
    use crate::game::rng::ScriptedRng;

    fn engine() -> BattleEngine<ScriptedRng> {
        let a = vec![
            CardSnapshot::new(CardId::new(1), "Luffy", Rarity::S, "One Piece", 40, 10, 200),
            CardSnapshot::new(CardId::new(2), "Nami", Rarity::C, "One Piece", 15, 5, 90).at_position(1),
        ];
        let b = vec![CardSnapshot::new(CardId::new(3), "Kaido", Rarity::Sss, "One Piece", 20, 30, 600)];
        BattleEngine::new(a, b, ScriptedRng::plain()).unwrap()
    }

    #[test]
    fn test_snapshot_window() {
        let mut engine = engine();
        for _ in 0..6 {
            engine.resolve_next_turn().unwrap();
        }
        // 3 attacks per turn
        assert_eq!(engine.actions().len(), 18);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.recent_actions.len(), RECENT_ACTIONS_WINDOW);
        assert_eq!(snapshot.recent_actions[..], engine.actions()[8..]);
        assert_eq!(snapshot.turn, 6);
        assert_eq!(snapshot.synergy_a.get(&Franchise::new("One Piece")), Some(&5));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut engine = engine();
        engine.resolve_next_turn().unwrap();
        let snapshot = engine.snapshot();

        let json = snapshot.to_json().unwrap();
        assert_eq!(BattleSnapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_malformed_json() {
        let err = BattleSnapshot::from_json("{\"turn\": 3").unwrap_err();
        assert!(matches!(err, BattleError::SnapshotDecode(_)));
    }

    #[test]
    fn test_inconsistent_alive_flag() {
        let mut snapshot = engine().snapshot();
        snapshot.side_a_cards[0].is_alive = false;
        assert!(matches!(snapshot.validate(), Err(BattleError::SnapshotDecode(_))));
    }

    #[test]
    fn test_winner_must_match_health() {
        let mut snapshot = engine().snapshot();
        snapshot.winner = Some(Side::A);
        assert!(matches!(snapshot.validate(), Err(BattleError::SnapshotDecode(_))));
    }

    #[test]
    fn test_out_of_range_slot_rejected() {
        let mut snapshot = engine().snapshot();
        snapshot.side_a_cards[0].id.slot = u8::MAX;
        let json = snapshot.to_json().unwrap();

        match BattleSnapshot::from_json(&json) {
            Err(BattleError::SnapshotDecode(msg)) => assert!(msg.contains("A256"), "{msg}"),
            other => panic!("expected SnapshotDecode, got {other:?}"),
        }
    }

    #[test]
    fn test_action_with_out_of_range_slot_rejected() {
        let mut engine = engine();
        engine.resolve_next_turn().unwrap();
        let mut snapshot = engine.snapshot();
        snapshot.recent_actions[0].defender_id.slot = u8::MAX;

        assert!(matches!(
            BattleSnapshot::from_json(&snapshot.to_json().unwrap()),
            Err(BattleError::SnapshotDecode(_))
        ));
    }

    #[test]
    fn test_swapped_ids_rejected() {
        let mut snapshot = engine().snapshot();
        snapshot.side_a_cards.swap(0, 1);
        assert!(matches!(snapshot.validate(), Err(BattleError::SnapshotDecode(_))));
    }
}
