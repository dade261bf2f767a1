//! Core card types and identities

pub mod entity;
pub mod card;
pub mod types;

pub use entity::{CardId, CombatantId, Side};
pub use card::{BattleCard, CardSnapshot};
pub use types::{CardName, Franchise, Rarity};
