//! Identity types for cards and combatants

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog identity of a card (the collectible, not its seat in a battle)
///
/// Several combatants may share a `CardId` when a player owns duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(u32);

impl CardId {
    pub fn new(id: u32) -> Self {
        CardId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two sides of a battle
///
/// Side A is the challenger and always strikes first within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The side facing this one
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Address of a combatant inside one battle
///
/// The slot is the card's index in its roster. Together with the side tag this
/// is unique for the whole battle, so action records never need signed or
/// offset ids to tell the two rosters apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId {
    pub side: Side,
    pub slot: u8,
}

impl CombatantId {
    pub fn new(side: Side, slot: u8) -> Self {
        CombatantId { side, slot }
    }

    pub fn index(&self) -> usize {
        self.slot as usize
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side, u16::from(self.slot) + 1)
    }
}
