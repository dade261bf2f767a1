//! Battle action records
//!
//! One `BattleAction` is appended for every attack, in resolution order.

use crate::core::{CardName, CombatantId, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One attack and its result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleAction {
    /// Turn this attack happened in (1-based)
    pub turn: u32,
    pub attacker_id: CombatantId,
    pub attacker_name: CardName,
    pub defender_id: CombatantId,
    pub defender_name: CardName,
    /// Health actually removed from the defender
    pub damage: u32,
    pub is_critical: bool,
    pub is_dodged: bool,
    /// The defender reached 0 health from this hit
    pub defender_died: bool,
}

impl BattleAction {
    /// Side that performed the attack
    pub fn attacking_side(&self) -> Side {
        self.attacker_id.side
    }
}

impl fmt::Display for BattleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) -> {} ({}): ",
            self.attacker_name, self.attacker_id, self.defender_name, self.defender_id
        )?;
        if self.is_dodged {
            return write!(f, "dodged");
        }
        write!(f, "{} damage", self.damage)?;
        if self.is_critical {
            write!(f, " (critical)")?;
        }
        if self.defender_died {
            write!(f, ", {} falls", self.defender_name)?;
        }
        Ok(())
    }
}
