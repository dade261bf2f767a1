//! Arena Battle - turn-resolution combat engine for a card-collection game
//!
//! Two rosters of up to five cards fight automatically until one side has no
//! card left alive. The engine applies franchise synergy bonuses, rolls
//! critical hits, dodges and damage variance through a seedable RNG, and
//! keeps a full action log plus a serializable snapshot for the caller.

pub mod core;
pub mod game;
pub mod loader;
pub mod tournament;
pub mod error;

pub use error::{BattleError, Result};
