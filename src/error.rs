//! Error types for the arena battle engine

use crate::game::BattleStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Cannot resolve turn: battle already finished ({0})")]
    InvalidTurnRequest(BattleStatus),

    #[error("Snapshot decode error: {0}")]
    SnapshotDecode(String),

    #[error("No winner after {0} turns")]
    TurnLimitExceeded(u32),

    #[error("Card not found: {0}")]
    CardNotFound(u32),

    #[error("Invalid card pool: {0}")]
    InvalidPool(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, BattleError>;
