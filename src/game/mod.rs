//! Battle resolution: engine, combat rolls, synergy, logging and snapshots

pub mod actions;
pub mod combat;
pub mod engine;
pub mod logger;
pub mod rng;
pub mod snapshot;
pub mod synergy;

pub use actions::BattleAction;
pub use combat::{roll_damage, DamageRoll};
pub use engine::{
    BattleEngine, BattleOutcome, BattleStatus, DEFAULT_MAX_TURNS, MAX_ROSTER_SIZE, MUTUAL_WIPE_WINNER,
    TURN_ORDER,
};
pub use logger::{BattleLogger, LogEntry, OutputFormat, OutputMode, VerbosityLevel};
pub use rng::{CombatRng, ScriptedRng, SeededRng, TargetPick};
pub use snapshot::{BattleSnapshot, CardView, RECENT_ACTIONS_WINDOW};
pub use synergy::{compute_synergies, total_bonus, SynergyMap};
