//! Battle engine: the turn-resolution state machine
//!
//! The engine owns both rosters for the duration of one battle. Synergy
//! bonuses are baked into attack/defense at construction; after that each
//! call to [`BattleEngine::resolve_next_turn`] resolves exactly one turn:
//! every alive card of side A strikes a random alive card of side B, then side
//! B answers with whoever survived. Fainted cards stay in their roster with 0
//! health so snapshots can still render them.

use crate::core::{BattleCard, CardSnapshot, CombatantId, Side};
use crate::game::actions::BattleAction;
use crate::game::combat::roll_damage;
use crate::game::logger::{BattleLogger, VerbosityLevel};
use crate::game::rng::{CombatRng, SeededRng};
use crate::game::snapshot::{BattleSnapshot, CardView};
use crate::game::synergy::{apply_bonus, compute_synergies, total_bonus, SynergyMap};
use crate::{BattleError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of cards in one roster
pub const MAX_ROSTER_SIZE: usize = 5;

/// Turn cap for [`BattleEngine::resolve_to_completion`]
pub const DEFAULT_MAX_TURNS: u32 = 1000;

/// Order in which the sides strike within a turn
pub const TURN_ORDER: [Side; 2] = [Side::A, Side::B];

/// Winner when both rosters are wiped out at once: the side that strikes last
pub const MUTUAL_WIPE_WINNER: Side = TURN_ORDER[1];

/// State of a battle
///
/// Both won states are terminal: no further turns can be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BattleStatus {
    #[default]
    InProgress,
    SideAWon,
    SideBWon,
}

impl BattleStatus {
    pub fn won_by(side: Side) -> Self {
        match side {
            Side::A => BattleStatus::SideAWon,
            Side::B => BattleStatus::SideBWon,
        }
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            BattleStatus::InProgress => None,
            BattleStatus::SideAWon => Some(Side::A),
            BattleStatus::SideBWon => Some(Side::B),
        }
    }

    pub fn is_terminal(self) -> bool {
        self != BattleStatus::InProgress
    }

    /// Status implied by which sides still have a card standing
    ///
    /// A mutual wipe goes to [`MUTUAL_WIPE_WINNER`].
    pub fn from_survivors(a_alive: bool, b_alive: bool) -> Self {
        match (a_alive, b_alive) {
            (true, true) => BattleStatus::InProgress,
            (true, false) => BattleStatus::SideAWon,
            (false, true) => BattleStatus::SideBWon,
            (false, false) => BattleStatus::won_by(MUTUAL_WIPE_WINNER),
        }
    }
}

impl fmt::Display for BattleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleStatus::InProgress => write!(f, "in progress"),
            BattleStatus::SideAWon => write!(f, "side A won"),
            BattleStatus::SideBWon => write!(f, "side B won"),
        }
    }
}

/// Final result of a battle, handed to reward and persistence collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub winner: Side,
    /// Number of turns resolved
    pub turns: u32,
    /// Full action history
    pub actions: Vec<BattleAction>,
    pub side_a: Vec<CardView>,
    pub side_b: Vec<CardView>,
    /// Total health removed by side A's attacks
    pub damage_by_a: u64,
    /// Total health removed by side B's attacks
    pub damage_by_b: u64,
}

/// One battle between two rosters
#[derive(Debug, Clone)]
pub struct BattleEngine<R: CombatRng = SeededRng> {
    side_a: Vec<BattleCard>,
    side_b: Vec<BattleCard>,
    synergy_a: SynergyMap,
    synergy_b: SynergyMap,
    turn: u32,
    actions: Vec<BattleAction>,
    status: BattleStatus,
    max_turns: u32,
    rng: R,
    logger: BattleLogger,
}

fn validate_roster(side: Side, roster: &[CardSnapshot]) -> Result<()> {
    if roster.is_empty() {
        return Err(BattleError::InvalidRoster(format!("side {side} roster is empty")));
    }
    if roster.len() > MAX_ROSTER_SIZE {
        return Err(BattleError::InvalidRoster(format!(
            "side {side} has {} cards (max {MAX_ROSTER_SIZE})",
            roster.len()
        )));
    }
    if let Some(card) = roster.iter().find(|c| c.health > c.max_health) {
        return Err(BattleError::InvalidRoster(format!(
            "side {side} card '{}' has health {} above max {}",
            card.name, card.health, card.max_health
        )));
    }
    Ok(())
}

fn seat_roster(side: Side, roster: Vec<CardSnapshot>, bonus: u32) -> Vec<BattleCard> {
    roster
        .into_iter()
        .enumerate()
        .map(|(slot, snapshot)| {
            let attack = apply_bonus(snapshot.attack, bonus);
            let defense = apply_bonus(snapshot.defense, bonus);
            BattleCard::from_snapshot(CombatantId::new(side, slot as u8), snapshot, attack, defense)
        })
        .collect()
}

impl<R: CombatRng> BattleEngine<R> {
    /// Start a battle between two rosters of 1 to 5 cards
    ///
    /// Synergy bonuses are computed here and applied to every card's attack
    /// and defense. The battle starts `InProgress` even when a roster is
    /// already fully defeated; the first turn settles that.
    pub fn new(side_a: Vec<CardSnapshot>, side_b: Vec<CardSnapshot>, rng: R) -> Result<Self> {
        validate_roster(Side::A, &side_a)?;
        validate_roster(Side::B, &side_b)?;

        let synergy_a = compute_synergies(&side_a);
        let synergy_b = compute_synergies(&side_b);
        let side_a = seat_roster(Side::A, side_a, total_bonus(&synergy_a));
        let side_b = seat_roster(Side::B, side_b, total_bonus(&synergy_b));

        Ok(BattleEngine {
            side_a,
            side_b,
            synergy_a,
            synergy_b,
            turn: 0,
            actions: Vec::new(),
            status: BattleStatus::InProgress,
            max_turns: DEFAULT_MAX_TURNS,
            rng,
            logger: BattleLogger::silent(),
        })
    }

    /// Rebuild an engine from a stored snapshot
    ///
    /// Card stats are taken as stored (synergy already included). Only the
    /// snapshot's recent actions survive as history.
    pub fn from_snapshot(snapshot: BattleSnapshot, rng: R) -> Result<Self> {
        snapshot.validate()?;

        let status = snapshot
            .winner
            .map(BattleStatus::won_by)
            .unwrap_or(BattleStatus::InProgress);

        Ok(BattleEngine {
            side_a: snapshot.side_a_cards.into_iter().map(CardView::into_card).collect(),
            side_b: snapshot.side_b_cards.into_iter().map(CardView::into_card).collect(),
            synergy_a: snapshot.synergy_a,
            synergy_b: snapshot.synergy_b,
            turn: snapshot.turn,
            actions: snapshot.recent_actions,
            status,
            max_turns: DEFAULT_MAX_TURNS,
            rng,
            logger: BattleLogger::silent(),
        })
    }

    pub fn with_logger(mut self, logger: BattleLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Set the turn cap used by `resolve_to_completion`
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn status(&self) -> BattleStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Side> {
        self.status.winner()
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Full action history, oldest first
    pub fn actions(&self) -> &[BattleAction] {
        &self.actions
    }

    pub fn roster(&self, side: Side) -> &[BattleCard] {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    pub fn synergy(&self, side: Side) -> &SynergyMap {
        match side {
            Side::A => &self.synergy_a,
            Side::B => &self.synergy_b,
        }
    }

    /// Total synergy percent applied to a side
    pub fn synergy_bonus(&self, side: Side) -> u32 {
        total_bonus(self.synergy(side))
    }

    pub fn card(&self, id: CombatantId) -> Option<&BattleCard> {
        self.roster(id.side).get(id.index())
    }

    pub fn alive_count(&self, side: Side) -> usize {
        self.roster(side).iter().filter(|c| c.is_alive()).count()
    }

    fn has_alive(&self, side: Side) -> bool {
        self.roster(side).iter().any(BattleCard::is_alive)
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn logger(&self) -> &BattleLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut BattleLogger {
        &mut self.logger
    }

    /// Health removed from the opponent by one side's attacks so far
    pub fn damage_dealt_by(&self, side: Side) -> u64 {
        self.actions
            .iter()
            .filter(|a| a.attacking_side() == side)
            .map(|a| a.damage as u64)
            .sum()
    }

    /// Resolve one turn and return its actions
    ///
    /// Fails with `InvalidTurnRequest` once the battle is over, leaving the
    /// engine untouched. If a side has no card alive when the turn starts,
    /// the battle ends with no actions. A counter that cannot advance fails
    /// with `TurnLimitExceeded`, also without touching the engine.
    pub fn resolve_next_turn(&mut self) -> Result<Vec<BattleAction>> {
        if self.status.is_terminal() {
            return Err(BattleError::InvalidTurnRequest(self.status));
        }

        self.turn = self
            .turn
            .checked_add(1)
            .ok_or(BattleError::TurnLimitExceeded(self.turn))?;

        let a_alive = self.has_alive(Side::A);
        let b_alive = self.has_alive(Side::B);
        if !a_alive || !b_alive {
            self.finish(BattleStatus::from_survivors(a_alive, b_alive));
            return Ok(Vec::new());
        }

        self.logger.log(
            VerbosityLevel::Normal,
            Some("turn"),
            &format!(
                "Turn {}: {} vs {} cards standing",
                self.turn,
                self.alive_count(Side::A),
                self.alive_count(Side::B)
            ),
        );

        let mut turn_actions = Vec::new();
        for side in TURN_ORDER {
            self.strike(side, &mut turn_actions);
        }
        self.actions.extend_from_slice(&turn_actions);

        let status = BattleStatus::from_survivors(self.has_alive(Side::A), self.has_alive(Side::B));
        if status.is_terminal() {
            self.finish(status);
        }

        Ok(turn_actions)
    }

    /// Resolve turns until the battle ends and return the full history
    ///
    /// Stops with `TurnLimitExceeded` when the turn counter reaches the cap
    /// first; the engine is left in progress and may be resumed.
    pub fn resolve_to_completion(&mut self) -> Result<&[BattleAction]> {
        while !self.status.is_terminal() {
            if self.turn >= self.max_turns {
                return Err(BattleError::TurnLimitExceeded(self.turn));
            }
            self.resolve_next_turn()?;
        }
        Ok(&self.actions)
    }

    /// Every alive card of `side` attacks once, in roster order
    fn strike(&mut self, side: Side, turn_actions: &mut Vec<BattleAction>) {
        let turn = self.turn;
        let (attackers, defenders) = match side {
            Side::A => (&self.side_a, &mut self.side_b),
            Side::B => (&self.side_b, &mut self.side_a),
        };

        for attacker in attackers.iter().filter(|c| c.is_alive()) {
            let targets: SmallVec<[usize; MAX_ROSTER_SIZE]> = defenders
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_alive())
                .map(|(i, _)| i)
                .collect();
            if targets.is_empty() {
                break;
            }

            let pick = self.rng.choose_target(targets.len()).min(targets.len() - 1);
            let defender = &mut defenders[targets[pick]];

            let roll = roll_damage(attacker.attack, defender.defense, &mut self.rng);
            let damage = defender.take_damage(roll.damage);

            let action = BattleAction {
                turn,
                attacker_id: attacker.id,
                attacker_name: attacker.name.clone(),
                defender_id: defender.id,
                defender_name: defender.name.clone(),
                damage,
                is_critical: roll.is_critical,
                is_dodged: roll.is_dodged,
                defender_died: !defender.is_alive(),
            };

            if cfg!(feature = "verbose-logging") && self.logger.enabled(VerbosityLevel::Verbose) {
                self.logger
                    .log(VerbosityLevel::Verbose, Some("attack"), &action.to_string());
            }

            turn_actions.push(action);
        }
    }

    fn finish(&mut self, status: BattleStatus) {
        self.status = status;
        if let Some(side) = status.winner() {
            self.logger.log(
                VerbosityLevel::Minimal,
                Some("result"),
                &format!("Side {side} wins after {} turns", self.turn),
            );
        }
    }

    /// Transmission-safe view of the current state
    ///
    /// Carries only the last [`RECENT_ACTIONS_WINDOW`](crate::game::snapshot::RECENT_ACTIONS_WINDOW)
    /// actions; the engine itself keeps the full history.
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::capture(
            self.turn,
            self.winner(),
            &self.side_a,
            &self.side_b,
            &self.synergy_a,
            &self.synergy_b,
            &self.actions,
        )
    }

    /// Final result, once the battle is over
    pub fn outcome(&self) -> Option<BattleOutcome> {
        let winner = self.winner()?;
        Some(BattleOutcome {
            winner,
            turns: self.turn,
            actions: self.actions.clone(),
            side_a: self.side_a.iter().map(CardView::from).collect(),
            side_b: self.side_b.iter().map(CardView::from).collect(),
            damage_by_a: self.damage_dealt_by(Side::A),
            damage_by_b: self.damage_dealt_by(Side::B),
        })
    }
}
