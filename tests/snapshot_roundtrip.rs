//! Snapshot persistence: the request-per-turn flow

use arena_battle::core::{CardId, CardSnapshot, Rarity, Side};
use arena_battle::game::{BattleEngine, BattleSnapshot, ScriptedRng, SeededRng, RECENT_ACTIONS_WINDOW};
use arena_battle::BattleError;
use std::path::PathBuf;

fn rosters() -> (Vec<CardSnapshot>, Vec<CardSnapshot>) {
    let a = vec![
        CardSnapshot::new(CardId::new(1), "Gon Freecss", Rarity::A, "Hunter x Hunter", 30, 12, 300),
        CardSnapshot::new(CardId::new(2), "Killua Zoldyck", Rarity::A, "Hunter x Hunter", 32, 10, 280).at_position(1),
    ];
    let b = vec![
        CardSnapshot::new(CardId::new(3), "Meruem", Rarity::Sss, "Hunter x Hunter", 45, 20, 600),
        CardSnapshot::new(CardId::new(4), "Hisoka", Rarity::S, "Hunter x Hunter", 35, 14, 320).at_position(1),
    ];
    (a, b)
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("arena-{}-{name}", std::process::id()))
}

#[test]
fn test_step_through_files() {
    let path = temp_path("step.snapshot.json");
    let (a, b) = rosters();

    let mut engine = BattleEngine::new(a, b, SeededRng::new(3)).unwrap();
    engine.resolve_next_turn().unwrap();
    engine.snapshot().save_to_file(&path).unwrap();

    let mut turns = 1;
    loop {
        let snapshot = BattleSnapshot::load_from_file(&path).unwrap();
        assert_eq!(snapshot.turn, turns);
        assert!(snapshot.recent_actions.len() <= RECENT_ACTIONS_WINDOW);
        if snapshot.winner.is_some() {
            break;
        }

        let mut engine = BattleEngine::from_snapshot(snapshot, SeededRng::new(100 + turns as u64)).unwrap();
        engine.resolve_next_turn().unwrap();
        engine.snapshot().save_to_file(&path).unwrap();
        turns += 1;
        assert!(turns < 1000);
    }

    let last = BattleSnapshot::load_from_file(&path).unwrap();
    let winner = last.winner.unwrap();
    assert!(last.cards(winner).iter().any(|c| c.is_alive));
    assert!(last.cards(winner.opponent()).iter().all(|c| !c.is_alive));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_json_roundtrip_at_every_turn() {
    let (a, b) = rosters();
    let mut engine = BattleEngine::new(a, b, SeededRng::new(21)).unwrap();

    loop {
        let snapshot = engine.snapshot();
        let decoded = BattleSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(decoded, snapshot, "turn {}", snapshot.turn);
        if engine.is_finished() {
            break;
        }
        engine.resolve_next_turn().unwrap();
    }
}

#[test]
fn test_restored_engine_keeps_synergy_and_stats() {
    let (a, b) = rosters();
    let mut engine = BattleEngine::new(a, b, ScriptedRng::plain()).unwrap();
    engine.resolve_next_turn().unwrap();

    let snapshot = engine.snapshot();
    let restored = BattleEngine::from_snapshot(snapshot.clone(), ScriptedRng::plain()).unwrap();

    assert_eq!(restored.turn(), engine.turn());
    assert_eq!(restored.synergy(Side::A), engine.synergy(Side::A));
    assert_eq!(restored.roster(Side::A), engine.roster(Side::A));
    assert_eq!(restored.roster(Side::B), engine.roster(Side::B));
    assert_eq!(restored.snapshot(), snapshot);

    // Both continue identically on identical rolls
    let mut original = engine;
    let mut restored = restored;
    assert_eq!(original.resolve_next_turn().unwrap(), restored.resolve_next_turn().unwrap());
}

#[test]
fn test_finished_snapshot_rejects_turns() {
    let (a, b) = rosters();
    let mut engine = BattleEngine::new(a, b, SeededRng::new(11)).unwrap();
    engine.resolve_to_completion().unwrap();
    let status = engine.status();

    let mut restored = BattleEngine::from_snapshot(engine.snapshot(), SeededRng::new(0)).unwrap();
    assert!(restored.is_finished());
    assert!(matches!(
        restored.resolve_next_turn(),
        Err(BattleError::InvalidTurnRequest(s)) if s == status
    ));
}

#[test]
fn test_corrupt_snapshot_file() {
    let path = temp_path("corrupt.snapshot.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        BattleSnapshot::load_from_file(&path),
        Err(BattleError::SnapshotDecode(_))
    ));
    std::fs::remove_file(&path).ok();

    assert!(matches!(
        BattleSnapshot::load_from_file(temp_path("missing.snapshot.json")),
        Err(BattleError::IoError(_))
    ));
}

#[test]
fn test_tampered_health_rejected() {
    let (a, b) = rosters();
    let engine = BattleEngine::new(a, b, ScriptedRng::plain()).unwrap();

    let mut snapshot = engine.snapshot();
    snapshot.side_b_cards[0].health = snapshot.side_b_cards[0].max_health + 1;
    let json = snapshot.to_json().unwrap();

    assert!(matches!(BattleSnapshot::from_json(&json), Err(BattleError::SnapshotDecode(_))));
    assert!(matches!(
        BattleEngine::from_snapshot(snapshot, ScriptedRng::plain()),
        Err(BattleError::SnapshotDecode(_))
    ));
}
