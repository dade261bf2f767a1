//! Card pool loading from files and directories

use arena_battle::core::{CardId, Rarity};
use arena_battle::loader::{build_roster, CardPool, OwnedCard};
use arena_battle::BattleError;
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("arena-pool-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("nested")).unwrap();
    dir
}

#[test]
fn test_load_directory_merges_files() {
    let dir = scratch_dir("merge");
    fs::write(
        dir.join("shonen.json"),
        r#"[{"id": 1, "name": "Deku", "rarity": "A", "franchise": "My Hero Academia"}]"#,
    )
    .unwrap();
    fs::write(
        dir.join("nested/seinen.json"),
        r#"[{"id": 2, "name": "Guts", "rarity": "SSS", "franchise": "Berserk", "base_attack": 30}]"#,
    )
    .unwrap();
    fs::write(dir.join("README.txt"), "not a pool").unwrap();

    let pool = CardPool::load_from_dir(&dir).unwrap();
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.get(CardId::new(2)).unwrap().rarity, Rarity::Sss);
    assert_eq!(pool.get(CardId::new(2)).unwrap().base_attack, 30);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_duplicate_ids_across_files() {
    let dir = scratch_dir("dupes");
    fs::write(dir.join("a.json"), r#"[{"id": 5, "name": "Light", "rarity": "S"}]"#).unwrap();
    fs::write(dir.join("nested/b.json"), r#"[{"id": 5, "name": "L", "rarity": "S"}]"#).unwrap();

    assert!(matches!(CardPool::load_from_dir(&dir), Err(BattleError::InvalidPool(_))));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_malformed_file_names_path() {
    let dir = scratch_dir("malformed");
    let path = dir.join("broken.json");
    fs::write(&path, "[{").unwrap();

    match CardPool::load_from_file(&path) {
        Err(BattleError::InvalidPool(msg)) => assert!(msg.contains("broken.json"), "{msg}"),
        other => panic!("expected InvalidPool, got {other:?}"),
    }

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_sample_pool_builds_rosters() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("cards/sample_pool.json");
    let pool = CardPool::load_from_file(&path).unwrap();

    let owned: Vec<_> = pool.iter().take(5).map(|c| OwnedCard::new(c.id, 10)).collect();
    let roster = build_roster(&pool, &owned).unwrap();

    assert_eq!(roster.len(), 5);
    for (snapshot, entry) in roster.iter().zip(&owned) {
        assert_eq!(snapshot.card_id, entry.card_id);
        assert!(snapshot.attack > 0 && snapshot.defense > 0 && snapshot.health > 0);
    }
}
