//! Properties that must hold for every seeded battle

use arena_battle::core::{CardSnapshot, Side};
use arena_battle::game::{BattleEngine, SeededRng, MAX_ROSTER_SIZE};
use arena_battle::loader::{generate_test_roster, CardPool};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::path::PathBuf;

fn sample_pool() -> CardPool {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("cards/sample_pool.json");
    CardPool::load_from_file(&path).expect("sample pool loads")
}

/// Random rosters of 1..=5 cards for seed `seed`
fn rosters(pool: &CardPool, seed: u64) -> (Vec<CardSnapshot>, Vec<CardSnapshot>) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let side = |rng: &mut Xoshiro256PlusPlus| {
        let rating = rng.gen_range(0..5000);
        let mut roster = generate_test_roster(pool, rating, rng).unwrap();
        roster.truncate(rng.gen_range(1..=MAX_ROSTER_SIZE));
        roster
    };
    let a = side(&mut rng);
    let b = side(&mut rng);
    (a, b)
}

#[test]
fn test_turn_invariants_hold_for_many_seeds() {
    let pool = sample_pool();

    for seed in 0..300u64 {
        let (a, b) = rosters(&pool, seed);
        let mut engine = BattleEngine::new(a, b, SeededRng::new(seed)).unwrap();

        while !engine.is_finished() {
            let before: Vec<_> = [Side::A, Side::B]
                .iter()
                .flat_map(|&s| engine.roster(s).to_vec())
                .collect();

            let actions = engine.resolve_next_turn().unwrap();

            // A strikes before B within a turn
            let first_b = actions.iter().position(|a| a.attacking_side() == Side::B);
            if let Some(first_b) = first_b {
                assert!(actions[first_b..].iter().all(|a| a.attacking_side() == Side::B));
            }

            for action in &actions {
                assert_eq!(action.turn, engine.turn());
                assert_ne!(action.attacker_id.side, action.defender_id.side);
                if action.is_dodged {
                    assert_eq!(action.damage, 0);
                    assert!(!action.is_critical);
                } else {
                    assert!(action.damage >= 1, "seed {seed}: zero-damage hit {action}");
                }
            }

            for old in &before {
                let new = engine.card(old.id).unwrap();
                assert!(new.health <= old.health, "seed {seed}: {} healed", new.id);
                assert!(new.health <= new.max_health);
                if !old.is_alive() {
                    assert!(actions.iter().all(|a| a.attacker_id != old.id && a.defender_id != old.id));
                }
            }

            assert!(engine.turn() < 1000, "seed {seed} did not finish");
        }

        let winner = engine.winner().unwrap();
        assert!(engine.alive_count(winner) > 0, "seed {seed}: winner has no cards");
        assert_eq!(engine.alive_count(winner.opponent()), 0, "seed {seed}: loser still standing");
    }
}

#[test]
fn test_action_damage_matches_health_lost() {
    let pool = sample_pool();

    for seed in 1000..1100u64 {
        let (a, b) = rosters(&pool, seed);
        let start_total: Vec<u64> = [&a, &b]
            .iter()
            .map(|r| r.iter().map(|c| c.health as u64).sum())
            .collect();

        let mut engine = BattleEngine::new(a, b, SeededRng::new(seed)).unwrap();
        engine.resolve_to_completion().unwrap();

        let end_a: u64 = engine.roster(Side::A).iter().map(|c| c.health as u64).sum();
        let end_b: u64 = engine.roster(Side::B).iter().map(|c| c.health as u64).sum();

        assert_eq!(start_total[0] - end_a, engine.damage_dealt_by(Side::B));
        assert_eq!(start_total[1] - end_b, engine.damage_dealt_by(Side::A));
    }
}

#[test]
fn test_roll_rates_over_many_battles() {
    let pool = sample_pool();
    let mut attacks = 0usize;
    let mut crits = 0usize;
    let mut dodges = 0usize;

    for seed in 0..400u64 {
        let (a, b) = rosters(&pool, seed);
        let mut engine = BattleEngine::new(a, b, SeededRng::new(seed)).unwrap();
        for action in engine.resolve_to_completion().unwrap() {
            attacks += 1;
            crits += action.is_critical as usize;
            dodges += action.is_dodged as usize;
        }
    }

    let crit_rate = crits as f64 / attacks as f64;
    let dodge_rate = dodges as f64 / attacks as f64;
    // Dodged crits are reported as plain dodges: 0.10 * 0.95
    assert!((0.07..0.12).contains(&crit_rate), "crit rate {crit_rate} over {attacks} attacks");
    assert!((0.03..0.07).contains(&dodge_rate), "dodge rate {dodge_rate} over {attacks} attacks");
}
