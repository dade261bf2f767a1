//! Profiling binary for battle execution
//!
//! Runs battles in a tight loop for profiling with cargo-flamegraph.
//! Unlike the Criterion benchmarks, this has minimal overhead and produces
//! cleaner flamegraphs.
//!
//! Usage:
//!   cargo flamegraph --bin profile --no-default-features

use anyhow::Context;
use arena_battle::{
    game::{BattleEngine, SeededRng},
    loader::{generate_test_roster, CardPool},
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let pool_path = PathBuf::from("cards/sample_pool.json");
    let pool = CardPool::load_from_file(&pool_path)
        .with_context(|| format!("loading card pool {}", pool_path.display()))?;

    // Allow overriding iterations via environment variable
    let iterations: u64 = std::env::var("PROFILE_ITERATIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000);

    println!("Profiling battle execution...");
    println!("Running {iterations} battles with seed 42");
    println!();

    let seed = 42u64;
    let mut roster_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut total_turns = 0u64;

    for i in 0..iterations {
        let side_a = generate_test_roster(&pool, 1500, &mut roster_rng)?;
        let side_b = generate_test_roster(&pool, 1500, &mut roster_rng)?;

        let mut engine = BattleEngine::new(side_a, side_b, SeededRng::new(seed.wrapping_add(i)))?;
        engine
            .resolve_to_completion()
            .with_context(|| format!("battle {i}"))?;
        total_turns += engine.turn() as u64;

        if (i + 1) % 10_000 == 0 {
            println!("Completed {} battles", i + 1);
        }
    }

    println!();
    println!(
        "Profiling complete! {iterations} battles executed, {:.2} turns on average.",
        total_turns as f64 / iterations.max(1) as f64
    );

    Ok(())
}
