//! Arena Battle - Main Binary
//!
//! Command-line driver for the battle engine: single fights, turn-by-turn
//! stepping through a stored snapshot, and parallel tournaments.

use arena_battle::{
    core::Side,
    game::{BattleEngine, BattleLogger, BattleSnapshot, OutputFormat, OutputMode, SeededRng, VerbosityLevel},
    loader::{generate_test_roster, test_opponent_rating, CardPool, RosterPair},
    tournament::{run_tourney, TourneyConfig},
    BattleError, Result,
};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::path::{Path, PathBuf};

/// Verbosity level for battle output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Arena Battle - card roster combat engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one battle to completion
    Fight {
        /// Card pool (.json file or directory of .json files)
        #[arg(long, default_value = "cards/sample_pool.json")]
        pool: PathBuf,

        /// Prepared rosters file ({"side_a": [...], "side_b": [...]}); generated from the pool if absent
        #[arg(long, value_name = "ROSTERS_FILE")]
        rosters: Option<PathBuf>,

        /// Challenger rating used to level generated rosters
        #[arg(long, default_value_t = 1000)]
        rating: u32,

        /// Random seed for deterministic battles
        #[arg(long)]
        seed: Option<u64>,

        /// Verbosity level (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, short = 'v', default_value = "normal")]
        verbosity: VerbosityArg,

        /// Log line format
        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,

        /// Buffer the log and print only the last N lines
        #[arg(long, value_name = "N")]
        log_tail: Option<usize>,

        /// Write the final outcome as JSON
        #[arg(long, value_name = "FILE")]
        outcome_json: Option<PathBuf>,

        /// Turn cap
        #[arg(long, default_value_t = arena_battle::game::DEFAULT_MAX_TURNS)]
        max_turns: u32,
    },

    /// Resolve a single turn, resuming from and saving to a snapshot file
    Step {
        /// Snapshot file (created from the rosters or pool if missing)
        #[arg(long, default_value = "battle.snapshot.json")]
        snapshot: PathBuf,

        /// Card pool used when starting a new battle
        #[arg(long, default_value = "cards/sample_pool.json")]
        pool: PathBuf,

        /// Prepared rosters used when starting a new battle
        #[arg(long, value_name = "ROSTERS_FILE")]
        rosters: Option<PathBuf>,

        /// Challenger rating used to level generated rosters
        #[arg(long, default_value_t = 1000)]
        rating: u32,

        /// Random seed for this turn
        #[arg(long)]
        seed: Option<u64>,

        /// Verbosity level (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, short = 'v', default_value = "verbose")]
        verbosity: VerbosityArg,
    },

    /// Run many generated battles in parallel and report statistics
    Tourney {
        /// Card pool (.json file or directory of .json files)
        #[arg(long, default_value = "cards/sample_pool.json")]
        pool: PathBuf,

        /// Number of battles
        #[arg(long, short = 'b', default_value_t = 1000)]
        battles: usize,

        /// Tournament seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Rating for side A rosters
        #[arg(long, default_value_t = 1000)]
        rating_a: u32,

        /// Rating for side B rosters
        #[arg(long, default_value_t = 1000)]
        rating_b: u32,

        /// Turn cap per battle
        #[arg(long, default_value_t = arena_battle::game::DEFAULT_MAX_TURNS)]
        max_turns: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fight {
            pool,
            rosters,
            rating,
            seed,
            verbosity,
            format,
            log_tail,
            outcome_json,
            max_turns,
        } => {
            run_fight(FightArgs {
                pool,
                rosters,
                rating,
                seed,
                verbosity: verbosity.into(),
                format: format.into(),
                log_tail,
                outcome_json,
                max_turns,
            })
            .await?
        }
        Commands::Step {
            snapshot,
            pool,
            rosters,
            rating,
            seed,
            verbosity,
        } => run_step(snapshot, pool, rosters, rating, seed, verbosity.into()).await?,
        Commands::Tourney {
            pool,
            battles,
            seed,
            rating_a,
            rating_b,
            max_turns,
        } => {
            let pool = load_pool(&pool).await?;
            println!("=== Arena Battle - Tournament Mode ===\n");
            println!("Card pool: {} cards", pool.len());
            println!("Running {battles} battles (seed {seed}, ratings {rating_a} vs {rating_b})\n");

            let config = TourneyConfig {
                battles,
                seed,
                rating_a,
                rating_b,
                max_turns,
            };
            let report = tokio::task::spawn_blocking(move || run_tourney(&pool, config)).await??;
            report.print();
        }
    }

    Ok(())
}

struct FightArgs {
    pool: PathBuf,
    rosters: Option<PathBuf>,
    rating: u32,
    seed: Option<u64>,
    verbosity: VerbosityLevel,
    format: OutputFormat,
    log_tail: Option<usize>,
    outcome_json: Option<PathBuf>,
    max_turns: u32,
}

/// Load a pool file, or every pool file under a directory
async fn load_pool(path: &Path) -> Result<CardPool> {
    if path.is_dir() {
        let dir = path.to_path_buf();
        tokio::task::spawn_blocking(move || CardPool::load_from_dir(&dir)).await?
    } else {
        CardPool::load_from_file_async(path.to_path_buf()).await
    }
}

/// Rosters from a prepared file, or a generated pair at and around `rating`
async fn prepare_rosters(
    pool_path: &Path,
    rosters: Option<&Path>,
    rating: u32,
    seed: Option<u64>,
) -> Result<RosterPair> {
    if let Some(path) = rosters {
        return RosterPair::load_from_file(path);
    }

    let pool = load_pool(pool_path).await?;
    let mut rng = match seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_entropy(),
    };
    let opponent_rating = test_opponent_rating(rating, &mut rng);
    println!("Generated opponent rated {opponent_rating} for challenger rated {rating}");

    Ok(RosterPair {
        side_a: generate_test_roster(&pool, rating, &mut rng)?,
        side_b: generate_test_roster(&pool, opponent_rating, &mut rng)?,
    })
}

fn combat_rng(seed: Option<u64>) -> SeededRng {
    match seed {
        Some(seed) => SeededRng::new(seed),
        None => SeededRng::from_entropy(),
    }
}

fn print_rosters<R: arena_battle::game::CombatRng>(engine: &BattleEngine<R>) {
    for side in [Side::A, Side::B] {
        let bonus = engine.synergy_bonus(side);
        println!("Side {side} (synergy +{bonus}%):");
        for card in engine.roster(side) {
            println!(
                "  {} {} [{}] {} ATK {} DEF {} HP {}/{}",
                card.id, card.name, card.rarity, card.franchise, card.attack, card.defense, card.health, card.max_health
            );
        }
    }
    println!();
}

async fn run_fight(args: FightArgs) -> Result<()> {
    println!("=== Arena Battle ===\n");

    let pair = prepare_rosters(&args.pool, args.rosters.as_deref(), args.rating, args.seed).await?;

    let mut logger = BattleLogger::with_verbosity(args.verbosity);
    logger.set_output_format(args.format);
    if args.log_tail.is_some() {
        logger.set_output_mode(OutputMode::Memory);
    }

    let mut engine = BattleEngine::new(pair.side_a, pair.side_b, combat_rng(args.seed))?
        .with_logger(logger)
        .with_max_turns(args.max_turns);

    if args.verbosity >= VerbosityLevel::Normal {
        print_rosters(&engine);
    }

    let result = engine.resolve_to_completion().map(|_| ());

    if let Some(tail) = args.log_tail {
        engine.logger_mut().flush_tail(tail);
    }

    match result {
        Ok(()) => {}
        Err(BattleError::TurnLimitExceeded(turns)) => {
            println!("\nNo winner after {turns} turns");
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    if let Some(outcome) = engine.outcome() {
        println!("\n=== Battle Complete ===");
        println!("Winner: Side {}", outcome.winner);
        println!("Turns: {}", outcome.turns);
        println!("Damage dealt: A {} / B {}", outcome.damage_by_a, outcome.damage_by_b);

        if let Some(path) = args.outcome_json {
            let json = serde_json::to_string_pretty(&outcome)
                .map_err(|e| BattleError::SerializationError(e.to_string()))?;
            tokio::fs::write(&path, json).await?;
            println!("Outcome written to {}", path.display());
        }
    }

    Ok(())
}

async fn run_step(
    snapshot_path: PathBuf,
    pool: PathBuf,
    rosters: Option<PathBuf>,
    rating: u32,
    seed: Option<u64>,
    verbosity: VerbosityLevel,
) -> Result<()> {
    let logger = BattleLogger::with_verbosity(verbosity);

    let engine = if snapshot_path.exists() {
        let snapshot = BattleSnapshot::load_from_file(&snapshot_path)?;
        println!("Resuming battle at turn {} from {}", snapshot.turn, snapshot_path.display());
        BattleEngine::from_snapshot(snapshot, combat_rng(seed))?
    } else {
        let pair = prepare_rosters(&pool, rosters.as_deref(), rating, seed).await?;
        println!("Starting new battle in {}", snapshot_path.display());
        BattleEngine::new(pair.side_a, pair.side_b, combat_rng(seed))?
    };
    let mut engine = engine.with_logger(logger);

    if engine.is_finished() {
        println!("Battle already finished: {}", engine.status());
        return Ok(());
    }

    engine.resolve_next_turn()?;
    engine.snapshot().save_to_file(&snapshot_path)?;

    println!(
        "After turn {}: {} vs {} cards standing ({})",
        engine.turn(),
        engine.alive_count(Side::A),
        engine.alive_count(Side::B),
        engine.status()
    );
    println!("Snapshot saved to {}", snapshot_path.display());

    Ok(())
}
