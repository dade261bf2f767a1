//! Card pool and roster loaders
//!
//! Reads the JSON card catalog and turns owned or generated cards into
//! battle-ready rosters.

pub mod card_pool;
pub mod opponent;
pub mod roster;

pub use card_pool::{CardPool, CatalogCard};
pub use opponent::{generate_test_roster, test_opponent_rating};
pub use roster::{build_roster, leveled_stats, OwnedCard, RosterPair};
