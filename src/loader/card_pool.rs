//! Card catalog loading
//!
//! A pool file is a JSON array of catalog cards. Pools can be read from a
//! single file, from every `*.json` file under a directory (walked in
//! parallel), or asynchronously.

use crate::core::{CardId, CardName, Franchise, Rarity};
use crate::{BattleError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_base_attack() -> u32 {
    10
}

fn default_base_defense() -> u32 {
    10
}

fn default_base_health() -> u32 {
    100
}

/// Level-1 catalog entry for a collectible card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCard {
    pub id: CardId,
    pub name: CardName,
    pub rarity: Rarity,
    #[serde(default = "Franchise::empty")]
    pub franchise: Franchise,
    #[serde(default = "default_base_attack")]
    pub base_attack: u32,
    #[serde(default = "default_base_defense")]
    pub base_defense: u32,
    #[serde(default = "default_base_health")]
    pub base_health: u32,
}

/// All catalog cards known to the arena, indexed by id
#[derive(Debug, Clone, Default)]
pub struct CardPool {
    cards: Vec<CatalogCard>,
    by_id: FxHashMap<CardId, usize>,
}

impl CardPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from cards, rejecting duplicate ids
    pub fn from_cards(cards: impl IntoIterator<Item = CatalogCard>) -> Result<Self> {
        let mut pool = CardPool::new();
        for card in cards {
            pool.add(card)?;
        }
        Ok(pool)
    }

    pub fn add(&mut self, card: CatalogCard) -> Result<()> {
        if self.by_id.contains_key(&card.id) {
            return Err(BattleError::InvalidPool(format!(
                "duplicate card id {} ('{}')",
                card.id, card.name
            )));
        }
        self.by_id.insert(card.id, self.cards.len());
        self.cards.push(card);
        Ok(())
    }

    /// Parse a JSON array of cards
    pub fn parse(json: &str) -> Result<Self> {
        Self::from_cards(parse_cards(json)?)
    }

    /// Load a pool from one JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_cards(parse_cards(&json).map_err(|e| with_path(path, e))?)
    }

    /// Load and merge every `*.json` pool file under `dir`
    ///
    /// Files are merged in path order so the result does not depend on the
    /// walk's scheduling.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(BattleError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Card pool directory not found: {dir:?}"),
            )));
        }

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in jwalk::WalkDir::new(dir).skip_hidden(true) {
            let entry = entry.map_err(|e| BattleError::InvalidPool(format!("walking {dir:?}: {e}")))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut pool = CardPool::new();
        for path in paths {
            let json = std::fs::read_to_string(&path)?;
            for card in parse_cards(&json).map_err(|e| with_path(&path, e))? {
                pool.add(card)?;
            }
        }
        Ok(pool)
    }

    /// Load a pool from one JSON file without blocking the runtime
    pub async fn load_from_file_async(path: PathBuf) -> Result<Self> {
        let json = tokio::fs::read_to_string(&path).await?;
        Self::from_cards(parse_cards(&json).map_err(|e| with_path(&path, e))?)
    }

    pub fn get(&self, id: CardId) -> Option<&CatalogCard> {
        self.by_id.get(&id).map(|&i| &self.cards[i])
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in load order
    pub fn iter(&self) -> std::slice::Iter<'_, CatalogCard> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[CatalogCard] {
        &self.cards
    }
}

fn parse_cards(json: &str) -> Result<Vec<CatalogCard>> {
    serde_json::from_str(json).map_err(|e| BattleError::InvalidPool(e.to_string()))
}

fn with_path(path: &Path, err: BattleError) -> BattleError {
    match err {
        BattleError::InvalidPool(msg) => BattleError::InvalidPool(format!("{}: {msg}", path.display())),
        other => other,
    }
}
