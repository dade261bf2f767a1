//! Strongly-typed wrappers for card attributes
//!
//! Names, franchise tags and rarities are kept apart as distinct types so a
//! franchise can never be passed where a card name is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rarity tier, ordered from weakest to strongest
///
/// `E < D < C < B < A < S < ASS < SSS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    E,
    D,
    C,
    B,
    A,
    S,
    #[serde(rename = "ASS")]
    Ass,
    #[serde(rename = "SSS")]
    Sss,
}

impl Rarity {
    pub const ALL: [Rarity; 8] = [
        Rarity::E,
        Rarity::D,
        Rarity::C,
        Rarity::B,
        Rarity::A,
        Rarity::S,
        Rarity::Ass,
        Rarity::Sss,
    ];

    /// Stat multiplier applied on top of level scaling
    pub fn stat_multiplier(self) -> f64 {
        match self {
            Rarity::E => 1.0,
            Rarity::D => 1.1,
            Rarity::C => 1.2,
            Rarity::B => 1.3,
            Rarity::A => 1.45,
            Rarity::S => 1.65,
            Rarity::Ass => 1.8,
            Rarity::Sss => 2.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::E => "E",
            Rarity::D => "D",
            Rarity::C => "C",
            Rarity::B => "B",
            Rarity::A => "A",
            Rarity::S => "S",
            Rarity::Ass => "ASS",
            Rarity::Sss => "SSS",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Rarity::ALL
            .into_iter()
            .find(|r| r.as_str() == upper)
            .ok_or_else(|| format!("unknown rarity '{s}' (expected one of E, D, C, B, A, S, ASS, SSS)"))
    }
}

/// Source-franchise tag (e.g. which show a character comes from)
///
/// Keeps the display spelling; grouping uses [`Franchise::key`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Franchise(String);

impl Franchise {
    pub fn new(s: impl Into<String>) -> Self {
        Franchise(s.into())
    }

    /// A card with no franchise tag
    pub fn empty() -> Self {
        Franchise(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Grouping key: ASCII transliteration, trimmed, lowercased
    ///
    /// "Naruto", " naruto " and "NARUTO" all share one key. Returns `None` for
    /// an empty tag, which never forms a synergy group.
    pub fn key(&self) -> Option<String> {
        let key = deunicode::deunicode(self.0.trim()).to_lowercase();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

impl fmt::Display for Franchise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Franchise {
    fn from(s: String) -> Self {
        Franchise(s)
    }
}

impl From<&str> for Franchise {
    fn from(s: &str) -> Self {
        Franchise(s.to_string())
    }
}

/// Card display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardName(String);

impl CardName {
    pub fn new(s: impl Into<String>) -> Self {
        CardName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardName {
    fn from(s: String) -> Self {
        CardName(s)
    }
}

impl From<&str> for CardName {
    fn from(s: &str) -> Self {
        CardName(s.to_string())
    }
}
