//! Random encounters produced by the narrator engine.
//!
//! Every field has a named default so that a returned encounter is always
//! fully populated, whatever the model actually produced.

use serde::{Deserialize, Serialize};

/// Named defaults applied when the model omits a field or produces
/// undecodable output.
pub mod defaults {
    pub const DESCRIPTION: &str = "A mysterious encounter awaits...";
    pub const SETTING: &str = "Unknown location";
    pub const TACTICS: &str = "The monsters fight to the death";
    pub const MONSTER_NAME: &str = "Unknown creature";
}

/// Advisory difficulty rating.
///
/// The four standard ratings are enumerated; anything else the model emits is
/// carried through as-is rather than rejected, since difficulty guides the
/// table rather than any rules engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Deadly,
    Other(String),
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Deadly => "deadly",
            Self::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Self::Easy,
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            "deadly" => Self::Deadly,
            _ => Self::Other(raw.to_string()),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Difficulty {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// One monster in an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterMonster {
    pub name: String,
    /// Kept as text: models emit "1/2", "CR 3", or bare numbers.
    #[serde(default)]
    pub challenge_rating: String,
}

/// A generated encounter, always fully populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub description: String,
    #[serde(default)]
    pub monsters: Vec<EncounterMonster>,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub setting: String,
    pub tactics: String,
}

impl Encounter {
    /// A whole-object degraded encounter: the raw model text becomes the
    /// description and everything else takes its named default.
    pub fn degraded(raw_text: impl Into<String>) -> Self {
        Self {
            description: raw_text.into(),
            monsters: Vec::new(),
            difficulty: Difficulty::default(),
            setting: defaults::SETTING.to_string(),
            tactics: defaults::TACTICS.to_string(),
        }
    }
}
