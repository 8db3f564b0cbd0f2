//! The debate session configuration record.
//!
//! A [`DebateConfig`] is a flat record of named settings, each with a default.
//! Presentation code never edits it in place; it sends a [`ConfigPatch`] (or a
//! single [`FieldValue`]) and receives the merged record back.
//!
//! # Shallow merge
//!
//! Merging a patch onto a record is field-by-field: a field present in the
//! patch replaces the record's value wholesale, every other field is kept.
//!
//! ```rust
//! use debate_core::{ConfigPatch, DebateConfig};
//!
//! let cfg = DebateConfig::default();
//! let merged = cfg.merge(&ConfigPatch { rounds: Some(5), ..Default::default() });
//! assert_eq!(merged.rounds, 5);
//! assert_eq!(merged.topic, cfg.topic);
//! ```

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default debate topic: empty until the user picks one.
pub const DEFAULT_TOPIC: &str = "";
/// Default difficulty level.
pub const DEFAULT_DIFFICULTY: Difficulty = Difficulty::Medium;
/// Default number of rounds in a session.
pub const DEFAULT_ROUNDS: u32 = 3;

/// Error type for parsing a single-field update from raw strings.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    /// The key does not name a configuration field.
    #[error("unknown configuration field: {0:?}")]
    UnknownField(String),

    /// The value is not one of `easy`, `medium`, `hard`.
    #[error("invalid difficulty {0:?}: expected easy, medium or hard")]
    InvalidDifficulty(String),

    /// The round count is not a non-negative integer.
    #[error("invalid round count {raw:?}: {source}")]
    InvalidRounds {
        raw: String,
        #[source]
        source: ParseIntError,
    },
}

// ── Record types ──────────────────────────────────────────────────────────────

/// How hard the opposing side argues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Lower-case name, as stored and as accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(FieldError::InvalidDifficulty(s.to_string())),
        }
    }
}

/// Configuration of a debate session.
///
/// Every field carries a serde default so that a stored record missing some
/// fields still decodes to a complete value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateConfig {
    /// Motion under debate.
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Opponent difficulty.
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    /// Number of rounds per session.
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}
fn default_difficulty() -> Difficulty {
    DEFAULT_DIFFICULTY
}
fn default_rounds() -> u32 {
    DEFAULT_ROUNDS
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            difficulty: default_difficulty(),
            rounds: default_rounds(),
        }
    }
}

impl DebateConfig {
    /// Returns a copy of `self` with every field set in `patch` overridden.
    pub fn merge(&self, patch: &ConfigPatch) -> DebateConfig {
        DebateConfig {
            topic: patch.topic.clone().unwrap_or_else(|| self.topic.clone()),
            difficulty: patch.difficulty.unwrap_or(self.difficulty),
            rounds: patch.rounds.unwrap_or(self.rounds),
        }
    }
}

/// A partial update: any subset of the [`DebateConfig`] fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
}

impl ConfigPatch {
    /// `true` when the patch sets no field.
    pub fn is_empty(&self) -> bool {
        self.topic.is_none() && self.difficulty.is_none() && self.rounds.is_none()
    }
}

// ── Single-field updates ──────────────────────────────────────────────────────

/// Names one field of [`DebateConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    Topic,
    Difficulty,
    Rounds,
}

impl ConfigField {
    /// All fields, in declaration order.
    pub const ALL: [ConfigField; 3] = [
        ConfigField::Topic,
        ConfigField::Difficulty,
        ConfigField::Rounds,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigField::Topic => "topic",
            ConfigField::Difficulty => "difficulty",
            ConfigField::Rounds => "rounds",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "topic" => Ok(ConfigField::Topic),
            "difficulty" => Ok(ConfigField::Difficulty),
            "rounds" => Ok(ConfigField::Rounds),
            _ => Err(FieldError::UnknownField(s.to_string())),
        }
    }
}

/// A typed value for exactly one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Topic(String),
    Difficulty(Difficulty),
    Rounds(u32),
}

impl FieldValue {
    /// Parses `raw` as a value for `field`.
    ///
    /// Topics are taken verbatim; difficulty and rounds are validated.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidDifficulty`] or [`FieldError::InvalidRounds`]
    /// when `raw` is not a valid value for `field`.
    pub fn parse(field: ConfigField, raw: &str) -> Result<Self, FieldError> {
        match field {
            ConfigField::Topic => Ok(FieldValue::Topic(raw.to_string())),
            ConfigField::Difficulty => raw.parse().map(FieldValue::Difficulty),
            ConfigField::Rounds => raw
                .trim()
                .parse()
                .map(FieldValue::Rounds)
                .map_err(|source| FieldError::InvalidRounds {
                    raw: raw.to_string(),
                    source,
                }),
        }
    }

    /// Parses a string key and a raw value in one step.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::UnknownField`] for an unrecognised key, otherwise
    /// whatever [`FieldValue::parse`] returns.
    pub fn parse_key(key: &str, raw: &str) -> Result<Self, FieldError> {
        Self::parse(key.parse()?, raw)
    }

    /// The field this value belongs to.
    pub fn field(&self) -> ConfigField {
        match self {
            FieldValue::Topic(_) => ConfigField::Topic,
            FieldValue::Difficulty(_) => ConfigField::Difficulty,
            FieldValue::Rounds(_) => ConfigField::Rounds,
        }
    }
}

impl From<FieldValue> for ConfigPatch {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Topic(topic) => ConfigPatch {
                topic: Some(topic),
                ..Default::default()
            },
            FieldValue::Difficulty(difficulty) => ConfigPatch {
                difficulty: Some(difficulty),
                ..Default::default()
            },
            FieldValue::Rounds(rounds) => ConfigPatch {
                rounds: Some(rounds),
                ..Default::default()
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
