//! Text codec for the record stored in the durable slot.
//!
//! A record is stored as pretty-printed TOML:
//!
//! ```toml
//! topic = "Cities should ban cars"
//! difficulty = "medium"
//! rounds = 3
//! ```
//!
//! Decoding is lenient about *missing* fields (each falls back to its
//! default) but strict about *invalid* ones: a malformed document or an
//! out-of-range value is a [`CodecError::Decode`].

use thiserror::Error;

use crate::domain::config::DebateConfig;

/// Errors that can occur while encoding or decoding a stored record.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The stored text is not a valid record.
    #[error("failed to decode stored config: {0}")]
    Decode(#[from] toml::de::Error),

    /// The record could not be serialized.
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Serializes `config` into the text written to the durable slot.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode_config(config: &DebateConfig) -> Result<String, CodecError> {
    Ok(toml::to_string_pretty(config)?)
}

/// Parses text read from the durable slot.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if `text` is not valid TOML or a field has
/// an invalid value.
pub fn decode_config(text: &str) -> Result<DebateConfig, CodecError> {
    Ok(toml::from_str(text)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::Difficulty;

    #[test]
    fn test_encode_then_decode_returns_equal_record() {
        // Arrange
        let cfg = DebateConfig {
            topic: "Homework should be abolished".to_string(),
            difficulty: Difficulty::Easy,
            rounds: 4,
        };

        // Act
        let text = encode_config(&cfg).expect("encode");
        let restored = decode_config(&text).expect("decode");

        // Assert
        assert_eq!(restored, cfg);
    }

    #[test]
    fn test_encoded_record_uses_lowercase_difficulty() {
        let text = encode_config(&DebateConfig::default()).expect("encode");
        assert!(text.contains("difficulty = \"medium\""), "got:\n{text}");
        assert!(text.contains("rounds = 3"), "got:\n{text}");
    }

    #[test]
    fn test_decode_empty_document_yields_defaults() {
        let cfg = decode_config("").expect("empty document is a valid record");
        assert_eq!(cfg, DebateConfig::default());
    }

    #[test]
    fn test_decode_partial_document_fills_missing_fields_with_defaults() {
        // Arrange: only rounds stored
        let text = "rounds = 8\n";

        // Act
        let cfg = decode_config(text).expect("decode partial");

        // Assert
        assert_eq!(cfg.rounds, 8);
        assert_eq!(cfg.topic, "");
        assert_eq!(cfg.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let cfg = decode_config("rounds = 2\nlegacy_flag = true\n").expect("decode");
        assert_eq!(cfg.rounds, 2);
    }

    #[test]
    fn test_decode_malformed_text_returns_decode_error() {
        let result = decode_config("[[[ not valid toml");
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_decode_invalid_difficulty_returns_decode_error() {
        let result = decode_config("difficulty = \"impossible\"\n");
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_decode_negative_rounds_returns_decode_error() {
        let result = decode_config("rounds = -2\n");
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }
}
