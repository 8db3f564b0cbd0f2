//! # debate-core
//!
//! Shared domain types for the debate room configuration store.
//!
//! This crate has no I/O and no async code.  It defines:
//!
//! - **`domain`** – The [`DebateConfig`] record with its per-field defaults,
//!   the [`ConfigPatch`] partial update and the shallow merge between them,
//!   plus typed single-field updates ([`ConfigField`], [`FieldValue`]).
//!
//! - **`codec`** – How a record is turned into the text stored in the durable
//!   slot and back.  Missing fields decode to their defaults.

pub mod codec;
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `debate_core::DebateConfig` instead of `debate_core::domain::config::DebateConfig`.
pub use codec::{decode_config, encode_config, CodecError};
pub use domain::config::{
    ConfigField, ConfigPatch, DebateConfig, Difficulty, FieldError, FieldValue,
    DEFAULT_DIFFICULTY, DEFAULT_ROUNDS, DEFAULT_TOPIC,
};
