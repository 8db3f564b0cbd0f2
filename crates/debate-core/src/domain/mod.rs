//! Domain entities for the debate room.
//!
//! Pure value types with no infrastructure dependencies.  The record defined
//! here is what the configuration store keeps in memory and mirrors into the
//! durable slot; the store itself lives in the `debate-config` crate.

/// The debate session configuration record and its partial updates.
pub mod config;
