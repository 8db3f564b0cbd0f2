//! The durable slot collaborator.
//!
//! The store only needs two operations from persistent storage: read the
//! serialized record under a key, and replace it.  Each supported backend
//! provides an implementation in the infrastructure layer; tests substitute
//! `MemorySlot` or a mock.

use std::path::PathBuf;

use debate_core::CodecError;
use thiserror::Error;

/// Failure to obtain a usable record from the durable slot.
#[derive(Debug, Error)]
pub enum ReadFailure {
    /// The backing store cannot be accessed at all.
    #[error("durable store unavailable: {0}")]
    Unavailable(String),

    /// The slot exists but reading it failed.
    #[error("I/O error reading slot {key:?} at {path}: {source}")]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The slot was read but does not hold a valid record.
    #[error("slot {key:?} holds a corrupt record: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: CodecError,
    },
}

/// Failure to replace the record in the durable slot.
#[derive(Debug, Error)]
pub enum WriteFailure {
    /// The backing store rejected the write (unavailable, full, read-only).
    #[error("durable store unavailable: {0}")]
    Unavailable(String),

    /// Writing the slot failed.
    #[error("I/O error writing slot {key:?} at {path}: {source}")]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record could not be serialized.
    #[error(transparent)]
    Encode(#[from] CodecError),
}

/// Client-local persistent key-value storage.
#[cfg_attr(test, mockall::automock)]
pub trait DurableSlot: Send + Sync {
    /// Returns the serialized value stored under `key`, or `None` if the key
    /// has never been written.
    fn read(&self, key: &str) -> Result<Option<String>, ReadFailure>;

    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, serialized: &str) -> Result<(), WriteFailure>;
}
