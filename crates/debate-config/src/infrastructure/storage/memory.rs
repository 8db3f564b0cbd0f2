//! In-memory durable slot.
//!
//! Keeps values in a `Mutex<HashMap>` for the lifetime of the process.  Used
//! by unit tests, by the command bridge tests, and by callers that want a
//! store without touching the disk.
//!
//! # Failure switches
//!
//! [`MemorySlot::set_fail_reads`] and [`MemorySlot::set_fail_writes`] make
//! every subsequent read or write return `Unavailable`, the same way a browser
//! rejects access to local storage.  They can be flipped while the slot is
//! shared through an `Arc`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::slot::{DurableSlot, ReadFailure, WriteFailure};

/// A process-local [`DurableSlot`].
#[derive(Debug, Default)]
pub struct MemorySlot {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemorySlot {
    /// Creates an empty slot with both failure switches off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key` directly, bypassing the write counter and
    /// the failure switch.
    pub fn insert(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    /// Number of successful [`DurableSlot::write`] calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl DurableSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, ReadFailure> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ReadFailure::Unavailable("memory slot reads disabled".into()));
        }
        let entries = self
            .entries
            .lock()
            .map_err(|_| ReadFailure::Unavailable("memory slot lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, serialized: &str) -> Result<(), WriteFailure> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(WriteFailure::Unavailable("memory slot writes disabled".into()));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| WriteFailure::Unavailable("memory slot lock poisoned".into()))?;
        entries.insert(key.to_string(), serialized.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
