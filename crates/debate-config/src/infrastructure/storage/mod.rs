//! Storage infrastructure: durable slot implementations.
//!
//! - `file`   – [`FileSlot`]: one TOML file per key inside the platform
//!   configuration directory (or any directory the caller chooses).
//! - `memory` – [`MemorySlot`]: a process-local map with failure switches, for
//!   tests and headless runs.
//!
//! Both implement [`DurableSlot`](crate::application::DurableSlot), so the
//! store never knows which one it is talking to.

pub mod file;
pub mod memory;

pub use file::{default_slot_dir, FileSlot, SlotDirError};
pub use memory::MemorySlot;
