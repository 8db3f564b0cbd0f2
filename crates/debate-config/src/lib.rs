//! debate-config library crate.
//!
//! Keeps the debate session configuration in memory and mirrors it into a
//! durable client-local slot.
//!
//! # Architecture
//!
//! ```text
//! Presentation (UI / CLI)
//!         ↕  CommandResult<ConfigDto>
//! [debate-config]
//!   ├── application/      ConfigStore + the DurableSlot collaborator trait
//!   └── infrastructure/
//!         ├── storage/    FileSlot (one TOML file per key), MemorySlot
//!         └── ui_bridge/  async commands over a shared AppState
//! ```
//!
//! # Layer rules
//!
//! - `application` depends on `debate-core` and on the `DurableSlot` trait
//!   only; it never touches the file system.
//! - `infrastructure` implements the trait and adapts the store for callers.

pub mod application;
pub mod infrastructure;
