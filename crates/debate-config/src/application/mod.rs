//! Application layer for the configuration store.
//!
//! - **`slot`**   – The `DurableSlot` collaborator trait and its read/write
//!   failure types.  Infrastructure provides the implementations.
//! - **`config_store`** – `ConfigStore`: the in-memory record, its one-shot
//!   initial load, and the update/reset operations that persist on every
//!   change.

pub mod config_store;
pub mod slot;

pub use config_store::{ConfigStore, StoreState, CONFIG_SLOT_KEY};
pub use slot::{DurableSlot, ReadFailure, WriteFailure};
