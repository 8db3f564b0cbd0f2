//! Infrastructure layer for the configuration store.
//!
//! Contains the OS-facing slot implementations and the command bridge used by
//! presentation code.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `debate_core`, but MUST NOT be imported by the `application` layer outside
//! of tests.

pub mod storage;
pub mod ui_bridge;
