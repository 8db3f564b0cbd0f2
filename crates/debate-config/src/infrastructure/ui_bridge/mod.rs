//! Command bridge: exposes the configuration store to presentation code.
//!
//! Every command is an `async fn` taking the shared [`AppState`] and returning
//! a [`CommandResult`], so a UI shell (desktop webview, CLI, test harness)
//! gets the same `{ success, data, error }` shape from every call and never
//! has to handle a Rust error type.
//!
//! # Data Transfer Objects
//!
//! [`ConfigDto`] and [`ConfigPatchDto`] carry only JSON-friendly fields:
//! `difficulty` travels as a lower-case string and is validated on the way
//! in.  Any change here must be mirrored by the front end's types.
//!
//! # Initial load
//!
//! [`initialize`] spawns the one-shot load on the Tokio runtime and returns
//! immediately, so the first render sees the defaults and `is_loaded ==
//! false` until the task completes.

use std::sync::Arc;

use debate_core::{ConfigPatch, DebateConfig, Difficulty, FieldError, FieldValue};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::application::{ConfigStore, DurableSlot};

// ── Shared application state ──────────────────────────────────────────────────

/// State shared between command invocations.
///
/// The store sits behind an async Tokio mutex so commands running on the
/// runtime suspend rather than block while another command holds it.
pub struct AppState {
    pub store: Mutex<ConfigStore>,
}

impl AppState {
    /// Builds state around a fresh, uninitialized store writing to `slot`.
    pub fn new(slot: Arc<dyn DurableSlot>) -> Arc<Self> {
        Self::from_store(ConfigStore::new(slot))
    }

    pub fn from_store(store: ConfigStore) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
        })
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// The configuration record as returned to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDto {
    pub topic: String,
    pub difficulty: String,
    pub rounds: u32,
}

impl From<&DebateConfig> for ConfigDto {
    fn from(cfg: &DebateConfig) -> Self {
        Self {
            topic: cfg.topic.clone(),
            difficulty: cfg.difficulty.to_string(),
            rounds: cfg.rounds,
        }
    }
}

/// A partial update sent by the UI.  Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPatchDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
}

impl TryFrom<ConfigPatchDto> for ConfigPatch {
    type Error = FieldError;

    fn try_from(dto: ConfigPatchDto) -> Result<Self, Self::Error> {
        Ok(ConfigPatch {
            topic: dto.topic,
            difficulty: dto
                .difficulty
                .as_deref()
                .map(str::parse::<Difficulty>)
                .transpose()?,
            rounds: dto.rounds,
        })
    }
}

/// Unified response wrapper used by every command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Spawns the one-shot initial load.  Must be called from within a Tokio
/// runtime.
///
/// The returned handle resolves to the loaded record; callers that only care
/// about the side effect may drop it.
pub fn initialize(state: Arc<AppState>) -> JoinHandle<ConfigDto> {
    tokio::spawn(async move {
        let mut store = state.store.lock().await;
        ConfigDto::from(&store.initialize())
    })
}

/// Returns the current record.
///
/// # Example (frontend)
/// ```ts
/// const cfg = await invoke<CommandResult<ConfigDto>>('get_config');
/// ```
pub async fn get_config(state: Arc<AppState>) -> CommandResult<ConfigDto> {
    let store = state.store.lock().await;
    CommandResult::ok(ConfigDto::from(store.config()))
}

/// Merges a partial update and returns the merged record.
///
/// An invalid difficulty string rejects the whole patch; nothing is written.
pub async fn update_config(
    state: Arc<AppState>,
    patch: ConfigPatchDto,
) -> CommandResult<ConfigDto> {
    let patch = match ConfigPatch::try_from(patch) {
        Ok(p) => p,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    let mut store = state.store.lock().await;
    let merged = store.update_config(&patch);
    CommandResult::ok(ConfigDto::from(&merged))
}

/// Updates one field named by `key`, parsing `value` for that field.
pub async fn update_field(
    state: Arc<AppState>,
    key: String,
    value: String,
) -> CommandResult<ConfigDto> {
    let value = match FieldValue::parse_key(&key, &value) {
        Ok(v) => v,
        Err(e) => {
            warn!("rejected field update {key:?}: {e}");
            return CommandResult::err(e.to_string());
        }
    };

    let mut store = state.store.lock().await;
    let merged = store.update_field(value);
    CommandResult::ok(ConfigDto::from(&merged))
}

/// Restores and returns the defaults.
pub async fn reset_config(state: Arc<AppState>) -> CommandResult<ConfigDto> {
    let mut store = state.store.lock().await;
    let defaults = store.reset_config();
    CommandResult::ok(ConfigDto::from(&defaults))
}

/// Whether the initial load has completed.
pub async fn is_loaded(state: Arc<AppState>) -> CommandResult<bool> {
    let store = state.store.lock().await;
    CommandResult::ok(store.is_loaded())
}

/// The last write failure as a message, or `None` if the latest write
/// succeeded.  The UI may show it as a non-blocking warning.
pub async fn get_write_warning(state: Arc<AppState>) -> CommandResult<Option<String>> {
    let store = state.store.lock().await;
    CommandResult::ok(store.last_write_failure().map(ToString::to_string))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
