//! ConfigStore: the in-memory debate configuration and its durable mirror.
//!
//! # Lifecycle
//!
//! ```text
//! new()  ──►  Uninitialized  ──initialize()──►  Loaded
//!               (defaults)                   (durable copy)
//! ```
//!
//! The store starts with [`DebateConfig::default()`] so presentation code can
//! render before storage has been read.  The first call to
//! [`ConfigStore::initialize`] replaces the record with the durable copy and
//! moves the store to [`StoreState::Loaded`]; later calls do nothing.
//!
//! # Failure handling
//!
//! No operation returns an error or panics.  A failed read falls back to the
//! defaults; a failed write is logged and kept in
//! [`ConfigStore::last_write_failure`] until the next successful write.  The
//! `try_load` / `try_save` variants expose the underlying `Result` for callers
//! that want to decide for themselves.
//!
//! Every update writes the full merged record immediately.

use std::sync::Arc;

use debate_core::{decode_config, encode_config, ConfigPatch, DebateConfig, FieldValue};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::application::slot::{DurableSlot, ReadFailure, WriteFailure};

/// Fixed key under which the record is persisted.
pub const CONFIG_SLOT_KEY: &str = "debate-config";

/// Whether the initial load has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Holding defaults; the durable slot has not been read yet.
    Uninitialized,
    /// The initial load ran once.  Never reverts.
    Loaded,
}

/// Owns the current [`DebateConfig`] and keeps the durable slot in sync.
pub struct ConfigStore {
    slot: Arc<dyn DurableSlot>,
    key: String,
    config: DebateConfig,
    state: StoreState,
    last_write_failure: Option<WriteFailure>,
    changes: watch::Sender<DebateConfig>,
}

impl ConfigStore {
    /// Creates an uninitialized store persisting under [`CONFIG_SLOT_KEY`].
    pub fn new(slot: Arc<dyn DurableSlot>) -> Self {
        Self::with_key(slot, CONFIG_SLOT_KEY)
    }

    /// Creates an uninitialized store persisting under a custom key.
    pub fn with_key(slot: Arc<dyn DurableSlot>, key: impl Into<String>) -> Self {
        let config = DebateConfig::default();
        let (changes, _) = watch::channel(config.clone());
        Self {
            slot,
            key: key.into(),
            config,
            state: StoreState::Uninitialized,
            last_write_failure: None,
            changes,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    /// `false` until [`initialize`](Self::initialize) has run once.
    pub fn is_loaded(&self) -> bool {
        self.state == StoreState::Loaded
    }

    /// The current in-memory record.
    pub fn config(&self) -> &DebateConfig {
        &self.config
    }

    /// Returns a receiver that observes every change to the record.
    pub fn subscribe(&self) -> watch::Receiver<DebateConfig> {
        self.changes.subscribe()
    }

    /// The most recent write failure, cleared by the next successful write.
    pub fn last_write_failure(&self) -> Option<&WriteFailure> {
        self.last_write_failure.as_ref()
    }

    // ── Durable slot access ───────────────────────────────────────────────────

    /// Reads the durable record.  A slot that was never written yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns the slot's [`ReadFailure`], or [`ReadFailure::Corrupt`] when the
    /// stored text does not decode.
    pub fn try_load(&self) -> Result<DebateConfig, ReadFailure> {
        match self.slot.read(&self.key)? {
            None => Ok(DebateConfig::default()),
            Some(text) => decode_config(&text).map_err(|source| ReadFailure::Corrupt {
                key: self.key.clone(),
                source,
            }),
        }
    }

    /// Reads the durable record, falling back to the defaults on any failure.
    ///
    /// Does not touch the in-memory record.
    pub fn load(&self) -> DebateConfig {
        self.try_load().unwrap_or_else(|e| {
            warn!(key = %self.key, "config read failed, using defaults: {e}");
            DebateConfig::default()
        })
    }

    /// Writes `config` to the durable slot, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns [`WriteFailure::Encode`] if the record cannot be serialized, or
    /// the slot's own [`WriteFailure`].
    pub fn try_save(&self, config: &DebateConfig) -> Result<(), WriteFailure> {
        let text = encode_config(config)?;
        self.slot.write(&self.key, &text)
    }

    /// Best-effort write of `config`.  A failure is logged and remembered in
    /// [`last_write_failure`](Self::last_write_failure).
    pub fn save(&mut self, config: &DebateConfig) {
        match self.try_save(config) {
            Ok(()) => {
                debug!(key = %self.key, "config saved");
                self.last_write_failure = None;
            }
            Err(e) => {
                warn!(key = %self.key, "config write failed, change kept in memory only: {e}");
                self.last_write_failure = Some(e);
            }
        }
    }

    // ── Operations used by presentation code ─────────────────────────────────

    /// Performs the one-shot initial load.
    ///
    /// In [`StoreState::Uninitialized`] this replaces the in-memory record with
    /// the durable copy (or the defaults) and notifies subscribers.  Once
    /// loaded it returns the current record without reading again.
    pub fn initialize(&mut self) -> DebateConfig {
        if self.state == StoreState::Loaded {
            return self.config.clone();
        }

        self.config = self.load();
        self.state = StoreState::Loaded;
        info!(key = %self.key, rounds = self.config.rounds, "config loaded");
        self.publish();
        self.config.clone()
    }

    /// Shallow-merges `patch` onto the current record, persists the result and
    /// returns it.
    pub fn update_config(&mut self, patch: &ConfigPatch) -> DebateConfig {
        let merged = self.config.merge(patch);
        debug!(key = %self.key, ?patch, "merging config patch");
        self.replace(merged)
    }

    /// Updates a single field.  Equivalent to a one-field
    /// [`update_config`](Self::update_config).
    pub fn update_field(&mut self, value: FieldValue) -> DebateConfig {
        self.update_config(&ConfigPatch::from(value))
    }

    /// Restores the defaults, persists them and returns them.
    pub fn reset_config(&mut self) -> DebateConfig {
        info!(key = %self.key, "resetting config to defaults");
        self.replace(DebateConfig::default())
    }

    fn replace(&mut self, config: DebateConfig) -> DebateConfig {
        self.config = config.clone();
        self.save(&config);
        self.publish();
        config
    }

    fn publish(&self) {
        // send_replace succeeds even when nobody is subscribed.
        self.changes.send_replace(self.config.clone());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::slot::MockDurableSlot;
    use crate::infrastructure::storage::memory::MemorySlot;
    use debate_core::{ConfigField, Difficulty};
    use mockall::predicate::eq;

    fn make_store() -> (Arc<MemorySlot>, ConfigStore) {
        let slot = Arc::new(MemorySlot::new());
        let store = ConfigStore::new(Arc::clone(&slot) as Arc<dyn DurableSlot>);
        (slot, store)
    }

    fn sample() -> DebateConfig {
        DebateConfig {
            topic: "Social media does more harm than good".to_string(),
            difficulty: Difficulty::Hard,
            rounds: 6,
        }
    }

    // ── Initial state ─────────────────────────────────────────────────────────

    #[test]
    fn test_new_store_is_uninitialized_with_defaults() {
        let (_slot, store) = make_store();

        assert_eq!(store.state(), StoreState::Uninitialized);
        assert!(!store.is_loaded());
        assert_eq!(store.config(), &DebateConfig::default());
        assert_eq!(store.key(), CONFIG_SLOT_KEY);
    }

    // ── load / save ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_from_never_written_slot_returns_defaults() {
        let (_slot, store) = make_store();
        assert_eq!(store.load(), DebateConfig::default());
    }

    #[test]
    fn test_save_then_load_returns_saved_record() {
        // Arrange
        let (_slot, mut store) = make_store();
        let cfg = sample();

        // Act
        store.save(&cfg);
        let loaded = store.load();

        // Assert
        assert_eq!(loaded, cfg);
        assert!(store.last_write_failure().is_none());
    }

    #[test]
    fn test_load_twice_without_save_returns_same_record() {
        let (slot, store) = make_store();
        slot.insert(CONFIG_SLOT_KEY, "topic = \"Tea over coffee\"\nrounds = 2\n");

        let first = store.load();
        let second = store.load();

        assert_eq!(first, second);
        assert_eq!(first.topic, "Tea over coffee");
    }

    #[test]
    fn test_load_does_not_change_in_memory_record() {
        let (slot, store) = make_store();
        slot.insert(CONFIG_SLOT_KEY, "rounds = 9\n");

        let _ = store.load();

        assert_eq!(store.config().rounds, 3);
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_load_corrupt_record_falls_back_to_defaults() {
        // Arrange
        let (slot, store) = make_store();
        slot.insert(CONFIG_SLOT_KEY, "[[[ definitely not toml");

        // Act
        let fallible = store.try_load();
        let loaded = store.load();

        // Assert
        assert!(matches!(fallible, Err(ReadFailure::Corrupt { .. })));
        assert_eq!(loaded, DebateConfig::default());
    }

    #[test]
    fn test_load_unavailable_slot_falls_back_to_defaults() {
        let (slot, store) = make_store();
        slot.insert(CONFIG_SLOT_KEY, "rounds = 9\n");
        slot.set_fail_reads(true);

        assert!(matches!(store.try_load(), Err(ReadFailure::Unavailable(_))));
        assert_eq!(store.load(), DebateConfig::default());
    }

    #[test]
    fn test_save_failure_is_recorded_not_propagated() {
        // Arrange
        let (slot, mut store) = make_store();
        slot.set_fail_writes(true);

        // Act
        store.save(&sample());

        // Assert
        assert!(matches!(
            store.last_write_failure(),
            Some(WriteFailure::Unavailable(_))
        ));
        assert!(slot.get(CONFIG_SLOT_KEY).is_none());
    }

    #[test]
    fn test_successful_save_clears_previous_write_failure() {
        let (slot, mut store) = make_store();
        slot.set_fail_writes(true);
        store.save(&sample());
        assert!(store.last_write_failure().is_some());

        slot.set_fail_writes(false);
        store.save(&sample());

        assert!(store.last_write_failure().is_none());
    }

    // ── initialize ────────────────────────────────────────────────────────────

    #[test]
    fn test_initialize_replaces_defaults_with_durable_copy() {
        // Arrange
        let (slot, mut store) = make_store();
        slot.insert(CONFIG_SLOT_KEY, "topic = \"Mars first\"\ndifficulty = \"easy\"\n");

        // Act
        let loaded = store.initialize();

        // Assert
        assert!(store.is_loaded());
        assert_eq!(loaded.topic, "Mars first");
        assert_eq!(loaded.difficulty, Difficulty::Easy);
        assert_eq!(loaded.rounds, 3, "missing field falls back to its default");
        assert_eq!(store.config(), &loaded);
    }

    #[test]
    fn test_initialize_with_unreadable_slot_still_transitions_to_loaded() {
        let (slot, mut store) = make_store();
        slot.set_fail_reads(true);

        let loaded = store.initialize();

        assert!(store.is_loaded());
        assert_eq!(loaded, DebateConfig::default());
    }

    #[test]
    fn test_initialize_runs_only_once() {
        // Arrange
        let (slot, mut store) = make_store();
        store.initialize();
        slot.insert(CONFIG_SLOT_KEY, "rounds = 11\n");

        // Act: second call must not re-read the slot
        let again = store.initialize();

        // Assert
        assert_eq!(again.rounds, 3);
        assert_eq!(store.state(), StoreState::Loaded);
    }

    #[test]
    fn test_initialize_does_not_write_to_slot() {
        let (slot, mut store) = make_store();
        store.initialize();
        assert_eq!(slot.write_count(), 0);
    }

    #[test]
    fn test_is_loaded_stays_true_after_reset() {
        let (_slot, mut store) = make_store();
        store.initialize();
        store.reset_config();
        assert!(store.is_loaded());
    }

    // ── update_config / update_field / reset_config ───────────────────────────

    #[test]
    fn test_update_field_rounds_scenario_then_reset() {
        // Arrange
        let (_slot, mut store) = make_store();
        store.initialize();

        // Act
        store.update_field(FieldValue::Rounds(5));

        // Assert
        assert_eq!(
            store.config(),
            &DebateConfig {
                topic: String::new(),
                difficulty: Difficulty::Medium,
                rounds: 5,
            }
        );

        // Act
        store.reset_config();

        // Assert
        assert_eq!(
            store.config(),
            &DebateConfig {
                topic: String::new(),
                difficulty: Difficulty::Medium,
                rounds: 3,
            }
        );
    }

    #[test]
    fn test_update_config_merges_and_persists() {
        // Arrange
        let (slot, mut store) = make_store();
        store.initialize();
        let patch = ConfigPatch {
            topic: Some("Nuclear power is green".to_string()),
            difficulty: Some(Difficulty::Hard),
            rounds: None,
        };

        // Act
        let merged = store.update_config(&patch);

        // Assert
        assert_eq!(merged.topic, "Nuclear power is green");
        assert_eq!(merged.difficulty, Difficulty::Hard);
        assert_eq!(merged.rounds, 3);
        assert_eq!(store.load(), merged, "durable copy must match memory");
        assert_eq!(slot.write_count(), 1);
    }

    #[test]
    fn test_every_update_writes_the_full_record() {
        let (slot, mut store) = make_store();
        store.update_field(FieldValue::Topic("A".to_string()));
        store.update_field(FieldValue::Rounds(4));
        store.update_config(&ConfigPatch::default());

        assert_eq!(slot.write_count(), 3);
        let stored = slot.get(CONFIG_SLOT_KEY).expect("record written");
        assert!(stored.contains("topic = \"A\""), "got:\n{stored}");
        assert!(stored.contains("difficulty = \"medium\""), "got:\n{stored}");
        assert!(stored.contains("rounds = 4"), "got:\n{stored}");
    }

    #[test]
    fn test_update_returns_merged_record_even_when_write_fails() {
        // Arrange
        let (slot, mut store) = make_store();
        slot.set_fail_writes(true);

        // Act
        let merged = store.update_field(FieldValue::Difficulty(Difficulty::Easy));

        // Assert
        assert_eq!(merged.difficulty, Difficulty::Easy);
        assert_eq!(store.config(), &merged);
        assert!(store.last_write_failure().is_some());
    }

    #[test]
    fn test_reset_yields_defaults_regardless_of_prior_state() {
        let (_slot, mut store) = make_store();
        store.update_config(&ConfigPatch {
            topic: Some("x".to_string()),
            difficulty: Some(Difficulty::Hard),
            rounds: Some(12),
        });

        let reset = store.reset_config();

        assert_eq!(reset, DebateConfig::default());
        assert_eq!(store.load(), DebateConfig::default());
    }

    #[test]
    fn test_update_field_matches_equivalent_patch() {
        let (_a_slot, mut a) = make_store();
        let (_b_slot, mut b) = make_store();

        let via_field = a.update_field(FieldValue::parse(ConfigField::Topic, "Cats").unwrap());
        let via_patch = b.update_config(&ConfigPatch {
            topic: Some("Cats".to_string()),
            ..Default::default()
        });

        assert_eq!(via_field, via_patch);
    }

    #[test]
    fn test_update_before_initialize_is_read_back_by_initial_load() {
        let (_slot, mut store) = make_store();
        store.update_field(FieldValue::Rounds(8));

        let loaded = store.initialize();

        assert_eq!(loaded.rounds, 8);
    }

    // ── Change notifications ──────────────────────────────────────────────────

    #[test]
    fn test_subscriber_observes_updates() {
        // Arrange
        let (_slot, mut store) = make_store();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        // Act
        store.update_field(FieldValue::Rounds(2));

        // Assert
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().rounds, 2);
    }

    #[test]
    fn test_subscriber_observes_initial_load() {
        let (slot, mut store) = make_store();
        slot.insert(CONFIG_SLOT_KEY, "topic = \"Loaded\"\n");
        let mut rx = store.subscribe();

        store.initialize();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().topic, "Loaded");
    }

    #[tokio::test]
    async fn test_subscriber_wakes_on_reset() {
        let (_slot, mut store) = make_store();
        store.update_field(FieldValue::Rounds(10));
        let mut rx = store.subscribe();

        store.reset_config();

        rx.changed().await.expect("sender still alive");
        assert_eq!(*rx.borrow(), DebateConfig::default());
    }

    // ── Exact collaborator calls ──────────────────────────────────────────────

    #[test]
    fn test_store_reads_and_writes_under_fixed_key() {
        // Arrange
        let mut slot = MockDurableSlot::new();
        slot.expect_read()
            .with(eq(CONFIG_SLOT_KEY))
            .times(1)
            .returning(|_| Ok(None));
        slot.expect_write()
            .withf(|key, text| key == CONFIG_SLOT_KEY && text.contains("rounds = 5"))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut store = ConfigStore::new(Arc::new(slot));

        // Act
        store.initialize();
        store.update_field(FieldValue::Rounds(5));

        // Assert: expectations are verified when the mock is dropped
        assert!(store.last_write_failure().is_none());
    }

    #[test]
    fn test_custom_key_is_passed_to_slot() {
        let mut slot = MockDurableSlot::new();
        slot.expect_read()
            .with(eq("profile-2"))
            .times(1)
            .returning(|_| Ok(Some("rounds = 1\n".to_string())));
        let store = ConfigStore::with_key(Arc::new(slot), "profile-2");

        assert_eq!(store.load().rounds, 1);
    }

    #[test]
    fn test_reset_writes_exactly_the_default_record() {
        let expected = encode_config(&DebateConfig::default()).unwrap();
        let mut slot = MockDurableSlot::new();
        slot.expect_write()
            .withf(move |_, text| text == expected)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut store = ConfigStore::new(Arc::new(slot));

        store.reset_config();
    }
}
