//! File-backed durable slot.
//!
//! Each key maps to `<dir>/<key>.toml`.  The default directory is
//! platform-appropriate:
//! - Windows:  `%APPDATA%\DebateRoom`
//! - Linux:    `$XDG_CONFIG_HOME/debate-room` or `~/.config/debate-room`
//! - macOS:    `~/Library/Application Support/DebateRoom`
//!
//! A missing file is a slot that was never written.  Writing creates the
//! directory first.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::application::slot::{DurableSlot, ReadFailure, WriteFailure};

/// File extension used for slot files.
const SLOT_EXTENSION: &str = "toml";

/// Error returned when no default slot directory can be derived.
#[derive(Debug, Error)]
pub enum SlotDirError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,
}

/// Determines the platform-appropriate directory for slot files.
///
/// # Errors
///
/// Returns [`SlotDirError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn default_slot_dir() -> Result<PathBuf, SlotDirError> {
    platform_config_dir().ok_or(SlotDirError::NoPlatformConfigDir)
}

/// Stores each key as a TOML file in one directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Creates a slot rooted at `dir`.  The directory need not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a slot rooted at [`default_slot_dir`].
    ///
    /// # Errors
    ///
    /// Returns [`SlotDirError::NoPlatformConfigDir`] if the base directory
    /// cannot be determined.
    pub fn platform_default() -> Result<Self, SlotDirError> {
        Ok(Self::new(default_slot_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{SLOT_EXTENSION}"))
    }
}

impl DurableSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, ReadFailure> {
        let path = self.path_for(key);

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), "slot read");
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ReadFailure::Io {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }

    fn write(&self, key: &str, serialized: &str) -> Result<(), WriteFailure> {
        std::fs::create_dir_all(&self.dir).map_err(|source| WriteFailure::Io {
            key: key.to_string(),
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(key);
        std::fs::write(&path, serialized).map_err(|source| WriteFailure::Io {
            key: key.to_string(),
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = serialized.len(), "slot written");
        Ok(())
    }
}

/// Resolves the platform config directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("DebateRoom"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("debate-room"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("DebateRoom")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
