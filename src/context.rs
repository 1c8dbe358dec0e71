//! Storage directory resolution for plume.
//!
//! All durable state (config, current post, post history, audit events,
//! locks) lives in one per-user data directory. Commands resolve that
//! directory through this module so every invocation targets the same
//! store regardless of the working directory.
//!
//! Resolution order:
//! 1. `PLUME_DATA_DIR` environment variable, if set and non-empty
//! 2. The platform data directory (e.g. `~/.local/share`) joined with `plume`

use crate::error::{PlumeError, Result};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the storage directory.
pub const DATA_DIR_ENV: &str = "PLUME_DATA_DIR";

/// Directory name under the platform data dir.
pub const DEFAULT_APP_DIR: &str = "plume";

/// Resolved paths for the plume store.
///
/// All paths are derived from a single data directory.
#[derive(Debug, Clone)]
pub struct StorageContext {
    /// Absolute path to the data directory.
    pub data_dir: PathBuf,
}

impl StorageContext {
    /// Resolve the storage context from the environment.
    ///
    /// # Returns
    ///
    /// * `Ok(StorageContext)` - Successfully resolved context
    /// * `Err(PlumeError::UserError)` - If no data directory can be determined
    pub fn resolve() -> Result<Self> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV)
            && !dir.trim().is_empty()
        {
            return Ok(Self::from_dir(dir));
        }

        let base = dirs::data_dir().ok_or_else(|| {
            PlumeError::UserError(format!(
                "could not determine the platform data directory.\n\
                 Set {} to choose a storage location explicitly.",
                DATA_DIR_ENV
            ))
        })?;

        Ok(Self::from_dir(base.join(DEFAULT_APP_DIR)))
    }

    /// Build a storage context rooted at a specific directory.
    ///
    /// This is useful for testing or when the directory is already known.
    pub fn from_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            data_dir: dir.into(),
        }
    }

    /// Create the data directory and its subdirectories if missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.data_dir, &self.events_dir(), &self.locks_dir()] {
            std::fs::create_dir_all(dir).map_err(|e| {
                PlumeError::UserError(format!(
                    "failed to create storage directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.yaml")
    }

    /// Get the path to the persisted post history.
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("history.json")
    }

    /// Get the path to the persisted current post.
    pub fn current_post_path(&self) -> PathBuf {
        self.data_dir.join("current_post.txt")
    }

    /// Get the path to the events directory.
    pub fn events_dir(&self) -> PathBuf {
        self.data_dir.join("events")
    }

    /// Get the path to the audit events log file.
    pub fn events_file(&self) -> PathBuf {
        self.events_dir().join("events.ndjson")
    }

    /// Get the path to the locks directory.
    pub fn locks_dir(&self) -> PathBuf {
        self.data_dir.join("locks")
    }

    /// Get the path to the in-flight generation lock file.
    pub fn generate_lock_path(&self) -> PathBuf {
        self.locks_dir().join("generate.lock")
    }

    /// Check whether the store has been initialized on disk.
    pub fn exists(&self) -> bool {
        self.data_dir.exists()
    }
}

impl AsRef<Path> for StorageContext {
    fn as_ref(&self) -> &Path {
        &self.data_dir
    }
}
