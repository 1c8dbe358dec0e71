//! In-flight generation lock.
//!
//! The UI affordance of the original component disabled the generate button
//! while a request was in flight but never enforced mutual exclusion at the
//! data layer. Here the guard is explicit: `generate` takes a lock file
//! before issuing the request, so a second invocation started while one is
//! outstanding fails fast instead of racing on the store.
//!
//! The lock is a file created with `create_new` (atomic on all supported
//! platforms) containing JSON metadata about the holder. A lock older than
//! the configured staleness threshold is assumed to belong to a crashed run
//! and is replaced.

use crate::context::StorageContext;
use crate::error::{PlumeError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Metadata stored in the lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockMetadata {
    /// Owner of the lock (e.g., `user@HOST`).
    pub owner: String,

    /// Process ID of the lock holder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Timestamp when the lock was created (RFC3339).
    pub created_at: DateTime<Utc>,

    /// The action being performed (currently always "generate").
    pub action: String,
}

impl LockMetadata {
    /// Create new lock metadata stamped with the current time.
    pub fn new(action: &str) -> Self {
        Self {
            owner: owner_string(),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
            action: action.to_string(),
        }
    }

    /// Parse lock metadata from a lock file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            PlumeError::LockError(format!(
                "failed to read lock file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            PlumeError::LockError(format!(
                "failed to parse lock file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// Age of the lock.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Whether the lock exceeds the staleness threshold.
    pub fn is_stale(&self, stale_minutes: u32) -> bool {
        self.age() > Duration::minutes(i64::from(stale_minutes))
    }
}

/// Get the owner string for lock metadata.
fn owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// RAII guard for the generation lock. Dropping the guard removes the
/// lock file; a failed removal only warns.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
    released: bool,
}

impl LockGuard {
    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Manually release the lock, reporting removal errors.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        fs::remove_file(&self.path).map_err(|e| {
            PlumeError::LockError(format!(
                "failed to remove lock file '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            eprintln!(
                "Warning: failed to remove lock file '{}': {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Acquire the in-flight generation lock.
///
/// # Arguments
///
/// * `ctx` - The storage context
/// * `stale_minutes` - Threshold after which an existing lock is replaced
/// * `action` - The action recorded in the lock metadata
///
/// # Returns
///
/// * `Ok(LockGuard)` - The lock was acquired
/// * `Err(PlumeError::LockError)` - Another generation holds a fresh lock
pub fn acquire_generation_lock(
    ctx: &StorageContext,
    stale_minutes: u32,
    action: &str,
) -> Result<LockGuard> {
    let locks_dir = ctx.locks_dir();
    fs::create_dir_all(&locks_dir).map_err(|e| {
        PlumeError::LockError(format!(
            "failed to create locks directory '{}': {}",
            locks_dir.display(),
            e
        ))
    })?;

    let path = ctx.generate_lock_path();

    match try_create(&path, action)? {
        Some(guard) => Ok(guard),
        None => {
            // Lock file exists. Replace it only if its holder looks dead.
            let metadata = LockMetadata::from_file(&path)?;
            if !metadata.is_stale(stale_minutes) {
                return Err(PlumeError::LockError(format!(
                    "a generation is already in flight (started {} minute(s) ago by {}).\n\
                     If that run crashed, remove '{}' or wait for the lock to go stale.",
                    metadata.age().num_minutes(),
                    metadata.owner,
                    path.display()
                )));
            }

            eprintln!(
                "Warning: replacing stale generation lock held by {} ({} minutes old)",
                metadata.owner,
                metadata.age().num_minutes()
            );
            fs::remove_file(&path).map_err(|e| {
                PlumeError::LockError(format!(
                    "failed to remove stale lock '{}': {}",
                    path.display(),
                    e
                ))
            })?;

            try_create(&path, action)?.ok_or_else(|| {
                PlumeError::LockError(
                    "another generation grabbed the lock while replacing a stale one".to_string(),
                )
            })
        }
    }
}

/// Attempt to create the lock file exclusively. Returns `Ok(None)` when it
/// already exists.
fn try_create(path: &Path, action: &str) -> Result<Option<LockGuard>> {
    let metadata = LockMetadata::new(action);
    let content = serde_json::to_string_pretty(&metadata)
        .map_err(|e| PlumeError::LockError(format!("failed to serialize lock metadata: {}", e)))?;

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(content.as_bytes()).map_err(|e| {
                let _ = fs::remove_file(path);
                PlumeError::LockError(format!(
                    "failed to write lock file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            Ok(Some(LockGuard {
                path: path.to_path_buf(),
                released: false,
            }))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(PlumeError::LockError(format!(
            "failed to create lock file '{}': {}",
            path.display(),
            e
        ))),
    }
}
