//! Shared helpers for command tests.

use crate::context::{DATA_DIR_ENV, StorageContext};
use std::path::Path;
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Points `PLUME_DATA_DIR` at a fresh temporary directory for the lifetime
/// of the guard, restoring the previous value on drop.
pub(crate) struct DataDirGuard {
    temp: TempDir,
    previous: Option<String>,
    _lock: MutexGuard<'static, ()>,
}

impl DataDirGuard {
    pub(crate) fn new() -> Self {
        // Mutating the process environment is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = ENV_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let temp = TempDir::new().unwrap();
        let previous = std::env::var(DATA_DIR_ENV).ok();
        unsafe {
            std::env::set_var(DATA_DIR_ENV, temp.path());
        }
        Self {
            temp,
            previous,
            _lock: lock,
        }
    }

    /// The temporary data directory.
    #[allow(dead_code)]
    pub(crate) fn path(&self) -> &Path {
        self.temp.path()
    }

    /// A storage context rooted at the temporary data directory, matching
    /// what commands resolve from the environment.
    pub(crate) fn context(&self) -> StorageContext {
        StorageContext::from_dir(self.temp.path())
    }
}

impl Drop for DataDirGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.previous {
                Some(value) => std::env::set_var(DATA_DIR_ENV, value),
                None => std::env::remove_var(DATA_DIR_ENV),
            }
        }
    }
}
