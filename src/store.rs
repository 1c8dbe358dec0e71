//! Persistent store for the current post and the post history.
//!
//! Two entries back the composer across invocations, mirroring the two
//! storage keys of the original component:
//!
//! - `history.json` - a JSON array of post strings, newest first, unbounded
//! - `current_post.txt` - the plain text of the most recent post
//!
//! The store is read once at the start of a command and written back after
//! every mutation. Loss of history is non-critical: unreadable or corrupt
//! files are reported on stderr and treated as empty rather than aborting
//! the command.

use crate::context::StorageContext;
use crate::error::Result;
use crate::fs::atomic_write_file;
use std::path::PathBuf;

/// In-memory view of the persisted composer state.
#[derive(Debug, Clone)]
pub struct PostStore {
    history_path: PathBuf,
    current_path: PathBuf,

    /// Past posts, newest first.
    pub history: Vec<String>,
    /// The most recent post, if any.
    pub current: Option<String>,
}

impl PostStore {
    /// Load the store from disk. Missing files yield an empty store.
    pub fn load(ctx: &StorageContext) -> Self {
        let history_path = ctx.history_path();
        let current_path = ctx.current_post_path();

        let history = match std::fs::read_to_string(&history_path) {
            Ok(content) => match serde_json::from_str::<Vec<String>>(&content) {
                Ok(list) => list,
                Err(e) => {
                    eprintln!(
                        "Warning: ignoring corrupt history file '{}': {}",
                        history_path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                eprintln!(
                    "Warning: could not read history file '{}': {}",
                    history_path.display(),
                    e
                );
                Vec::new()
            }
        };

        let current = match std::fs::read_to_string(&current_path) {
            Ok(content) if !content.is_empty() => Some(content),
            Ok(_) => None,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                eprintln!(
                    "Warning: could not read current post '{}': {}",
                    current_path.display(),
                    e
                );
                None
            }
        };

        Self {
            history_path,
            current_path,
            history,
            current,
        }
    }

    /// Write both entries back to disk atomically.
    pub fn save(&self) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.history).map_err(|e| {
            crate::error::PlumeError::UserError(format!("failed to serialize history: {}", e))
        })?;
        atomic_write_file(&self.history_path, &serialized)?;
        atomic_write_file(&self.current_path, self.current.as_deref().unwrap_or(""))?;
        Ok(())
    }

    /// Prepend a post to the in-memory history (newest first).
    pub fn prepend(&mut self, post: &str) {
        self.history.insert(0, post.to_string());
    }

    /// Empty the in-memory history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
