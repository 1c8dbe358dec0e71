//! Atomic file writes.
//!
//! Strategy: write the content to a temporary file in the same directory,
//! fsync it, then rename it over the target. On POSIX the rename is atomic;
//! on Windows an existing target is removed first, which narrows but does
//! not fully close the replacement window. Source and target must live on
//! the same filesystem. On a crash a stray `.{name}.tmp` file may remain.

use crate::error::{PlumeError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            PlumeError::UserError(format!(
                "failed to create parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;

    // Write and sync the temporary file.
    let write_result = (|| -> std::io::Result<()> {
        let mut file = File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()
    })();

    if let Err(e) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(PlumeError::UserError(format!(
            "failed to write temporary file '{}': {}",
            temp_path.display(),
            e
        )));
    }

    replace(&temp_path, path)?;

    // Sync the parent directory so the rename itself is durable.
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Temporary file path next to the target: `.{name}.tmp`.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let name = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PlumeError::UserError("invalid file path".to_string()))?;
    Ok(parent.join(format!(".{}.tmp", name)))
}

#[cfg(unix)]
fn replace(source: &Path, target: &Path) -> Result<()> {
    // rename() replaces the destination atomically on POSIX.
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        PlumeError::UserError(format!(
            "failed to replace '{}': {}",
            target.display(),
            e
        ))
    })
}

#[cfg(windows)]
fn replace(source: &Path, target: &Path) -> Result<()> {
    // rename() fails on an existing destination on Windows; remove it first.
    if target.exists() {
        fs::remove_file(target).map_err(|e| {
            let _ = fs::remove_file(source);
            PlumeError::UserError(format!(
                "failed to remove '{}' before replace: {}",
                target.display(),
                e
            ))
        })?;
    }
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        PlumeError::UserError(format!(
            "failed to replace '{}': {}",
            target.display(),
            e
        ))
    })
}
