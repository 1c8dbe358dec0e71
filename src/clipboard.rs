//! Best-effort system clipboard integration.
//!
//! The post text is piped into the platform clipboard command. On Linux
//! several candidates are tried in order since no single tool is
//! universally installed.

use crate::error::{PlumeError, Result};
use std::io::Write;
use std::process::{Command, Stdio};

#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[&["pbcopy"]];

#[cfg(target_os = "windows")]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[&["clip"]];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];

/// Copy text to the system clipboard.
///
/// Tries each candidate command until one succeeds. Returns a user error
/// naming every attempt when none of them works.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut failures = Vec::new();

    for command in CLIPBOARD_COMMANDS {
        match pipe_into(command, text) {
            Ok(()) => return Ok(()),
            Err(e) => failures.push(format!("{}: {}", command[0], e)),
        }
    }

    Err(PlumeError::UserError(format!(
        "could not copy to the clipboard ({})",
        failures.join("; ")
    )))
}

/// Spawn a command and write `text` to its stdin.
fn pipe_into(command: &[&str], text: &str) -> std::io::Result<()> {
    let mut child = Command::new(command[0])
        .args(&command[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!(
            "exited with status {}",
            status
        )))
    }
}
