//! Audit event logging for plume.
//!
//! State-changing commands append one event per action to an NDJSON log
//! (`events/events.ndjson` in the data directory). Each event is a JSON
//! object with the fields:
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: the action performed (init, generate, save, ...)
//! - `actor`: the owner string (`user@HOST`)
//! - `profile`: optional profile name for generation events
//! - `details`: freeform object with action-specific details
//!
//! Appends are best-effort from the caller's point of view: commands that
//! have already completed their user-visible effect warn on a failed append
//! rather than undoing the action.

use crate::context::StorageContext;
use crate::error::{PlumeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Store initialized
    Init,
    /// Post generated (or generation failed)
    Generate,
    /// Current post explicitly saved to history
    Save,
    /// History emptied
    ClearHistory,
    /// Current post copied to the clipboard
    Copy,
    /// Share URL opened
    Share,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventAction::Init => "init",
            EventAction::Generate => "generate",
            EventAction::Save => "save",
            EventAction::ClearHistory => "clear_history",
            EventAction::Copy => "copy",
            EventAction::Share => "share",
        };
        f.write_str(name)
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Profile that was active, for generation-related events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action, stamped with the current
    /// time and the `USER@HOSTNAME` actor string.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            profile: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the active profile for this event.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| PlumeError::UserError(format!("failed to serialize event: {}", e)))
    }
}

/// Get the actor string for event metadata.
fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event to the audit log, creating the events directory and
/// file as needed.
pub fn append_event(ctx: &StorageContext, event: &Event) -> Result<()> {
    let line = event.to_ndjson_line()?;

    let events_dir = ctx.events_dir();
    if !events_dir.exists() {
        fs::create_dir_all(&events_dir).map_err(|e| {
            PlumeError::UserError(format!(
                "failed to create events directory '{}': {}",
                events_dir.display(),
                e
            ))
        })?;
    }

    let events_file = ctx.events_file();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            PlumeError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", line).map_err(|e| {
        PlumeError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        PlumeError::UserError(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// Append an event, downgrading failures to a stderr warning.
///
/// Used after the user-visible effect of a command has already happened.
pub fn append_event_best_effort(ctx: &StorageContext, event: &Event) {
    if let Err(e) = append_event(ctx, event) {
        eprintln!("Warning: failed to log {} event: {}", event.action, e);
    }
}
