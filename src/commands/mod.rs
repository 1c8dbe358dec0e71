//! Command implementations for plume.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Small commands live here; `generate`, `history`, and
//! `init` have their own modules.

mod generate;
mod history;
mod init;

use crate::cli::{Command, HistoryAction, HistoryCommand};
use crate::clipboard;
use crate::composer;
use crate::config::Config;
use crate::context::StorageContext;
use crate::error::{PlumeError, Result};
use crate::events::{Event, EventAction, append_event_best_effort};
use crate::store::PostStore;
use serde_json::json;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init => init::cmd_init(),
        Command::Generate(args) => generate::cmd_generate(args),
        Command::Show => cmd_show(),
        Command::Save => cmd_save(),
        Command::Copy => cmd_copy(),
        Command::Share => cmd_share(),
        Command::History(history_cmd) => dispatch_history(history_cmd),
        Command::Profiles => cmd_profiles(),
    }
}

/// Dispatch history subcommands.
fn dispatch_history(history_cmd: HistoryCommand) -> Result<()> {
    match history_cmd.action {
        HistoryAction::List => history::cmd_history_list(),
        HistoryAction::Clear(args) => history::cmd_history_clear(args),
    }
}

/// Load the store and return the current post, or a helpful error.
fn require_current_post(ctx: &StorageContext) -> Result<(PostStore, String)> {
    let store = PostStore::load(ctx);
    match store.current.clone() {
        Some(post) => Ok((store, post)),
        None => Err(PlumeError::UserError(
            "no current post. Run `plume generate` first.".to_string(),
        )),
    }
}

fn cmd_show() -> Result<()> {
    let ctx = StorageContext::resolve()?;
    let (_store, post) = require_current_post(&ctx)?;
    println!("{}", post);
    Ok(())
}

fn cmd_save() -> Result<()> {
    let ctx = StorageContext::resolve()?;
    let (mut store, post) = require_current_post(&ctx)?;

    store.prepend(&post);
    store.save()?;

    let event = Event::new(EventAction::Save)
        .with_details(json!({ "history_len": store.history.len() }));
    append_event_best_effort(&ctx, &event);

    println!(
        "Saved the current post to history ({} post(s)).",
        store.history.len()
    );
    Ok(())
}

fn cmd_copy() -> Result<()> {
    let ctx = StorageContext::resolve()?;
    let (_store, post) = require_current_post(&ctx)?;

    clipboard::copy_to_clipboard(&post)?;

    let event = Event::new(EventAction::Copy)
        .with_details(json!({ "chars": post.chars().count() }));
    append_event_best_effort(&ctx, &event);

    println!("Copied the current post to the clipboard.");
    Ok(())
}

fn cmd_share() -> Result<()> {
    let ctx = StorageContext::resolve()?;
    let (_store, post) = require_current_post(&ctx)?;

    let url = composer::share_url(&post);
    open::that(&url).map_err(|e| {
        PlumeError::UserError(format!("failed to open the share URL in a browser: {}", e))
    })?;

    let event = Event::new(EventAction::Share).with_details(json!({ "url_len": url.len() }));
    append_event_best_effort(&ctx, &event);

    println!("Opened the share URL:");
    println!("  {}", url);
    Ok(())
}

fn cmd_profiles() -> Result<()> {
    let ctx = StorageContext::resolve()?;
    let config = Config::load_or_default(ctx.config_path())?;

    println!("Configured profiles ({}):", config.profiles.len());
    println!();

    for (name, profile) in &config.profiles {
        let default_marker = if *name == config.default_profile {
            " (default)"
        } else {
            ""
        };
        println!("  {}{}:", name, default_marker);
        println!(
            "    Mode:               {}",
            if profile.scenario_mode {
                "scenario"
            } else {
                "topic"
            }
        );
        println!(
            "    History:            {}",
            if profile.history { "enabled" } else { "disabled" }
        );
        println!(
            "    Custom instruction: {}",
            if profile.custom_system_instruction {
                "allowed"
            } else {
                "ignored"
            }
        );
        println!("    Temperature:        {}", profile.temperature);
        if profile.user_template.is_some() {
            println!("    User template:      overridden");
        }
        println!();
    }

    if ctx.config_path().exists() {
        println!("Config: {}", ctx.config_path().display());
    } else {
        println!(
            "Config: built-in defaults (run `plume init` to write {})",
            ctx.config_path().display()
        );
    }

    Ok(())
}
