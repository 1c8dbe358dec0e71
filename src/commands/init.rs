//! Implementation of the `plume init` command.
//!
//! Creates the data directory layout and writes the default config with
//! the shipped profiles. Running against an existing store is harmless:
//! an existing config is never overwritten.

use crate::config::Config;
use crate::context::StorageContext;
use crate::error::Result;
use crate::events::{Event, EventAction, append_event_best_effort};
use crate::fs::atomic_write_file;
use serde_json::json;

/// Execute the `plume init` command.
pub fn cmd_init() -> Result<()> {
    let ctx = StorageContext::resolve()?;
    ctx.ensure_dirs()?;

    let config_path = ctx.config_path();
    if config_path.exists() {
        println!("Store already initialized at {}", ctx.data_dir.display());
        println!();
        println!("  Config: {}", config_path.display());
        return Ok(());
    }

    let config = Config::default();
    atomic_write_file(&config_path, &config.to_yaml()?)?;

    let event = Event::new(EventAction::Init)
        .with_details(json!({ "data_dir": ctx.data_dir.display().to_string() }));
    append_event_best_effort(&ctx, &event);

    println!("Initialized plume store at {}", ctx.data_dir.display());
    println!();
    println!("  Config:   {}", config_path.display());
    println!(
        "  Profiles: {} (default), composer, storyteller",
        config.default_profile
    );
    println!();
    println!("Next steps:");
    println!("  1. Export your credential: export {}=...", config.api_key_env);
    println!("  2. Run `plume generate \"your topic\"` to create a post");

    Ok(())
}
