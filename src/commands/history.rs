//! Implementation of the `plume history` commands.

use crate::cli::HistoryClearArgs;
use crate::context::StorageContext;
use crate::error::{PlumeError, Result};
use crate::events::{Event, EventAction, append_event_best_effort};
use crate::store::PostStore;
use serde_json::json;

/// Execute the `plume history list` command.
pub fn cmd_history_list() -> Result<()> {
    let ctx = StorageContext::resolve()?;
    let store = PostStore::load(&ctx);

    if store.history.is_empty() {
        println!("No posts in history.");
        return Ok(());
    }

    println!(
        "Post history ({} post(s), newest first):",
        store.history.len()
    );
    println!();

    for (index, post) in store.history.iter().enumerate() {
        println!("[{}]", index + 1);
        println!("{}", post);
        println!();
    }

    Ok(())
}

/// Execute the `plume history clear` command.
pub fn cmd_history_clear(args: HistoryClearArgs) -> Result<()> {
    if !args.yes {
        return Err(PlumeError::UserError(
            "refusing to clear the history without --yes.\n\n\
             Clearing removes every saved post permanently.\n\
             To clear the history, run:\n  plume history clear --yes"
                .to_string(),
        ));
    }

    let ctx = StorageContext::resolve()?;
    let mut store = PostStore::load(&ctx);
    let removed = store.history.len();

    store.clear_history();
    store.save()?;

    let event = Event::new(EventAction::ClearHistory).with_details(json!({ "removed": removed }));
    append_event_best_effort(&ctx, &event);

    println!("Cleared {} post(s) from history.", removed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::DataDirGuard;
    use serial_test::serial;

    #[test]
    #[serial]
    fn list_succeeds_on_an_empty_store() {
        let _guard = DataDirGuard::new();
        cmd_history_list().unwrap();
    }

    #[test]
    #[serial]
    fn clear_refuses_without_yes() {
        let guard = DataDirGuard::new();
        let ctx = guard.context();
        ctx.ensure_dirs().unwrap();

        let mut store = PostStore::load(&ctx);
        store.prepend("a post");
        store.save().unwrap();

        let err = cmd_history_clear(HistoryClearArgs { yes: false }).unwrap_err();
        assert!(err.to_string().contains("--yes"));

        // Nothing was removed.
        let store = PostStore::load(&ctx);
        assert_eq!(store.history.len(), 1);
    }

    #[test]
    #[serial]
    fn clear_empties_the_persisted_history() {
        let guard = DataDirGuard::new();
        let ctx = guard.context();
        ctx.ensure_dirs().unwrap();

        let mut store = PostStore::load(&ctx);
        store.prepend("first");
        store.prepend("second");
        store.current = Some("second".to_string());
        store.save().unwrap();

        cmd_history_clear(HistoryClearArgs { yes: true }).unwrap();

        // A fresh load (simulating the next invocation) sees no history,
        // while the current post is untouched.
        let store = PostStore::load(&ctx);
        assert!(store.history.is_empty());
        assert_eq!(store.current.as_deref(), Some("second"));
    }

    #[test]
    #[serial]
    fn clear_is_idempotent() {
        let guard = DataDirGuard::new();
        let ctx = guard.context();
        ctx.ensure_dirs().unwrap();

        cmd_history_clear(HistoryClearArgs { yes: true }).unwrap();
        cmd_history_clear(HistoryClearArgs { yes: true }).unwrap();

        let store = PostStore::load(&ctx);
        assert!(store.history.is_empty());
    }
}
