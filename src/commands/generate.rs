//! Implementation of the `plume generate` command.
//!
//! Runs one pass of the composer workflow: validate input, build the
//! prompt, issue a single generation request under the in-flight lock,
//! persist the result, and print it.

use crate::cli::GenerateArgs;
use crate::client::HttpGenerationClient;
use crate::composer::{Composer, FAILURE_MESSAGE, GenerateOutcome};
use crate::config::Config;
use crate::context::StorageContext;
use crate::error::{PlumeError, Result};
use crate::events::{Event, EventAction, append_event_best_effort};
use crate::fields::{FormFields, Length, Tone};
use crate::locks;
use crate::store::PostStore;
use serde_json::json;

/// Execute the `plume generate` command.
pub fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let ctx = StorageContext::resolve()?;
    ctx.ensure_dirs()?;

    let config = Config::load_or_default(ctx.config_path())?;
    let (profile_name, profile) = config.profile(args.profile.as_deref())?;
    let fields = form_fields(&args)?;

    let store = PostStore::load(&ctx);
    let mut composer = Composer::new(
        profile,
        fields,
        store.current.clone(),
        store.history.clone(),
    );

    // Held across the request and the store write-back, so a second
    // invocation started meanwhile fails fast instead of racing.
    let _lock = locks::acquire_generation_lock(&ctx, config.lock_stale_minutes, "generate")?;

    let client = HttpGenerationClient::from_config(&config);
    let outcome = composer.generate(&client)?;

    let mut store = store;
    store.current = composer.current().map(str::to_string);
    store.history = composer.history().to_vec();
    store.save()?;

    match outcome {
        GenerateOutcome::Generated => {
            let event = Event::new(EventAction::Generate)
                .with_profile(profile_name)
                .with_details(json!({
                    "outcome": "generated",
                    "tone": composer.fields().tone.as_str(),
                    "length": composer.fields().length.as_str(),
                    "scenario_mode": profile.scenario_mode,
                }));
            append_event_best_effort(&ctx, &event);

            println!("{}", composer.current().unwrap_or_default());
            eprintln!();
            eprintln!("Saved as the current post. Use `plume copy`, `plume share`, or `plume save`.");
            Ok(())
        }
        GenerateOutcome::Failed(err) => {
            let event = Event::new(EventAction::Generate)
                .with_profile(profile_name)
                .with_details(json!({
                    "outcome": "failed",
                    "detail": err.to_string(),
                }));
            append_event_best_effort(&ctx, &event);

            println!("{}", FAILURE_MESSAGE);
            Err(PlumeError::GenerationError(err.to_string()))
        }
    }
}

/// Build the field snapshot from CLI arguments.
fn form_fields(args: &GenerateArgs) -> Result<FormFields> {
    let tone = Tone::from_str(&args.tone).ok_or_else(|| {
        PlumeError::UserError(format!(
            "invalid tone '{}': must be 'inspirational', 'funny', 'professional', \
             'thought-provoking', or 'casual'",
            args.tone
        ))
    })?;

    let length = Length::from_str(&args.length).ok_or_else(|| {
        PlumeError::UserError(format!(
            "invalid length '{}': must be 'short', 'medium', or 'long'",
            args.length
        ))
    })?;

    Ok(FormFields {
        topic: args.topic.clone().unwrap_or_default(),
        tone,
        length,
        buzzwords: args.buzzwords.clone(),
        include_hashtags: args.hashtags,
        scenario: args.scenario.clone(),
        system_instruction: args.system.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::DataDirGuard;
    use serial_test::serial;

    fn generate_args(topic: Option<&str>) -> GenerateArgs {
        GenerateArgs {
            topic: topic.map(str::to_string),
            tone: "professional".to_string(),
            length: "medium".to_string(),
            buzzwords: None,
            hashtags: true,
            scenario: None,
            system: None,
            profile: None,
        }
    }

    #[test]
    fn form_fields_parses_valid_arguments() {
        let mut args = generate_args(Some("hiring"));
        args.tone = "Funny".to_string();
        args.length = "LONG".to_string();
        args.buzzwords = Some("synergy".to_string());
        args.hashtags = false;

        let fields = form_fields(&args).unwrap();
        assert_eq!(fields.topic, "hiring");
        assert_eq!(fields.tone, Tone::Funny);
        assert_eq!(fields.length, Length::Long);
        assert_eq!(fields.buzzwords.as_deref(), Some("synergy"));
        assert!(!fields.include_hashtags);
    }

    #[test]
    fn form_fields_rejects_unknown_tone() {
        let mut args = generate_args(Some("hiring"));
        args.tone = "sarcastic".to_string();

        let err = form_fields(&args).unwrap_err();
        assert!(err.to_string().contains("invalid tone 'sarcastic'"));
    }

    #[test]
    fn form_fields_rejects_unknown_length() {
        let mut args = generate_args(Some("hiring"));
        args.length = "huge".to_string();

        let err = form_fields(&args).unwrap_err();
        assert!(err.to_string().contains("invalid length 'huge'"));
    }

    #[test]
    #[serial]
    fn missing_topic_is_a_validation_failure_and_issues_no_request() {
        let guard = DataDirGuard::new();

        // The default profile is topic-driven; with no topic the command
        // must fail validation before any request or store write.
        let err = cmd_generate(generate_args(None)).unwrap_err();
        assert!(matches!(err, PlumeError::ValidationError(_)));

        let ctx = guard.context();
        let store = PostStore::load(&ctx);
        assert!(store.current.is_none());
        assert!(store.history.is_empty());
        // The lock was released on the way out.
        assert!(!ctx.generate_lock_path().exists());
    }

    #[test]
    #[serial]
    fn unknown_profile_is_a_user_error() {
        let _guard = DataDirGuard::new();

        let mut args = generate_args(Some("hiring"));
        args.profile = Some("nope".to_string());

        let err = cmd_generate(args).unwrap_err();
        assert!(matches!(err, PlumeError::UserError(_)));
        assert!(err.to_string().contains("unknown profile 'nope'"));
    }

    #[test]
    #[serial]
    fn failed_generation_stores_the_fixed_failure_message() {
        let guard = DataDirGuard::new();
        let ctx = guard.context();
        ctx.ensure_dirs().unwrap();

        // Point the credential at a variable that is guaranteed unset, so
        // the request fails before any network traffic.
        std::fs::write(
            ctx.config_path(),
            "api_key_env: PLUME_TEST_MISSING_CREDENTIAL\n",
        )
        .unwrap();

        let err = cmd_generate(generate_args(Some("hiring"))).unwrap_err();
        assert!(matches!(err, PlumeError::GenerationError(_)));
        assert!(err.to_string().contains("PLUME_TEST_MISSING_CREDENTIAL"));

        // The failure message is persisted as the current post, and the
        // history never records it.
        let store = PostStore::load(&ctx);
        assert_eq!(store.current.as_deref(), Some(FAILURE_MESSAGE));
        assert!(store.history.is_empty());
        assert!(!ctx.generate_lock_path().exists());
    }

    #[test]
    #[serial]
    fn held_lock_rejects_a_concurrent_generation() {
        let guard = DataDirGuard::new();
        let ctx = guard.context();
        ctx.ensure_dirs().unwrap();

        let _held = locks::acquire_generation_lock(&ctx, 10, "generate").unwrap();

        let err = cmd_generate(generate_args(Some("hiring"))).unwrap_err();
        assert!(matches!(err, PlumeError::LockError(_)));
    }
}
