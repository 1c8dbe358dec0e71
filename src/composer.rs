//! The post composer state machine.
//!
//! `Composer` is the in-memory model behind the CLI: a field snapshot, the
//! two-panel view state, the in-flight flag, the current post, and the
//! history list. Commands seed it from the store, drive one operation, and
//! persist the result.
//!
//! Generation failures are absorbed here: the client error is reported to
//! the caller for logging, and the displayed result becomes a fixed
//! failure message rather than an exception. Control always returns to a
//! retryable state.

use crate::client::{ClientError, GenerationClient, GenerationRequest};
use crate::config::Profile;
use crate::error::{PlumeError, Result};
use crate::fields::FormFields;
use crate::prompt;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Fixed user-facing text shown when a generation request fails.
pub const FAILURE_MESSAGE: &str = "Failed to generate post. Please try again.";

/// Base of the external share URL. The post text is percent-encoded into
/// the `summary` query parameter.
const SHARE_URL_BASE: &str =
    "https://www.linkedin.com/shareArticle?mini=true&url=https://yourapp.com&title=Generated%20Post&summary=";

/// Characters escaped in the share URL query value. Matches JavaScript's
/// `encodeURIComponent`: alphanumerics and `-_.!~*'()` pass through.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Which of the two panels the composer is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    /// The input form.
    #[default]
    Editing,
    /// The generated-post preview.
    Previewing,
}

/// Result of a generation attempt that got as far as issuing a request.
#[derive(Debug)]
pub enum GenerateOutcome {
    /// The post was generated and stored as the current post.
    Generated,
    /// The request failed; the current post is now the failure message.
    Failed(ClientError),
}

/// In-memory composer state for one invocation.
#[derive(Debug)]
pub struct Composer<'a> {
    profile: &'a Profile,
    fields: FormFields,
    view: ViewState,
    loading: bool,
    current: Option<String>,
    history: Vec<String>,
}

impl<'a> Composer<'a> {
    /// Create a composer for the given profile and field snapshot, seeded
    /// with the persisted current post and history.
    pub fn new(
        profile: &'a Profile,
        fields: FormFields,
        current: Option<String>,
        history: Vec<String>,
    ) -> Self {
        Self {
            profile,
            fields,
            view: ViewState::Editing,
            loading: false,
            current,
            history,
        }
    }

    /// The current post, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Past posts, newest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Which panel is showing.
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The field snapshot.
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Run one generation.
    ///
    /// Validates the required input first: topic-driven profiles refuse to
    /// issue a request without a topic and return a `ValidationError`,
    /// leaving all state unchanged. Otherwise the prompt is built, exactly
    /// one request is issued, and:
    ///
    /// - on success the trimmed text becomes the current post, is prepended
    ///   to the history when the profile keeps one, and the view switches
    ///   to the preview;
    /// - on failure the current post becomes the fixed failure message and
    ///   the error is returned inside the outcome for diagnostics.
    ///
    /// The loading flag is cleared on both paths.
    pub fn generate(&mut self, client: &dyn GenerationClient) -> Result<GenerateOutcome> {
        if !self.profile.scenario_mode && !self.fields.has_topic() {
            return Err(PlumeError::ValidationError(
                "please enter a topic before generating a post".to_string(),
            ));
        }

        let prompt = prompt::build(&self.fields, self.profile)
            .map_err(|e| PlumeError::UserError(format!("failed to build prompt: {}", e)))?;

        let request = GenerationRequest {
            system: prompt.system,
            user: prompt.user,
            max_tokens: self.fields.length.max_tokens(),
            temperature: self.profile.temperature,
        };

        self.loading = true;
        let result = client.complete(&request);
        self.loading = false;

        match result {
            Ok(text) => {
                self.current = Some(text.clone());
                if self.profile.history {
                    self.history.insert(0, text);
                }
                self.view = ViewState::Previewing;
                Ok(GenerateOutcome::Generated)
            }
            Err(err) => {
                self.current = Some(FAILURE_MESSAGE.to_string());
                Ok(GenerateOutcome::Failed(err))
            }
        }
    }

    /// Explicitly prepend the current post to the history.
    pub fn save_post(&mut self) -> Result<()> {
        match &self.current {
            Some(post) => {
                self.history.insert(0, post.clone());
                Ok(())
            }
            None => Err(PlumeError::UserError(
                "no post to save. Run `plume generate` first.".to_string(),
            )),
        }
    }

    /// Empty the history. Does not touch the current post.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Restore the form fields to their defaults. Does not affect history.
    pub fn reset_fields(&mut self) {
        self.fields = FormFields::default();
    }

    /// Return from the preview to the form, discarding the current post.
    pub fn back(&mut self) {
        self.view = ViewState::Editing;
        self.current = None;
    }
}

/// Build the external share URL for a post.
pub fn share_url(post: &str) -> String {
    format!("{}{}", SHARE_URL_BASE, utf8_percent_encode(post, QUERY_VALUE))
}
