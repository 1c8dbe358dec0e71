//! Generation client abstraction.
//!
//! The composer talks to the text-generation service through the
//! `GenerationClient` trait so the state machine can be exercised in tests
//! with a scripted client. The real transport lives in the `http` module.

pub mod http;

use thiserror::Error;

pub use http::HttpGenerationClient;

/// Parameters for one chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// The system-role instruction string.
    pub system: String,
    /// The user-role content string.
    pub user: String,
    /// Maximum number of generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Error type for generation requests.
///
/// Every variant is caught at the call site and converted into the fixed
/// user-facing failure message; the detail here only feeds diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The credential environment variable is unset or empty.
    #[error("credential environment variable '{0}' is not set")]
    MissingCredential(String),

    /// The request never produced an HTTP response.
    #[error("request to the generation endpoint failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("generation endpoint returned HTTP {status}: {detail}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// A snippet of the response body.
        detail: String,
    },

    /// The response body did not have the expected shape.
    #[error("could not parse the generation response: {0}")]
    MalformedResponse(String),
}

/// A client that can turn a prompt into generated text.
///
/// Implementations perform exactly one request per call; retries and
/// cancellation are out of scope.
pub trait GenerationClient {
    /// Send the request and return the generated text, trimmed of
    /// surrounding whitespace.
    fn complete(&self, request: &GenerationRequest) -> Result<String, ClientError>;
}
