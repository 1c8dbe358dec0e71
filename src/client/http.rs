//! Blocking HTTP transport for the generation client.
//!
//! Sends an OpenAI-style chat-completion request:
//!
//! ```text
//! POST {endpoint}
//! Content-Type: application/json
//! Authorization: Bearer {credential}
//!
//! { "model": ..., "messages": [{"role": "system", ...}, {"role": "user", ...}],
//!   "max_tokens": ..., "temperature": ... }
//! ```
//!
//! and extracts `choices[0].message.content` from the response. The bearer
//! credential is read from the environment at request time so a missing key
//! surfaces as a failed generation, never as a startup crash. No timeout is
//! applied beyond the HTTP client's default and no retry is attempted.

use super::{ClientError, GenerationClient, GenerationRequest};
use crate::config::Config;
use serde::{Deserialize, Serialize};

/// Maximum number of response-body characters carried into error details.
const ERROR_DETAIL_LIMIT: usize = 200;

/// Request body for the chat-completion endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

/// One chat message in the request body.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Expected shape of the response body.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Generation client backed by a blocking HTTP connection.
#[derive(Debug)]
pub struct HttpGenerationClient {
    endpoint: String,
    model: String,
    api_key_env: String,
    http: reqwest::blocking::Client,
}

impl HttpGenerationClient {
    /// Create a client for the given endpoint and model. `api_key_env`
    /// names the environment variable holding the bearer credential.
    pub fn new(endpoint: &str, model: &str, api_key_env: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key_env: api_key_env.to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.endpoint, &config.model, &config.api_key_env)
    }

    /// Read the bearer credential from the environment.
    fn credential(&self) -> Result<String, ClientError> {
        match std::env::var(&self.api_key_env) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ClientError::MissingCredential(self.api_key_env.clone())),
        }
    }
}

impl GenerationClient for HttpGenerationClient {
    fn complete(&self, request: &GenerationRequest) -> Result<String, ClientError> {
        let credential = self.credential()?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(credential)
            .json(&body)
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                detail: snippet(&detail),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ClientError::MalformedResponse("response contained no choices".to_string())
        })?;

        Ok(choice.message.content.trim().to_string())
    }
}

/// Truncate a response body for inclusion in an error message.
fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_DETAIL_LIMIT {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(ERROR_DETAIL_LIMIT).collect();
        format!("{}...", cut)
    }
}
