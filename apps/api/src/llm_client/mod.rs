/// LLM Client — the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// The pipeline depends only on the `TextGenerator` trait; which backend sits
/// behind it is decided once at startup from configuration.
///
/// Calls are single-attempt. No retry or backoff happens here; a failed call
/// surfaces immediately as an `LlmError`.
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub mod chat;
pub mod completion;
pub mod prompts;

pub use chat::{ChatParams, TogetherClient};
pub use completion::{CompletionParams, HuggingFaceClient};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outcome of a successful backend call.
///
/// `Empty` replaces the placeholder strings some providers' SDKs hand back, so
/// callers cannot mistake a placeholder for real content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Text(String),
    Empty,
}

impl Completion {
    /// Wraps raw provider output. Missing or whitespace-only text is `Empty`.
    pub fn from_raw(text: Option<String>) -> Self {
        match text {
            Some(t) if !t.trim().is_empty() => Completion::Text(t),
            _ => Completion::Empty,
        }
    }
}

/// The text generation capability. Implement this to add a provider without
/// touching the compiler, parser, or handlers.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Completion, LlmError>;

    /// Short provider identifier for logs and `/health`.
    fn backend_name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Message shown in place of an empty completion.
    fn empty_placeholder(&self) -> &'static str;
}

/// Connection settings shared by every backend.
#[derive(Clone)]
pub struct BackendSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

// Credentials never reach logs, even through `{:?}`.
impl fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSettings")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn build_http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// POSTs a JSON body with bearer auth and returns the raw response body.
/// Non-2xx responses become `LlmError::Api` with the provider's message.
async fn post_json<B: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    api_key: &str,
    body: &B,
) -> Result<String, LlmError> {
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .header("content-type", "application/json")
        .json(body)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        warn!("LLM API returned {}", status);
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: api_error_message(&text),
        });
    }

    debug!("LLM call succeeded: {} bytes received", text.len());
    Ok(text)
}

/// Pulls a readable message out of a provider error body.
///
/// Providers disagree on shape: `{"error": "..."}`,
/// `{"error": {"message": "..."}}` and `{"message": "..."}` all occur.
/// Falls back to the raw body.
fn api_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    value
        .get("error")
        .and_then(|e| e.as_str().or_else(|| e.get("message").and_then(|m| m.as_str())))
        .or_else(|| value.get("message").and_then(|m| m.as_str()))
        .map(String::from)
        .unwrap_or_else(|| body.to_string())
}
