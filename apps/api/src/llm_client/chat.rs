//! Chat-style backend: Together AI chat completions (OpenAI-compatible).
//!
//! Sends a fixed system turn plus the compiled prompt as the user turn.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::COVER_LETTER_SYSTEM;
use super::{
    build_http_client, post_json, BackendSettings, Completion, LlmError, TextGenerator,
};

pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz";
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo";
pub const EMPTY_PLACEHOLDER: &str = "No response generated.";

/// Decoding parameters for chat-style generation. The model lives in
/// `BackendSettings`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
    }
}

#[derive(Clone)]
pub struct TogetherClient {
    client: Client,
    settings: BackendSettings,
    params: ChatParams,
}

impl TogetherClient {
    pub fn new(settings: BackendSettings) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_http_client(settings.timeout)?,
            settings,
            params: ChatParams::default(),
        })
    }

    pub fn with_params(mut self, params: ChatParams) -> Self {
        self.params = params;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: COVER_LETTER_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.params.max_tokens,
            temperature: self.params.temperature,
        }
    }
}

#[async_trait]
impl TextGenerator for TogetherClient {
    async fn generate(&self, prompt: &str) -> Result<Completion, LlmError> {
        debug!(
            "Together chat completion: model={}, prompt_len={}",
            self.settings.model,
            prompt.len()
        );
        let body = post_json(
            &self.client,
            &self.endpoint(),
            &self.settings.api_key,
            &self.request_body(prompt),
        )
        .await?;

        parse_response(&body)
    }

    fn backend_name(&self) -> &'static str {
        "together"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    fn empty_placeholder(&self) -> &'static str {
        EMPTY_PLACEHOLDER
    }
}

fn parse_response(body: &str) -> Result<Completion, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    Ok(Completion::from_raw(response.first_content()))
}
