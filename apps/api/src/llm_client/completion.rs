//! Completion-style backend: Hugging Face Inference API text generation.
//!
//! One prompt string in, one generated string out.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    build_http_client, post_json, BackendSettings, Completion, LlmError, TextGenerator,
};

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.2-3B-Instruct";
pub const EMPTY_PLACEHOLDER: &str = "Error generating text.";

/// Decoding parameters for completion-style generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub repetition_penalty: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 500,
            temperature: 0.7,
            repetition_penalty: 1.2,
        }
    }
}

#[derive(Debug, Serialize)]
struct TextGenerationRequest<'a> {
    inputs: &'a str,
    parameters: TextGenerationParameters,
}

#[derive(Debug, Serialize)]
struct TextGenerationParameters {
    #[serde(flatten)]
    decoding: CompletionParams,
    /// Only the continuation is wanted; the echoed prompt would confuse parsing.
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: Option<String>,
}

/// The API answers with either a list of generations or a single object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextGenerationResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

impl TextGenerationResponse {
    fn into_text(self) -> Option<String> {
        match self {
            TextGenerationResponse::Batch(items) => {
                items.into_iter().next().and_then(|g| g.generated_text)
            }
            TextGenerationResponse::Single(g) => g.generated_text,
        }
    }
}

#[derive(Clone)]
pub struct HuggingFaceClient {
    client: Client,
    settings: BackendSettings,
    params: CompletionParams,
}

impl HuggingFaceClient {
    pub fn new(settings: BackendSettings) -> Result<Self, LlmError> {
        Ok(Self {
            client: build_http_client(settings.timeout)?,
            settings,
            params: CompletionParams::default(),
        })
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn request_body<'a>(&self, prompt: &'a str) -> TextGenerationRequest<'a> {
        TextGenerationRequest {
            inputs: prompt,
            parameters: TextGenerationParameters {
                decoding: self.params,
                return_full_text: false,
            },
        }
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceClient {
    async fn generate(&self, prompt: &str) -> Result<Completion, LlmError> {
        debug!(
            "Hugging Face text generation: model={}, prompt_len={}",
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
        "huggingface"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    fn empty_placeholder(&self) -> &'static str {
        EMPTY_PLACEHOLDER
    }
}

fn parse_response(body: &str) -> Result<Completion, LlmError> {
    let response: TextGenerationResponse = serde_json::from_str(body)?;
    Ok(Completion::from_raw(response.into_text()))
}
