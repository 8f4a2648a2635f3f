use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::generation::compiler::PromptDialect;
use crate::generation::extractor::DEFAULT_MAX_UPLOAD_BYTES;
use crate::llm_client::{chat, completion, BackendSettings};

/// Which provider protocol serves generation. Fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    /// Completion-style: Hugging Face Inference API.
    HuggingFace,
    /// Chat-style: Together AI chat completions.
    Together,
}

impl LlmBackend {
    /// Dialect used when `PROMPT_DIALECT` is not set.
    pub fn default_dialect(self) -> PromptDialect {
        match self {
            LlmBackend::HuggingFace => PromptDialect::Descriptive,
            LlmBackend::Together => PromptDialect::ResumeTailoring,
        }
    }

    fn key_var(self) -> &'static str {
        match self {
            LlmBackend::HuggingFace => "HUGGINGFACE_API_KEY",
            LlmBackend::Together => "TOGETHER_API_KEY",
        }
    }

    fn model_var(self) -> &'static str {
        match self {
            LlmBackend::HuggingFace => "HUGGINGFACE_MODEL",
            LlmBackend::Together => "TOGETHER_MODEL",
        }
    }

    fn url_var(self) -> &'static str {
        match self {
            LlmBackend::HuggingFace => "HUGGINGFACE_API_URL",
            LlmBackend::Together => "TOGETHER_API_URL",
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            LlmBackend::HuggingFace => completion::DEFAULT_MODEL,
            LlmBackend::Together => chat::DEFAULT_MODEL,
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            LlmBackend::HuggingFace => completion::DEFAULT_BASE_URL,
            LlmBackend::Together => chat::DEFAULT_BASE_URL,
        }
    }
}

impl FromStr for LlmBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" | "completion" => Ok(LlmBackend::HuggingFace),
            "together" | "togetherai" | "chat" => Ok(LlmBackend::Together),
            other => Err(anyhow!(
                "LLM_BACKEND must be 'huggingface' or 'together', got '{other}'"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if the selected backend's API key is missing.
#[derive(Clone)]
pub struct Config {
    pub backend: LlmBackend,
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub prompt_dialect: PromptDialect,
    pub llm_timeout: Duration,
    /// Overrides the backend's default token limit when set.
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("backend", &self.backend)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("prompt_dialect", &self.prompt_dialect)
            .field("llm_timeout", &self.llm_timeout)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get("LLM_BACKEND") {
            Some(v) => v.parse::<LlmBackend>()?,
            None => LlmBackend::Together,
        };

        let api_key = get(backend.key_var()).with_context(|| {
            format!(
                "Required environment variable '{}' is not set",
                backend.key_var()
            )
        })?;

        let prompt_dialect = match get("PROMPT_DIALECT") {
            Some(v) => v.parse::<PromptDialect>().map_err(|e| anyhow!(e))?,
            None => backend.default_dialect(),
        };

        Ok(Config {
            backend,
            api_key,
            model: get(backend.model_var()).unwrap_or_else(|| backend.default_model().to_string()),
            api_url: get(backend.url_var())
                .unwrap_or_else(|| backend.default_base_url().to_string()),
            prompt_dialect,
            llm_timeout: Duration::from_secs(
                parse_or("LLM_TIMEOUT_SECS", get("LLM_TIMEOUT_SECS"), 120)?,
            ),
            max_tokens: get("LLM_MAX_TOKENS")
                .map(|v| parse_or("LLM_MAX_TOKENS", Some(v), 0))
                .transpose()?,
            temperature: get("LLM_TEMPERATURE")
                .map(|v| parse_or("LLM_TEMPERATURE", Some(v), 0.0))
                .transpose()?,
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            port: parse_or("PORT", get("PORT"), 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            api_key: self.api_key.clone(),
            base_url: self.api_url.clone(),
            model: self.model.clone(),
            timeout: self.llm_timeout,
        }
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{v}'")),
        None => Ok(default),
    }
}
