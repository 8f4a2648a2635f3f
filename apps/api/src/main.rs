mod config;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LlmBackend};
use crate::generation::extractor::PdfTextExtractor;
use crate::generation::generator::CoverLetterGenerator;
use crate::llm_client::{
    ChatParams, CompletionParams, HuggingFaceClient, TextGenerator, TogetherClient,
};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing API key for the chosen backend)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cover Letter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the generation backend (selected once, never per request)
    let backend = build_backend(&config)?;
    info!(
        "LLM backend initialized: {} (model: {}, dialect: {})",
        backend.backend_name(),
        backend.model(),
        config.prompt_dialect
    );

    let state = AppState {
        generator: CoverLetterGenerator::new(backend, config.prompt_dialect),
        extractor: Arc::new(PdfTextExtractor),
        max_upload_bytes: config.max_upload_bytes,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the form's origin once it is deployed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the text generator for the configured provider.
fn build_backend(config: &Config) -> Result<Arc<dyn TextGenerator>> {
    let settings = config.backend_settings();
    let backend: Arc<dyn TextGenerator> = match config.backend {
        LlmBackend::HuggingFace => {
            let defaults = CompletionParams::default();
            Arc::new(HuggingFaceClient::new(settings)?.with_params(CompletionParams {
                max_new_tokens: config.max_tokens.unwrap_or(defaults.max_new_tokens),
                temperature: config.temperature.unwrap_or(defaults.temperature),
                ..defaults
            }))
        }
        LlmBackend::Together => {
            let defaults = ChatParams::default();
            Arc::new(TogetherClient::new(settings)?.with_params(ChatParams {
                max_tokens: config.max_tokens.unwrap_or(defaults.max_tokens),
                temperature: config.temperature.unwrap_or(defaults.temperature),
            }))
        }
    };
    Ok(backend)
}
