use std::sync::Arc;

use crate::generation::extractor::TextExtractor;
use crate::generation::generator::CoverLetterGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; nothing here holds per-request data.
#[derive(Clone)]
pub struct AppState {
    pub generator: CoverLetterGenerator,
    /// Pluggable document-to-text extractor. Default: PdfTextExtractor.
    pub extractor: Arc<dyn TextExtractor>,
    pub max_upload_bytes: usize,
}
