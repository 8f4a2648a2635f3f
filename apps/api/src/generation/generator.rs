//! Cover letter generation — orchestrates the full pipeline for one request.
//!
//! Flow: normalize → compile prompt → backend generate → parse paragraphs.
//!
//! Validation and compilation run before the backend is touched, so a bad
//! request never costs a model call. Nothing here outlives the request.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::errors::AppError;
use crate::generation::compiler::{compile_prompt, PromptDialect};
use crate::generation::parser::{parse_letter_body, split_paragraphs};
use crate::generation::tone::GenerationOptions;
use crate::llm_client::{Completion, TextGenerator};
use crate::models::{CandidateProfile, JobDescription};

/// Result of one generation run.
///
/// `generated_text` is kept verbatim for copying; `paragraphs` is for display.
/// When the backend produced nothing, `empty_completion` is set and
/// `generated_text` holds the backend's placeholder message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLetter {
    pub generated_text: String,
    pub paragraphs: Vec<String>,
    pub empty_completion: bool,
}

/// Holds the backend chosen at startup and the prompt dialect that goes with
/// it. Immutable after construction and cheap to clone.
#[derive(Clone)]
pub struct CoverLetterGenerator {
    backend: Arc<dyn TextGenerator>,
    dialect: PromptDialect,
}

impl CoverLetterGenerator {
    pub fn new(backend: Arc<dyn TextGenerator>, dialect: PromptDialect) -> Self {
        Self { backend, dialect }
    }

    pub fn backend(&self) -> &dyn TextGenerator {
        self.backend.as_ref()
    }

    pub fn dialect(&self) -> PromptDialect {
        self.dialect
    }

    /// Runs the pipeline once. Single attempt: a backend failure is returned
    /// as `AppError::Generation` carrying the backend's message.
    pub async fn generate_cover_letter(
        &self,
        job: &JobDescription,
        candidate: &CandidateProfile,
        options: &GenerationOptions,
    ) -> Result<GeneratedLetter, AppError> {
        let prompt = compile_prompt(job, candidate, options, self.dialect)?;

        info!(
            "Generating cover letter: backend={}, model={}, dialect={}, tone={}, length={}",
            self.backend.backend_name(),
            self.backend.model(),
            self.dialect,
            options.tone,
            options.length
        );
        debug!("Compiled prompt: {} chars", prompt.len());

        let completion = self.backend.generate(&prompt).await.map_err(|e| {
            error!("Cover letter generation failed: {e}");
            AppError::from(e)
        })?;

        let letter = match completion {
            Completion::Text(text) => {
                let paragraphs = match candidate.full_name() {
                    Some(name) => parse_letter_body(&text, name),
                    // No name to delimit the body with: show the whole output.
                    None => split_paragraphs(&text),
                };
                GeneratedLetter {
                    generated_text: text,
                    paragraphs,
                    empty_completion: false,
                }
            }
            Completion::Empty => {
                warn!(
                    "Backend {} returned no usable text",
                    self.backend.backend_name()
                );
                GeneratedLetter {
                    generated_text: self.backend.empty_placeholder().to_string(),
                    paragraphs: Vec::new(),
                    empty_completion: true,
                }
            }
        };

        info!(
            "Cover letter generated: {} chars, {} paragraphs",
            letter.generated_text.len(),
            letter.paragraphs.len()
        );
        Ok(letter)
    }
}
