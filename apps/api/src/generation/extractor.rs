//! Résumé upload handling — checks the uploaded document and pulls plain text
//! out of it. The extractor is a black box behind `TextExtractor`.

use bytes::Bytes;

use crate::errors::AppError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// A document received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Checks type, size and emptiness, in that order.
pub fn validate_upload(doc: &UploadedDocument, max_bytes: usize) -> Result<(), AppError> {
    let is_pdf = doc
        .content_type
        .as_deref()
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim())
        .is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE));
    if !is_pdf {
        return Err(AppError::Validation(
            "Invalid file type. Please upload a PDF.".to_string(),
        ));
    }

    if doc.data.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "File size exceeds {}MB. Please upload a smaller file.",
            max_bytes / (1024 * 1024)
        )));
    }

    if doc.data.is_empty() {
        return Err(AppError::Validation(
            "File is empty. Please upload a valid PDF.".to_string(),
        ));
    }

    Ok(())
}

/// Turns document bytes into plain text. Blocking; callers run it off the
/// async executor.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, data: &[u8]) -> Result<String, AppError>;
}

/// Default extractor backed by `pdf-extract`.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, data: &[u8]) -> Result<String, AppError> {
        pdf_extract::extract_text_from_mem(data)
            .map_err(|e| AppError::Extraction(format!("Could not read text from PDF: {e:?}")))
    }
}
