//! Axum route handlers for the Cover Letter API.

use axum::{
    extract::{multipart::MultipartRejection, FromRequest, Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::extractor::{validate_upload, UploadedDocument};
use crate::generation::generator::GeneratedLetter;
use crate::generation::parser::{parse_letter_body, split_paragraphs};
use crate::generation::tone::{GenerationOptions, Length, Tone};
use crate::models::{CandidateProfile, JobDescription};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// JSON body extractor whose rejections render as `AppError` bodies.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCoverLetterRequest {
    pub job_description: Option<JobDescription>,
    pub candidate_profile: Option<CandidateProfile>,
    #[serde(flatten)]
    pub options: GenerationOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterData {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Contact details echoed back for rendering the letter header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub job_description: JobDescription,
    #[serde(flatten)]
    pub letter: GeneratedLetter,
}

#[derive(Debug, Serialize)]
pub struct GenerateCoverLetterResponse {
    pub data: CoverLetterData,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseLetterRequest {
    pub raw_text: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParseLetterResponse {
    pub paragraphs: Vec<String>,
}

/// Fields collected from the upload form before validation.
#[derive(Debug, Default)]
struct UploadForm {
    resume: Option<UploadedDocument>,
    job_title: Option<String>,
    company: Option<String>,
    requirements: Option<String>,
    responsibilities: Option<String>,
    tone: Option<String>,
    length: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cover-letters
///
/// Generates a cover letter from a job description and a candidate profile
/// (structured object or raw résumé string).
pub async fn handle_generate(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateCoverLetterRequest>,
) -> Result<Json<GenerateCoverLetterResponse>, AppError> {
    let (Some(job), Some(candidate)) = (request.job_description, request.candidate_profile) else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };

    let letter = state
        .generator
        .generate_cover_letter(&job, &candidate, &request.options)
        .await?;

    Ok(Json(build_response(job, &candidate, letter)))
}

/// POST /api/v1/cover-letters/upload
///
/// Multipart variant: a PDF résumé plus job fields. The PDF's text becomes a
/// raw-text candidate.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateCoverLetterResponse>, AppError> {
    let form = read_upload_form(multipart?).await?;

    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("Missing file resume (*.pdf)".to_string()))?;

    let (Some(title), Some(company), Some(requirements)) =
        (form.job_title, form.company, form.requirements)
    else {
        return Err(AppError::Validation(
            "Missing job title, company name, or job requirements".to_string(),
        ));
    };

    validate_upload(&resume, state.max_upload_bytes)?;

    let options = GenerationOptions {
        tone: form
            .tone
            .as_deref()
            .map(str::parse::<Tone>)
            .transpose()?
            .unwrap_or_default(),
        length: form
            .length
            .as_deref()
            .map(str::parse::<Length>)
            .transpose()?
            .unwrap_or_default(),
    };

    info!(
        "Extracting text from uploaded resume {:?} ({} bytes)",
        resume.file_name,
        resume.data.len()
    );
    let extractor = state.extractor.clone();
    let data = resume.data.clone();
    let text = tokio::task::spawn_blocking(move || extractor.extract_text(&data))
        .await
        .map_err(|e| AppError::Extraction(format!("PDF extraction aborted: {e}")))??;

    let job = JobDescription {
        title,
        company,
        requirements,
        responsibilities: form.responsibilities,
    };
    let candidate = CandidateProfile::RawText(text);

    let letter = state
        .generator
        .generate_cover_letter(&job, &candidate, &options)
        .await?;

    Ok(Json(build_response(job, &candidate, letter)))
}

/// POST /api/v1/cover-letters/parse
///
/// Splits previously generated text into display paragraphs. With a name the
/// body between the salutation and the name is used; without one the whole
/// text is split.
pub async fn handle_parse(
    AppJson(request): AppJson<ParseLetterRequest>,
) -> Result<Json<ParseLetterResponse>, AppError> {
    let paragraphs = match request.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => parse_letter_body(&request.raw_text, name),
        _ => split_paragraphs(&request.raw_text),
    };
    Ok(Json(ParseLetterResponse { paragraphs }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn build_response(
    job: JobDescription,
    candidate: &CandidateProfile,
    letter: GeneratedLetter,
) -> GenerateCoverLetterResponse {
    let (fullname, email, phone) = match candidate {
        CandidateProfile::Structured(p) => (
            Some(p.fullname.clone()),
            Some(p.email.clone()),
            Some(p.phone.clone()),
        ),
        CandidateProfile::RawText(_) => (None, None, None),
    };

    GenerateCoverLetterResponse {
        data: CoverLetterData {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            fullname,
            email,
            phone,
            job_description: job,
            letter,
        },
        message: "Cover letter generated successfully".to_string(),
    }
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "resume" {
            let file_name = field.file_name().map(String::from);
            let content_type = field.content_type().map(String::from);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
            form.resume = Some(UploadedDocument {
                file_name,
                content_type,
                data,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))?;
        let value = Some(value).filter(|v| !v.trim().is_empty());

        match name.as_str() {
            "jobTitle" => form.job_title = value,
            "company" | "companyName" => form.company = value,
            "requirements" | "jobRequirements" => form.requirements = value,
            "responsibilities" => form.responsibilities = value,
            "tone" => form.tone = value,
            "length" => form.length = value,
            other => debug!("Ignoring unknown form field '{other}'"),
        }
    }

    Ok(form)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::generation::compiler::PromptDialect;
    use crate::generation::extractor::TextExtractor;
    use crate::generation::generator::tests::{MockGenerator, MockReply};
    use crate::generation::generator::CoverLetterGenerator;
    use crate::routes::build_router;

    use super::*;

    struct FixedExtractor(&'static str);

    impl TextExtractor for FixedExtractor {
        fn extract_text(&self, _data: &[u8]) -> Result<String, AppError> {
            Ok(self.0.to_string())
        }
    }

    const REPLY: &str =
        "Dear Hiring Manager,\n\nI build reliable systems.\n\nBest Regards,\nJane Doe";
    const BOUNDARY: &str = "XBOUNDARYX";

    fn app(mock: &Arc<MockGenerator>) -> Router {
        build_router(AppState {
            generator: CoverLetterGenerator::new(mock.clone(), PromptDialect::Descriptive),
            extractor: Arc::new(FixedExtractor("Jane Doe\nRust engineer at Initech")),
            max_upload_bytes: 1024,
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((content_type, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"resume.pdf\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/cover-letters/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn generate_body() -> Value {
        json!({
            "jobDescription": {
                "title": "Senior Rust Engineer",
                "company": "Ferrous Systems",
                "requirements": "Rust, async"
            },
            "candidateProfile": {
                "fullname": "Jane Doe",
                "email": "jane@example.com",
                "phone": "555-0100",
                "skills": ["Rust"],
                "experience": [{
                    "company": "Initech",
                    "role": "Engineer",
                    "duration": "3 years",
                    "achievements": "Cut latency 40%"
                }],
                "education": []
            },
            "tone": "technical"
        })
    }

    #[tokio::test]
    async fn test_generate_returns_letter_and_paragraphs() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let response = app(&mock)
            .oneshot(json_request("/api/v1/cover-letters", generate_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Cover letter generated successfully");
        assert_eq!(json["data"]["generatedText"], REPLY);
        assert_eq!(json["data"]["paragraphs"], json!(["I build reliable systems.", "Best Regards,"]));
        assert_eq!(json["data"]["fullname"], "Jane Doe");
        assert_eq!(json["data"]["emptyCompletion"], false);
        assert_eq!(json["data"]["jobDescription"]["company"], "Ferrous Systems");
        assert!(json["data"]["requestId"].is_string());

        let prompt = mock.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Use technical writing style"));
    }

    #[tokio::test]
    async fn test_generate_missing_candidate_is_bad_request() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let body = json!({ "jobDescription": { "title": "x", "company": "y", "requirements": "z" } });
        let response = app(&mock)
            .oneshot(json_request("/api/v1/cover-letters", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["message"], "Missing required fields");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_empty_requirements_is_bad_request_without_backend_call() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let mut body = generate_body();
        body["jobDescription"]["requirements"] = json!("");
        let response = app(&mock)
            .oneshot(json_request("/api/v1/cover-letters", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_backend_failure_is_bad_gateway() {
        let mock = MockGenerator::new(MockReply::Fail("model overloaded".into()));
        let response = app(&mock)
            .oneshot(json_request("/api/v1/cover-letters", generate_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "GENERATION_ERROR");
        assert_eq!(
            json["error"]["message"],
            "Failed to generate cover letter: API error (status 500): model overloaded"
        );
    }

    #[tokio::test]
    async fn test_generate_raw_text_candidate() {
        let mock = MockGenerator::new(MockReply::Text("One.\n\nTwo.".into()));
        let mut body = generate_body();
        body["candidateProfile"] = json!("Jane Doe — Rust engineer");
        let response = app(&mock)
            .oneshot(json_request("/api/v1/cover-letters", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["paragraphs"], json!(["One.", "Two."]));
        assert!(json["data"].get("fullname").is_none());
    }

    #[tokio::test]
    async fn test_upload_generates_from_extracted_text() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let request = multipart_request(
            &[
                ("jobTitle", "Senior Rust Engineer"),
                ("company", "Ferrous Systems"),
                ("requirements", "Rust"),
                ("tone", "enthusiastic"),
            ],
            Some(("application/pdf", b"%PDF-1.4 fake".as_slice())),
        );
        let response = app(&mock).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["generatedText"], REPLY);

        let prompt = mock.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Jane Doe\nRust engineer at Initech"));
        assert!(prompt.contains("Tone: enthusiastic"));
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let request = multipart_request(
            &[("jobTitle", "SRE"), ("company", "Acme"), ("requirements", "Linux")],
            None,
        );
        let response = app(&mock).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Missing file resume (*.pdf)");
    }

    #[tokio::test]
    async fn test_upload_missing_job_fields() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let request = multipart_request(
            &[("jobTitle", "SRE")],
            Some(("application/pdf", b"%PDF-1.4".as_slice())),
        );
        let response = app(&mock).oneshot(request).await.unwrap();

        let json = body_json(response).await;
        assert_eq!(
            json["error"]["message"],
            "Missing job title, company name, or job requirements"
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let request = multipart_request(
            &[("jobTitle", "SRE"), ("company", "Acme"), ("requirements", "Linux")],
            Some(("text/plain", b"hello".as_slice())),
        );
        let response = app(&mock).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let big = vec![b'a'; 2048];
        let request = multipart_request(
            &[("jobTitle", "SRE"), ("company", "Acme"), ("requirements", "Linux")],
            Some(("application/pdf", big.as_slice())),
        );
        let response = app(&mock).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_tone() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let request = multipart_request(
            &[
                ("jobTitle", "SRE"),
                ("company", "Acme"),
                ("requirements", "Linux"),
                ("tone", "sarcastic"),
            ],
            Some(("application/pdf", b"%PDF-1.4".as_slice())),
        );
        let response = app(&mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_parse_with_name() {
        let mock = MockGenerator::new(MockReply::Empty);
        let body = json!({
            "rawText": "Dear Hiring Manager,\n\nI am excited...\n\nJane Doe",
            "name": "Jane Doe"
        });
        let response = app(&mock)
            .oneshot(json_request("/api/v1/cover-letters/parse", body))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["paragraphs"], json!(["I am excited..."]));
    }

    #[tokio::test]
    async fn test_parse_without_salutation_is_empty() {
        let mock = MockGenerator::new(MockReply::Empty);
        let body = json!({ "rawText": "Hello there\n\nJane Doe", "name": "Jane Doe" });
        let response = app(&mock)
            .oneshot(json_request("/api/v1/cover-letters/parse", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["paragraphs"], json!([]));
    }

    #[tokio::test]
    async fn test_generate_unknown_tone_is_validation_error() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let mut body = generate_body();
        body["tone"] = json!("sarcastic");
        let response = app(&mock)
            .oneshot(json_request("/api/v1/cover-letters", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert!(json["error"]["message"].as_str().unwrap().contains("sarcastic"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_malformed_json_is_validation_error() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/cover-letters")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"jobDescription\": "))
            .unwrap();
        let response = app(&mock).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_wrong_content_type_is_validation_error() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/cover-letters")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(generate_body().to_string()))
            .unwrap();
        let response = app(&mock).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["message"], "Invalid content type");
    }

    #[tokio::test]
    async fn test_parse_missing_raw_text_is_validation_error() {
        let mock = MockGenerator::new(MockReply::Empty);
        let response = app(&mock)
            .oneshot(json_request("/api/v1/cover-letters/parse", json!({ "name": "Jane Doe" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_without_multipart_body_is_validation_error() {
        let mock = MockGenerator::new(MockReply::Text(REPLY.into()));
        let response = app(&mock)
            .oneshot(json_request("/api/v1/cover-letters/upload", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Invalid content type");
    }
}
