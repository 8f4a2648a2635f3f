//! Candidate input normalizer — validates a job/candidate pair before any
//! prompt is built. Reshapes only; content is never rewritten.

use crate::errors::AppError;
use crate::models::{CandidateProfile, JobDescription};

/// A job/candidate pair that passed validation. Only constructible through
/// `normalize`, so the compiler can rely on its invariants.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedInput<'a> {
    pub job: &'a JobDescription,
    pub candidate: &'a CandidateProfile,
}

/// Validates the pair. Fails with `AppError::Validation` when:
/// - job title, company or requirements is blank
/// - raw résumé text is blank
/// - a structured profile has no full name or no experience entries
pub fn normalize<'a>(
    job: &'a JobDescription,
    candidate: &'a CandidateProfile,
) -> Result<NormalizedInput<'a>, AppError> {
    require_non_blank(&job.title, "Job title is required")?;
    require_non_blank(&job.company, "Company is required")?;
    require_non_blank(&job.requirements, "Requirements is required")?;

    match candidate {
        CandidateProfile::RawText(text) => {
            require_non_blank(text, "Resume text is empty")?;
        }
        CandidateProfile::Structured(profile) => {
            require_non_blank(&profile.fullname, "Fullname is required")?;
            if profile.experience.is_empty() {
                return Err(AppError::Validation(
                    "At least one experience entry is required".to_string(),
                ));
            }
        }
    }

    Ok(NormalizedInput { job, candidate })
}

fn require_non_blank(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}
