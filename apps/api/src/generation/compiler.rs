//! Prompt compiler — renders one deterministic prompt string from a validated
//! job/candidate pair, generation options and a prompt dialect.
//!
//! Pure: no clock, no randomness, no I/O. The same inputs always produce the
//! same bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::normalizer::{normalize, NormalizedInput};
use crate::generation::prompts::{
    DESCRIPTIVE_PROMPT_TEMPLATE, EDUCATION_ITEM_TEMPLATE, EXPERIENCE_LINE_TEMPLATE,
    GUIDELINES_TEMPLATE, RAW_CANDIDATE_TEMPLATE, RESPONSIBILITIES_LINE,
    RESUME_TAILORING_PROMPT_TEMPLATE, STRUCTURED_CANDIDATE_TEMPLATE,
};
use crate::generation::tone::GenerationOptions;
use crate::models::{CandidateProfile, JobDescription, StructuredProfile};

/// Which prompt shape to send. Chosen per deployment alongside the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptDialect {
    /// Summarizes the candidate and asks for a letter.
    #[default]
    Descriptive,
    /// Embeds the résumé verbatim and asks the model to tailor it.
    ResumeTailoring,
}

impl fmt::Display for PromptDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PromptDialect::Descriptive => "descriptive",
            PromptDialect::ResumeTailoring => "resume_tailoring",
        })
    }
}

impl FromStr for PromptDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "descriptive" => Ok(PromptDialect::Descriptive),
            "resume_tailoring" | "resume-tailoring" => Ok(PromptDialect::ResumeTailoring),
            other => Err(format!(
                "unknown prompt dialect '{other}': expected descriptive or resume_tailoring"
            )),
        }
    }
}

/// Validates the inputs, then compiles them. Validation always runs first so a
/// bad request never reaches a backend.
pub fn compile_prompt(
    job: &JobDescription,
    candidate: &CandidateProfile,
    options: &GenerationOptions,
    dialect: PromptDialect,
) -> Result<String, AppError> {
    let input = normalize(job, candidate)?;
    Ok(compile_normalized(&input, options, dialect))
}

fn compile_normalized(
    input: &NormalizedInput<'_>,
    options: &GenerationOptions,
    dialect: PromptDialect,
) -> String {
    let job = input.job;
    let guidelines = fill_template(
        GUIDELINES_TEMPLATE,
        &[
            ("tone", options.tone.as_str()),
            ("length", options.length.as_str()),
        ],
    );
    let responsibilities = render_responsibilities(job);

    match dialect {
        PromptDialect::Descriptive => {
            let candidate = match input.candidate {
                CandidateProfile::Structured(profile) => render_structured(profile),
                CandidateProfile::RawText(text) => {
                    fill_template(RAW_CANDIDATE_TEMPLATE, &[("resume", text)])
                }
            };
            fill_template(
                DESCRIPTIVE_PROMPT_TEMPLATE,
                &[
                    ("title", &job.title),
                    ("company", &job.company),
                    ("requirements", &job.requirements),
                    ("responsibilities", &responsibilities),
                    ("candidate", &candidate),
                    ("guidelines", &guidelines),
                ],
            )
        }
        PromptDialect::ResumeTailoring => {
            let rendered;
            let resume: &str = match input.candidate {
                CandidateProfile::RawText(text) => text,
                CandidateProfile::Structured(profile) => {
                    rendered = render_structured(profile);
                    &rendered
                }
            };
            let fence = resume_fence(resume);
            fill_template(
                RESUME_TAILORING_PROMPT_TEMPLATE,
                &[
                    ("fence", &fence),
                    ("resume", resume),
                    ("title", &job.title),
                    ("company", &job.company),
                    ("requirements", &job.requirements),
                    ("responsibilities", &responsibilities),
                    ("guidelines", &guidelines),
                ],
            )
        }
    }
}

/// Fence tag around the embedded résumé. Lengthened until neither `<<<tag`
/// nor `tag>>>` occurs in the résumé, so the fence can't close early.
fn resume_fence(resume: &str) -> String {
    let mut tag = String::from("RESUME");
    while resume.contains(&format!("<<<{tag}")) || resume.contains(&format!("{tag}>>>")) {
        tag.push('=');
    }
    tag
}

fn render_responsibilities(job: &JobDescription) -> String {
    match job.responsibilities.as_deref().map(str::trim) {
        Some(r) if !r.is_empty() => fill_template(RESPONSIBILITIES_LINE, &[("responsibilities", r)]),
        _ => String::new(),
    }
}

fn render_structured(profile: &StructuredProfile) -> String {
    let education = profile
        .education
        .iter()
        .map(|edu| {
            fill_template(
                EDUCATION_ITEM_TEMPLATE,
                &[
                    ("degree", &edu.degree),
                    ("institution", &edu.institution),
                    ("year", &edu.graduation_year),
                ],
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let experience = profile
        .experience
        .iter()
        .map(|exp| {
            fill_template(
                EXPERIENCE_LINE_TEMPLATE,
                &[
                    ("role", &exp.role),
                    ("company", &exp.company),
                    ("duration", &exp.duration),
                    ("achievements", &exp.achievements),
                ],
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let skills = profile.skills.join(", ");

    fill_template(
        STRUCTURED_CANDIDATE_TEMPLATE,
        &[
            ("fullname", &profile.fullname),
            ("email", &profile.email),
            ("phone", &profile.phone),
            ("education", &education),
            ("skills", &skills),
            ("experience", &experience),
        ],
    )
}

/// Replaces `{key}` tokens in one left-to-right pass. Substituted values are
/// copied as-is and never scanned again. Unknown tokens are left untouched.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let replacement = after.find('}').and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, end))
        });

        match replacement {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
