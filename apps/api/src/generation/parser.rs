//! Output parser — turns raw model text into display paragraphs.
//!
//! The body is whatever sits between the literal salutation and the first
//! later occurrence of the candidate's name. If the name also appears inside
//! the body, the body is cut short at that point. That is a known limitation
//! and kept as-is.

use regex::Regex;
use tracing::debug;

pub const SALUTATION: &str = "Dear Hiring Manager,";

/// Extracts the letter body delimited by the salutation and `name`, then
/// splits it into paragraphs. Never fails: no match yields no paragraphs.
pub fn parse_letter_body(raw_text: &str, name: &str) -> Vec<String> {
    split_paragraphs(extract_body(raw_text, name).unwrap_or_default())
}

/// Returns the trimmed text between the salutation and the first subsequent
/// occurrence of `name`, or `None` when either delimiter is missing.
pub fn extract_body<'a>(raw_text: &'a str, name: &str) -> Option<&'a str> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    // The name is matched literally, never as a pattern.
    let pattern = format!(
        "(?s){}(.*?){}",
        regex::escape(SALUTATION),
        regex::escape(name)
    );
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            debug!("Letter body pattern rejected: {e}");
            return None;
        }
    };

    re.captures(raw_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Splits on blank lines (`"\n\n"`), trims each piece and drops empty ones.
/// Relative order is preserved.
pub fn split_paragraphs(body: &str) -> Vec<String> {
    body.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
