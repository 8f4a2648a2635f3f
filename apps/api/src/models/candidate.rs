//! Candidate input: either a structured profile from the form, or raw résumé
//! text pulled out of an uploaded document.

use serde::{Deserialize, Deserializer, Serialize};

/// Exactly one of the two input shapes.
///
/// On the wire a JSON object is a structured profile and a JSON string is raw
/// résumé text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateProfile {
    Structured(StructuredProfile),
    RawText(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredProfile {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub duration: String,
    /// Free text. A JSON list is accepted and joined with ", ".
    #[serde(default, deserialize_with = "text_or_list")]
    pub achievements: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    /// The form sends a string, older clients send a number.
    #[serde(default, deserialize_with = "text_or_number")]
    pub graduation_year: String,
}

impl CandidateProfile {
    /// The candidate's full name, when the input shape carries one.
    pub fn full_name(&self) -> Option<&str> {
        match self {
            CandidateProfile::Structured(profile) => Some(profile.fullname.trim()),
            CandidateProfile::RawText(_) => None,
        }
    }
}

fn text_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrList {
        Text(String),
        List(Vec<String>),
    }

    Ok(match TextOrList::deserialize(deserializer)? {
        TextOrList::Text(s) => s,
        TextOrList::List(items) => items.join(", "),
    })
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(i64),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Number(n) => n.to_string(),
    })
}
