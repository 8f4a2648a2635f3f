use serde::{Deserialize, Serialize};

/// The target job, supplied per request.
///
/// Fields default to empty so that missing values reach the normalizer and
/// produce a descriptive validation error instead of a generic JSON rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
}
