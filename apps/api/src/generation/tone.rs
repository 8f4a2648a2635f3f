//! Generation options: desired tone and length of the letter.
//!
//! Both are advisory. They are written into the prompt as plain words and
//! nothing checks that the model honored them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Enthusiastic,
    Technical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Detailed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub length: Length,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Technical => "technical",
        }
    }
}

impl Length {
    pub fn as_str(self) -> &'static str {
        match self {
            Length::Short => "short",
            Length::Medium => "medium",
            Length::Detailed => "detailed",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "professional" => Ok(Tone::Professional),
            "enthusiastic" => Ok(Tone::Enthusiastic),
            "technical" => Ok(Tone::Technical),
            other => Err(AppError::Validation(format!(
                "Unknown tone '{other}': expected professional, enthusiastic or technical"
            ))),
        }
    }
}

impl FromStr for Length {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Length::Short),
            "medium" => Ok(Length::Medium),
            "detailed" => Ok(Length::Detailed),
            other => Err(AppError::Validation(format!(
                "Unknown length '{other}': expected short, medium or detailed"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let o = GenerationOptions::default();
        assert_eq!(o.tone, Tone::Professional);
        assert_eq!(o.length, Length::Medium);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let o: GenerationOptions = serde_json::from_str(r#"{"tone": "technical"}"#).unwrap();
        assert_eq!(o.tone, Tone::Technical);
        assert_eq!(o.length, Length::Medium);
    }

    #[test]
    fn test_unknown_tone_rejected_by_serde() {
        assert!(serde_json::from_str::<GenerationOptions>(r#"{"tone": "sarcastic"}"#).is_err());
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Enthusiastic".parse::<Tone>().unwrap(), Tone::Enthusiastic);
        assert_eq!(" DETAILED ".parse::<Length>().unwrap(), Length::Detailed);
    }

    #[test]
    fn test_from_str_unknown_is_validation_error() {
        let err = "long".parse::<Length>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_display_matches_wire_names() {
        assert_eq!(Tone::Technical.to_string(), "technical");
        assert_eq!(Length::Short.to_string(), "short");
        assert_eq!(serde_json::to_string(&Tone::Technical).unwrap(), "\"technical\"");
    }
}
