//! Input format detection

use crate::domain::RedactorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Document format of a redaction input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Xml,
    Text,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = RedactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "text" | "txt" | "plain" => Ok(Self::Text),
            _ => Err(RedactorError::Validation(format!(
                "Unknown document format: {s}"
            ))),
        }
    }
}

/// Classify raw input
///
/// The result is advisory: a string that looks like XML may still fail to
/// parse, in which case the engine redacts it as text.
pub fn detect(input: &str) -> DocumentFormat {
    let trimmed = input.trim();

    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return DocumentFormat::Json;
    }

    if trimmed.starts_with('<') && trimmed.contains('>') {
        return DocumentFormat::Xml;
    }

    DocumentFormat::Text
}
