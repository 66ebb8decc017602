//! Domain error types
//!
//! This module defines the error hierarchy for phi-redact. Errors are
//! domain-specific and don't expose third-party types. Parse failures of
//! structured input are deliberately absent: they are recovered inside the
//! engine by falling back to plain-text redaction and never reach callers.

use thiserror::Error;

/// Main phi-redact error type
///
/// Every variant carries a message that is safe to show to the caller. No
/// variant ever embeds a PHI value.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// Bad or missing caller input, including a malformed encryption key
    #[error("Validation error: {0}")]
    Validation(String),

    /// Cipher failure while encrypting
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Cipher failure while decrypting (malformed envelope, wrong key, tampering)
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// Invalid pattern definition (bad regex, unknown category, duplicate name)
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization errors while rendering redacted output
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl RedactorError {
    /// Whether the caller can fix the problem by changing its input
    ///
    /// Every engine error is caller-correctable; I/O and serialization
    /// failures originate outside the caller's arguments.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Encryption(_)
                | Self::Decryption(_)
                | Self::Pattern(_)
                | Self::Configuration(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RedactorError {
    fn from(err: std::io::Error) -> Self {
        RedactorError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RedactorError {
    fn from(err: serde_json::Error) -> Self {
        RedactorError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RedactorError {
    fn from(err: toml::de::Error) -> Self {
        RedactorError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from regex compilation errors
impl From<regex::Error> for RedactorError {
    fn from(err: regex::Error) -> Self {
        RedactorError::Pattern(format!("Invalid regex: {err}"))
    }
}
