//! Configuration schema types

use crate::config::SecretString;
use crate::domain::{RedactorError, Result};
use crate::redaction::{cipher, PatternCatalog, PhiCategory, RedactionOptions};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main phi-redact configuration
///
/// Root structure of the TOML file. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactorConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Default redaction options
    #[serde(default)]
    pub redaction: RedactionConfig,

    /// Output encryption
    #[serde(default)]
    pub encryption: EncryptionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RedactorConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.application.validate()?;
        self.redaction.validate()?;
        self.encryption.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Build the per-call options this configuration describes
    ///
    /// Loads the custom pattern library when one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the custom pattern file cannot be read or compiled.
    pub fn redaction_options(&self) -> Result<RedactionOptions> {
        let mut options = RedactionOptions::default()
            .with_preserve_format(self.redaction.preserve_format)
            .with_mask_char(self.redaction.mask_char);

        if !self.redaction.categories.is_empty() {
            options = options.with_categories(self.redaction.categories.iter().copied());
        }

        if let Some(path) = &self.redaction.custom_patterns_file {
            let catalog = PatternCatalog::from_file(path)?;
            tracing::debug!(
                path = %path.display(),
                patterns = catalog.len(),
                "Custom patterns loaded"
            );
            options.custom_patterns = catalog.into_patterns();
        }

        if self.encryption.enabled {
            let key = self.encryption.key.clone().ok_or_else(|| {
                RedactorError::Configuration(
                    "encryption.enabled is set but no encryption.key is configured".to_string(),
                )
            })?;
            options = options.with_encryption_key(key);
        }

        Ok(options)
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Default redaction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Use shape-preserving masks instead of replacement tokens
    #[serde(default = "default_true")]
    pub preserve_format: bool,

    /// Fill character for generic masks
    #[serde(default = "default_mask_char")]
    pub mask_char: char,

    /// Categories to apply; empty means all
    #[serde(default)]
    pub categories: Vec<PhiCategory>,

    /// TOML pattern library applied as custom patterns on every call
    #[serde(default)]
    pub custom_patterns_file: Option<PathBuf>,
}

impl RedactionConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.mask_char.is_whitespace() || self.mask_char.is_control() {
            return Err(format!(
                "redaction.mask_char must be a visible character, got {:?}",
                self.mask_char
            ));
        }

        if let Some(path) = &self.custom_patterns_file {
            if !path.exists() {
                return Err(format!(
                    "redaction.custom_patterns_file not found: {}",
                    path.display()
                ));
            }
        }

        Ok(())
    }
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            preserve_format: true,
            mask_char: default_mask_char(),
            categories: Vec::new(),
            custom_patterns_file: None,
        }
    }
}

/// Output encryption configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// Encrypt redacted output
    #[serde(default)]
    pub enabled: bool,

    /// 64-hex-character AES-256 key
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default, skip_serializing)]
    pub key: Option<SecretString>,
}

impl EncryptionConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        match (&self.key, self.enabled) {
            (None, true) => Err("Encryption enabled but encryption.key not provided".to_string()),
            (Some(key), _) if !cipher::validate_key_strength(key.expose_secret().as_ref()) => {
                Err(format!(
                    "encryption.key must be {} hexadecimal characters",
                    cipher::KEY_HEX_LEN
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path must be set when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_mask_char() -> char {
    '*'
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
