//! Configuration management for phi-redact.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation. Configuration only supplies defaults for the CLI; the library
//! engine takes everything it needs through
//! [`RedactionOptions`](crate::redaction::RedactionOptions).
//!
//! # Overview
//!
//! phi-redact uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PHI_REDACT_*` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use phi_redact::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("phi-redact.toml")?;
//! let options = config.redaction_options()?;
//!
//! println!("Preserve format: {}", options.preserve_format);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [redaction]
//! preserve_format = true
//! mask_char = "*"
//! categories = ["direct_identifier", "contact"]
//!
//! [encryption]
//! enabled = true
//! key = "${PHI_REDACT_KEY}"
//!
//! [logging]
//! local_enabled = true
//! local_path = "./logs"
//! local_rotation = "daily"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, DEFAULT_CONFIG_FILE};
pub use schema::{
    ApplicationConfig, EncryptionConfig, LoggingConfig, RedactionConfig, RedactorConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
