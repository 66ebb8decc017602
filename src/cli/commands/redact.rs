//! Redact command implementation
//!
//! Reads input from an argument, a file or stdin, redacts it with the
//! configured defaults plus any flag overrides, and writes the JSON report
//! (or only the redacted payload) to stdout or a file.

use super::{read_input, write_output};
use crate::cli::{EXIT_INVALID, EXIT_OK};
use crate::config::{load_config_or_default, secret_string};
use crate::domain::{RedactorError, Result};
use crate::log_error_with_context;
use crate::redaction::{
    DocumentFormat, PhiCategory, RedactionEngine, RedactionOptions, RedactionResult,
};
use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the redact command
#[derive(Args, Debug, Default)]
pub struct RedactArgs {
    /// Text to redact (reads --input or stdin when omitted)
    pub text: Option<String>,

    /// Read input from a file
    #[arg(short, long, conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Force the input format (json, xml, text); detected when omitted
    #[arg(short, long)]
    pub format: Option<DocumentFormat>,

    /// Replace matches with tokens such as [SSN] instead of shaped masks
    #[arg(long)]
    pub no_preserve_format: bool,

    /// Fill character for generic masks, which keep the first and last
    /// character and the length of a value
    #[arg(long)]
    pub mask_char: Option<char>,

    /// Only apply these categories (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<PhiCategory>,

    /// Encrypt the output with this 64-hex-character key
    #[arg(long)]
    pub encryption_key: Option<String>,

    /// Print only the redacted payload instead of the JSON report
    #[arg(long)]
    pub redacted_only: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

impl RedactArgs {
    /// Execute the redact command
    pub fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let options = match self.options(config_path) {
            Ok(options) => options,
            Err(e) => {
                log_error_with_context!(&e, "Failed to resolve redaction options");
                eprintln!("Error: {e}");
                return Ok(EXIT_INVALID);
            }
        };

        let input = read_input(self.text.as_deref(), self.input.as_deref())?;
        let engine = RedactionEngine::new().context("Failed to load pattern catalog")?;

        let result = match self.format {
            Some(format) => engine.redact_with_format(&input, format, &options),
            None => engine.redact(&input, &options),
        };

        let result = match result {
            Ok(result) => result,
            Err(e) if e.is_caller_error() => {
                log_error_with_context!(&e, "Redaction rejected");
                eprintln!("Error: {e}");
                return Ok(EXIT_INVALID);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            matches = result.total_matches(),
            encrypted = result.encrypted,
            "Redaction finished"
        );

        write_output(&self.render(&result)?, self.output.as_ref())?;
        Ok(EXIT_OK)
    }

    /// Configured defaults with command-line overrides applied
    fn options(&self, config_path: Option<&Path>) -> Result<RedactionOptions> {
        let config = load_config_or_default(config_path)?;
        let mut options = config.redaction_options()?;

        if self.no_preserve_format {
            options.preserve_format = false;
        }
        if let Some(mask_char) = self.mask_char {
            if mask_char.is_whitespace() || mask_char.is_control() {
                return Err(RedactorError::Validation(format!(
                    "Mask character must be visible, got {mask_char:?}"
                )));
            }
            options.mask_char = mask_char;
        }
        if !self.categories.is_empty() {
            options = options.with_categories(self.categories.iter().copied());
        }
        if let Some(key) = &self.encryption_key {
            options = options.with_encryption_key(secret_string(key.clone()));
        }

        Ok(options)
    }

    fn render(&self, result: &RedactionResult) -> anyhow::Result<String> {
        if self.redacted_only {
            return Ok(result.redacted.clone());
        }

        let report = result.to_report_json()?;
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        rendered.context("Failed to serialize redaction report")
    }
}
