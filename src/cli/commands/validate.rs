//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the phi-redact configuration file.

use crate::cli::{EXIT_INVALID, EXIT_OK};
use crate::config::{load_config_or_default, DEFAULT_CONFIG_FILE};
use crate::redaction::RedactionEngine;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let shown = config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        tracing::info!(config_path = %shown, "Validating configuration");

        println!("🔍 Validating configuration file: {shown}");
        println!();

        let config = match load_config_or_default(config_path) {
            Ok(c) => {
                println!("✅ Configuration loaded and valid");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(EXIT_INVALID);
            }
        };

        // Loading custom patterns compiles them, which catches bad regexes
        let options = match config.redaction_options() {
            Ok(options) => options,
            Err(e) => {
                println!("❌ Redaction settings are invalid");
                println!("   Error: {e}");
                return Ok(EXIT_INVALID);
            }
        };

        let builtin = RedactionEngine::new()
            .map(|engine| engine.pattern_count())
            .unwrap_or(0);

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Preserve Format: {}", options.preserve_format);
        println!("  Mask Character: {}", options.mask_char);
        if config.redaction.categories.is_empty() {
            println!("  Categories: all");
        } else {
            let names: Vec<&str> = config
                .redaction
                .categories
                .iter()
                .map(|c| c.as_str())
                .collect();
            println!("  Categories: {}", names.join(", "));
        }
        println!("  Built-in Patterns: {builtin}");
        println!("  Custom Patterns: {}", options.custom_patterns.len());
        println!("  Encryption: {}", if config.encryption.enabled { "enabled" } else { "disabled" });
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                format!("{} ({})", config.logging.local_path, config.logging.local_rotation)
            } else {
                "disabled".to_string()
            }
        );
        println!();
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_valid_config() {
        let file = write_config("[redaction]\nmask_char = \"#\"\n");
        assert_eq!(ValidateArgs {}.execute(Some(file.path())).unwrap(), EXIT_OK);
    }

    #[test]
    fn test_invalid_config() {
        let file = write_config("[logging]\nlocal_rotation = \"weekly\"\n");
        assert_eq!(
            ValidateArgs {}.execute(Some(file.path())).unwrap(),
            EXIT_INVALID
        );
    }

    #[test]
    fn test_bad_custom_pattern_file() {
        let patterns = write_config(
            "[[patterns]]\nname = \"x\"\ncategory = \"clinical\"\nseverity = \"low\"\nexpression = '(bad'\nreplacement = \"[X]\"\n",
        );
        let config = write_config(&format!(
            "[redaction]\ncustom_patterns_file = {:?}\n",
            patterns.path().display().to_string()
        ));
        assert_eq!(
            ValidateArgs {}.execute(Some(config.path())).unwrap(),
            EXIT_INVALID
        );
    }
}
