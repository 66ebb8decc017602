//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_FATAL, EXIT_INVALID, EXIT_OK};
use crate::config::DEFAULT_CONFIG_FILE;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Include commented examples for every setting
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing phi-redact configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_INVALID);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. To encrypt output, generate a key: phi-redact generate-key");
                println!("     and export it as PHI_REDACT_ENCRYPTION_KEY (or in .env)");
                println!("  3. Validate configuration: phi-redact validate-config");
                println!("  4. Redact: phi-redact redact --input note.txt");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# phi-redact configuration

[application]
log_level = "info"

[redaction]
preserve_format = true
mask_char = "*"

[encryption]
enabled = false

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# phi-redact configuration
#
# Values may reference environment variables with ${VAR_NAME}; every
# setting can also be overridden with a PHI_REDACT_* variable.

[application]
# trace | debug | info | warn | error
log_level = "info"

[redaction]
# true: shaped masks such as XXX-XX-XXXX and J******e
# false: replacement tokens such as [SSN] and [NAME]
preserve_format = true

# Fill character for generic masks
mask_char = "*"

# Restrict detection to these categories; empty applies all of them.
# direct_identifier | healthcare_identifier | temporal | geographic
# contact | financial | biometric | clinical
categories = []

# Extra patterns applied on every call, in the built-in library format:
#
#   [[patterns]]
#   name = "ward_number"
#   description = "Hospital ward"
#   category = "clinical"
#   severity = "low"
#   expression = 'Ward (?P<value>\d+)'
#   replacement = "[WARD]"
#
# custom_patterns_file = "./custom_patterns.toml"

[encryption]
# Encrypt the redacted output with AES-256-GCM
enabled = false
# 64 hex characters; generate with `phi-redact generate-key`
# key = "${PHI_REDACT_KEY}"

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedactorConfig;
    use tempfile::TempDir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: DEFAULT_CONFIG_FILE.to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "phi-redact.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_parse_and_validate() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config: RedactorConfig = toml::from_str(&content).unwrap();
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("phi-redact.toml");
        fs::write(&path, "# existing").unwrap();

        let mut args = InitArgs {
            output: path.to_string_lossy().to_string(),
            with_examples: true,
            force: false,
        };
        assert_eq!(args.execute().unwrap(), EXIT_INVALID);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# existing");

        args.force = true;
        assert_eq!(args.execute().unwrap(), EXIT_OK);
        assert!(fs::read_to_string(&path).unwrap().contains("[redaction]"));
    }
}
