//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RedactorConfig;
use crate::config::secret_string;
use crate::domain::errors::RedactorError;
use crate::domain::result::Result;
use crate::redaction::PhiCategory;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "phi-redact.toml";

static ENV_PLACEHOLDER: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").ok());

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RedactorConfig
/// 4. Applies environment variable overrides (PHI_REDACT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use phi_redact::config::load_config;
///
/// let config = load_config("phi-redact.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RedactorConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RedactorError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RedactorError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: RedactorConfig = toml::from_str(&contents)
        .map_err(|e| RedactorError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(&mut config)?;
    Ok(config)
}

/// Load `path` if given, else the default file if present, else defaults
///
/// An explicitly named file must exist; the default file is optional.
/// Environment overrides and validation apply in every case.
pub fn load_config_or_default(path: Option<&Path>) -> Result<RedactorConfig> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config(DEFAULT_CONFIG_FILE),
        None => {
            let mut config = RedactorConfig::default();
            finish(&mut config)?;
            Ok(config)
        }
    }
}

fn finish(config: &mut RedactorConfig) -> Result<()> {
    apply_env_overrides(config)?;

    config.validate().map_err(|e| {
        RedactorError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported
/// together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = ENV_PLACEHOLDER.as_ref().ok_or_else(|| {
        RedactorError::Configuration("Environment placeholder pattern failed to compile".to_string())
    })?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RedactorError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(RedactorError::Configuration(format!(
            "{name} must be a boolean, got '{value}'"
        ))),
    }
}

/// Applies environment variable overrides using the PHI_REDACT_* prefix
///
/// Variables use the PHI_REDACT_ prefix, for example PHI_REDACT_MASK_CHAR
/// or PHI_REDACT_LOGGING_LOCAL_PATH. Setting PHI_REDACT_ENCRYPTION_KEY also
/// enables encryption.
fn apply_env_overrides(config: &mut RedactorConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("PHI_REDACT_LOG_LEVEL") {
        config.application.log_level = val.trim().to_lowercase();
    }

    // Redaction overrides
    if let Ok(val) = std::env::var("PHI_REDACT_PRESERVE_FORMAT") {
        config.redaction.preserve_format = parse_bool("PHI_REDACT_PRESERVE_FORMAT", &val)?;
    }
    if let Ok(val) = std::env::var("PHI_REDACT_MASK_CHAR") {
        let mut chars = val.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => config.redaction.mask_char = c,
            _ => {
                return Err(RedactorError::Configuration(format!(
                    "PHI_REDACT_MASK_CHAR must be a single character, got '{val}'"
                )))
            }
        }
    }
    if let Ok(val) = std::env::var("PHI_REDACT_CATEGORIES") {
        config.redaction.categories = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<PhiCategory>)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| RedactorError::Configuration(format!("PHI_REDACT_CATEGORIES: {e}")))?;
    }
    if let Ok(val) = std::env::var("PHI_REDACT_CUSTOM_PATTERNS_FILE") {
        config.redaction.custom_patterns_file = Some(val.into());
    }

    // Encryption overrides
    if let Ok(val) = std::env::var("PHI_REDACT_ENCRYPTION_KEY") {
        config.encryption.key = Some(secret_string(val.trim().to_string()));
        config.encryption.enabled = true;
    }
    if let Ok(val) = std::env::var("PHI_REDACT_ENCRYPTION_ENABLED") {
        config.encryption.enabled = parse_bool("PHI_REDACT_ENCRYPTION_ENABLED", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PHI_REDACT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_bool("PHI_REDACT_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("PHI_REDACT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("PHI_LOADER_TEST_VAR", "test_value");
        let input = "key = \"${PHI_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "key = \"test_value\"\n");
        std::env::remove_var("PHI_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("PHI_LOADER_MISSING_A");
        std::env::remove_var("PHI_LOADER_MISSING_B");
        let input = "a = \"${PHI_LOADER_MISSING_A}\"\nb = \"${PHI_LOADER_MISSING_B}\"";
        let err = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err.contains("PHI_LOADER_MISSING_A"));
        assert!(err.contains("PHI_LOADER_MISSING_B"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("PHI_LOADER_COMMENTED");
        let input = "# key = \"${PHI_LOADER_COMMENTED}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("nonexistent-phi-redact.toml").is_err());
    }
}
