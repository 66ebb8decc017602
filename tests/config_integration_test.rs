//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX so they do
//! not interfere with each other.

use phi_redact::config::{load_config, load_config_or_default, RedactorConfig};
use phi_redact::domain::RedactorError;
use phi_redact::redaction::{cipher, PhiCategory, RedactionEngine};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const TEST_KEY: &str = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for name in [
        "PHI_REDACT_LOG_LEVEL",
        "PHI_REDACT_PRESERVE_FORMAT",
        "PHI_REDACT_MASK_CHAR",
        "PHI_REDACT_CATEGORIES",
        "PHI_REDACT_CUSTOM_PATTERNS_FILE",
        "PHI_REDACT_ENCRYPTION_KEY",
        "PHI_REDACT_ENCRYPTION_ENABLED",
        "PHI_REDACT_LOGGING_LOCAL_ENABLED",
        "PHI_REDACT_LOGGING_LOCAL_PATH",
        "TEST_PHI_REDACT_KEY",
    ] {
        std::env::remove_var(name);
    }
}

fn write_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_file(&format!(
        r##"
[application]
log_level = "debug"

[redaction]
preserve_format = false
mask_char = "#"
categories = ["direct_identifier", "contact"]

[encryption]
enabled = true
key = "{TEST_KEY}"

[logging]
local_enabled = true
local_path = "/tmp/phi-redact-logs"
local_rotation = "hourly"
"##
    ));

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert!(!config.redaction.preserve_format);
    assert_eq!(config.redaction.mask_char, '#');
    assert_eq!(
        config.redaction.categories,
        vec![PhiCategory::DirectIdentifier, PhiCategory::Contact]
    );
    assert!(config.encryption.enabled);
    assert_eq!(
        config.encryption.key.as_ref().unwrap().expose_secret().as_ref(),
        TEST_KEY
    );
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");

    let options = config.redaction_options().unwrap();
    assert!(!options.preserve_format);
    assert!(options.encryption_key.is_some());
    assert!(options.allows(PhiCategory::Contact));
    assert!(!options.allows(PhiCategory::Financial));
}

#[test]
fn test_empty_file_uses_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_file("");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert!(config.redaction.preserve_format);
    assert_eq!(config.redaction.mask_char, '*');
    assert!(config.redaction.categories.is_empty());
    assert!(!config.encryption.enabled);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let err = load_config_or_default(Some(std::path::Path::new(
        "/nonexistent/phi-redact.toml",
    )))
    .unwrap_err();
    assert!(matches!(err, RedactorError::Configuration(_)));
}

#[test]
fn test_no_file_gives_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let config = load_config_or_default(None).unwrap();
    assert_eq!(config.application.log_level, "info");
}

#[test]
fn test_env_var_substitution() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_PHI_REDACT_KEY", TEST_KEY);

    let file = write_file(
        r#"
[encryption]
enabled = true
key = "${TEST_PHI_REDACT_KEY}"
"#,
    );
    let config = load_config(file.path());
    cleanup_env_vars();

    let config = config.expect("Failed to load config");
    assert_eq!(
        config.encryption.key.unwrap().expose_secret().as_ref(),
        TEST_KEY
    );
}

#[test]
fn test_missing_substitution_var_is_reported() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_file(
        r#"
# key = "${COMMENTED_OUT_VAR}"
[encryption]
key = "${TEST_PHI_REDACT_KEY}"
"#,
    );

    let err = load_config(file.path()).unwrap_err().to_string();
    assert!(err.contains("TEST_PHI_REDACT_KEY"));
    assert!(!err.contains("COMMENTED_OUT_VAR"));
}

#[test]
fn test_env_overrides() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("PHI_REDACT_LOG_LEVEL", "WARN");
    std::env::set_var("PHI_REDACT_PRESERVE_FORMAT", "false");
    std::env::set_var("PHI_REDACT_MASK_CHAR", "#");
    std::env::set_var("PHI_REDACT_CATEGORIES", "financial, contact");
    std::env::set_var("PHI_REDACT_ENCRYPTION_KEY", TEST_KEY);

    let file = write_file("[redaction]\nmask_char = \"*\"\n");
    let config = load_config(file.path());
    cleanup_env_vars();

    let config = config.expect("Failed to load config");
    assert_eq!(config.application.log_level, "warn");
    assert!(!config.redaction.preserve_format);
    assert_eq!(config.redaction.mask_char, '#');
    assert_eq!(
        config.redaction.categories,
        vec![PhiCategory::Financial, PhiCategory::Contact]
    );
    assert!(config.encryption.enabled);
}

#[test]
fn test_invalid_env_override_is_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    for (name, value) in [
        ("PHI_REDACT_CATEGORIES", "not_a_category"),
        ("PHI_REDACT_MASK_CHAR", "##"),
        ("PHI_REDACT_PRESERVE_FORMAT", "maybe"),
        ("PHI_REDACT_ENCRYPTION_KEY", "too-short"),
    ] {
        std::env::set_var(name, value);
        let result = load_config_or_default(None);
        cleanup_env_vars();
        assert!(result.is_err(), "{name}={value} was accepted");
    }
}

#[test]
fn test_validation_errors() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    for content in [
        "[application]\nlog_level = \"verbose\"\n",
        "[redaction]\nmask_char = \" \"\n",
        "[redaction]\ncategories = [\"unknown\"]\n",
        "[redaction]\ncustom_patterns_file = \"/nonexistent/patterns.toml\"\n",
        "[encryption]\nenabled = true\n",
        "[encryption]\nkey = \"abc\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ] {
        let file = write_file(content);
        assert!(
            load_config(file.path()).is_err(),
            "accepted invalid config:\n{content}"
        );
    }
}

#[test]
fn test_custom_patterns_file_feeds_the_engine() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let patterns = write_file(
        r#"
version = "0.1.0"

[[patterns]]
name = "ward_number"
description = "Hospital ward"
category = "clinical"
severity = "low"
expression = 'Ward (?P<value>\d+)'
replacement = "[WARD]"
"#,
    );
    let file = write_file(&format!(
        "[redaction]\npreserve_format = false\ncustom_patterns_file = {:?}\n",
        patterns.path().display().to_string()
    ));

    let config = load_config(file.path()).unwrap();
    let options = config.redaction_options().unwrap();
    assert_eq!(options.custom_patterns.len(), 1);

    let result = RedactionEngine::new()
        .unwrap()
        .redact("Admitted to Ward 12, SSN 123-45-6789", &options)
        .unwrap();
    assert_eq!(result.redacted, "Admitted to Ward [WARD], SSN [SSN]");
}

#[test]
fn test_encryption_key_not_serialized() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_file(&format!("[encryption]\nkey = \"{TEST_KEY}\"\n"));
    let config = load_config(file.path()).unwrap();

    let rendered = toml::to_string(&config).unwrap();
    assert!(!rendered.contains(TEST_KEY));
    assert!(!format!("{config:?}").contains(TEST_KEY));

    let reparsed: RedactorConfig = toml::from_str(&rendered).unwrap();
    assert!(reparsed.encryption.key.is_none());
    assert!(cipher::validate_key_strength(TEST_KEY));
}
