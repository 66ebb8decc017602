//! Integration tests for logging functionality
//!
//! The global subscriber can be installed once per process, so everything
//! that needs it lives in a single test.

use phi_redact::config::LoggingConfig;
use phi_redact::logging::init_logging;
use phi_redact::redaction::{RedactionEngine, RedactionOptions};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_file_logging_never_records_phi() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("debug", &config).expect("Failed to initialize logging");
    assert!(log_path.exists());

    // A second subscriber cannot be installed
    assert!(init_logging("debug", &LoggingConfig::default()).is_err());

    let engine = RedactionEngine::new().unwrap();
    engine
        .redact(
            "Patient John Doe, SSN: 123-45-6789",
            &RedactionOptions::default(),
        )
        .unwrap();
    engine
        .redact("<broken>SSN 987-65-4321", &RedactionOptions::default())
        .unwrap();
    drop(guard);

    let contents = fs::read_to_string(log_path.join("phi-redact.log")).unwrap();
    assert!(contents.contains("Redaction completed"));
    for line in contents.lines() {
        serde_json::from_str::<serde_json::Value>(line).expect("log line is not JSON");
    }
    for literal in ["John Doe", "123-45-6789", "987-65-4321"] {
        assert!(!contents.contains(literal), "{literal} reached the log file");
    }
}
