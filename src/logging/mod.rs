//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console logs on stderr
//! - Configurable log levels
//! - JSON file logging with rotation
//!
//! Log events carry pattern names, counts and lengths only. Matched values,
//! inputs and keys are never logged.
//!
//! # Example
//!
//! ```no_run
//! use phi_redact::logging::init_logging;
//! use phi_redact::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the completion of a redaction call
///
/// # Example
///
/// ```no_run
/// use phi_redact::log_redaction_complete;
/// use phi_redact::redaction::DocumentFormat;
/// use std::time::Duration;
///
/// log_redaction_complete!(DocumentFormat::Json, 3, false, Duration::from_millis(2));
/// ```
#[macro_export]
macro_rules! log_redaction_complete {
    ($format:expr, $matches:expr, $encrypted:expr, $duration:expr) => {
        tracing::debug!(
            format = %$format,
            matches = $matches,
            encrypted = $encrypted,
            duration_us = $duration.as_micros() as u64,
            "Redaction completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use phi_redact::log_error_with_context;
/// use phi_redact::domain::RedactorError;
///
/// let error = RedactorError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
