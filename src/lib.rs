// phi-redact - PHI Detection and Masking
// Copyright (c) 2025 phi-redact Contributors
// Licensed under the MIT License

//! # phi-redact - PHI Detection and Masking
//!
//! phi-redact finds Protected Health Information in free text, JSON and XML
//! with a catalog of regular-expression rules, masks it while keeping the
//! document structure intact, and can encrypt the result.
//!
//! Detection is pattern based. It catches well-formed identifiers (SSNs,
//! phone numbers, record numbers, dates) and labelled values ("Patient John
//! Doe", "MRN: 00123456"); it does not recognise unlabelled names or other
//! free-form entities.
//!
//! ## Architecture
//!
//! - [`redaction`] - Pattern catalog, cipher, format detection, redaction engine
//! - [`domain`] - Error type and result alias
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`cli`] - Command-line interface and argument parsing
//!
//! ## Quick Start
//!
//! ```rust
//! use phi_redact::redaction::{RedactionEngine, RedactionOptions};
//!
//! # fn main() -> Result<(), phi_redact::domain::RedactorError> {
//! let engine = RedactionEngine::new()?;
//! let result = engine.redact(
//!     "Patient John Doe, SSN: 123-45-6789, phone (555) 123-4567",
//!     &RedactionOptions::default(),
//! )?;
//!
//! assert_eq!(
//!     result.redacted,
//!     "Patient J******e, SSN: XXX-XX-XXXX, phone (XXX) XXX-XXXX"
//! );
//! println!("{} matches", result.summary().total_matches);
//! # Ok(())
//! # }
//! ```
//!
//! ## Encryption
//!
//! When an encryption key is supplied the whole redacted output is encrypted
//! with AES-256-GCM:
//!
//! ```rust
//! use phi_redact::config::secret_string;
//! use phi_redact::redaction::{cipher, RedactionEngine, RedactionOptions};
//!
//! # fn main() -> Result<(), phi_redact::domain::RedactorError> {
//! let key = cipher::generate_key();
//! let options = RedactionOptions::default().with_encryption_key(secret_string(key.clone()));
//!
//! let result = RedactionEngine::new()?.redact("DOB: 01/02/1980", &options)?;
//! assert!(result.encrypted);
//! assert_eq!(cipher::decrypt(&result.redacted, &key)?, "DOB: 0********0");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library calls return [`domain::Result`]. Structured input that fails to
//! parse is not an error: it is redacted as plain text.

pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod redaction;
