//! PHI redaction
//!
//! Pattern-based detection and masking of Protected Health Information in
//! free text, JSON and XML.
//!
//! # Components
//!
//! - [`catalog`]: the ordered, versioned set of built-in detection rules
//! - [`cipher`]: encryption envelopes, key handling, hashing and value masks
//! - [`format`]: input format detection
//! - [`tree`]: the node tree JSON and XML are normalized into
//! - [`engine`]: the [`RedactionEngine`] tying them together
//!
//! # Example
//!
//! ```
//! use phi_redact::redaction::{RedactionEngine, RedactionOptions};
//!
//! let engine = RedactionEngine::new()?;
//! let result = engine.redact(
//!     r#"{"patient":{"name":"Jane Smith","ssn":"987-65-4321"}}"#,
//!     &RedactionOptions::default(),
//! )?;
//!
//! assert_eq!(
//!     result.redacted,
//!     r#"{"patient":{"name":"Jane Smith","ssn":"XXX-XX-XXXX"}}"#
//! );
//! # Ok::<(), phi_redact::domain::RedactorError>(())
//! ```

pub mod catalog;
pub mod cipher;
pub mod engine;
pub mod format;
pub mod models;
pub mod tree;

pub use catalog::{Pattern, PatternCatalog, PatternSummary};
pub use engine::RedactionEngine;
pub use format::{detect, DocumentFormat};
pub use models::{
    Match, PhiCategory, RedactionOptions, RedactionReport, RedactionResult, RedactionSummary,
    Severity,
};
