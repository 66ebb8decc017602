//! Domain error and result types.
//!
//! phi-redact reports every failure through [`RedactorError`]:
//!
//! - [`RedactorError::Validation`] - bad caller input, including a malformed
//!   encryption key (raised before any text is scanned)
//! - [`RedactorError::Encryption`] / [`RedactorError::Decryption`] - cipher failures
//! - [`RedactorError::Pattern`] - invalid custom pattern definitions
//! - [`RedactorError::Configuration`] - configuration file problems
//!
//! ```rust
//! use phi_redact::domain::{RedactorError, Result};
//!
//! fn check(key: &str) -> Result<()> {
//!     if key.len() != 64 {
//!         return Err(RedactorError::Validation("key must be 64 hex characters".into()));
//!     }
//!     Ok(())
//! }
//! assert!(check("nothex").is_err());
//! ```

pub mod errors;
pub mod result;

pub use errors::RedactorError;
pub use result::Result;
