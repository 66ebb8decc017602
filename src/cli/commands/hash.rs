//! Hash command implementation
//!
//! Produces salted Argon2 digests suitable for audit trails, or verifies a
//! value against an existing digest.

use super::read_input;
use crate::cli::{EXIT_INVALID, EXIT_OK};
use crate::log_error_with_context;
use crate::redaction::cipher;
use clap::Args;

/// Arguments for the hash command
#[derive(Args, Debug, Default)]
pub struct HashArgs {
    /// Value to hash (reads stdin when omitted)
    pub value: Option<String>,

    /// Salt of at least 8 bytes; random when omitted
    #[arg(short, long)]
    pub salt: Option<String>,

    /// Verify the value against this digest instead of hashing
    #[arg(long, conflicts_with = "salt")]
    pub verify: Option<String>,
}

impl HashArgs {
    /// Execute the hash command
    pub fn execute(&self) -> anyhow::Result<i32> {
        let value = read_input(self.value.as_deref(), None)?;
        let value = value.trim_end_matches(['\r', '\n']);

        let outcome = match &self.verify {
            Some(digest) => cipher::verify_hash(value, digest).map(|matched| {
                if matched {
                    println!("✅ Value matches digest");
                    EXIT_OK
                } else {
                    println!("❌ Value does not match digest");
                    EXIT_INVALID
                }
            }),
            None => cipher::hash(value, self.salt.as_deref()).map(|digest| {
                println!("{digest}");
                EXIT_OK
            }),
        };

        match outcome {
            Ok(code) => Ok(code),
            Err(e) => {
                log_error_with_context!(&e, "Hashing failed");
                eprintln!("Error: {e}");
                Ok(EXIT_INVALID)
            }
        }
    }
}
