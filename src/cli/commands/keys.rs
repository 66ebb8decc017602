//! Key generation and validation commands

use crate::cli::{EXIT_INVALID, EXIT_OK};
use crate::redaction::cipher;
use clap::Args;

/// Arguments for the generate-key command
#[derive(Args, Debug, Default)]
pub struct GenerateKeyArgs {
    /// Print as a JSON object with the key and its fingerprint
    #[arg(long)]
    pub json: bool,
}

impl GenerateKeyArgs {
    /// Execute the generate-key command
    pub fn execute(&self) -> anyhow::Result<i32> {
        let key = cipher::generate_key();
        let fingerprint = cipher::key_fingerprint(&key);
        tracing::info!(key_id = %fingerprint, "Encryption key generated");

        if self.json {
            let rendered = serde_json::to_string(&serde_json::json!({
                "key": key,
                "fingerprint": fingerprint,
            }))?;
            println!("{rendered}");
        } else {
            println!("{key}");
        }
        Ok(EXIT_OK)
    }
}

/// Arguments for the validate-key command
#[derive(Args, Debug)]
pub struct ValidateKeyArgs {
    /// Key to check
    pub key: String,
}

impl ValidateKeyArgs {
    /// Execute the validate-key command
    pub fn execute(&self) -> anyhow::Result<i32> {
        if cipher::validate_key_strength(self.key.trim()) {
            println!("✅ Key is valid (256-bit, hex encoded)");
            Ok(EXIT_OK)
        } else {
            println!(
                "❌ Key is invalid: expected {} hexadecimal characters, got {}",
                cipher::KEY_HEX_LEN,
                self.key.trim().chars().count()
            );
            Ok(EXIT_INVALID)
        }
    }
}
