//! Decrypt command implementation

use super::{read_input, write_output};
use crate::cli::{EXIT_INVALID, EXIT_OK};
use crate::config::load_config_or_default;
use crate::log_error_with_context;
use crate::redaction::cipher;
use clap::Args;
use secrecy::ExposeSecret;
use std::path::{Path, PathBuf};

/// Arguments for the decrypt command
#[derive(Args, Debug, Default)]
pub struct DecryptArgs {
    /// Envelope to decrypt (reads --input or stdin when omitted)
    pub envelope: Option<String>,

    /// Read the envelope from a file
    #[arg(short, long, conflicts_with = "envelope")]
    pub input: Option<PathBuf>,

    /// Write plaintext to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Decryption key; falls back to encryption.key from the configuration
    #[arg(short, long)]
    pub key: Option<String>,
}

impl DecryptArgs {
    /// Execute the decrypt command
    pub fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let key = match &self.key {
            Some(key) => key.clone(),
            None => {
                let configured = load_config_or_default(config_path)
                    .ok()
                    .and_then(|config| config.encryption.key)
                    .map(|key| key.expose_secret().as_ref().to_string());
                match configured {
                    Some(key) => key,
                    None => {
                        eprintln!("Error: no key given; pass --key or set encryption.key");
                        return Ok(EXIT_INVALID);
                    }
                }
            }
        };

        let envelope = read_input(self.envelope.as_deref(), self.input.as_deref())?;

        match cipher::decrypt(&envelope, &key) {
            Ok(plaintext) => {
                write_output(&plaintext, self.output.as_ref())?;
                Ok(EXIT_OK)
            }
            Err(e) => {
                log_error_with_context!(&e, "Decryption failed");
                eprintln!("Error: {e}");
                Ok(EXIT_INVALID)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_decrypt_roundtrip_to_file() {
        let key = cipher::generate_key();
        let envelope = cipher::encrypt("Patient J******e", &key).unwrap();
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("plain.txt");

        let args = DecryptArgs {
            envelope: Some(envelope),
            output: Some(output.clone()),
            key: Some(key),
            ..Default::default()
        };

        assert_eq!(args.execute(None).unwrap(), EXIT_OK);
        assert_eq!(std::fs::read_to_string(output).unwrap(), "Patient J******e");
    }

    #[test]
    fn test_decrypt_wrong_key_exit_code() {
        let envelope = cipher::encrypt("secret", &cipher::generate_key()).unwrap();
        let args = DecryptArgs {
            envelope: Some(envelope),
            key: Some(cipher::generate_key()),
            ..Default::default()
        };

        assert_eq!(args.execute(None).unwrap(), EXIT_INVALID);
    }
}
