//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for phi-redact using clap.
//! Every command returns a process exit code:
//!
//! | code | meaning                                  |
//! |------|------------------------------------------|
//! | 0    | success                                  |
//! | 2    | configuration or validation error        |
//! | 5    | fatal error (I/O, serialization)         |

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Exit code for success
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration and validation errors
pub const EXIT_INVALID: i32 = 2;
/// Exit code for fatal errors
pub const EXIT_FATAL: i32 = 5;

/// phi-redact - PHI detection and masking
#[derive(Parser, Debug)]
#[command(name = "phi-redact")]
#[command(version, about, long_about = None)]
#[command(author = "phi-redact Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults to phi-redact.toml when present)
    #[arg(short, long, env = "PHI_REDACT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redact PHI from text, JSON or XML
    Redact(commands::redact::RedactArgs),

    /// Decrypt an encrypted redaction output
    Decrypt(commands::decrypt::DecryptArgs),

    /// Generate a random 256-bit encryption key
    GenerateKey(commands::keys::GenerateKeyArgs),

    /// Check that a key is 64 hexadecimal characters
    ValidateKey(commands::keys::ValidateKeyArgs),

    /// List the built-in detection patterns
    ListPatterns(commands::patterns::ListPatternsArgs),

    /// Compute or verify a salted Argon2 digest of a value
    Hash(commands::hash::HashArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
