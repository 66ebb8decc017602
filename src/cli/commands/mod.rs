//! CLI command implementations

pub mod decrypt;
pub mod hash;
pub mod init;
pub mod keys;
pub mod patterns;
pub mod redact;
pub mod validate;

use anyhow::Context;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Resolve command input from an inline argument, a file, or stdin
pub(crate) fn read_input(inline: Option<&str>, file: Option<&Path>) -> anyhow::Result<String> {
    if let Some(text) = inline {
        return Ok(text.to_string());
    }

    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read input from stdin")?;
    Ok(buffer)
}

/// Write command output to a file, or stdout with a trailing newline
pub(crate) fn write_output(content: &str, file: Option<&PathBuf>) -> anyhow::Result<()> {
    match file {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write output file {}", path.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}
