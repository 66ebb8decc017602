//! List-patterns command implementation

use crate::cli::EXIT_OK;
use crate::redaction::{PatternSummary, PhiCategory, RedactionEngine, Severity};
use anyhow::Context;
use clap::Args;

/// Arguments for the list-patterns command
#[derive(Args, Debug, Default)]
pub struct ListPatternsArgs {
    /// Only list patterns in this category
    #[arg(long)]
    pub category: Option<PhiCategory>,

    /// Only list patterns at or above this severity
    #[arg(long)]
    pub min_severity: Option<Severity>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,

    /// Print only the number of matching patterns
    #[arg(long)]
    pub count: bool,
}

impl ListPatternsArgs {
    /// Execute the list-patterns command
    pub fn execute(&self) -> anyhow::Result<i32> {
        let engine = RedactionEngine::new().context("Failed to load pattern catalog")?;
        let patterns = self.select(&engine);

        if self.count {
            println!("{}", patterns.len());
        } else if self.json {
            println!("{}", serde_json::to_string_pretty(&patterns)?);
        } else {
            println!(
                "Pattern catalog v{} ({} patterns)",
                engine.catalog().version(),
                patterns.len()
            );
            println!();
            for p in &patterns {
                println!(
                    "  {:<24} {:<22} {:<7} {}",
                    p.name, p.category, p.severity, p.description
                );
            }
        }

        Ok(EXIT_OK)
    }

    fn select(&self, engine: &RedactionEngine) -> Vec<PatternSummary> {
        engine
            .list_patterns(self.category)
            .into_iter()
            .filter(|p| self.min_severity.map_or(true, |min| p.severity >= min))
            .collect()
    }
}
