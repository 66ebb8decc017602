//! Pattern catalog for PHI detection
//!
//! The built-in rules live in `patterns/phi_patterns.toml`, embedded at
//! compile time and compiled once on first use. The compiled catalog is
//! shared read-only by every engine in the process; per-call additions go
//! through [`RedactionOptions::custom_patterns`](crate::redaction::RedactionOptions)
//! and never touch it.

use crate::domain::{RedactorError, Result};
use crate::redaction::models::{PhiCategory, Severity};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

/// Capture group that narrows a match to the PHI value itself
pub const VALUE_GROUP: &str = "value";

const BUILTIN_PATTERNS: &str = include_str!("../../../patterns/phi_patterns.toml");

static BUILTIN: OnceCell<Arc<PatternCatalog>> = OnceCell::new();

/// Pattern definition as written in a pattern library TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub severity: String,
    pub expression: String,
    pub replacement: String,
}

#[derive(Debug, Deserialize)]
struct PatternLibrary {
    #[serde(default = "default_library_version")]
    version: String,
    #[serde(default)]
    patterns: Vec<PatternDefinition>,
}

fn default_library_version() -> String {
    "0.0.0".to_string()
}

/// Compiled detection rule
#[derive(Debug, Clone)]
pub struct Pattern {
    pub name: String,
    pub description: String,
    pub category: PhiCategory,
    pub severity: Severity,
    pub regex: Regex,
    /// Literal token used when format preservation is off
    pub replacement: String,
    narrows_to_value: bool,
}

impl Pattern {
    /// Compile a pattern
    ///
    /// If `expression` defines a capture group named `value`, only that group
    /// is treated as PHI; the rest of the match is context that stays in the
    /// output.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: PhiCategory,
        severity: Severity,
        expression: &str,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RedactorError::Pattern("Pattern name must not be empty".to_string()));
        }

        let regex = Regex::new(expression)
            .map_err(|e| RedactorError::Pattern(format!("Invalid regex in pattern '{name}': {e}")))?;
        let narrows_to_value = regex
            .capture_names()
            .any(|group| group == Some(VALUE_GROUP));

        Ok(Self {
            name,
            description: description.into(),
            category,
            severity,
            regex,
            replacement: replacement.into(),
            narrows_to_value,
        })
    }

    fn from_definition(def: PatternDefinition) -> Result<Self> {
        let category: PhiCategory = def.category.parse().map_err(|_| {
            RedactorError::Pattern(format!(
                "Invalid category in pattern '{}': {}",
                def.name, def.category
            ))
        })?;
        let severity: Severity = def.severity.parse().map_err(|_| {
            RedactorError::Pattern(format!(
                "Invalid severity in pattern '{}': {}",
                def.name, def.severity
            ))
        })?;

        Self::new(
            def.name,
            def.description,
            category,
            severity,
            &def.expression,
            def.replacement,
        )
    }

    /// Find the next PHI span starting the search at byte offset `start`
    pub fn find_at(&self, haystack: &str, start: usize) -> Option<Range<usize>> {
        if !self.narrows_to_value {
            return self.regex.find_at(haystack, start).map(|m| m.range());
        }

        let captures = self.regex.captures_at(haystack, start)?;
        captures
            .name(VALUE_GROUP)
            .or_else(|| captures.get(0))
            .map(|m| m.range())
    }

    /// The source expression
    pub fn expression(&self) -> &str {
        self.regex.as_str()
    }

    /// Serializable description of this pattern
    pub fn summary(&self) -> PatternSummary {
        PatternSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            severity: self.severity,
            expression: self.expression().to_string(),
            replacement: self.replacement.clone(),
        }
    }
}

/// Pattern metadata as listed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSummary {
    pub name: String,
    pub description: String,
    pub category: PhiCategory,
    pub severity: Severity,
    pub expression: String,
    pub replacement: String,
}

/// Ordered, immutable set of patterns
#[derive(Debug)]
pub struct PatternCatalog {
    version: String,
    patterns: Vec<Pattern>,
}

impl PatternCatalog {
    /// The built-in catalog, compiled on first use
    pub fn builtin() -> Result<Arc<PatternCatalog>> {
        BUILTIN
            .get_or_try_init(|| -> Result<Arc<PatternCatalog>> {
                let catalog = Self::from_toml(BUILTIN_PATTERNS)?;
                tracing::debug!(
                    version = %catalog.version,
                    patterns = catalog.len(),
                    "Built-in pattern catalog compiled"
                );
                Ok(Arc::new(catalog))
            })
            .cloned()
    }

    /// Load a pattern library from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RedactorError::Io(format!(
                "Failed to read pattern library {}: {e}",
                path.as_ref().display()
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Build a catalog from TOML content
    ///
    /// Pattern order is kept as written. Duplicate names are rejected.
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content).map_err(|e| {
            RedactorError::Pattern(format!("Failed to parse pattern library TOML: {e}"))
        })?;

        let mut seen = HashSet::new();
        let mut patterns = Vec::with_capacity(library.patterns.len());
        for def in library.patterns {
            if !seen.insert(def.name.clone()) {
                return Err(RedactorError::Pattern(format!(
                    "Duplicate pattern name: {}",
                    def.name
                )));
            }
            patterns.push(Pattern::from_definition(def)?);
        }

        Ok(Self {
            version: library.version,
            patterns,
        })
    }

    /// Catalog version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// All patterns, in catalog order
    pub fn all_patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Patterns of one category
    pub fn by_category(&self, category: PhiCategory) -> Vec<&Pattern> {
        self.patterns
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Patterns at or above a severity
    pub fn by_min_severity(&self, severity: Severity) -> Vec<&Pattern> {
        self.patterns
            .iter()
            .filter(|p| p.severity >= severity)
            .collect()
    }

    /// Look up a pattern by name
    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Take the patterns out, e.g. to use them as per-call custom patterns
    pub fn into_patterns(self) -> Vec<Pattern> {
        self.patterns
    }
}
