//! Redaction data models

use crate::config::SecretString;
use crate::domain::{RedactorError, Result};
use crate::redaction::catalog::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// PHI category
///
/// A closed set; category filters are set-membership checks over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhiCategory {
    /// Names, SSNs, licence and passport numbers, vehicle identifiers
    DirectIdentifier,
    /// Medical record, health plan, provider and device identifiers
    HealthcareIdentifier,
    /// Dates related to an individual and ages over 89
    Temporal,
    /// Street addresses and ZIP codes
    Geographic,
    /// Phone, fax, email, URLs and IP addresses
    Contact,
    /// Card, bank account and routing numbers
    Financial,
    /// Biometric identifiers and photographs
    Biometric,
    /// Diagnosis codes, prescription and specimen numbers
    Clinical,
}

impl PhiCategory {
    /// Every category, in declaration order
    pub const ALL: [PhiCategory; 8] = [
        Self::DirectIdentifier,
        Self::HealthcareIdentifier,
        Self::Temporal,
        Self::Geographic,
        Self::Contact,
        Self::Financial,
        Self::Biometric,
        Self::Clinical,
    ];

    /// Stable snake_case identifier used in configuration and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectIdentifier => "direct_identifier",
            Self::HealthcareIdentifier => "healthcare_identifier",
            Self::Temporal => "temporal",
            Self::Geographic => "geographic",
            Self::Contact => "contact",
            Self::Financial => "financial",
            Self::Biometric => "biometric",
            Self::Clinical => "clinical",
        }
    }
}

impl fmt::Display for PhiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PhiCategory {
    type Err = RedactorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "direct_identifier" | "direct" => Ok(Self::DirectIdentifier),
            "healthcare_identifier" | "healthcare" => Ok(Self::HealthcareIdentifier),
            "temporal" | "date" => Ok(Self::Temporal),
            "geographic" | "location" => Ok(Self::Geographic),
            "contact" => Ok(Self::Contact),
            "financial" => Ok(Self::Financial),
            "biometric" => Ok(Self::Biometric),
            "clinical" => Ok(Self::Clinical),
            _ => Err(RedactorError::Validation(format!("Unknown PHI category: {s}"))),
        }
    }
}

/// Match severity, totally ordered `High > Medium > Low`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = RedactorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            _ => Err(RedactorError::Validation(format!("Unknown severity: {s}"))),
        }
    }
}

/// A single detection
///
/// `start` and `length` are byte offsets into the string fragment that was
/// being scanned when the match was found. For structured documents that is
/// the leaf string, already rewritten by any pattern applied before this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub pattern_name: String,
    pub category: PhiCategory,
    pub start: usize,
    pub length: usize,
    pub severity: Severity,
}

impl Match {
    pub(crate) fn new(pattern: &Pattern, start: usize, length: usize) -> Self {
        Self {
            pattern_name: pattern.name.clone(),
            category: pattern.category,
            start,
            length,
            severity: pattern.severity,
        }
    }
}

/// Per-call redaction settings
#[derive(Debug, Clone)]
pub struct RedactionOptions {
    /// Shape-preserving masks instead of the pattern's replacement token
    pub preserve_format: bool,
    /// Fill character for the generic mask
    pub mask_char: char,
    /// 64-hex-character key; when set the final output is encrypted
    pub encryption_key: Option<SecretString>,
    /// Restrict built-in patterns to these categories
    pub categories: Option<HashSet<PhiCategory>>,
    /// Extra patterns for this call only, applied alongside the catalog
    pub custom_patterns: Vec<Pattern>,
}

impl Default for RedactionOptions {
    fn default() -> Self {
        Self {
            preserve_format: true,
            mask_char: '*',
            encryption_key: None,
            categories: None,
            custom_patterns: Vec::new(),
        }
    }
}

impl RedactionOptions {
    /// Sets whether shape-preserving masking is used
    pub fn with_preserve_format(mut self, preserve_format: bool) -> Self {
        self.preserve_format = preserve_format;
        self
    }

    /// Sets the generic mask character
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// Sets the encryption key
    pub fn with_encryption_key(mut self, key: SecretString) -> Self {
        self.encryption_key = Some(key);
        self
    }

    /// Restricts the built-in catalog to the given categories
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = PhiCategory>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    /// Adds a custom pattern for this call
    pub fn with_custom_pattern(mut self, pattern: Pattern) -> Self {
        self.custom_patterns.push(pattern);
        self
    }

    /// Whether a built-in pattern of this category applies
    pub fn allows(&self, category: PhiCategory) -> bool {
        self.categories
            .as_ref()
            .map_or(true, |allowed| allowed.contains(&category))
    }
}

/// Outcome of a single `redact` call
///
/// Built fresh per call; it owns all of its data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionResult {
    /// Input exactly as received; never serialized
    #[serde(skip_serializing, default)]
    pub original: String,
    /// Masked output, or an encryption envelope when `encrypted` is set
    pub redacted: String,
    /// Matches in detection order
    pub matches: Vec<Match>,
    pub encrypted: bool,
}

impl RedactionResult {
    pub(crate) fn new(
        original: String,
        redacted: String,
        matches: Vec<Match>,
        encrypted: bool,
    ) -> Self {
        Self {
            original,
            redacted,
            matches,
            encrypted,
        }
    }

    /// Total number of matches
    pub fn total_matches(&self) -> usize {
        self.matches.len()
    }

    /// Check if any PHI was detected
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Match counts, total and per severity
    pub fn summary(&self) -> RedactionSummary {
        let mut summary = RedactionSummary {
            total_matches: self.matches.len(),
            ..RedactionSummary::default()
        };
        for m in &self.matches {
            match m.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }
        summary
    }

    /// Serializable view handed back to transport callers
    ///
    /// The original input is reduced to its length so the report itself
    /// never echoes PHI.
    pub fn report(&self) -> RedactionReport<'_> {
        RedactionReport {
            original_length: self.original.chars().count(),
            redacted: &self.redacted,
            matches: &self.matches,
            encrypted: self.encrypted,
            summary: self.summary(),
        }
    }

    /// JSON form of [`report`](Self::report)
    pub fn to_report_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.report())?)
    }
}

/// Match totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionSummary {
    pub total_matches: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Transport-facing serialization of a [`RedactionResult`]
#[derive(Debug, Serialize)]
pub struct RedactionReport<'a> {
    pub original_length: usize,
    pub redacted: &'a str,
    pub matches: &'a [Match],
    pub encrypted: bool,
    pub summary: RedactionSummary,
}
