//! Redaction engine
//!
//! The [`RedactionEngine`] applies the pattern catalog to free text, JSON or
//! XML input and returns a [`RedactionResult`].
//!
//! # Algorithm
//!
//! 1. Validate the encryption key, if one is set, before scanning anything.
//! 2. Resolve the applicable patterns: built-ins allowed by the category
//!    filter, then the call's custom patterns, stable-sorted by descending
//!    severity.
//! 3. Redact by format. Plain text is scanned pattern by pattern; every
//!    pattern sees the output of the previous one. JSON and XML are parsed
//!    into a [`Node`] tree and the same text pass runs over each string leaf.
//!    Input that fails to parse is redacted as plain text.
//! 4. Encrypt the final output as a whole when a key is set.
//!
//! Overlapping patterns are resolved by application order: once a
//! higher-severity pattern has masked a span, a later pattern only sees the
//! mask.
//!
//! # Examples
//!
//! ```
//! use phi_redact::redaction::{RedactionEngine, RedactionOptions};
//!
//! let engine = RedactionEngine::new()?;
//! let result = engine.redact("SSN 123-45-6789", &RedactionOptions::default())?;
//!
//! assert_eq!(result.redacted, "SSN XXX-XX-XXXX");
//! assert_eq!(result.matches[0].pattern_name, "ssn");
//! # Ok::<(), phi_redact::domain::RedactorError>(())
//! ```

use crate::domain::{RedactorError, Result};
use crate::log_redaction_complete;
use crate::redaction::{
    catalog::{Pattern, PatternCatalog, PatternSummary},
    cipher,
    format::{detect, DocumentFormat},
    models::{Match, PhiCategory, RedactionOptions, RedactionResult},
    tree::{json, xml, Node},
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Instant;

/// PHI redaction engine
///
/// Holds only a shared, immutable pattern catalog. Calls keep all of their
/// state on the stack, so one engine can serve any number of threads.
///
/// # Examples
///
/// ```
/// use phi_redact::redaction::{PhiCategory, RedactionEngine, RedactionOptions};
///
/// let engine = RedactionEngine::new()?;
/// let options = RedactionOptions::default()
///     .with_preserve_format(false)
///     .with_categories([PhiCategory::Contact]);
///
/// let result = engine.redact("Mail jane@example.com, SSN 123-45-6789", &options)?;
/// assert_eq!(result.redacted, "Mail [EMAIL], SSN 123-45-6789");
/// # Ok::<(), phi_redact::domain::RedactorError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RedactionEngine {
    catalog: Arc<PatternCatalog>,
}

impl RedactionEngine {
    /// Create an engine over the built-in catalog
    ///
    /// # Errors
    ///
    /// Returns [`RedactorError::Pattern`] if the embedded pattern library fails
    /// to compile.
    pub fn new() -> Result<Self> {
        Ok(Self::with_catalog(PatternCatalog::builtin()?))
    }

    /// Create an engine over a specific catalog
    pub fn with_catalog(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    /// The catalog this engine applies
    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Redact PHI from `input`, detecting its format
    ///
    /// # Arguments
    ///
    /// * `input` - Free text, a JSON document or an XML document
    /// * `options` - Masking, filtering and encryption settings for this call
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The encryption key is not 64 hexadecimal characters ([`RedactorError::Validation`])
    /// - Encrypting the output fails
    ///
    /// Structured input that does not parse is never an error; it is redacted
    /// as plain text instead.
    pub fn redact(&self, input: &str, options: &RedactionOptions) -> Result<RedactionResult> {
        self.redact_with_format(input, detect(input), options)
    }

    /// Redact PHI from `input`, treating it as `format`
    ///
    /// Same contract as [`redact`](Self::redact), skipping detection.
    pub fn redact_with_format(
        &self,
        input: &str,
        format: DocumentFormat,
        options: &RedactionOptions,
    ) -> Result<RedactionResult> {
        let started = Instant::now();

        let key = options
            .encryption_key
            .as_ref()
            .map(|key| key.expose_secret().as_ref());
        if let Some(key) = key {
            if !cipher::validate_key_strength(key) {
                return Err(RedactorError::Validation(format!(
                    "Encryption key must be {} hexadecimal characters",
                    cipher::KEY_HEX_LEN
                )));
            }
        }

        let patterns = self.applicable_patterns(options);
        let mut matches = Vec::new();

        let (redacted, applied_format) = match format {
            DocumentFormat::Text => (
                redact_text(input, &patterns, options, &mut matches),
                DocumentFormat::Text,
            ),
            DocumentFormat::Json => match json::parse(input) {
                Ok(mut tree) => {
                    redact_tree(&mut tree, &patterns, options, &mut matches);
                    (json::render(tree)?, DocumentFormat::Json)
                }
                Err(failure) => {
                    tracing::debug!(error = %failure, "Redacting as plain text");
                    (
                        redact_text(input, &patterns, options, &mut matches),
                        DocumentFormat::Text,
                    )
                }
            },
            DocumentFormat::Xml => match xml::parse(input) {
                Ok(mut tree) => {
                    redact_tree(&mut tree, &patterns, options, &mut matches);
                    (xml::render(&tree)?, DocumentFormat::Xml)
                }
                Err(failure) => {
                    tracing::debug!(error = %failure, "Redacting as plain text");
                    (
                        redact_text(input, &patterns, options, &mut matches),
                        DocumentFormat::Text,
                    )
                }
            },
        };

        let (redacted, encrypted) = match key {
            Some(key) => (cipher::encrypt(&redacted, key)?, true),
            None => (redacted, false),
        };

        log_redaction_complete!(applied_format, matches.len(), encrypted, started.elapsed());

        Ok(RedactionResult::new(
            input.to_string(),
            redacted,
            matches,
            encrypted,
        ))
    }

    /// Describe the built-in patterns, optionally limited to one category
    pub fn list_patterns(&self, category: Option<PhiCategory>) -> Vec<PatternSummary> {
        self.catalog
            .all_patterns()
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .map(Pattern::summary)
            .collect()
    }

    /// Number of built-in patterns
    pub fn pattern_count(&self) -> usize {
        self.catalog.len()
    }

    /// Kept for callers that manage engine lifecycles
    ///
    /// The engine holds no per-call state, so there is nothing to clear; the
    /// call is only recorded.
    pub fn clear_cache(&self) {
        tracing::info!(patterns = self.catalog.len(), "Redaction cache cleared");
    }

    fn applicable_patterns<'a>(&'a self, options: &'a RedactionOptions) -> Vec<&'a Pattern> {
        let mut patterns: Vec<&Pattern> = self
            .catalog
            .all_patterns()
            .iter()
            .filter(|p| options.allows(p.category))
            .chain(options.custom_patterns.iter())
            .collect();

        // sort_by is stable: catalog order holds within a severity
        patterns.sort_by(|a, b| b.severity.cmp(&a.severity));
        patterns
    }
}

fn redact_tree(
    tree: &mut Node,
    patterns: &[&Pattern],
    options: &RedactionOptions,
    matches: &mut Vec<Match>,
) {
    tree.for_each_text_mut(&mut |leaf: &mut String| {
        *leaf = redact_text(leaf, patterns, options, matches);
    });
}

/// Run every pattern over `text` in order, rewriting as it goes
fn redact_text(
    text: &str,
    patterns: &[&Pattern],
    options: &RedactionOptions,
    matches: &mut Vec<Match>,
) -> String {
    let mut current = text.to_string();

    for pattern in patterns {
        let mut cursor = 0;
        while cursor <= current.len() {
            let Some(span) = pattern.find_at(&current, cursor) else {
                break;
            };

            if span.is_empty() {
                cursor = next_char_boundary(&current, span.start);
                continue;
            }

            let replacement = if options.preserve_format {
                cipher::mask_data(&current[span.clone()], options.mask_char, true)
            } else {
                pattern.replacement.clone()
            };

            matches.push(Match::new(pattern, span.start, span.len()));
            cursor = span.start + replacement.len();
            current.replace_range(span, &replacement);
        }
    }

    current
}

/// Byte offset just past the character at `at`, or one past the end
fn next_char_boundary(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| at + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::redaction::models::Severity;

    fn engine() -> RedactionEngine {
        RedactionEngine::new().unwrap()
    }

    fn custom(name: &str, severity: Severity, expression: &str, replacement: &str) -> Pattern {
        Pattern::new(
            name,
            "test pattern",
            PhiCategory::Clinical,
            severity,
            expression,
            replacement,
        )
        .unwrap()
    }

    #[test]
    fn test_redact_plain_text_ssn() {
        let result = engine()
            .redact("SSN: 123-45-6789", &RedactionOptions::default())
            .unwrap();

        assert_eq!(result.redacted, "SSN: XXX-XX-XXXX");
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].start, 5);
        assert_eq!(result.matches[0].length, 11);
        assert!(!result.encrypted);
    }

    #[test]
    fn test_no_phi_returns_input() {
        let input = "The quick brown fox jumps over the lazy dog";
        let result = engine().redact(input, &RedactionOptions::default()).unwrap();
        assert_eq!(result.redacted, input);
        assert!(!result.has_matches());
    }

    #[test]
    fn test_empty_input() {
        let result = engine().redact("", &RedactionOptions::default()).unwrap();
        assert_eq!(result.redacted, "");
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_invalid_key_rejected_before_scanning() {
        let options =
            RedactionOptions::default().with_encryption_key(secret_string("nothex".to_string()));
        let err = engine().redact("SSN 123-45-6789", &options).unwrap_err();
        assert!(matches!(err, RedactorError::Validation(_)));
    }

    #[test]
    fn test_patterns_sorted_by_severity() {
        let engine = engine();
        let options = RedactionOptions::default();
        let patterns = engine.applicable_patterns(&options);

        assert!(patterns
            .windows(2)
            .all(|pair| pair[0].severity >= pair[1].severity));
        assert_eq!(patterns.len(), engine.pattern_count());
    }

    #[test]
    fn test_custom_patterns_ignore_category_filter() {
        let engine = engine();
        let options = RedactionOptions::default()
            .with_categories([PhiCategory::Contact])
            .with_custom_pattern(custom("ward", Severity::Low, r"Ward \d+", "[WARD]"));
        let patterns = engine.applicable_patterns(&options);

        assert!(patterns.iter().any(|p| p.name == "ward"));
        assert!(patterns
            .iter()
            .filter(|p| p.name != "ward")
            .all(|p| p.category == PhiCategory::Contact));
    }

    #[test]
    fn test_zero_width_matches_are_skipped() {
        let pattern = custom("empty", Severity::High, r"x*", "[X]");
        let options = RedactionOptions::default().with_preserve_format(false);
        let mut matches = Vec::new();

        let output = redact_text("abxc", &[&pattern], &options, &mut matches);

        assert_eq!(output, "ab[X]c");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 2);
    }

    #[test]
    fn test_zero_width_on_multibyte_text() {
        let pattern = custom("empty", Severity::High, r"z*", "[Z]");
        let mut matches = Vec::new();
        let output = redact_text("ëé", &[&pattern], &RedactionOptions::default(), &mut matches);
        assert_eq!(output, "ëé");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_replacement_does_not_rescan() {
        let pattern = custom("digits", Severity::High, r"\d+", "[0]");
        let options = RedactionOptions::default().with_preserve_format(false);
        let mut matches = Vec::new();

        let output = redact_text("a1b22", &[&pattern], &options, &mut matches);

        assert_eq!(output, "a[0]b[0]");
        assert_eq!(matches.len(), 2);
        // offsets are into the string as rewritten so far
        assert_eq!(matches[1].start, 5);
    }

    #[test]
    fn test_list_patterns_filter() {
        let engine = engine();
        let contact = engine.list_patterns(Some(PhiCategory::Contact));
        assert!(!contact.is_empty());
        assert!(contact.iter().all(|p| p.category == PhiCategory::Contact));
        assert_eq!(engine.list_patterns(None).len(), engine.pattern_count());
    }

    #[test]
    fn test_clear_cache_is_harmless() {
        let engine = engine();
        engine.clear_cache();
        let result = engine
            .redact("SSN 123-45-6789", &RedactionOptions::default())
            .unwrap();
        assert_eq!(result.total_matches(), 1);
    }

    #[test]
    fn test_next_char_boundary() {
        assert_eq!(next_char_boundary("aé", 0), 1);
        assert_eq!(next_char_boundary("aé", 1), 3);
        assert_eq!(next_char_boundary("aé", 3), 4);
    }
}
