//! Document tree shared by the structured formats
//!
//! JSON and XML inputs are both normalized into a [`Node`] tree so a single
//! traversal can redact their string leaves. Each format module converts in
//! both directions:
//!
//! - [`json`]: objects become [`Node::Map`], arrays [`Node::List`], strings
//!   [`Node::Text`], and every other scalar [`Node::Fixed`].
//! - [`xml`]: every element becomes a [`Node::Map`] whose entries use
//!   reserved keys for non-element content (see that module).

pub mod json;
pub mod xml;

use crate::redaction::format::DocumentFormat;
use thiserror::Error;

/// Normalized structured document
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// String leaf, subject to redaction
    Text(String),
    /// Ordered sequence
    List(Vec<Node>),
    /// Ordered key/value entries; keys are structure and are never redacted
    Map(Vec<(String, Node)>),
    /// Value carried through untouched
    Fixed(serde_json::Value),
}

impl Node {
    /// Visit every string leaf in document order
    pub fn for_each_text_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut String),
    {
        match self {
            Node::Text(text) => f(text),
            Node::List(items) => {
                for item in items {
                    item.for_each_text_mut(f);
                }
            }
            Node::Map(entries) => {
                for (_, value) in entries {
                    value.for_each_text_mut(f);
                }
            }
            Node::Fixed(_) => {}
        }
    }

    /// Number of string leaves
    pub fn text_leaf_count(&self) -> usize {
        match self {
            Node::Text(_) => 1,
            Node::List(items) => items.iter().map(Node::text_leaf_count).sum(),
            Node::Map(entries) => entries.iter().map(|(_, v)| v.text_leaf_count()).sum(),
            Node::Fixed(_) => 0,
        }
    }
}

/// Structured input that could not be parsed
///
/// Recovered by redacting the input as plain text; never returned to callers.
#[derive(Debug, Error)]
#[error("{format} parse failed: {message}")]
pub struct ParseFailure {
    pub format: DocumentFormat,
    pub message: String,
}

impl ParseFailure {
    pub(crate) fn new(format: DocumentFormat, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
        }
    }
}
