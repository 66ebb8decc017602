//! JSON <-> [`Node`] conversion

use super::{Node, ParseFailure};
use crate::domain::Result;
use crate::redaction::format::DocumentFormat;
use serde_json::Value;

/// Parse JSON text into a tree
pub fn parse(input: &str) -> std::result::Result<Node, ParseFailure> {
    serde_json::from_str::<Value>(input)
        .map(from_value)
        .map_err(|e| ParseFailure::new(DocumentFormat::Json, e.to_string()))
}

/// Render a tree as compact JSON, keeping key order
pub fn render(node: Node) -> Result<String> {
    Ok(serde_json::to_string(&into_value(node))?)
}

fn from_value(value: Value) -> Node {
    match value {
        Value::String(text) => Node::Text(text),
        Value::Array(items) => Node::List(items.into_iter().map(from_value).collect()),
        Value::Object(object) => Node::Map(
            object
                .into_iter()
                .map(|(key, value)| (key, from_value(value)))
                .collect(),
        ),
        other => Node::Fixed(other),
    }
}

fn into_value(node: Node) -> Value {
    match node {
        Node::Text(text) => Value::String(text),
        Node::List(items) => Value::Array(items.into_iter().map(into_value).collect()),
        Node::Map(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key, into_value(value)))
                .collect(),
        ),
        Node::Fixed(value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_keeps_key_order_and_scalars() {
        let input = r#"{"zeta":"z","alpha":[1,"two",null,{"b":false,"a":1.5}]}"#;
        let node = parse(input).unwrap();
        assert_eq!(render(node).unwrap(), input);
    }

    #[test]
    fn test_strings_become_text_leaves() {
        let node = parse(r#"{"n":1,"s":"x","l":["y"]}"#).unwrap();
        assert_eq!(node.text_leaf_count(), 2);
    }

    #[test]
    fn test_output_is_compact() {
        let node = parse("{\n  \"a\" : [ 1 , 2 ]\n}").unwrap();
        assert_eq!(render(node).unwrap(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_invalid_json_fails() {
        let failure = parse(r#"{"a": }"#).unwrap_err();
        assert_eq!(failure.format, DocumentFormat::Json);
    }
}
