//! XML <-> [`Node`] conversion
//!
//! The document is a [`Node::Map`] of top-level entries. Each element is a
//! [`Node::Map`] keyed by child tag name, plus reserved keys that can never
//! collide with an XML name:
//!
//! | key            | node                         |
//! |----------------|------------------------------|
//! | `@name`        | attribute value (text leaf)  |
//! | `#text`        | character data (text leaf)   |
//! | `#cdata`       | CDATA section (text leaf)    |
//! | `#comment`     | comment body (text leaf)     |
//! | `?…` / `!…`    | declaration, PI or doctype, kept verbatim |
//!
//! Entries keep document order, so rendering reproduces the element and
//! attribute layout of the input.

use super::{Node, ParseFailure};
use crate::domain::{RedactorError, Result};
use crate::redaction::format::DocumentFormat;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::Value;

const TEXT_KEY: &str = "#text";
const CDATA_KEY: &str = "#cdata";
const COMMENT_KEY: &str = "#comment";
const ATTRIBUTE_PREFIX: char = '@';

struct OpenElement {
    name: String,
    entries: Vec<(String, Node)>,
}

fn failure(message: impl Into<String>) -> ParseFailure {
    ParseFailure::new(DocumentFormat::Xml, message)
}

/// Parse an XML document into a tree
///
/// Fails unless the input is well formed with exactly one root element.
pub fn parse(input: &str) -> std::result::Result<Node, ParseFailure> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_comments = true;

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut document: Vec<(String, Node)> = Vec::new();
    let mut roots = 0usize;

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| failure(e.to_string()))?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(start) => {
                stack.push(OpenElement {
                    name: element_name(&start)?,
                    entries: attributes(&start)?,
                });
            }
            Event::Empty(start) => {
                let name = element_name(&start)?;
                let node = Node::Map(attributes(&start)?);
                attach_element(&mut stack, &mut document, &mut roots, name, node);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| failure("closing tag without matching start"))?;
                attach_element(
                    &mut stack,
                    &mut document,
                    &mut roots,
                    element.name,
                    Node::Map(element.entries),
                );
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| failure(e.to_string()))?
                    .into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.entries.push((TEXT_KEY.to_string(), Node::Text(text))),
                    None if text.trim().is_empty() => {
                        document.push((TEXT_KEY.to_string(), Node::Text(text)))
                    }
                    None => return Err(failure("character data outside the root element")),
                }
            }
            Event::CData(cdata) => {
                let parent = stack
                    .last_mut()
                    .ok_or_else(|| failure("CDATA outside the root element"))?;
                let text = std::str::from_utf8(&cdata).map_err(|e| failure(e.to_string()))?;
                parent
                    .entries
                    .push((CDATA_KEY.to_string(), Node::Text(text.to_string())));
            }
            Event::Comment(comment) => {
                let text = std::str::from_utf8(&comment).map_err(|e| failure(e.to_string()))?;
                let entry = (COMMENT_KEY.to_string(), Node::Text(text.to_string()));
                match stack.last_mut() {
                    Some(parent) => parent.entries.push(entry),
                    None => document.push(entry),
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {
                let raw = input
                    .get(before..after)
                    .ok_or_else(|| failure("markup spans an invalid byte range"))?;
                let entry = (verbatim_key(raw), Node::Fixed(Value::String(raw.to_string())));
                match stack.last_mut() {
                    Some(parent) => parent.entries.push(entry),
                    None => document.push(entry),
                }
            }
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(failure(format!("unclosed element <{}>", open.name)));
    }
    if roots != 1 {
        return Err(failure(format!("expected one root element, found {roots}")));
    }

    Ok(Node::Map(document))
}

fn element_name(start: &BytesStart<'_>) -> std::result::Result<String, ParseFailure> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_string)
        .map_err(|e| failure(e.to_string()))
}

fn attributes(start: &BytesStart<'_>) -> std::result::Result<Vec<(String, Node)>, ParseFailure> {
    let mut entries = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| failure(e.to_string()))?;
        let key = std::str::from_utf8(attribute.key.as_ref()).map_err(|e| failure(e.to_string()))?;
        let value = attribute
            .unescape_value()
            .map_err(|e| failure(e.to_string()))?
            .into_owned();
        entries.push((format!("{ATTRIBUTE_PREFIX}{key}"), Node::Text(value)));
    }
    Ok(entries)
}

fn attach_element(
    stack: &mut [OpenElement],
    document: &mut Vec<(String, Node)>,
    roots: &mut usize,
    name: String,
    node: Node,
) {
    match stack.last_mut() {
        Some(parent) => parent.entries.push((name, node)),
        None => {
            *roots += 1;
            document.push((name, node));
        }
    }
}

/// `?xml`, `?xml-stylesheet`, `!DOCTYPE` and so on
fn verbatim_key(raw: &str) -> String {
    raw.trim_start_matches('<')
        .split(|c: char| c.is_whitespace() || c == '>' || c == '[')
        .next()
        .unwrap_or("?")
        .trim_end_matches('?')
        .to_string()
}

/// Render a tree produced by [`parse`] back to XML
pub fn render(node: &Node) -> Result<String> {
    let Node::Map(entries) = node else {
        return Err(RedactorError::Serialization(
            "XML document must be a map of top-level entries".to_string(),
        ));
    };

    let mut writer = Writer::new(Vec::new());
    write_entries(&mut writer, entries)?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| RedactorError::Serialization(format!("XML output is not UTF-8: {e}")))
}

fn write_entries(writer: &mut Writer<Vec<u8>>, entries: &[(String, Node)]) -> Result<()> {
    for (key, node) in entries {
        match (key.as_str(), node) {
            (k, _) if k.starts_with(ATTRIBUTE_PREFIX) => {}
            (TEXT_KEY, Node::Text(text)) => write_event(writer, Event::Text(BytesText::new(text)))?,
            (CDATA_KEY, Node::Text(text)) => {
                write_event(writer, Event::CData(BytesCData::new(text.as_str())))?
            }
            (COMMENT_KEY, Node::Text(text)) => {
                let body = comment_body(text);
                write_event(writer, Event::Comment(BytesText::from_escaped(body.as_str())))?
            }
            (_, Node::Fixed(Value::String(raw))) if key.starts_with(['?', '!']) => {
                writer.get_mut().extend_from_slice(raw.as_bytes());
            }
            (name, node) => write_element(writer, name, node)?,
        }
    }
    Ok(())
}

/// Comment text with `--` runs split and no trailing `-`, which a mask
/// built from `-` would otherwise produce.
fn comment_body(text: &str) -> String {
    let mut body = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '-' && body.ends_with('-') {
            body.push(' ');
        }
        body.push(c);
    }
    if body.ends_with('-') {
        body.push(' ');
    }
    body
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, node: &Node) -> Result<()> {
    match node {
        Node::Map(entries) => {
            let mut start = BytesStart::new(name);
            for (key, value) in entries {
                if let (Some(attr), Node::Text(value)) = (key.strip_prefix(ATTRIBUTE_PREFIX), value) {
                    start.push_attribute((attr, value.as_str()));
                }
            }

            let has_content = entries
                .iter()
                .any(|(key, _)| !key.starts_with(ATTRIBUTE_PREFIX));
            if !has_content {
                return write_event(writer, Event::Empty(start));
            }

            write_event(writer, Event::Start(start.borrow()))?;
            write_entries(writer, entries)?;
            write_event(writer, Event::End(BytesEnd::new(name)))
        }
        Node::Text(text) => {
            write_event(writer, Event::Start(BytesStart::new(name)))?;
            write_event(writer, Event::Text(BytesText::new(text)))?;
            write_event(writer, Event::End(BytesEnd::new(name)))
        }
        other => Err(RedactorError::Serialization(format!(
            "Cannot render <{name}> from {other:?}"
        ))),
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| RedactorError::Serialization(format!("XML write failed: {e}")))
}
