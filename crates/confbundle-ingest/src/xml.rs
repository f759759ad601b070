//! Event-driven XML reader producing owned [`XmlNode`] trees.

use std::borrow::Cow;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};

use confbundle_model::XmlNode;

use crate::error::{IngestError, Result};

/// Parses a document and returns its root element.
///
/// Namespace prefixes are dropped from element and attribute names, so a
/// TEI `<tei:title>` and a plain `<title>` both become `title`.
pub fn parse_document(source: &str, path: &Path) -> Result<XmlNode> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(ref e)) => stack.push(start_node(e)),
            Ok(Event::Empty(ref e)) => attach(&mut stack, &mut root, start_node(e)),
            Ok(Event::End(_)) => {
                if let Some(node) = stack.pop() {
                    attach(&mut stack, &mut root, node);
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(top) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(e);
                    top.text.push_str(&unescape_lossy(&raw));
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Ok(Event::GeneralRef(ref e)) => {
                if let Some(top) = stack.last_mut() {
                    let name = String::from_utf8_lossy(e);
                    top.text.push_str(&resolve_reference(&name));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(error) => {
                return Err(IngestError::XmlParse {
                    path: path.to_path_buf(),
                    position,
                    message: error.to_string(),
                });
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(IngestError::XmlParse {
            path: path.to_path_buf(),
            position: reader.buffer_position(),
            message: format!("unclosed element <{}>", open.name),
        });
    }
    root.ok_or_else(|| IngestError::XmlParse {
        path: path.to_path_buf(),
        position: 0,
        message: "document has no root element".to_string(),
    })
}

/// Reads and parses an XML file.
pub fn read_document(path: &Path) -> Result<XmlNode> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let source = String::from_utf8_lossy(&bytes);
    parse_document(&source, path)
}

fn start_node(start: &BytesStart<'_>) -> XmlNode {
    let mut node = XmlNode::new(String::from_utf8_lossy(start.local_name().as_ref()));
    for attribute in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attribute.value);
        node.attributes.push((key, unescape_lossy(&raw).into_owned()));
    }
    node
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

fn unescape_lossy(raw: &str) -> Cow<'_, str> {
    unescape(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Resolves `&name;` (`name` without delimiters) to its text.
fn resolve_reference(name: &str) -> String {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => number.parse::<u32>().ok(),
        };
        if let Some(ch) = code.and_then(char::from_u32) {
            return ch.to_string();
        }
    } else if let Some(text) = resolve_predefined_entity(name) {
        return text.to_string();
    }
    format!("&{name};")
}
