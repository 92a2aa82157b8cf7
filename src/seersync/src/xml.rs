//! Structured XML writer
//!
//! Serializes an annotated tree under a fixed `root` element: `@`-prefixed
//! keys become attributes, list-valued keys repeat their element once per
//! list entry, everything else becomes a child element. Output is
//! tab-indented with no XML declaration, so mirrored files diff cleanly.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::annotate::ATTR_MARKER;
use crate::node::Node;

/// Fixed name of the document root element
pub const ROOT_ELEMENT: &str = "root";

/// Errors from XML serialization
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("XML write failed: {0}")]
    Write(#[from] quick_xml::Error),

    #[error("serialized document is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Serialize an annotated tree as a pretty-printed XML document
pub fn write_document(node: &Node) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
    write_element(&mut writer, ROOT_ELEMENT, node)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, node: &Node) -> Result<()> {
    match node {
        // A list repeats the element name once per entry
        Node::List(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        Node::Map(map) => {
            let mut attrs: Vec<(&str, String)> = Vec::new();
            let mut children: Vec<(&str, &Node)> = Vec::new();

            for (key, value) in map.iter() {
                match key.strip_prefix(ATTR_MARKER) {
                    // Attribute form is only possible for scalars; a
                    // map-valued attribute key degrades to a child element.
                    Some(attr) => match scalar_text(value) {
                        Some(text) => attrs.push((attr, text)),
                        None => children.push((attr, value)),
                    },
                    None => children.push((key, value)),
                }
            }

            let mut start = BytesStart::new(name);
            for (attr, text) in &attrs {
                start.push_attribute((*attr, text.as_str()));
            }

            if children.is_empty() {
                writer.write_event(Event::Start(start))?;
                // Empty text keeps `<a></a>` on one line
                writer.write_event(Event::Text(BytesText::new("")))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            } else {
                writer.write_event(Event::Start(start))?;
                for (child_name, child) in children {
                    write_element(writer, child_name, child)?;
                }
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            Ok(())
        }
        scalar => {
            let text = scalar_text(scalar).unwrap_or_default();
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
            Ok(())
        }
    }
}

/// Text form of a scalar; `None` for lists and maps
fn scalar_text(node: &Node) -> Option<String> {
    match node {
        Node::Null => Some(String::new()),
        Node::Bool(b) => Some(b.to_string()),
        Node::Int(i) => Some(i.to_string()),
        Node::Float(f) => Some(f.to_string()),
        Node::Text(s) => Some(s.clone()),
        Node::List(_) | Node::Map(_) => None,
    }
}
