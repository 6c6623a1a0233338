//! Serialization of an element tree in Gradle's exact byte layout.
//!
//! Serialization happens in two passes. [`write_element`] renders the tree
//! like a generic element-tree writer would (`<tag />` for empty elements,
//! character references for non-ASCII data). [`to_gradle_bytes`] then applies
//! the byte-level fixups Gradle's own writer produces: a double-quoted UTF-8
//! declaration and `<tag/>` empty elements.

use super::document::{Document, Element};
use quick_xml::escape::partial_escape;

/// XML declaration Gradle writes at the top of the descriptor.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Render `document` with the declaration and empty-tag layout Gradle emits.
#[must_use]
pub fn to_gradle_bytes(document: &Document) -> Vec<u8> {
    let mut body = String::new();
    write_element(&mut body, document.root());
    finalize(&body).into_bytes()
}

/// Apply the Gradle layout fixups to an already serialized body.
#[must_use]
pub fn finalize(body: &str) -> String {
    let mut output = String::with_capacity(XML_DECLARATION.len() + body.len());
    output.push_str(XML_DECLARATION);
    output.push_str(&ascii_only(body));
    output.replace(" />", "/>")
}

/// Serialize `element`, its descendants and its tail into `out`.
pub fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(element.name());
    for (key, value) in element.attributes() {
        out.push_str(&format!(" {key}=\"{}\"", escape_attribute(value)));
    }

    let text = element.text().filter(|text| !text.is_empty());
    if text.is_none() && element.children().is_empty() {
        out.push_str(" />");
    } else {
        out.push('>');
        if let Some(text) = text {
            out.push_str(&partial_escape(text));
        }
        for child in element.children() {
            write_element(out, child);
        }
        out.push_str("</");
        out.push_str(element.name());
        out.push('>');
    }

    if let Some(tail) = element.tail() {
        out.push_str(&partial_escape(tail));
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in partial_escape(value).chars() {
        match c {
            '"' => escaped.push_str("&quot;"),
            '\r' => escaped.push_str("&#13;"),
            '\n' => escaped.push_str("&#10;"),
            '\t' => escaped.push_str("&#09;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Replace every non-ASCII character with a decimal character reference.
fn ascii_only(data: &str) -> String {
    let mut output = String::with_capacity(data.len());
    for c in data.chars() {
        if c.is_ascii() {
            output.push(c);
        } else {
            output.push_str(&format!("&#{};", u32::from(c)));
        }
    }
    output
}
