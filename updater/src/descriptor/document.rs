//! Element tree for verification descriptors.
//!
//! The tree keeps character data in `text`/`tail` slots: `text` is the data
//! between an element's start tag and its first child, `tail` the data after
//! its end tag and before the next sibling. That layout lets the indenter
//! rewrite whitespace without touching meaningful content.

use crate::error::DescriptorError;
use log::trace;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

/// An XML element with its attributes, character data and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    tail: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Create an empty element with a qualified name.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(str::to_owned),
            attributes: Vec::new(),
            text: None,
            tail: None,
            children: Vec::new(),
        }
    }

    /// Builder-style helper appending an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Qualified name as written, including any prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the element, keeping its resolved namespace.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Name without its namespace prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Namespace prefix of the qualified name, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Namespace URI the element resolved to.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Attributes in document order, namespace declarations included.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Mutable access to the attributes.
    pub const fn attributes_mut(&mut self) -> &mut Vec<(String, String)> {
        &mut self.attributes
    }

    /// Value of the attribute with the given qualified name.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Character data before the first child.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replace the character data before the first child.
    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    /// Character data following the end tag.
    #[must_use]
    pub fn tail(&self) -> Option<&str> {
        self.tail.as_deref()
    }

    /// Replace the character data following the end tag.
    pub fn set_tail(&mut self, tail: Option<String>) {
        self.tail = tail;
    }

    /// Child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Mutable access to the child elements.
    pub const fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }

    /// Append a child after the existing ones.
    pub fn push_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Returns true when the element has the given namespace and local name.
    #[must_use]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace() == Some(namespace) && self.local_name() == local_name
    }

    fn append_char_data(&mut self, data: &str) {
        let slot = match self.children.last_mut() {
            Some(last) => &mut last.tail,
            None => &mut self.text,
        };
        slot.get_or_insert_with(String::new).push_str(data);
    }
}

/// A parsed XML document.
///
/// Only the root element is retained. The XML declaration, comments,
/// processing instructions and document type declarations are dropped, as is
/// whitespace outside the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Wrap an existing root element.
    #[must_use]
    pub const fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parse a document, resolving element namespaces.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] when the input is not well-formed or has no
    /// root element.
    pub fn parse(xml: &str) -> Result<Self, DescriptorError> {
        let mut reader = NsReader::from_str(xml);
        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            match event {
                Event::Start(start) => {
                    reject_second_root(root.as_ref())?;
                    open.push(element_from_start(&start, &resolved)?);
                }
                Event::Empty(start) => {
                    reject_second_root(root.as_ref())?;
                    let element = element_from_start(&start, &resolved)?;
                    close_element(element, &mut open, &mut root);
                }
                Event::End(_) => {
                    let element = open.pop().ok_or_else(|| DescriptorError::Malformed {
                        reason: "unexpected end tag".to_owned(),
                    })?;
                    close_element(element, &mut open, &mut root);
                }
                Event::Text(text) => {
                    if let Some(current) = open.last_mut() {
                        current.append_char_data(&text.unescape()?);
                    }
                }
                Event::CData(cdata) => {
                    if let Some(current) = open.last_mut() {
                        let bytes = cdata.into_inner();
                        current.append_char_data(std::str::from_utf8(&bytes)?);
                    }
                }
                Event::Eof => break,
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(DescriptorError::Malformed {
                reason: format!("unclosed element <{}>", unclosed.name()),
            });
        }

        root.map(Self::new).ok_or_else(|| DescriptorError::Malformed {
            reason: "no root element".to_owned(),
        })
    }

    /// The root element.
    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable access to the root element.
    pub const fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }
}

fn reject_second_root(root: Option<&Element>) -> Result<(), DescriptorError> {
    match root {
        Some(existing) => Err(DescriptorError::Malformed {
            reason: format!("content after root element <{}>", existing.name()),
        }),
        None => Ok(()),
    }
}

fn element_from_start(
    start: &BytesStart<'_>,
    resolved: &ResolveResult<'_>,
) -> Result<Element, DescriptorError> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_owned();
    let namespace = match resolved {
        ResolveResult::Bound(namespace) => Some(std::str::from_utf8(namespace.as_ref())?),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(DescriptorError::Malformed {
                reason: format!(
                    "undeclared namespace prefix '{}' on <{name}>",
                    String::from_utf8_lossy(prefix)
                ),
            });
        }
    };

    let mut element = Element::new(name, namespace);
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key.as_ref())?;
        let raw = normalize_attribute_whitespace(std::str::from_utf8(&attribute.value)?);
        let value = unescape(&raw).map_err(quick_xml::Error::from)?;
        element.attributes.push((key.to_owned(), value.into_owned()));
    }
    trace!(
        "parsed <{}> in namespace {:?}",
        element.name(),
        element.namespace()
    );
    Ok(element)
}

/// Attribute-value normalization: literal line breaks and tabs become spaces.
///
/// Runs before unescaping so that character references such as `&#9;` keep
/// their value.
fn normalize_attribute_whitespace(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace(['\t', '\n', '\r'], " ")
}

fn close_element(element: Element, open: &mut [Element], root: &mut Option<Element>) {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}
