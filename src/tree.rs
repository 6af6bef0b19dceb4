//! In-memory XML tree.
//!
//! A small owned DOM used both for element documents and for the SVG output.
//! Only elements, attributes and text survive a round trip; comments,
//! processing instructions and whitespace between tags are dropped.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;

use crate::errors::DocumentError;

/// A child of an [`Element`]
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style child
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder-style text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attr(key).is_some()
    }

    /// Numeric attribute; missing or unparseable values are `None`
    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        self.attr(key).and_then(|v| v.trim().parse().ok())
    }

    /// Boolean attribute: true when the value starts with `1`, `t`, `T`, `y`
    /// or `Y`
    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        self.attr(key)
            .map(|v| matches!(v.trim_start().chars().next(), Some('1' | 't' | 'T' | 'y' | 'Y')))
    }

    /// Replace an attribute in place, or append it
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(k, _)| k == key)?;
        Some(self.attrs.remove(index).1)
    }

    /// Rewrite the attribute list: `known` first in the given order, then
    /// every attribute not named in `owned`, in its original order.
    ///
    /// `owned` lists every key the caller manages, so a managed attribute
    /// that is absent from `known` gets removed.
    pub fn set_attrs_ordered(&mut self, known: Vec<(String, String)>, owned: &[&str]) {
        let foreign: Vec<(String, String)> = std::mem::take(&mut self.attrs)
            .into_iter()
            .filter(|(k, _)| !owned.contains(&k.as_str()) && !known.iter().any(|(n, _)| n == k))
            .collect();
        self.attrs = known;
        self.attrs.extend(foreign);
    }

    // ========================================================================
    // Children
    // ========================================================================

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// Run `edit` on the named child, creating it at the end if missing
    pub fn edit_child_or_insert<R>(
        &mut self,
        name: &str,
        edit: impl FnOnce(&mut Element) -> R,
    ) -> R {
        if let Some(child) = self.child_mut(name) {
            return edit(child);
        }
        let mut child = Element::new(name);
        let result = edit(&mut child);
        self.push_child(child);
        result
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Keep only the child elements for which `keep` returns true
    pub fn retain_elements(&mut self, mut keep: impl FnMut(&Element) -> bool) {
        self.children.retain(|node| match node {
            Node::Element(e) => keep(e),
            Node::Text(_) => true,
        });
    }

    /// Concatenated direct text content
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Replace all direct text content with `text`, keeping child elements
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.children.retain(|node| matches!(node, Node::Element(_)));
        if !text.is_empty() {
            self.children.insert(0, Node::Text(text));
        }
    }
}

// ============================================================================
// Reading
// ============================================================================

/// Parse an XML document into its root element.
///
/// `name` is used in error reports (usually the file name).
pub fn parse_document(source: &str, name: &str) -> Result<Element, DocumentError> {
    let mut reader = Reader::from_str(source);

    let syntax = |offset: usize, message: String| DocumentError::syntax(name, source, offset, message);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let offset = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| syntax(reader.buffer_position() as usize, e.to_string()))?;
        match event {
            Event::Start(start) => {
                let element = start_element(&start).map_err(|e| syntax(offset, e.to_string()))?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = start_element(&start).map_err(|e| syntax(offset, e.to_string()))?;
                attach(&mut stack, &mut root, element)
                    .map_err(|message| syntax(offset, message))?;
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err(syntax(offset, "unexpected closing tag".to_string()));
                };
                attach(&mut stack, &mut root, element)
                    .map_err(|message| syntax(offset, message))?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| syntax(offset, e.to_string()))?;
                push_text(&mut stack, text);
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                push_text(&mut stack, String::from_utf8_lossy(&bytes));
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if !stack.is_empty() {
        return Err(syntax(source.len(), "unclosed element at end of input".to_string()));
    }
    root.ok_or_else(|| DocumentError::Empty {
        src: miette::NamedSource::new(name, source.to_string()),
    })
}

fn start_element(start: &BytesStart<'_>) -> Result<Element, quick_xml::Error> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attrs.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(format!("second root element <{}>", element.name)),
    }
}

/// Whitespace-only text is indentation and dropped; other text is kept as is
fn push_text(stack: &mut [Element], text: Cow<'_, str>) {
    // text outside the root carries nothing
    if let Some(parent) = stack.last_mut() {
        if !text.trim().is_empty() {
            parent.children.push(Node::Text(text.into_owned()));
        }
    }
}

// ============================================================================
// Writing
// ============================================================================

/// Serialize an element tree with four-space indentation and no XML
/// declaration.
pub fn write_document(root: &Element) -> Result<String, DocumentError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    write_element(&mut writer, root)?;
    let mut out = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    out.push('\n');
    Ok(out)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attrs {
        start.push_attribute(attribute(key, value));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => {
                writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(t))))?
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

/// Attribute with only `&`, `<`, `>` and `"` escaped, so apostrophes in
/// French element names stay readable. Line breaks (multi-line texts) are
/// written as character references so readers do not fold them to spaces.
fn attribute<'a>(key: &'a str, value: &'a str) -> Attribute<'a> {
    let escaped = partial_escape(value);
    let escaped = if escaped.contains(['"', '\n']) {
        Cow::Owned(escaped.replace('"', "&quot;").replace('\n', "&#10;"))
    } else {
        escaped
    };
    Attribute {
        key: QName(key.as_bytes()),
        value: match escaped {
            Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
            Cow::Owned(s) => Cow::Owned(s.into_bytes()),
        },
    }
}
