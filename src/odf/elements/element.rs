//! Base Element type for ODF XML elements.
//!
//! This module provides the in-memory XML tree the cell layer operates on:
//! an [`Element`] owns its attributes in document order and a list of child
//! [`Node`]s, so mixed content such as `<text:p>a<text:s/>b</text:p>`
//! survives a parse/serialize cycle.

use crate::common::xml::{escape_text, escape_xml, unescape_xml};
use crate::common::{Error, Result};
use crate::odf::elements::namespace::{Namespace, QualifiedName, TEXTNS};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;
use std::str::FromStr;

/// Attribute storage; cells rarely carry more than four attributes.
pub type Attributes = SmallVec<[(String, String); 4]>;

/// Base trait for attribute access on ODF elements
pub trait ElementBase {
    /// Get the tag name of this element
    fn tag_name(&self) -> &str;

    /// Get the attributes of this element, in document order
    fn attributes(&self) -> &[(String, String)];

    /// Get a mutable reference to attributes
    fn attributes_mut(&mut self) -> &mut Attributes;

    /// Get attribute value by name
    fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set attribute value, keeping the position of an existing attribute
    fn set_attribute(&mut self, name: &str, value: &str) {
        let attributes = self.attributes_mut();
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove attribute, returning its previous value
    fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let attributes = self.attributes_mut();
        let index = attributes.iter().position(|(key, _)| key == name)?;
        Some(attributes.remove(index).1)
    }

    /// Check if element has attribute
    fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Get integer attribute value
    fn get_int_attribute(&self, name: &str) -> Option<i64> {
        self.get_attribute(name).and_then(|s| s.trim().parse().ok())
    }
}

/// A child of an element
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Character data, already unescaped
    Text(String),
}

/// Concrete XML element
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag_name: String,
    attributes: Attributes,
    children: Vec<Node>,
}

impl Element {
    /// Create a new element
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attributes: SmallVec::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element holding a single text node
    pub fn with_text(tag_name: &str, text: &str) -> Self {
        let mut element = Self::new(tag_name);
        element.push_text(text);
        element
    }

    /// Get the local name (without namespace prefix)
    pub fn local_name(&self) -> &str {
        QualifiedName::parse(&self.tag_name).local_name
    }

    /// Get the namespace prefix, if any
    pub fn prefix(&self) -> Option<&str> {
        QualifiedName::parse(&self.tag_name).prefix
    }

    /// Get all child nodes
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Get mutable child nodes
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Iterate over child elements, skipping text
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First child element
    pub fn first_element(&self) -> Option<&Element> {
        self.elements().next()
    }

    /// Check whether the element has any child nodes
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Append a child element
    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append text, merging with a trailing text node
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.children.last_mut() {
            Some(Node::Text(existing)) => existing.push_str(text),
            _ => self.children.push(Node::Text(text.to_string())),
        }
    }

    /// Remove all child nodes
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Text of this element and all descendants.
    ///
    /// `text:s` expands to `text:c` spaces (default one), `text:tab` to a tab
    /// and `text:line-break` to a newline.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(child) => match child.local_name() {
                    "s" => {
                        let count = child
                            .attributes
                            .iter()
                            .find(|(key, _)| QualifiedName::parse(key).local_name == "c")
                            .and_then(|(_, value)| value.parse::<usize>().ok())
                            .unwrap_or(1);
                        out.extend(std::iter::repeat_n(' ', count));
                    },
                    "tab" => out.push('\t'),
                    "line-break" => out.push('\n'),
                    _ => child.collect_text(out),
                },
            }
        }
    }

    /// All descendant elements named `tag_name`, in document order
    pub fn find_all(&self, tag_name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.find_into(tag_name, &mut found);
        found
    }

    fn find_into<'a>(&'a self, tag_name: &str, found: &mut Vec<&'a Element>) {
        for child in self.elements() {
            if child.tag_name == tag_name {
                found.push(child);
            }
            child.find_into(tag_name, found);
        }
    }

    /// First descendant element named `tag_name`
    pub fn find_first(&self, tag_name: &str) -> Option<&Element> {
        self.find_all(tag_name).into_iter().next()
    }

    /// Create element from XML bytes.
    ///
    /// The first root element is returned. Whitespace-only text is kept only
    /// inside elements of the ODF text namespace, where it is significant;
    /// the namespace is recognised under whatever prefix the document binds
    /// it to (`text` when undeclared).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = quick_xml::Reader::from_reader(bytes);
        let mut buf = Vec::new();
        // Each open element with the text prefix in scope for it
        let mut stack: Vec<(Element, Option<String>)> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let element = Self::from_start(e, reader.decoder())?;
                    let inherited = match stack.last() {
                        Some((_, scope)) => scope.as_deref(),
                        None => Some(Namespace::Text.canonical_prefix()),
                    };
                    let scope = Self::text_scope(&element, inherited);
                    stack.push((element, scope));
                },
                Ok(Event::Empty(ref e)) => {
                    let element = Self::from_start(e, reader.decoder())?;
                    match stack.last_mut() {
                        Some((parent, _)) => parent.push_child(element),
                        None => return Ok(element),
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some((current, scope)) = stack.last_mut() {
                        let text = t.xml_content()?;
                        let significant = scope.as_deref() == Some(current.prefix().unwrap_or(""));
                        if significant || !text.trim().is_empty() {
                            current.push_text(&text);
                        }
                    }
                },
                Ok(Event::CData(ref c)) => {
                    if let Some((current, _)) = stack.last_mut() {
                        current.push_text(&c.decode()?);
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    if let Some((current, _)) = stack.last_mut() {
                        match r.resolve_char_ref()? {
                            Some(c) => {
                                let mut utf8 = [0u8; 4];
                                current.push_text(c.encode_utf8(&mut utf8));
                            },
                            None => {
                                let name = r.decode()?;
                                current.push_text(&unescape_xml(&format!("&{};", name)));
                            },
                        }
                    }
                },
                Ok(Event::End(_)) => {
                    if let Some((element, _)) = stack.pop() {
                        match stack.last_mut() {
                            Some((parent, _)) => parent.push_child(element),
                            None => return Ok(element),
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlError(format!("XML parsing error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Err(Error::InvalidFormat("No root element found".to_string()))
    }

    fn from_start(e: &BytesStart<'_>, decoder: Decoder) -> Result<Self> {
        let tag_name = String::from_utf8(e.name().as_ref().to_vec())?;
        let mut element = Element::new(&tag_name);
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8(attr.key.as_ref().to_vec())?;
            let value = attr.decode_and_unescape_value(decoder)?;
            element.attributes.push((key, value.into_owned()));
        }
        Ok(element)
    }

    /// Prefix bound to the text namespace inside `element`, given the
    /// binding in scope for its parent.
    ///
    /// An empty string stands for the default namespace; `None` means no
    /// prefix is bound to it.
    fn text_scope(element: &Element, inherited: Option<&str>) -> Option<String> {
        let mut scope = inherited.map(str::to_string);
        for (key, uri) in &element.attributes {
            let prefix = match key.as_str() {
                "xmlns" => "",
                key => match key.strip_prefix("xmlns:") {
                    Some(prefix) => prefix,
                    None => continue,
                },
            };
            if uri == TEXTNS {
                return Some(prefix.to_string());
            }
            if scope.as_deref() == Some(prefix) {
                scope = None;
            }
        }
        scope
    }

    /// Serialize element to XML string
    pub fn to_xml_string(&self) -> String {
        let mut xml = String::with_capacity(self.estimated_xml_len());
        self.write_xml(&mut xml);
        xml
    }

    /// Serialize only the children of this element
    pub fn inner_xml(&self) -> String {
        let mut xml = String::new();
        self.write_children(&mut xml);
        xml
    }

    fn estimated_xml_len(&self) -> usize {
        let attrs: usize = self
            .attributes
            .iter()
            .map(|(key, value)| key.len() + value.len() + 4)
            .sum();
        let children: usize = self
            .children
            .iter()
            .map(|node| match node {
                Node::Element(child) => child.estimated_xml_len(),
                Node::Text(text) => text.len() + 8,
            })
            .sum();
        2 * self.tag_name.len() + attrs + children + 5
    }

    fn write_xml(&self, output: &mut String) {
        output.push('<');
        output.push_str(&self.tag_name);

        for (key, value) in &self.attributes {
            output.push(' ');
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(&escape_xml(value));
            output.push('"');
        }

        if self.children.is_empty() {
            output.push_str("/>");
            return;
        }

        output.push('>');
        self.write_children(output);
        output.push_str("</");
        output.push_str(&self.tag_name);
        output.push('>');
    }

    fn write_children(&self, output: &mut String) {
        for node in &self.children {
            match node {
                Node::Element(child) => child.write_xml(output),
                Node::Text(text) => output.push_str(&escape_text(text)),
            }
        }
    }
}

impl FromStr for Element {
    type Err = Error;

    /// Parse an element from an XML string
    fn from_str(xml: &str) -> Result<Self> {
        Self::from_bytes(xml.as_bytes())
    }
}

impl ElementBase for Element {
    fn tag_name(&self) -> &str {
        &self.tag_name
    }

    fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}
