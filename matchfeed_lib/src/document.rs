//! Parsed document trees for both feeds.
//!
//! XML payloads are parsed strictly with `quick-xml`; HTML payloads are parsed
//! leniently with `scraper` (html5ever). Both end up in the same owned
//! [`Element`] tree, which is `Send + Sync` and can be shared through the
//! run cache.

use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use scraper::{ElementRef, Html};

use crate::cache::Cache;
use crate::error::CrawlError;

/// Which parser strategy a payload needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    /// Well-formed XML only.
    Xml,
    /// Tag soup accepted.
    Html,
}

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("document is empty")]
    Blank,
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },
    #[error("element <{0}> is never closed")]
    Unclosed(String),
    #[error("more than one root element")]
    MultipleRoots,
    #[error("text outside the root element")]
    StrayText,
    #[error("no root element")]
    NoRoot,
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its attributes and children, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Self {
            name: name.into(),
            attributes,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Element children, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First element child named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.name == name)
    }

    /// Follows a chain of child names, e.g. `["team-stats", "outcome-totals"]`.
    pub fn path(&self, names: &[&str]) -> Option<&Element> {
        names
            .iter()
            .try_fold(self, |current, name| current.child(name))
    }

    /// All descendants named `name`, in document order (pre-order), excluding `self`.
    pub fn descendants(&self, name: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_named(name, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        for child in self.elements() {
            if child.name == name {
                out.push(child);
            }
            child.collect_named(name, out);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|value| value.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Text content of the element and its descendants, whitespace-normalized.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        self.collect_text(&mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => {
                    out.push(' ');
                    out.push_str(text);
                }
                Node::Element(el) => el.collect_text(out),
            }
        }
    }
}

/// A parsed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    kind: DocumentKind,
    root: Element,
}

impl Document {
    /// Parses `content` with the strategy for `kind`.
    pub fn parse(content: &str, kind: DocumentKind) -> Result<Self, DocumentError> {
        if content.trim().is_empty() {
            return Err(DocumentError::Blank);
        }
        let root = match kind {
            DocumentKind::Xml => parse_xml(content)?,
            DocumentKind::Html => parse_html(content),
        };
        Ok(Self { kind, root })
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All elements named `name` in document order, the root included.
    pub fn descendants(&self, name: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        if self.root.name == name {
            out.push(&self.root);
        }
        self.root.collect_named(name, &mut out);
        out
    }

    /// First element named `name` carrying `class`, like the selector `name.class`.
    pub fn first_with_class(&self, name: &str, class: &str) -> Option<&Element> {
        self.descendants(name)
            .into_iter()
            .find(|el| el.has_class(class))
    }
}

/// Returns the parsed document for `content`, parsing and caching it on a miss.
///
/// The cache is keyed by the raw content. A cached tree built with a
/// different strategy is not reused.
pub fn parse_document(
    content: &str,
    kind: DocumentKind,
    cache: &dyn Cache<Arc<Document>>,
) -> Result<Arc<Document>, CrawlError> {
    if let Some(doc) = cache.get(content) {
        if doc.kind() == kind {
            tracing::debug!("Returning cached {:?} document", kind);
            return Ok(doc);
        }
    }

    let doc = Arc::new(Document::parse(content, kind)?);
    cache.put(content.to_string(), Arc::clone(&doc));
    Ok(doc)
}

fn parse_xml(content: &str) -> Result<Element, DocumentError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let malformed = |message: String, position: u64| DocumentError::Malformed { position, message };
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let el = element_from_start(e).map_err(|m| malformed(m, reader.buffer_position() as u64))?;
                stack.push(el);
            }
            Ok(Event::Empty(ref e)) => {
                let el = element_from_start(e).map_err(|m| malformed(m, reader.buffer_position() as u64))?;
                attach(&mut stack, &mut root, el)?;
            }
            Ok(Event::End(_)) => {
                let el = stack.pop().ok_or_else(|| {
                    malformed("unexpected closing tag".into(), reader.buffer_position() as u64)
                })?;
                attach(&mut stack, &mut root, el)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| malformed(err.to_string(), reader.buffer_position() as u64))?;
                push_text(&mut stack, text.into_owned())?;
            }
            Ok(Event::CData(ref e)) => {
                push_text(&mut stack, String::from_utf8_lossy(e).into_owned())?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(malformed(err.to_string(), reader.buffer_position() as u64));
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(DocumentError::Unclosed(open.name.clone()));
    }
    root.ok_or(DocumentError::NoRoot)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element::new(name, attributes))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<(), DocumentError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(el));
        return Ok(());
    }
    if root.is_some() {
        return Err(DocumentError::MultipleRoots);
    }
    *root = Some(el);
    Ok(())
}

fn push_text(stack: &mut [Element], text: String) -> Result<(), DocumentError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(text));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(DocumentError::StrayText),
    }
}

fn parse_html(content: &str) -> Element {
    let html = Html::parse_document(content);
    convert_html(html.root_element())
}

fn convert_html(el: ElementRef<'_>) -> Element {
    let attributes = el
        .value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let mut element = Element::new(el.value().name(), attributes);
    for child in el.children() {
        match child.value() {
            scraper::Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    element.children.push(Node::Element(convert_html(child_el)));
                }
            }
            scraper::Node::Text(text) => {
                let text: &str = text;
                if !text.trim().is_empty() {
                    element.children.push(Node::Text(text.to_string()));
                }
            }
            _ => {}
        }
    }
    element
}
