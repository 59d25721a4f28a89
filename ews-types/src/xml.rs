//! An owned XML element tree.
//!
//! Entities marshal into and unmarshal out of [`XmlElement`] fragments. Names
//! are namespace-resolved on read, so lookups compare namespace URIs, never
//! prefixes. On write, the types and messages namespaces get their canonical
//! `t:` and `m:` prefixes and every namespace used in the fragment is declared
//! on its root.
//!
//! Unmarshalling is destructive: [`XmlElement::take`] detaches a child from its
//! parent so that the consumed subtree is dropped as soon as the entity built
//! from it is done with it.

use crate::{Error, Namespace, Result, MNS, TNS};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::{NsReader, Writer};
use std::collections::BTreeMap;
use std::fmt;

/// A namespace-qualified element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    namespace: Option<String>,
    local: String,
}

impl QName {
    /// Creates a name in an arbitrary namespace (or none).
    #[must_use]
    pub fn new(namespace: Option<&str>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local: local.into(),
        }
    }

    /// Creates a name in one of the two protocol namespaces.
    #[must_use]
    pub fn in_namespace(namespace: Namespace, local: impl Into<String>) -> Self {
        Self::new(Some(namespace.uri()), local)
    }

    /// Shorthand for a name in the types namespace.
    #[must_use]
    pub fn types(local: impl Into<String>) -> Self {
        Self::new(Some(TNS), local)
    }

    /// Shorthand for a name in the messages namespace.
    #[must_use]
    pub fn messages(local: impl Into<String>) -> Self {
        Self::new(Some(MNS), local)
    }

    /// Returns the namespace URI, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the local part of the name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for QName {
    /// Clark notation: `{uri}local`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// An XML element with its attributes, text and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: QName,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Creates an element holding only text, e.g. `<t:Name>value</t:Name>`.
    #[must_use]
    pub fn with_text(name: QName, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.text = Some(text.into());
        element
    }

    #[must_use]
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Renames the element, keeping its content.
    pub fn rename(&mut self, name: QName) {
        self.name = name;
    }

    /// Returns the value of an unqualified attribute.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Returns the attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Removes and returns the text content.
    pub fn take_text(&mut self) -> Option<String> {
        self.text.take()
    }

    #[must_use]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Appends a child element.
    pub fn push(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Returns the first child with the given name.
    #[must_use]
    pub fn find(&self, name: &QName) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == *name)
    }

    /// Returns all children with the given name.
    pub fn find_all<'a>(&'a self, name: &'a QName) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == *name)
    }

    /// Detaches and returns the first child with the given name.
    pub fn take(&mut self, name: &QName) -> Option<XmlElement> {
        let idx = self.children.iter().position(|c| c.name == *name)?;
        Some(self.children.remove(idx))
    }

    /// Detaches and returns all children with the given name, in order.
    pub fn take_all(&mut self, name: &QName) -> Vec<XmlElement> {
        self.take_where(|c| c.name == *name)
    }

    /// Detaches and returns all children matching `predicate`, in order.
    pub fn take_where(&mut self, predicate: impl FnMut(&XmlElement) -> bool) -> Vec<XmlElement> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.children).into_iter().partition(predicate);
        self.children = kept;
        taken
    }

    /// Drops all attributes, text and children.
    pub fn clear(&mut self) {
        self.attributes.clear();
        self.text = None;
        self.children.clear();
    }

    /// True if the element has no attributes, text or children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.text.is_none() && self.children.is_empty()
    }

    // ── Reading ──────────────────────────────────────────────────

    /// Parses a document (or fragment with a single root) into a tree.
    ///
    /// Text is kept verbatim, surrounding whitespace included. Whitespace-only
    /// text of an element that has children is indentation and is dropped.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);

        let mut stack: Vec<XmlElement> = Vec::new();
        loop {
            let (ns, event) = reader.read_resolved_event()?;
            match event {
                Event::Start(start) => {
                    stack.push(Self::from_start(ns, &start)?);
                }
                Event::Empty(start) => {
                    let element = Self::from_start(ns, &start)?;
                    if let Some(root) = close(&mut stack, element) {
                        return Ok(root);
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::MalformedXml("unbalanced end tag".to_string()))?;
                    if let Some(root) = close(&mut stack, element) {
                        return Ok(root);
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let text = text.unescape()?;
                        current.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        let text = utf8(&data.into_inner())?;
                        current.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Event::Eof => {
                    return Err(Error::MalformedXml("document ended before the root element closed".to_string()));
                }
                _ => {}
            }
        }
    }

    fn from_start(ns: ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Self> {
        let namespace = match ns {
            ResolveResult::Bound(ns) => Some(utf8(ns.0)?),
            ResolveResult::Unbound => None,
            ResolveResult::Unknown(prefix) => {
                return Err(Error::MalformedXml(format!(
                    "undeclared namespace prefix {:?}",
                    String::from_utf8_lossy(&prefix)
                )));
            }
        };
        let local = utf8(start.local_name().as_ref())?;
        let mut element = Self::new(QName { namespace, local });

        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::MalformedXml(e.to_string()))?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = utf8(attr.key.local_name().as_ref())?;
            let value = attr.unescape_value()?.into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    // ── Writing ──────────────────────────────────────────────────

    /// Serializes the tree, declaring all used namespaces on the root.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut prefixes = BTreeMap::new();
        self.collect_namespaces(&mut prefixes);

        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer, &prefixes, true)?;
        String::from_utf8(writer.into_inner()).map_err(|e| Error::MalformedXml(e.to_string()))
    }

    fn collect_namespaces(&self, prefixes: &mut BTreeMap<String, String>) {
        if let Some(ns) = self.name.namespace()
            && !prefixes.contains_key(ns)
        {
            let prefix = match Namespace::from_uri(ns) {
                Some(known) => known.prefix().to_string(),
                None => format!("ns{}", prefixes.len()),
            };
            prefixes.insert(ns.to_string(), prefix);
        }
        for child in &self.children {
            child.collect_namespaces(prefixes);
        }
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>, prefixes: &BTreeMap<String, String>, root: bool) -> Result<()> {
        let tag = match self.name.namespace().and_then(|ns| prefixes.get(ns)) {
            Some(prefix) => format!("{prefix}:{}", self.name.local),
            None => self.name.local.clone(),
        };

        let mut start = BytesStart::new(tag.as_str());
        if root {
            for (uri, prefix) in prefixes {
                let key = format!("xmlns:{prefix}");
                start.push_attribute((key.as_str(), uri.as_str()));
            }
        }
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.text.is_none() && self.children.is_empty() {
            writer.write_event(Event::Empty(start)).map_err(write_error)?;
            return Ok(());
        }

        writer.write_event(Event::Start(start)).map_err(write_error)?;
        if let Some(text) = &self.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(write_error)?;
        }
        for child in &self.children {
            child.write(writer, prefixes, false)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(tag.as_str())))
            .map_err(write_error)?;
        Ok(())
    }
}

/// Attaches a finished element to its parent, or returns it if it was the root.
fn close(stack: &mut [XmlElement], mut element: XmlElement) -> Option<XmlElement> {
    if !element.children.is_empty() && element.text.as_deref().is_some_and(|t| t.trim().is_empty()) {
        element.text = None;
    }
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            None
        }
        None => Some(element),
    }
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| Error::MalformedXml(e.to_string()))
}

fn write_error(e: impl fmt::Display) -> Error {
    Error::MalformedXml(format!("write failed: {e}"))
}
