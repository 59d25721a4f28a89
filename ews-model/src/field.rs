//! Field descriptors: one named, typed, wire-located attribute of an entity.
//!
//! A [`Field`] knows how to validate (`clean`), marshal (`to_wire`), unmarshal
//! (`from_wire`) and canonicalize (`to_hashable`) values of its [`FieldKind`].

use crate::value::hashable;
use crate::{Element, ElementType, FieldValue, Hashable, ModelError, ModelResult};
use ews_types::{wire, Build, Namespace, QName, Version, XmlElement};
use std::borrow::Cow;
use std::fmt;

/// Default limit for [`FieldKind::Char`] values.
pub const DEFAULT_MAX_LEN: usize = 255;

/// Where a field's value lives on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// An XML attribute of the entity's element.
    Attribute,
    /// A child element, emitted in schema order.
    Element,
    /// The text body of the entity's element.
    Text,
}

/// One legal value of a choice field, optionally gated to a minimum build.
///
/// Choices compare by value only.
#[derive(Debug, Clone)]
pub struct Choice {
    value: &'static str,
    supported_from: Option<Build>,
}

impl Choice {
    #[must_use]
    pub const fn new(value: &'static str) -> Self {
        Self {
            value,
            supported_from: None,
        }
    }

    /// A choice that the server only accepts from `build` onwards.
    #[must_use]
    pub const fn since(value: &'static str, build: Build) -> Self {
        Self {
            value,
            supported_from: Some(build),
        }
    }

    #[must_use]
    pub const fn value(&self) -> &'static str {
        self.value
    }

    #[must_use]
    pub fn supports_version(&self, version: &Version) -> bool {
        self.supported_from.is_none_or(|from| version.build() >= from)
    }
}

impl PartialEq for Choice {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Choice {}

/// The value kind a field holds and how it is laid out on the wire.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    /// Text with a maximum length in characters.
    Char { max_len: usize },
    Boolean,
    Integer { min: Option<i64>, max: Option<i64> },
    DateTime,
    Time,
    Base64,
    /// A closed set of wire strings.
    Choice(Vec<Choice>),
    /// A 1-based index into a list of wire names. Marshals as the name.
    Enum(&'static [&'static str]),
    /// A space-separated list of enum names.
    EnumList(&'static [&'static str]),
    /// A nested entity.
    Element(&'static ElementType),
    /// Nested entities inside a wrapper element.
    ElementList(&'static ElementType),
    /// Text items, each in an `item` element, inside a wrapper element.
    TextList { item: &'static str },
    /// Typed key/value entries inside a wrapper element.
    Dictionary,
}

impl FieldKind {
    const fn expected(&self) -> &'static str {
        match self {
            Self::Text | Self::Char { .. } | Self::Choice(_) => "text",
            Self::Boolean => "boolean",
            Self::Integer { .. } => "integer",
            Self::DateTime => "date-time",
            Self::Time => "time",
            Self::Base64 => "bytes",
            Self::Enum(_) => "enum name or index",
            Self::EnumList(_) => "list of enum names or indexes",
            Self::Element(ty) => ty.type_name,
            Self::ElementList(_) => "list of elements",
            Self::TextList { .. } => "list of text",
            Self::Dictionary => "dictionary",
        }
    }
}

/// A named, typed, wire-located descriptor of one entity attribute.
#[derive(Debug, Clone)]
pub struct Field {
    name: Cow<'static, str>,
    wire_name: Option<Cow<'static, str>>,
    location: Location,
    namespace: Namespace,
    kind: FieldKind,
    required: bool,
    read_only: bool,
    default: Option<FieldValue>,
    supported_from: Option<Build>,
    deprecated_from: Option<Build>,
}

impl Field {
    /// Creates a child-element field. Most fields are built through the
    /// shorthands below.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        wire_name: Option<&'static str>,
        kind: FieldKind,
    ) -> Self {
        Self {
            name: name.into(),
            wire_name: wire_name.map(Cow::Borrowed),
            location: Location::Element,
            namespace: Namespace::Types,
            kind,
            required: false,
            read_only: false,
            default: None,
            supported_from: None,
            deprecated_from: None,
        }
    }

    pub fn text(name: impl Into<Cow<'static, str>>, wire_name: &'static str) -> Self {
        Self::new(name, Some(wire_name), FieldKind::Text)
    }

    /// Text limited to [`DEFAULT_MAX_LEN`] characters.
    pub fn char(name: impl Into<Cow<'static, str>>, wire_name: &'static str) -> Self {
        Self::new(
            name,
            Some(wire_name),
            FieldKind::Char {
                max_len: DEFAULT_MAX_LEN,
            },
        )
    }

    pub fn boolean(name: impl Into<Cow<'static, str>>, wire_name: &'static str) -> Self {
        Self::new(name, Some(wire_name), FieldKind::Boolean)
    }

    pub fn integer(name: impl Into<Cow<'static, str>>, wire_name: &'static str) -> Self {
        Self::new(name, Some(wire_name), FieldKind::Integer { min: None, max: None })
    }

    pub fn datetime(name: impl Into<Cow<'static, str>>, wire_name: &'static str) -> Self {
        Self::new(name, Some(wire_name), FieldKind::DateTime)
    }

    pub fn time(name: impl Into<Cow<'static, str>>, wire_name: &'static str) -> Self {
        Self::new(name, Some(wire_name), FieldKind::Time)
    }

    pub fn base64(name: impl Into<Cow<'static, str>>, wire_name: &'static str) -> Self {
        Self::new(name, Some(wire_name), FieldKind::Base64)
    }

    pub fn choice(name: impl Into<Cow<'static, str>>, wire_name: &'static str, choices: Vec<Choice>) -> Self {
        Self::new(name, Some(wire_name), FieldKind::Choice(choices))
    }

    pub fn enumeration(
        name: impl Into<Cow<'static, str>>,
        wire_name: &'static str,
        names: &'static [&'static str],
    ) -> Self {
        Self::new(name, Some(wire_name), FieldKind::Enum(names))
    }

    pub fn enum_list(
        name: impl Into<Cow<'static, str>>,
        wire_name: &'static str,
        names: &'static [&'static str],
    ) -> Self {
        Self::new(name, Some(wire_name), FieldKind::EnumList(names))
    }

    /// A nested entity emitted under its own element name.
    pub fn element(name: impl Into<Cow<'static, str>>, ty: &'static ElementType) -> Self {
        Self::new(name, None, FieldKind::Element(ty))
    }

    /// A nested entity emitted under `wire_name` instead of its own element name.
    pub fn renamed_element(
        name: impl Into<Cow<'static, str>>,
        wire_name: &'static str,
        ty: &'static ElementType,
    ) -> Self {
        Self::new(name, Some(wire_name), FieldKind::Element(ty))
    }

    pub fn element_list(
        name: impl Into<Cow<'static, str>>,
        wire_name: &'static str,
        ty: &'static ElementType,
    ) -> Self {
        Self::new(name, Some(wire_name), FieldKind::ElementList(ty))
    }

    pub fn text_list(name: impl Into<Cow<'static, str>>, wire_name: &'static str, item: &'static str) -> Self {
        Self::new(name, Some(wire_name), FieldKind::TextList { item })
    }

    pub fn dictionary(name: impl Into<Cow<'static, str>>, wire_name: &'static str) -> Self {
        Self::new(name, Some(wire_name), FieldKind::Dictionary)
    }

    // ── Builder modifiers ────────────────────────────────────────

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Read-only fields are parsed from responses but never sent.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Moves the field to an XML attribute of the entity's element.
    #[must_use]
    pub fn attribute(mut self) -> Self {
        self.location = Location::Attribute;
        self
    }

    /// Moves the field to the text body of the entity's element.
    #[must_use]
    pub fn text_body(mut self) -> Self {
        self.location = Location::Text;
        self
    }

    #[must_use]
    pub fn in_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn min(mut self, value: i64) -> Self {
        if let FieldKind::Integer { min, .. } = &mut self.kind {
            *min = Some(value);
        }
        self
    }

    #[must_use]
    pub fn max(mut self, value: i64) -> Self {
        if let FieldKind::Integer { max, .. } = &mut self.kind {
            *max = Some(value);
        }
        self
    }

    #[must_use]
    pub fn max_len(mut self, value: usize) -> Self {
        if let FieldKind::Char { max_len } = &mut self.kind {
            *max_len = value;
        }
        self
    }

    #[must_use]
    pub fn supported_from(mut self, build: Build) -> Self {
        self.supported_from = Some(build);
        self
    }

    #[must_use]
    pub fn deprecated_from(mut self, build: Build) -> Self {
        self.deprecated_from = Some(build);
        self
    }

    // ── Accessors ────────────────────────────────────────────────

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute name or child tag. Falls back to the field name.
    #[must_use]
    pub fn wire_name(&self) -> &str {
        self.wire_name.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub fn is_attribute(&self) -> bool {
        self.location == Location::Attribute
    }

    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub const fn default_value(&self) -> Option<&FieldValue> {
        self.default.as_ref()
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::EnumList(_) | FieldKind::ElementList(_) | FieldKind::TextList { .. } | FieldKind::Dictionary
        )
    }

    /// Half-open check: `supported_from <= version < deprecated_from`.
    #[must_use]
    pub fn supports_version(&self, version: &Version) -> bool {
        let build = version.build();
        self.supported_from.is_none_or(|from| build >= from) && self.deprecated_from.is_none_or(|until| build < until)
    }

    /// The child element name of this field.
    #[must_use]
    pub fn qname(&self) -> QName {
        match (&self.kind, &self.wire_name) {
            (FieldKind::Element(ty), None) => ty.response_tag(),
            _ => QName::in_namespace(self.namespace, self.wire_name()),
        }
    }

    // ── Validation ───────────────────────────────────────────────

    /// Validates and normalizes a value.
    ///
    /// An absent value becomes the default if there is one. Required fields
    /// without a default reject absent values and empty collections.
    pub fn clean(&self, value: Option<FieldValue>, version: Option<&Version>) -> ModelResult<Option<FieldValue>> {
        let Some(value) = value else {
            if let Some(default) = &self.default {
                return Ok(Some(default.clone()));
            }
            if self.required {
                return Err(self.missing());
            }
            return Ok(None);
        };
        if self.required && value.is_empty_collection() {
            return Err(self.missing());
        }
        self.clean_value(value, version).map(Some)
    }

    fn clean_value(&self, value: FieldValue, version: Option<&Version>) -> ModelResult<FieldValue> {
        match (&self.kind, value) {
            (FieldKind::Text, value @ FieldValue::Text(_))
            | (FieldKind::Boolean, value @ FieldValue::Bool(_))
            | (FieldKind::DateTime, value @ FieldValue::DateTime(_))
            | (FieldKind::Time, value @ FieldValue::Time(_))
            | (FieldKind::Base64, value @ FieldValue::Bytes(_)) => Ok(value),
            (FieldKind::Char { max_len }, FieldValue::Text(text)) => {
                let len = text.chars().count();
                if len > *max_len {
                    return Err(ModelError::ValueTooLong {
                        field: self.name.to_string(),
                        len,
                        max: *max_len,
                    });
                }
                Ok(FieldValue::Text(text))
            }
            (FieldKind::Integer { min, max }, FieldValue::Int(n)) => {
                if min.is_some_and(|min| n < min) || max.is_some_and(|max| n > max) {
                    return Err(ModelError::OutOfRange {
                        field: self.name.to_string(),
                        value: n,
                        min: min.unwrap_or(i64::MIN),
                        max: max.unwrap_or(i64::MAX),
                    });
                }
                Ok(FieldValue::Int(n))
            }
            (FieldKind::Choice(choices), FieldValue::Text(text)) => {
                let Some(choice) = choices.iter().find(|c| c.value == text) else {
                    return Err(self.invalid_choice(&text, choices.iter().map(Choice::value)));
                };
                if let Some(version) = version
                    && !choice.supports_version(version)
                {
                    return Err(ModelError::InvalidChoiceForVersion {
                        field: self.name.to_string(),
                        value: text,
                        version: version.to_string(),
                    });
                }
                Ok(FieldValue::Text(text))
            }
            (FieldKind::Enum(names), value) => self.enum_index(names, &value).map(FieldValue::Int),
            (FieldKind::EnumList(names), FieldValue::List(items)) => items
                .iter()
                .map(|item| self.enum_index(names, item).map(FieldValue::Int))
                .collect::<ModelResult<Vec<_>>>()
                .map(FieldValue::List),
            (FieldKind::Element(ty), FieldValue::Element(mut element)) => {
                self.check_element_type(*ty, &element)?;
                element.clean(version)?;
                Ok(FieldValue::Element(element))
            }
            (FieldKind::ElementList(ty), FieldValue::List(items)) => {
                let mut cleaned = Vec::with_capacity(items.len());
                for item in items {
                    let FieldValue::Element(mut element) = item else {
                        return Err(self.mismatch(&item));
                    };
                    self.check_element_type(*ty, &element)?;
                    element.clean(version)?;
                    cleaned.push(FieldValue::Element(element));
                }
                Ok(FieldValue::List(cleaned))
            }
            (FieldKind::TextList { .. }, FieldValue::List(items)) => {
                if let Some(bad) = items.iter().find(|item| !matches!(item, FieldValue::Text(_))) {
                    return Err(self.mismatch(bad));
                }
                Ok(FieldValue::List(items))
            }
            (FieldKind::Dictionary, FieldValue::Dict(entries)) => {
                for (key, value) in &entries {
                    type_value_name(key).ok_or_else(|| self.mismatch(key))?;
                    type_value_name(value).ok_or_else(|| self.mismatch(value))?;
                }
                Ok(FieldValue::Dict(entries))
            }
            (_, other) => Err(self.mismatch(&other)),
        }
    }

    /// Normalizes an enum value given by name or 1-based index to the index.
    fn enum_index(&self, names: &[&str], value: &FieldValue) -> ModelResult<i64> {
        match value {
            FieldValue::Int(n) => {
                let len = i64::try_from(names.len()).unwrap_or(i64::MAX);
                if (1..=len).contains(n) {
                    Ok(*n)
                } else {
                    Err(ModelError::OutOfRange {
                        field: self.name.to_string(),
                        value: *n,
                        min: 1,
                        max: len,
                    })
                }
            }
            FieldValue::Text(text) => names
                .iter()
                .position(|name| *name == text.as_str())
                .and_then(|idx| i64::try_from(idx + 1).ok())
                .ok_or_else(|| self.invalid_choice(text, names.iter().copied())),
            other => Err(self.mismatch(other)),
        }
    }

    fn check_element_type(&self, ty: &'static ElementType, element: &Element) -> ModelResult<()> {
        if std::ptr::eq(element.element_type(), ty) {
            Ok(())
        } else {
            Err(ModelError::TypeMismatch {
                field: self.name.to_string(),
                expected: ty.type_name,
                found: element.element_type().type_name,
            })
        }
    }

    // ── Marshal ──────────────────────────────────────────────────

    /// Writes an already cleaned value into `parent`.
    pub fn to_wire(&self, value: &FieldValue, version: &Version, parent: &mut XmlElement) -> ModelResult<()> {
        match self.location {
            Location::Attribute => parent.set_attr(self.wire_name(), self.value_to_text(value)?),
            Location::Text => parent.set_text(self.value_to_text(value)?),
            Location::Element => parent.push(self.value_to_child(value, version)?),
        }
        Ok(())
    }

    fn value_to_child(&self, value: &FieldValue, version: &Version) -> ModelResult<XmlElement> {
        match (&self.kind, value) {
            (FieldKind::Element(_), FieldValue::Element(element)) => {
                let mut child = element.render(version)?;
                if self.wire_name.is_some() {
                    child.rename(self.qname());
                }
                Ok(child)
            }
            (FieldKind::ElementList(_), FieldValue::List(items)) => {
                let mut wrapper = XmlElement::new(self.qname());
                for item in items {
                    let element = item.as_element().ok_or_else(|| self.mismatch(item))?;
                    wrapper.push(element.render(version)?);
                }
                Ok(wrapper)
            }
            (FieldKind::TextList { item }, FieldValue::List(items)) => {
                let mut wrapper = XmlElement::new(self.qname());
                for value in items {
                    let text = value.as_str().ok_or_else(|| self.mismatch(value))?;
                    wrapper.push(XmlElement::with_text(QName::in_namespace(self.namespace, *item), text));
                }
                Ok(wrapper)
            }
            (FieldKind::Dictionary, FieldValue::Dict(entries)) => {
                let mut wrapper = XmlElement::new(self.qname());
                for (key, value) in entries {
                    let mut entry = XmlElement::new(QName::types("DictionaryEntry"));
                    entry.push(self.type_value_to_wire("DictionaryKey", key)?);
                    entry.push(self.type_value_to_wire("DictionaryValue", value)?);
                    wrapper.push(entry);
                }
                Ok(wrapper)
            }
            _ => Ok(XmlElement::with_text(self.qname(), self.value_to_text(value)?)),
        }
    }

    fn value_to_text(&self, value: &FieldValue) -> ModelResult<String> {
        match (&self.kind, value) {
            (FieldKind::Enum(names), FieldValue::Int(idx)) => self.enum_name(names, *idx).map(str::to_string),
            (FieldKind::EnumList(names), FieldValue::List(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let idx = item.as_int().ok_or_else(|| self.mismatch(item))?;
                    out.push(self.enum_name(names, idx)?);
                }
                Ok(out.join(" "))
            }
            (_, FieldValue::Text(text)) => Ok(text.clone()),
            (_, FieldValue::Bool(b)) => Ok(wire::bool_to_text(*b).to_string()),
            (_, FieldValue::Int(n)) => Ok(n.to_string()),
            (_, FieldValue::DateTime(dt)) => Ok(wire::datetime_to_text(dt)),
            (_, FieldValue::Time(t)) => Ok(wire::time_to_text(t)),
            (_, FieldValue::Bytes(bytes)) => Ok(wire::bytes_to_text(bytes)),
            (_, other) => Err(self.mismatch(other)),
        }
    }

    fn enum_name(&self, names: &[&'static str], idx: i64) -> ModelResult<&'static str> {
        usize::try_from(idx)
            .ok()
            .and_then(|idx| idx.checked_sub(1))
            .and_then(|idx| names.get(idx).copied())
            .ok_or_else(|| ModelError::OutOfRange {
                field: self.name.to_string(),
                value: idx,
                min: 1,
                max: i64::try_from(names.len()).unwrap_or(i64::MAX),
            })
    }

    fn type_value_to_wire(&self, tag: &str, value: &FieldValue) -> ModelResult<XmlElement> {
        let type_name = type_value_name(value).ok_or_else(|| self.mismatch(value))?;
        let mut element = XmlElement::new(QName::types(tag));
        element.push(XmlElement::with_text(QName::types("Type"), type_name));
        match value {
            FieldValue::List(items) => {
                for item in items {
                    element.push(XmlElement::with_text(QName::types("Value"), self.value_to_text(item)?));
                }
            }
            scalar => element.push(XmlElement::with_text(QName::types("Value"), self.value_to_text(scalar)?)),
        }
        Ok(element)
    }

    // ── Unmarshal ────────────────────────────────────────────────

    /// Extracts this field's value from `wire`, detaching any consumed child.
    pub fn from_wire(&self, wire: &mut XmlElement, version: &Version) -> ModelResult<Option<FieldValue>> {
        match self.location {
            Location::Attribute => wire.attr(self.wire_name()).map(|text| self.text_to_value(text)).transpose(),
            Location::Text => wire.take_text().map(|text| self.text_to_value(&text)).transpose(),
            Location::Element => {
                let Some(child) = wire.take(&self.qname()) else {
                    return Ok(None);
                };
                self.child_to_value(child, version)
            }
        }
    }

    fn child_to_value(&self, mut child: XmlElement, version: &Version) -> ModelResult<Option<FieldValue>> {
        match &self.kind {
            FieldKind::Element(ty) => {
                let element = Element::from_wire(*ty, child, version)?;
                Ok(Some(FieldValue::Element(Box::new(element))))
            }
            FieldKind::ElementList(ty) => {
                let items = child
                    .take_all(&ty.response_tag())
                    .into_iter()
                    .map(|item| Element::from_wire(*ty, item, version).map(FieldValue::from))
                    .collect::<ModelResult<Vec<_>>>()?;
                Ok(Some(FieldValue::List(items)))
            }
            FieldKind::TextList { item } => {
                let items = child
                    .take_all(&QName::in_namespace(self.namespace, *item))
                    .into_iter()
                    .map(|mut e| FieldValue::Text(e.take_text().unwrap_or_default()))
                    .collect();
                Ok(Some(FieldValue::List(items)))
            }
            FieldKind::Dictionary => {
                let mut entries = Vec::new();
                for mut entry in child.take_all(&QName::types("DictionaryEntry")) {
                    let key = entry.take(&QName::types("DictionaryKey"));
                    let value = entry.take(&QName::types("DictionaryValue"));
                    let (Some(key), Some(value)) = (key, value) else {
                        return Err(self.malformed("dictionary entry without key or value"));
                    };
                    entries.push((self.type_value_from_wire(key)?, self.type_value_from_wire(value)?));
                }
                Ok(Some(FieldValue::Dict(entries)))
            }
            _ => child.take_text().map(|text| self.text_to_value(&text)).transpose(),
        }
    }

    fn text_to_value(&self, text: &str) -> ModelResult<FieldValue> {
        match &self.kind {
            FieldKind::Text | FieldKind::Char { .. } => Ok(FieldValue::Text(text.to_string())),
            FieldKind::Boolean => wire::text_to_bool(text).map(FieldValue::Bool).map_err(|e| self.malformed(e)),
            FieldKind::Integer { .. } => wire::text_to_int(text).map(FieldValue::Int).map_err(|e| self.malformed(e)),
            FieldKind::DateTime => wire::text_to_datetime(text)
                .map(FieldValue::DateTime)
                .map_err(|e| self.malformed(e)),
            FieldKind::Time => wire::text_to_time(text).map(FieldValue::Time).map_err(|e| self.malformed(e)),
            FieldKind::Base64 => wire::text_to_bytes(text).map(FieldValue::Bytes).map_err(|e| self.malformed(e)),
            FieldKind::Choice(choices) => {
                if choices.iter().any(|c| c.value == text) {
                    Ok(FieldValue::Text(text.to_string()))
                } else {
                    Err(self.invalid_choice(text, choices.iter().map(Choice::value)))
                }
            }
            FieldKind::Enum(names) => self.enum_index(names, &FieldValue::from(text)).map(FieldValue::Int),
            FieldKind::EnumList(names) => text
                .split_whitespace()
                .map(|name| self.enum_index(names, &FieldValue::from(name)).map(FieldValue::Int))
                .collect::<ModelResult<Vec<_>>>()
                .map(FieldValue::List),
            FieldKind::Element(_) | FieldKind::ElementList(_) | FieldKind::TextList { .. } | FieldKind::Dictionary => {
                Err(ModelError::TypeMismatch {
                    field: self.name.to_string(),
                    expected: self.kind.expected(),
                    found: "text",
                })
            }
        }
    }

    fn type_value_from_wire(&self, mut element: XmlElement) -> ModelResult<FieldValue> {
        let type_name = element
            .take(&QName::types("Type"))
            .and_then(|mut t| t.take_text())
            .ok_or_else(|| self.malformed("typed value without a type"))?;
        let mut values = element
            .take_all(&QName::types("Value"))
            .into_iter()
            .map(|mut v| v.take_text().unwrap_or_default());
        if type_name == "StringArray" {
            return Ok(FieldValue::List(values.map(FieldValue::Text).collect()));
        }
        let text = values.next().unwrap_or_default();
        let value = match type_name.as_str() {
            "Boolean" => FieldValue::Bool(wire::text_to_bool(&text).map_err(|e| self.malformed(e))?),
            "Byte" | "Integer32" | "UnsignedInteger32" | "Integer64" | "UnsignedInteger64" => {
                FieldValue::Int(wire::text_to_int(&text).map_err(|e| self.malformed(e))?)
            }
            "ByteArray" => FieldValue::Bytes(wire::text_to_bytes(&text).map_err(|e| self.malformed(e))?),
            "DateTime" => FieldValue::DateTime(wire::text_to_datetime(&text).map_err(|e| self.malformed(e))?),
            "String" => FieldValue::Text(text),
            other => return Err(self.malformed(format!("unknown value type {other:?}"))),
        };
        Ok(value)
    }

    // ── Hashing ──────────────────────────────────────────────────

    /// Canonical form of a (possibly absent) value. Absent list fields hash
    /// like empty ones and enum values hash as their wire names.
    #[must_use]
    pub fn to_hashable(&self, value: Option<&FieldValue>) -> Hashable {
        match (value, &self.kind) {
            (None, _) if self.is_list() => Hashable::Tuple(Vec::new()),
            (None, _) => Hashable::None,
            (Some(FieldValue::Int(idx)), FieldKind::Enum(names)) => enum_hashable(names, *idx),
            (Some(FieldValue::List(items)), FieldKind::EnumList(names)) => Hashable::Tuple(
                items
                    .iter()
                    .map(|item| match item {
                        FieldValue::Int(idx) => enum_hashable(names, *idx),
                        other => hashable(other),
                    })
                    .collect(),
            ),
            (Some(value), _) => hashable(value),
        }
    }

    // ── Errors ───────────────────────────────────────────────────

    fn missing(&self) -> ModelError {
        ModelError::MissingRequiredField {
            field: self.name.to_string(),
        }
    }

    fn mismatch(&self, found: &FieldValue) -> ModelError {
        ModelError::TypeMismatch {
            field: self.name.to_string(),
            expected: self.kind.expected(),
            found: found.kind_name(),
        }
    }

    fn invalid_choice<'a>(&self, value: &str, choices: impl Iterator<Item = &'a str>) -> ModelError {
        ModelError::InvalidChoice {
            field: self.name.to_string(),
            value: value.to_string(),
            choices: choices.map(str::to_string).collect(),
        }
    }

    fn malformed(&self, reason: impl fmt::Display) -> ModelError {
        ModelError::MalformedWire {
            field: self.name.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn enum_hashable(names: &[&str], idx: i64) -> Hashable {
    usize::try_from(idx)
        .ok()
        .and_then(|idx| idx.checked_sub(1))
        .and_then(|idx| names.get(idx))
        .map_or(Hashable::Int(idx), |name| Hashable::Text((*name).to_string()))
}

/// Wire type name of a dictionary key or value, or `None` if the value
/// cannot be stored in a dictionary.
fn type_value_name(value: &FieldValue) -> Option<&'static str> {
    match value {
        FieldValue::Bool(_) => Some("Boolean"),
        FieldValue::Int(n) if i32::try_from(*n).is_ok() => Some("Integer32"),
        FieldValue::Int(_) => Some("Integer64"),
        FieldValue::Bytes(_) => Some("ByteArray"),
        FieldValue::DateTime(_) => Some("DateTime"),
        FieldValue::Text(_) => Some("String"),
        FieldValue::List(items) if items.iter().all(|i| matches!(i, FieldValue::Text(_))) => Some("StringArray"),
        _ => None,
    }
}
