use crate::Element;
use chrono::{DateTime, NaiveTime, Utc};

/// A native field value.
///
/// An absent value is represented by the field not being stored on the
/// element at all, so there is no `None` variant.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Int(i64),
    DateTime(DateTime<Utc>),
    Time(NaiveTime),
    Bytes(Vec<u8>),
    Element(Box<Element>),
    List(Vec<FieldValue>),
    /// Ordered key/value pairs. Keys are scalar values.
    Dict(Vec<(FieldValue, FieldValue)>),
}

impl FieldValue {
    /// Short name of the variant, used in type mismatch errors.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::DateTime(_) => "date-time",
            Self::Time(_) => "time",
            Self::Bytes(_) => "bytes",
            Self::Element(_) => "element",
            Self::List(_) => "list",
            Self::Dict(_) => "dictionary",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for an empty list or dictionary. Such values are never emitted.
    #[must_use]
    pub fn is_empty_collection(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Dict(entries) => entries.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<NaiveTime> for FieldValue {
    fn from(value: NaiveTime) -> Self {
        Self::Time(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Element> for FieldValue {
    fn from(value: Element) -> Self {
        Self::Element(Box::new(value))
    }
}

impl FromIterator<FieldValue> for FieldValue {
    fn from_iter<I: IntoIterator<Item = FieldValue>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

/// Canonical, hashable form of a field value.
///
/// Lists fold to tuples, enum values become their wire names and nested
/// elements contribute their own structural hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Hashable {
    None,
    Text(String),
    Bool(bool),
    Int(i64),
    DateTime(DateTime<Utc>),
    Time(NaiveTime),
    Bytes(Vec<u8>),
    Element(u64),
    Tuple(Vec<Hashable>),
}

/// Canonical form of a value without field-specific normalization.
pub(crate) fn hashable(value: &FieldValue) -> Hashable {
    match value {
        FieldValue::Text(s) => Hashable::Text(s.clone()),
        FieldValue::Bool(b) => Hashable::Bool(*b),
        FieldValue::Int(n) => Hashable::Int(*n),
        FieldValue::DateTime(dt) => Hashable::DateTime(*dt),
        FieldValue::Time(t) => Hashable::Time(*t),
        FieldValue::Bytes(b) => Hashable::Bytes(b.clone()),
        FieldValue::Element(e) => Hashable::Element(e.structural_hash()),
        FieldValue::List(items) => Hashable::Tuple(items.iter().map(hashable).collect()),
        FieldValue::Dict(entries) => Hashable::Tuple(
            entries
                .iter()
                .map(|(k, v)| Hashable::Tuple(vec![hashable(k), hashable(v)]))
                .collect(),
        ),
    }
}
