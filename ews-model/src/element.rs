use crate::identity::{CHANGEKEY, ID};
use crate::value::hashable;
use crate::{registry, ElementHooks, Field, FieldValue, Fields, Hashable, ModelError, ModelResult, NoHooks};
use chrono::{DateTime, NaiveTime, Utc};
use ews_types::{Namespace, QName, Version, XmlElement};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

/// Where a type keeps its delegated identity: the name of the field holding
/// the nested identity element, and that element's type.
#[derive(Debug, Clone, Copy)]
pub struct IdentitySlot {
    pub field: &'static str,
    pub ty: &'static ElementType,
}

/// Static description of one entity type.
///
/// Declared once per type as a `static`; the fields are built on first use
/// and then resolved through the schema registry, so they can be extended at
/// run time.
pub struct ElementType {
    pub type_name: &'static str,
    pub element_name: &'static str,
    pub namespace: Namespace,
    fields: fn() -> ModelResult<Fields>,
    identity: Option<IdentitySlot>,
    hooks: &'static dyn ElementHooks,
}

impl ElementType {
    #[must_use]
    pub const fn new(type_name: &'static str, element_name: &'static str, fields: fn() -> ModelResult<Fields>) -> Self {
        Self {
            type_name,
            element_name,
            namespace: Namespace::Types,
            fields,
            identity: None,
            hooks: &NoHooks,
        }
    }

    /// Emits the element in the messages namespace.
    #[must_use]
    pub const fn in_messages(mut self) -> Self {
        self.namespace = Namespace::Messages;
        self
    }

    #[must_use]
    pub const fn with_hooks(mut self, hooks: &'static dyn ElementHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Delegates `id`/`changekey` to the nested element stored in `field`.
    #[must_use]
    pub const fn with_identity(mut self, field: &'static str, ty: &'static ElementType) -> Self {
        self.identity = Some(IdentitySlot { field, ty });
        self
    }

    #[must_use]
    pub const fn identity(&self) -> Option<IdentitySlot> {
        self.identity
    }

    #[must_use]
    pub fn hooks(&self) -> &'static dyn ElementHooks {
        self.hooks
    }

    /// Builds the schema as declared, ignoring run-time extensions.
    pub fn declared_fields(&self) -> ModelResult<Fields> {
        (self.fields)()
    }

    /// The current schema, including run-time extensions.
    pub fn schema(&'static self) -> ModelResult<Arc<Fields>> {
        registry::schema(self)
    }

    /// Fields rendered as XML attributes.
    pub fn attribute_fields(&'static self) -> ModelResult<Vec<Field>> {
        Ok(self.schema()?.iter().filter(|f| f.is_attribute()).cloned().collect())
    }

    /// Non-attribute fields the given version supports.
    pub fn supported_fields(&'static self, version: &Version) -> ModelResult<Vec<Field>> {
        Ok(self
            .schema()?
            .iter()
            .filter(|f| !f.is_attribute() && f.supports_version(version))
            .cloned()
            .collect())
    }

    /// Looks up a field by name. `id` and `changekey` on a type with delegated
    /// identity resolve to the identity type's fields.
    pub fn get_field_by_fieldname(&'static self, name: &str) -> ModelResult<Field> {
        if let Some(slot) = self.identity
            && (name == ID || name == CHANGEKEY)
        {
            return slot.ty.get_field_by_fieldname(name);
        }
        self.schema()?
            .get(name)
            .cloned()
            .ok_or_else(|| ModelError::UnknownFieldName { name: name.to_string() })
    }

    /// Checks that `name` is a field of this type usable at `version`.
    pub fn validate_field(&'static self, name: &str, version: &Version) -> ModelResult<()> {
        let field = self.get_field_by_fieldname(name)?;
        if !field.supports_version(version) {
            return Err(ModelError::UnsupportedFieldVersion {
                field: name.to_string(),
                version: version.to_string(),
            });
        }
        Ok(())
    }

    /// Prefixed tag used in requests, e.g. `t:Mailbox`.
    #[must_use]
    pub fn request_tag(&self) -> String {
        format!("{}:{}", self.namespace.prefix(), self.element_name)
    }

    /// Namespace-qualified tag used to find the element in responses.
    #[must_use]
    pub fn response_tag(&self) -> QName {
        QName::in_namespace(self.namespace, self.element_name)
    }

    /// Inserts `field` right after the field named `after`.
    pub fn add_field(&'static self, field: Field, after: &str) -> ModelResult<()> {
        registry::add_field(self, field, after)
    }

    pub fn remove_field(&'static self, name: &str) -> ModelResult<Field> {
        registry::remove_field(self, name)
    }

    /// Drops all run-time extensions.
    pub fn reset_fields(&'static self) {
        registry::reset_fields(self);
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementType")
            .field("type_name", &self.type_name)
            .field("element_name", &self.element_name)
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

/// A schema-bound value object mapping to exactly one XML element.
///
/// Values are only ever stored under names declared in the type's schema (or
/// the virtual `id`/`changekey` of a type with delegated identity); every
/// write path checks this.
#[derive(Clone)]
pub struct Element {
    ty: &'static ElementType,
    values: BTreeMap<String, FieldValue>,
}

impl Element {
    /// An element with no fields set.
    #[must_use]
    pub fn empty(ty: &'static ElementType) -> Self {
        Self {
            ty,
            values: BTreeMap::new(),
        }
    }

    /// Builds an element from named values.
    ///
    /// Fails with [`ModelError::UnexpectedAttribute`] naming every key that is
    /// neither a field nor an allowed virtual attribute.
    pub fn new<K, V>(ty: &'static ElementType, values: impl IntoIterator<Item = (K, V)>) -> ModelResult<Self>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let schema = ty.schema()?;
        let mut element = Self::empty(ty);
        let mut unexpected = Vec::new();
        for (name, value) in values {
            let name = name.into();
            if schema.contains(&name) {
                element.values.insert(name, value.into());
            } else if element.is_virtual(&schema, &name) {
                element.set_identity_attr(&name, value.into())?;
            } else {
                unexpected.push(name);
            }
        }
        if !unexpected.is_empty() {
            return Err(ModelError::UnexpectedAttribute {
                type_name: ty.type_name,
                names: unexpected,
            });
        }
        Ok(element)
    }

    #[must_use]
    pub const fn element_type(&self) -> &'static ElementType {
        self.ty
    }

    pub fn schema(&self) -> ModelResult<Arc<Fields>> {
        self.ty.schema()
    }

    fn is_virtual(&self, schema: &Fields, name: &str) -> bool {
        self.ty.identity.is_some() && (name == ID || name == CHANGEKEY) && !schema.contains(name)
    }

    // ── Access ───────────────────────────────────────────────────

    /// Returns a field value, or `None` if the field is absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        if let Some(value) = self.values.get(name) {
            return Some(value);
        }
        if name == ID || name == CHANGEKEY {
            return self.identity()?.get(name);
        }
        None
    }

    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_int)
    }

    #[must_use]
    pub fn get_datetime(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get(name).and_then(FieldValue::as_datetime)
    }

    #[must_use]
    pub fn get_time(&self, name: &str) -> Option<NaiveTime> {
        self.get(name).and_then(FieldValue::as_time)
    }

    #[must_use]
    pub fn get_element(&self, name: &str) -> Option<&Element> {
        self.get(name).and_then(FieldValue::as_element)
    }

    #[must_use]
    pub fn get_list(&self, name: &str) -> Option<&[FieldValue]> {
        self.get(name).and_then(FieldValue::as_list)
    }

    /// Stored values, keyed by field name.
    pub fn values(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sets a field. Fails with [`ModelError::InvalidAttribute`] if `name` is
    /// not a field of this type. The value is validated by [`Element::clean`].
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> ModelResult<()> {
        let schema = self.schema()?;
        if schema.contains(name) {
            self.values.insert(name.to_string(), value.into());
            Ok(())
        } else if self.is_virtual(&schema, name) {
            self.set_identity_attr(name, value.into())
        } else {
            Err(self.invalid_attribute(name))
        }
    }

    /// Clears a field and returns its previous value.
    pub fn unset(&mut self, name: &str) -> ModelResult<Option<FieldValue>> {
        let schema = self.schema()?;
        if schema.contains(name) {
            Ok(self.values.remove(name))
        } else if self.is_virtual(&schema, name) {
            let slot = self.identity_slot(name)?;
            Ok(self
                .values
                .get_mut(slot.field)
                .and_then(FieldValue::as_element_mut)
                .and_then(|identity| identity.values.remove(name)))
        } else {
            Err(self.invalid_attribute(name))
        }
    }

    pub(crate) fn identity(&self) -> Option<&Element> {
        let slot = self.ty.identity?;
        self.values.get(slot.field)?.as_element()
    }

    pub(crate) fn identity_mut(&mut self) -> Option<&mut Element> {
        let slot = self.ty.identity?;
        self.values.get_mut(slot.field)?.as_element_mut()
    }

    fn identity_slot(&self, name: &str) -> ModelResult<IdentitySlot> {
        self.ty.identity.ok_or_else(|| self.invalid_attribute(name))
    }

    /// Writes `id` or `changekey` on the nested identity, creating it if needed.
    pub(crate) fn set_identity_attr(&mut self, name: &str, value: FieldValue) -> ModelResult<()> {
        let slot = self.identity_slot(name)?;
        let nested = self
            .values
            .entry(slot.field.to_string())
            .or_insert_with(|| FieldValue::Element(Box::new(Element::empty(slot.ty))));
        match nested {
            FieldValue::Element(identity) => identity.set(name, value),
            other => Err(ModelError::TypeMismatch {
                field: slot.field.to_string(),
                expected: slot.ty.type_name,
                found: other.kind_name(),
            }),
        }
    }

    fn invalid_attribute(&self, name: &str) -> ModelError {
        ModelError::InvalidAttribute {
            type_name: self.ty.type_name,
            name: name.to_string(),
        }
    }

    // ── Validation ───────────────────────────────────────────────

    /// Validates and normalizes every field in declaration order.
    ///
    /// With a version, fields that version doesn't support are skipped.
    pub fn clean(&mut self, version: Option<&Version>) -> ModelResult<()> {
        let hooks = self.ty.hooks;
        hooks.before_clean(self, version)?;
        let schema = self.schema()?;
        for field in schema.iter() {
            if version.is_some_and(|v| !field.supports_version(v)) {
                continue;
            }
            let current = self.values.get(field.name()).cloned();
            match field.clean(current, version)? {
                Some(value) => {
                    self.values.insert(field.name().to_string(), value);
                }
                None => {
                    self.values.remove(field.name());
                }
            }
        }
        hooks.after_clean(self, version)
    }

    // ── Marshal ──────────────────────────────────────────────────

    /// Validates the element and renders it.
    ///
    /// Validation runs to completion before anything is rendered, so a
    /// failure never leaves a partial element behind.
    pub fn to_wire(&mut self, version: &Version) -> ModelResult<XmlElement> {
        self.clean(Some(version))?;
        self.render(version)
    }

    /// Renders an already cleaned element: attributes first, then children in
    /// schema order.
    pub(crate) fn render(&self, version: &Version) -> ModelResult<XmlElement> {
        let schema = self.schema()?;
        let mut wire = XmlElement::new(self.ty.response_tag());
        let (attributes, children): (Vec<&Field>, Vec<&Field>) = schema.iter().partition(|f| f.is_attribute());
        for field in attributes.into_iter().chain(children) {
            if field.is_read_only() || !field.supports_version(version) {
                continue;
            }
            match self.values.get(field.name()) {
                Some(value) if !value.is_empty_collection() => field.to_wire(value, version, &mut wire)?,
                _ => {}
            }
        }
        Ok(wire)
    }

    // ── Unmarshal ────────────────────────────────────────────────

    /// Builds an element from its wire form.
    ///
    /// Takes the wire element by value: each field detaches the children it
    /// consumes and whatever is left is dropped before returning.
    pub fn from_wire(ty: &'static ElementType, mut wire: XmlElement, version: &Version) -> ModelResult<Self> {
        ty.hooks.before_from_wire(&mut wire)?;
        let schema = ty.schema()?;
        let mut element = Self::empty(ty);
        for field in schema.iter() {
            if let Some(value) = field.from_wire(&mut wire, version)? {
                element.values.insert(field.name().to_string(), value);
            }
        }
        if !wire.children().is_empty() {
            debug!(
                type_name = ty.type_name,
                skipped = wire.children().len(),
                "Skipped unknown child elements"
            );
        }
        drop(wire);
        ty.hooks.after_from_wire(&mut element)?;
        Ok(element)
    }

    // ── Hashing ──────────────────────────────────────────────────

    /// The canonical form this element hashes and compares by.
    ///
    /// An element with a delegated id hashes on `(id, changekey)` alone.
    /// Otherwise the type's hooks may supply a key; the default is the ordered
    /// `(name, value)` pairs of every field in the schema.
    #[must_use]
    pub fn hash_key(&self) -> Hashable {
        if let Some(identity) = self.identity()
            && let Some(id) = identity.get(ID)
        {
            let changekey = identity.get(CHANGEKEY).map_or(Hashable::None, hashable);
            return Hashable::Tuple(vec![hashable(id), changekey]);
        }
        if let Some(key) = self.ty.hooks.hash_key(self) {
            return key;
        }
        match self.schema() {
            Ok(schema) => Hashable::Tuple(
                schema
                    .iter()
                    .map(|f| {
                        Hashable::Tuple(vec![
                            Hashable::Text(f.name().to_string()),
                            f.to_hashable(self.values.get(f.name())),
                        ])
                    })
                    .collect(),
            ),
            Err(_) => Hashable::Tuple(
                self.values
                    .iter()
                    .map(|(k, v)| Hashable::Tuple(vec![Hashable::Text(k.clone()), hashable(v)]))
                    .collect(),
            ),
        }
    }

    #[must_use]
    pub fn structural_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash_key().hash(&mut hasher);
        hasher.finish()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.structural_hash() == other.structural_hash()
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("type", &self.ty.type_name)
            .field("values", &self.values)
            .finish()
    }
}
