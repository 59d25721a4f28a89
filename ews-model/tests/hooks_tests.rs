use chrono::{TimeZone, Utc};
use ews_model::{Element, ElementHooks, ElementType, Field, FieldValue, Fields, Hashable, ModelError, ModelResult};
use ews_types::{QName, Version, XmlElement, EXCHANGE_2013};
use pretty_assertions::assert_eq;

fn v2013() -> Version {
    Version::from_build(EXCHANGE_2013)
}

// ── Default implementations ──────────────────────────────────────

struct NoOpHooks;
impl ElementHooks for NoOpHooks {}

static PLAIN: ElementType = ElementType::new("Plain", "Plain", plain_fields).with_hooks(&NoOpHooks);

fn plain_fields() -> ModelResult<Fields> {
    Fields::new(vec![Field::text("name", "Name")])
}

#[test]
fn default_hooks_change_nothing() {
    let mut element = Element::new(&PLAIN, vec![("name", "x")]).unwrap();
    assert!(NoOpHooks.hash_key(&element).is_none());
    element.clean(None).unwrap();
    assert_eq!(element.get_str("name"), Some("x"));
}

// ── Cross-field validation ───────────────────────────────────────

struct RangeHooks;

impl ElementHooks for RangeHooks {
    fn after_clean(&self, element: &mut Element, _version: Option<&Version>) -> ModelResult<()> {
        if let (Some(start), Some(end)) = (element.get_datetime("start"), element.get_datetime("end")) {
            if end < start {
                return Err(ModelError::InvalidValue {
                    field: "end".to_string(),
                    reason: format!("{end} is before {start}"),
                });
            }
        }
        Ok(())
    }
}

static RANGE: ElementType = ElementType::new("Range", "Range", range_fields).with_hooks(&RangeHooks);

fn range_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::datetime("start", "StartTime").required(),
        Field::datetime("end", "EndTime").required(),
    ])
}

#[test]
fn after_clean_rejects_inverted_range() {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let mut range = Element::new(
        &RANGE,
        vec![("start", FieldValue::from(start)), ("end", FieldValue::from(end))],
    )
    .unwrap();
    assert!(matches!(range.to_wire(&v2013()), Err(ModelError::InvalidValue { field, .. }) if field == "end"));

    range.set("end", start).unwrap();
    assert!(range.to_wire(&v2013()).is_ok());
}

// ── Normalization before clean ───────────────────────────────────

struct ZipHooks;

impl ElementHooks for ZipHooks {
    fn before_clean(&self, element: &mut Element, _version: Option<&Version>) -> ModelResult<()> {
        if let Some(zip) = element.get_int("zipcode") {
            element.set("zipcode", zip.to_string())?;
        }
        Ok(())
    }
}

static ADDRESS: ElementType = ElementType::new("Address", "Entry", address_fields).with_hooks(&ZipHooks);

fn address_fields() -> ModelResult<Fields> {
    Fields::new(vec![Field::text("zipcode", "PostalCode")])
}

#[test]
fn before_clean_coerces_value() {
    let mut address = Element::new(&ADDRESS, vec![("zipcode", 2100)]).unwrap();
    let wire = address.to_wire(&v2013()).unwrap();
    assert_eq!(
        wire.find(&QName::types("PostalCode")).and_then(XmlElement::text),
        Some("2100")
    );
}

// ── Hash override ────────────────────────────────────────────────

struct CaseInsensitiveHooks;

impl ElementHooks for CaseInsensitiveHooks {
    fn hash_key(&self, element: &Element) -> Option<Hashable> {
        element.get_str("email").map(|e| Hashable::Text(e.to_lowercase()))
    }
}

static PERSON: ElementType = ElementType::new("Person", "Person", person_fields).with_hooks(&CaseInsensitiveHooks);

fn person_fields() -> ModelResult<Fields> {
    Fields::new(vec![Field::text("name", "Name"), Field::text("email", "EmailAddress")])
}

#[test]
fn hash_override_ignores_other_fields() {
    let a = Element::new(&PERSON, vec![("name", "Jane"), ("email", "Jane@Example.com")]).unwrap();
    let b = Element::new(&PERSON, vec![("name", "J."), ("email", "jane@example.com")]).unwrap();
    assert_eq!(a, b);

    let c = Element::new(&PERSON, vec![("name", "Jane")]).unwrap();
    let d = Element::new(&PERSON, vec![("name", "John")]).unwrap();
    assert_ne!(c, d);
}

// ── Wire shape hooks ─────────────────────────────────────────────

struct UnwrapHooks;

impl ElementHooks for UnwrapHooks {
    fn before_from_wire(&self, wire: &mut XmlElement) -> ModelResult<()> {
        if let Some(mut wrapper) = wire.take(&QName::types("Wrapper")) {
            for child in wrapper.take_all(&QName::types("Inner")) {
                wire.push(child);
            }
        }
        Ok(())
    }

    fn after_from_wire(&self, element: &mut Element) -> ModelResult<()> {
        if element.get("inner").is_none() {
            element.set("inner", "missing")?;
        }
        Ok(())
    }
}

static WRAPPED: ElementType = ElementType::new("Wrapped", "Wrapped", wrapped_fields).with_hooks(&UnwrapHooks);

fn wrapped_fields() -> ModelResult<Fields> {
    Fields::new(vec![Field::text("inner", "Inner")])
}

#[test]
fn before_from_wire_reshapes_input() {
    let mut wire = XmlElement::new(QName::types("Wrapped"));
    let mut wrapper = XmlElement::new(QName::types("Wrapper"));
    wrapper.push(XmlElement::with_text(QName::types("Inner"), "found"));
    wire.push(wrapper);
    let element = Element::from_wire(&WRAPPED, wire, &v2013()).unwrap();
    assert_eq!(element.get_str("inner"), Some("found"));
}

#[test]
fn after_from_wire_post_processes() {
    let wire = XmlElement::new(QName::types("Wrapped"));
    let element = Element::from_wire(&WRAPPED, wire, &v2013()).unwrap();
    assert_eq!(element.get_str("inner"), Some("missing"));
}
