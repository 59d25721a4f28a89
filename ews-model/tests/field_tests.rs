mod common;

use chrono::{NaiveTime, TimeZone, Utc};
use common::{v2010, v2013, WEEKDAYS};
use ews_model::{Choice, Field, FieldValue, Hashable, Location, ModelError};
use ews_types::{QName, XmlElement, EXCHANGE_2010, EXCHANGE_2013};
use pretty_assertions::assert_eq;

fn parent() -> XmlElement {
    XmlElement::new(QName::types("Parent"))
}

// ── Presence and defaults ────────────────────────────────────────

#[test]
fn absent_optional_stays_absent() {
    let field = Field::text("name", "Name");
    assert_eq!(field.clean(None, None).unwrap(), None);
}

#[test]
fn absent_required_fails() {
    let field = Field::text("name", "Name").required();
    let err = field.clean(None, None).unwrap_err();
    assert!(matches!(err, ModelError::MissingRequiredField { field } if field == "name"));
}

#[test]
fn absent_value_takes_default() {
    let field = Field::text("routing_type", "RoutingType").required().with_default("SMTP");
    assert_eq!(field.clean(None, None).unwrap(), Some(FieldValue::from("SMTP")));
}

#[test]
fn required_list_rejects_empty() {
    let field = Field::text_list("aliases", "Aliases", "String").required();
    let err = field.clean(Some(FieldValue::List(vec![])), None).unwrap_err();
    assert!(matches!(err, ModelError::MissingRequiredField { .. }));
}

// ── Scalar validation ────────────────────────────────────────────

#[test]
fn wrong_kind_is_a_type_mismatch() {
    let field = Field::boolean("active", "Active");
    let err = field.clean(Some(FieldValue::from("yes")), None).unwrap_err();
    assert!(matches!(
        err,
        ModelError::TypeMismatch { expected: "boolean", found: "text", .. }
    ));
}

#[test]
fn integer_bounds_are_inclusive() {
    let field = Field::integer("interval", "MergedFreeBusyIntervalInMinutes").min(6).max(1440);
    assert!(field.clean(Some(6.into()), None).is_ok());
    assert!(field.clean(Some(1440.into()), None).is_ok());
    let err = field.clean(Some(5.into()), None).unwrap_err();
    assert!(matches!(err, ModelError::OutOfRange { value: 5, min: 6, max: 1440, .. }));
}

#[test]
fn char_limit_counts_characters() {
    let field = Field::char("name", "Name").max_len(3);
    assert!(field.clean(Some("äöü".into()), None).is_ok());
    let err = field.clean(Some("abcd".into()), None).unwrap_err();
    assert!(matches!(err, ModelError::ValueTooLong { len: 4, max: 3, .. }));
}

#[test]
fn char_default_limit_is_255() {
    let field = Field::char("name", "Name");
    assert!(field.clean(Some("x".repeat(255).into()), None).is_ok());
    assert!(field.clean(Some("x".repeat(256).into()), None).is_err());
}

// ── Choices ──────────────────────────────────────────────────────

fn ab_choice() -> Field {
    Field::choice("letter", "Letter", vec![Choice::new("A"), Choice::new("B")]).with_default("A")
}

#[test]
fn choice_outside_set_fails() {
    let err = ab_choice().clean(Some("C".into()), None).unwrap_err();
    match err {
        ModelError::InvalidChoice { field, value, choices } => {
            assert_eq!(field, "letter");
            assert_eq!(value, "C");
            assert_eq!(choices, vec!["A", "B"]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn choice_in_set_marshals_verbatim() {
    let field = ab_choice();
    let value = field.clean(Some("B".into()), None).unwrap().unwrap();
    let mut wire = parent();
    field.to_wire(&value, &v2013(), &mut wire).unwrap();
    assert_eq!(wire.find(&QName::types("Letter")).and_then(XmlElement::text), Some("B"));
}

#[test]
fn choice_gated_to_later_version() {
    let field = Field::choice(
        "routing_type",
        "RoutingType",
        vec![Choice::new("SMTP"), Choice::since("X500", EXCHANGE_2013)],
    );
    assert!(field.clean(Some("X500".into()), Some(&v2013())).is_ok());
    assert!(field.clean(Some("X500".into()), None).is_ok());
    let err = field.clean(Some("X500".into()), Some(&v2010())).unwrap_err();
    assert!(matches!(err, ModelError::InvalidChoiceForVersion { .. }));
}

#[test]
fn choices_compare_by_value_only() {
    assert_eq!(Choice::new("X500"), Choice::since("X500", EXCHANGE_2013));
}

#[test]
fn unknown_choice_on_the_wire_fails() {
    let mut wire = parent();
    wire.push(XmlElement::with_text(QName::types("Letter"), "Z"));
    let err = ab_choice().from_wire(&mut wire, &v2013()).unwrap_err();
    assert!(matches!(err, ModelError::InvalidChoice { .. }));
}

// ── Enums ────────────────────────────────────────────────────────

#[test]
fn enum_accepts_name_or_index() {
    let field = Field::enumeration("weekday", "DayOfWeek", WEEKDAYS);
    assert_eq!(field.clean(Some("Wednesday".into()), None).unwrap(), Some(FieldValue::Int(3)));
    assert_eq!(field.clean(Some(7.into()), None).unwrap(), Some(FieldValue::Int(7)));
    assert!(matches!(
        field.clean(Some(8.into()), None),
        Err(ModelError::OutOfRange { .. })
    ));
    assert!(matches!(
        field.clean(Some("Funday".into()), None),
        Err(ModelError::InvalidChoice { .. })
    ));
}

#[test]
fn enum_marshals_as_name_and_hashes_as_name() {
    let field = Field::enumeration("weekday", "DayOfWeek", WEEKDAYS);
    let mut wire = parent();
    field.to_wire(&FieldValue::Int(1), &v2013(), &mut wire).unwrap();
    assert_eq!(wire.find(&QName::types("DayOfWeek")).and_then(XmlElement::text), Some("Monday"));

    assert_eq!(field.from_wire(&mut wire, &v2013()).unwrap(), Some(FieldValue::Int(1)));
    assert_eq!(
        field.to_hashable(Some(&FieldValue::Int(1))),
        Hashable::Text("Monday".to_string())
    );
}

#[test]
fn enum_list_is_space_separated() {
    let field = Field::enum_list("days", "DaysOfWeek", WEEKDAYS);
    let value = field
        .clean(Some(FieldValue::List(vec!["Monday".into(), 5.into()])), None)
        .unwrap()
        .unwrap();
    let mut wire = parent();
    field.to_wire(&value, &v2013(), &mut wire).unwrap();
    assert_eq!(
        wire.find(&QName::types("DaysOfWeek")).and_then(XmlElement::text),
        Some("Monday Friday")
    );
    assert_eq!(field.from_wire(&mut wire, &v2013()).unwrap(), Some(value));
}

// ── Wire locations ───────────────────────────────────────────────

#[test]
fn attribute_field_reads_and_writes_attribute() {
    let field = Field::text("id", "Id").attribute();
    assert_eq!(field.location(), Location::Attribute);
    let mut wire = parent();
    field.to_wire(&"AAMk".into(), &v2013(), &mut wire).unwrap();
    assert_eq!(wire.attr("Id"), Some("AAMk"));
    assert_eq!(field.from_wire(&mut wire, &v2013()).unwrap(), Some("AAMk".into()));
}

#[test]
fn text_body_field_uses_element_text() {
    let field = Field::text("value", "Value").text_body();
    let mut wire = parent();
    field.to_wire(&"+1 555 0100".into(), &v2013(), &mut wire).unwrap();
    assert_eq!(wire.text(), Some("+1 555 0100"));
    assert!(wire.children().is_empty());
}

#[test]
fn from_wire_detaches_consumed_child() {
    let field = Field::integer("bias", "Bias");
    let mut wire = parent();
    wire.push(XmlElement::with_text(QName::types("Bias"), "-60"));
    wire.push(XmlElement::with_text(QName::types("Other"), "x"));
    assert_eq!(field.from_wire(&mut wire, &v2013()).unwrap(), Some(FieldValue::Int(-60)));
    assert_eq!(wire.children().len(), 1);
    assert_eq!(field.from_wire(&mut wire, &v2013()).unwrap(), None);
}

#[test]
fn malformed_scalar_names_field() {
    let field = Field::datetime("start", "StartTime");
    let mut wire = parent();
    wire.push(XmlElement::with_text(QName::types("StartTime"), "tomorrow"));
    let err = field.from_wire(&mut wire, &v2013()).unwrap_err();
    assert!(matches!(err, ModelError::MalformedWire { field, .. } if field == "start"));
}

#[test]
fn scalar_kinds_marshal_to_canonical_text() {
    let cases = [
        (Field::boolean("b", "B"), FieldValue::Bool(true), "true"),
        (
            Field::datetime("d", "D"),
            FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            "2024-01-02T03:04:05Z",
        ),
        (
            Field::time("t", "T"),
            FieldValue::Time(NaiveTime::from_hms_opt(8, 30, 0).unwrap()),
            "08:30:00",
        ),
        (Field::base64("x", "X"), FieldValue::Bytes(b"hi".to_vec()), "aGk="),
    ];
    for (field, value, text) in cases {
        let mut wire = parent();
        field.to_wire(&value, &v2013(), &mut wire).unwrap();
        assert_eq!(wire.children()[0].text(), Some(text));
        assert_eq!(field.from_wire(&mut wire, &v2013()).unwrap(), Some(value));
    }
}

// ── Collections ──────────────────────────────────────────────────

#[test]
fn text_list_wraps_items() {
    let field = Field::text_list("aliases", "Aliases", "String");
    let value = FieldValue::List(vec!["a".into(), "b".into()]);
    let mut wire = parent();
    field.to_wire(&value, &v2013(), &mut wire).unwrap();
    let wrapper = wire.find(&QName::types("Aliases")).unwrap();
    assert_eq!(wrapper.children().len(), 2);
    assert_eq!(wrapper.children()[1].name(), &QName::types("String"));
    assert_eq!(field.from_wire(&mut wire, &v2013()).unwrap(), Some(value));
}

#[test]
fn dictionary_uses_typed_entries() {
    let field = Field::dictionary("dictionary", "Dictionary");
    let value = FieldValue::Dict(vec![
        ("count".into(), 3.into()),
        ("enabled".into(), true.into()),
        ("tags".into(), FieldValue::List(vec!["x".into(), "y".into()])),
        ("big".into(), FieldValue::Int(1 << 40)),
    ]);
    let cleaned = field.clean(Some(value.clone()), None).unwrap().unwrap();
    let mut wire = parent();
    field.to_wire(&cleaned, &v2013(), &mut wire).unwrap();

    let entries = wire.find(&QName::types("Dictionary")).unwrap().children();
    assert_eq!(entries.len(), 4);
    let type_of = |idx: usize| {
        entries[idx]
            .find(&QName::types("DictionaryValue"))
            .and_then(|v| v.find(&QName::types("Type")))
            .and_then(XmlElement::text)
            .map(str::to_string)
    };
    assert_eq!(type_of(0).as_deref(), Some("Integer32"));
    assert_eq!(type_of(2).as_deref(), Some("StringArray"));
    assert_eq!(type_of(3).as_deref(), Some("Integer64"));

    assert_eq!(field.from_wire(&mut wire, &v2013()).unwrap(), Some(value));
}

#[test]
fn dictionary_rejects_nested_dictionaries() {
    let field = Field::dictionary("dictionary", "Dictionary");
    let value = FieldValue::Dict(vec![("k".into(), FieldValue::Dict(vec![]))]);
    assert!(matches!(
        field.clean(Some(value), None),
        Err(ModelError::TypeMismatch { .. })
    ));
}

#[test]
fn absent_list_hashes_like_empty_list() {
    let field = Field::text_list("aliases", "Aliases", "String");
    assert_eq!(field.to_hashable(None), field.to_hashable(Some(&FieldValue::List(vec![]))));
    assert_eq!(Field::text("name", "Name").to_hashable(None), Hashable::None);
}

#[test]
fn temporal_values_hash_apart_from_integers() {
    let start = Utc.timestamp_micros(1).unwrap();
    let datetime = Field::datetime("start", "Start").to_hashable(Some(&FieldValue::DateTime(start)));
    assert_eq!(datetime, Hashable::DateTime(start));
    assert_ne!(datetime, Field::integer("n", "N").to_hashable(Some(&FieldValue::Int(1))));

    let time = NaiveTime::from_hms_nano_opt(0, 0, 0, 1).unwrap();
    let hashed = Field::time("at", "At").to_hashable(Some(&FieldValue::Time(time)));
    assert_eq!(hashed, Hashable::Time(time));
    assert_ne!(hashed, Field::integer("n", "N").to_hashable(Some(&FieldValue::Int(1))));
}

// ── Version gating ───────────────────────────────────────────────

#[test]
fn supports_version_is_half_open() {
    let field = Field::text("x", "X")
        .supported_from(EXCHANGE_2010)
        .deprecated_from(EXCHANGE_2013);
    assert!(field.supports_version(&v2010()));
    assert!(!field.supports_version(&v2013()));
    assert!(!field.supports_version(&ews_types::Version::from_build(ews_types::EXCHANGE_2007)));
}
