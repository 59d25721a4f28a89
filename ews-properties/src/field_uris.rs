//! Property paths, as used in response shapes, sort orders and restrictions.

use ews_model::{Element, ElementType, Field, Fields, ModelResult};

fn field_uri_fields() -> ModelResult<Fields> {
    Fields::new(vec![Field::char("field_uri", "FieldURI").attribute().required()])
}

/// A plain property such as `item:Subject`.
pub static FIELD_URI: ElementType = ElementType::new("FieldURI", "FieldURI", field_uri_fields);
/// A property of a recurring master's exceptions.
pub static EXCEPTION_FIELD_URI: ElementType =
    ElementType::new("ExceptionFieldURI", "ExceptionFieldURI", field_uri_fields);

fn indexed_field_uri_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::char("field_uri", "FieldURI").attribute().required(),
        Field::char("field_index", "FieldIndex").attribute().required(),
    ])
}

/// One entry of an indexed property, e.g. `contacts:PhoneNumber` / `MobilePhone`.
pub static INDEXED_FIELD_URI: ElementType =
    ElementType::new("IndexedFieldURI", "IndexedFieldURI", indexed_field_uri_fields);

fn extended_field_uri_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::char("distinguished_property_set_id", "DistinguishedPropertySetId").attribute(),
        Field::char("property_set_id", "PropertySetId").attribute(),
        Field::char("property_tag", "PropertyTag").attribute(),
        Field::char("property_name", "PropertyName").attribute(),
        Field::char("property_id", "PropertyId").attribute(),
        Field::char("property_type", "PropertyType").attribute(),
    ])
}

/// A MAPI property addressed by tag, or by property set and name or id.
pub static EXTENDED_FIELD_URI: ElementType =
    ElementType::new("ExtendedFieldURI", "ExtendedFieldURI", extended_field_uri_fields);

pub fn field_uri(uri: &str) -> ModelResult<Element> {
    let mut element = Element::empty(&FIELD_URI);
    element.set("field_uri", uri)?;
    Ok(element)
}

pub fn indexed_field_uri(uri: &str, index: &str) -> ModelResult<Element> {
    let mut element = Element::empty(&INDEXED_FIELD_URI);
    element.set("field_uri", uri)?;
    element.set("field_index", index)?;
    Ok(element)
}
