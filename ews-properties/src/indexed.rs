//! Indexed contact entries.
//!
//! Contacts store email addresses, phone numbers and postal addresses as
//! `Entry` elements keyed by a `Key` label attribute. Single-field entries
//! keep their value in the element's own text.

use ews_model::{Choice, Element, ElementHooks, ElementType, Field, Fields, ModelError, ModelResult};
use ews_types::Version;

/// The one non-label field of a single-field entry type.
pub fn value_field(ty: &'static ElementType, version: &Version) -> ModelResult<Field> {
    let mut fields = ty.supported_fields(version)?;
    if fields.len() != 1 {
        return Err(ModelError::InvalidValue {
            field: ty.type_name.to_string(),
            reason: format!("expected exactly one value field, found {}", fields.len()),
        });
    }
    Ok(fields.remove(0))
}

fn label(choices: &[&'static str], default: &'static str) -> Field {
    Field::choice("label", "Key", choices.iter().copied().map(Choice::new).collect())
        .attribute()
        .with_default(default)
}

fn email_address_entry_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        label(&["EmailAddress1", "EmailAddress2", "EmailAddress3"], "EmailAddress1"),
        Field::text("email", "Entry").text_body(),
    ])
}

pub static EMAIL_ADDRESS_ENTRY: ElementType = ElementType::new("EmailAddressEntry", "Entry", email_address_entry_fields);

const PHONE_LABELS: &[&str] = &[
    "AssistantPhone",
    "BusinessFax",
    "BusinessPhone",
    "BusinessPhone2",
    "Callback",
    "CarPhone",
    "CompanyMainPhone",
    "HomeFax",
    "HomePhone",
    "HomePhone2",
    "Isdn",
    "MobilePhone",
    "OtherFax",
    "OtherTelephone",
    "Pager",
    "PrimaryPhone",
    "RadioPhone",
    "Telex",
    "TtyTddPhone",
];

fn phone_number_entry_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        label(PHONE_LABELS, "PrimaryPhone"),
        Field::text("phone_number", "Entry").text_body(),
    ])
}

pub static PHONE_NUMBER_ENTRY: ElementType = ElementType::new("PhoneNumberEntry", "Entry", phone_number_entry_fields);

fn physical_address_entry_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        label(&["Business", "Home", "Other"], "Business"),
        Field::text("street", "Street"),
        Field::text("city", "City"),
        Field::text("state", "State"),
        Field::text("country", "CountryOrRegion"),
        Field::text("zipcode", "PostalCode"),
    ])
}

struct PhysicalAddressHooks;

impl ElementHooks for PhysicalAddressHooks {
    fn before_clean(&self, element: &mut Element, _version: Option<&Version>) -> ModelResult<()> {
        if let Some(zipcode) = element.get_int("zipcode") {
            element.set("zipcode", zipcode.to_string())?;
        }
        Ok(())
    }
}

pub static PHYSICAL_ADDRESS_ENTRY: ElementType =
    ElementType::new("PhysicalAddressEntry", "Entry", physical_address_entry_fields).with_hooks(&PhysicalAddressHooks);
