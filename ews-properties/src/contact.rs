//! Contact and persona building blocks.

use crate::ids::{FOLDER_ID, SOURCE_ID};
use crate::mailbox::{mailbox_fields, MailboxHooks};
use ews_model::{ElementType, Field, Fields, ModelResult};

fn complete_name_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::char("title", "Title"),
        Field::char("first_name", "FirstName"),
        Field::char("middle_name", "MiddleName"),
        Field::char("last_name", "LastName"),
        Field::char("suffix", "Suffix"),
        Field::char("initials", "Initials"),
        Field::char("full_name", "FullName"),
        Field::char("nickname", "Nickname"),
        Field::char("yomi_first_name", "YomiFirstName"),
        Field::char("yomi_last_name", "YomiLastName"),
    ])
}

pub static COMPLETE_NAME: ElementType = ElementType::new("CompleteName", "CompleteName", complete_name_fields);

fn phone_number_fields() -> ModelResult<Fields> {
    Fields::new(vec![Field::char("number", "Number"), Field::char("type", "Type")])
}

pub static PHONE_NUMBER: ElementType = ElementType::new("PhoneNumber", "PhoneNumber", phone_number_fields);

// ── Persona attributions ─────────────────────────────────────────

fn attribution_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::char("attribution_id", "Id"),
        Field::element("_id", &SOURCE_ID),
        Field::char("display_name", "DisplayName"),
        Field::boolean("is_writable", "IsWritable"),
        Field::boolean("is_quick_contact", "IsQuickContact"),
        Field::boolean("is_hidden", "IsHidden"),
        Field::element("folder_id", &FOLDER_ID),
    ])
}

/// Where a persona property came from. Its `id`/`changekey` live on the
/// nested `SourceId`.
pub static ATTRIBUTION: ElementType =
    ElementType::new("Attribution", "Attribution", attribution_fields).with_identity("_id", &SOURCE_ID);

fn body_content_value_fields() -> ModelResult<Fields> {
    Fields::new(vec![Field::char("value", "Value"), Field::char("body_type", "BodyType")])
}

pub static BODY_CONTENT_VALUE: ElementType = ElementType::new("BodyContentValue", "Value", body_content_value_fields);

fn body_content_attributed_value_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("value", &BODY_CONTENT_VALUE),
        Field::element_list("attributions", "Attributions", &ATTRIBUTION),
    ])
}

pub static BODY_CONTENT_ATTRIBUTED_VALUE: ElementType = ElementType::new(
    "BodyContentAttributedValue",
    "BodyContentAttributedValue",
    body_content_attributed_value_fields,
);

fn string_attributed_value_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::char("value", "Value"),
        Field::text_list("attributions", "Attributions", "Attribution"),
    ])
}

pub static STRING_ATTRIBUTED_VALUE: ElementType =
    ElementType::new("StringAttributedValue", "StringAttributedValue", string_attributed_value_fields);

pub static PERSONA_PHONE_NUMBER_VALUE: ElementType =
    ElementType::new("PersonaPhoneNumberTypeValue", "Value", phone_number_fields);

fn phone_number_attributed_value_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("value", &PERSONA_PHONE_NUMBER_VALUE),
        Field::text_list("attributions", "Attributions", "Attribution"),
    ])
}

pub static PHONE_NUMBER_ATTRIBUTED_VALUE: ElementType = ElementType::new(
    "PhoneNumberAttributedValue",
    "PhoneNumberAttributedValue",
    phone_number_attributed_value_fields,
);

fn email_address_value_fields() -> ModelResult<Fields> {
    mailbox_fields()?.concat(&Fields::new(vec![Field::text(
        "original_display_name",
        "OriginalDisplayName",
    )])?)
}

/// A mailbox with the display name it was originally stored under.
pub static EMAIL_ADDRESS_VALUE: ElementType =
    ElementType::new("EmailAddressTypeValue", "Value", email_address_value_fields).with_hooks(&MailboxHooks);

fn email_address_attributed_value_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("value", &EMAIL_ADDRESS_VALUE),
        Field::element_list("attributions", "Attributions", &ATTRIBUTION),
    ])
}

pub static EMAIL_ADDRESS_ATTRIBUTED_VALUE: ElementType = ElementType::new(
    "EmailAddressAttributedValue",
    "EmailAddressAttributedValue",
    email_address_attributed_value_fields,
);

fn postal_address_value_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::text("street", "Street"),
        Field::text("city", "City"),
        Field::text("state", "State"),
        Field::text("country", "Country"),
        Field::text("postal_code", "PostalCode"),
        Field::text("post_office_box", "PostOfficeBox"),
        Field::text("type", "Type"),
        Field::text("latitude", "Latitude"),
        Field::text("longitude", "Longitude"),
        Field::text("accuracy", "Accuracy"),
        Field::text("altitude", "Altitude"),
        Field::text("altitude_accuracy", "AltitudeAccuracy"),
        Field::text("formatted_address", "FormattedAddress"),
        Field::text("location_uri", "LocationUri"),
        Field::text("location_source", "LocationSource"),
    ])
}

pub static POSTAL_ADDRESS_VALUE: ElementType =
    ElementType::new("PersonaPostalAddressTypeValue", "Value", postal_address_value_fields);

fn postal_address_attributed_value_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("value", &POSTAL_ADDRESS_VALUE),
        Field::element_list("attributions", "Attributions", &ATTRIBUTION),
    ])
}

pub static POSTAL_ADDRESS_ATTRIBUTED_VALUE: ElementType = ElementType::new(
    "PostalAddressAttributedValue",
    "PostalAddressAttributedValue",
    postal_address_attributed_value_fields,
);
