//! Entity types shared by the schema engine tests.

#![allow(dead_code)]

use ews_model::{Choice, ElementType, Field, Fields, ModelResult};
use ews_types::{Version, EXCHANGE_2010, EXCHANGE_2013};

pub const WEEKDAYS: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn v2010() -> Version {
    Version::from_build(EXCHANGE_2010)
}

pub fn v2013() -> Version {
    Version::from_build(EXCHANGE_2013)
}

pub static ITEM_ID: ElementType = ElementType::new("ItemId", "ItemId", item_id_fields);

fn item_id_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::text("id", "Id").attribute().required(),
        Field::text("changekey", "ChangeKey").attribute(),
    ])
}

pub static CONTACT: ElementType = ElementType::new("Contact", "Contact", contact_fields);

fn contact_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::text("kind", "Kind").attribute(),
        Field::char("name", "Name"),
        Field::choice(
            "routing_type",
            "RoutingType",
            vec![Choice::new("SMTP"), Choice::new("EX"), Choice::since("X500", EXCHANGE_2013)],
        )
        .with_default("SMTP"),
        Field::integer("priority", "Priority").min(1).max(5),
        Field::boolean("active", "Active"),
        Field::enumeration("weekday", "DayOfWeek", WEEKDAYS),
        Field::text_list("aliases", "Aliases", "String"),
        Field::text("secret", "Secret").read_only(),
        Field::text("nickname", "Nickname").supported_from(EXCHANGE_2013),
    ])
}

/// A type with delegated identity, emitted in the messages namespace.
pub static FOLDER: ElementType = ElementType::new("Folder", "Folder", folder_fields)
    .in_messages()
    .with_identity("_id", &ITEM_ID);

fn folder_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("_id", &ITEM_ID),
        Field::text("display_name", "DisplayName").required(),
        Field::element_list("members", "Members", &CONTACT),
        Field::renamed_element("owner", "Owner", &CONTACT),
    ])
}

/// One field of every scalar kind.
pub static APPOINTMENT: ElementType = ElementType::new("Appointment", "Appointment", appointment_fields);

fn appointment_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::text("subject", "Subject"),
        Field::datetime("start", "Start"),
        Field::time("reminder_at", "ReminderAt"),
        Field::integer("sequence", "Sequence"),
        Field::boolean("all_day", "IsAllDayEvent"),
        Field::base64("blob", "Blob"),
    ])
}
