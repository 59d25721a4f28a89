//! Mailboxes and the entities that wrap them.
//!
//! Mailboxes compare by item id if they have one, else by case-insensitive
//! address: the server may fill in a display name or mailbox type on insert,
//! and those must not make a round-tripped mailbox look different.

use crate::ids::ITEM_ID;
use ews_model::{Choice, Element, ElementHooks, ElementType, Field, Fields, Hashable, ModelError, ModelResult};
use ews_types::{QName, Version, XmlElement, EXCHANGE_2013};
use std::ptr;

pub const MAILBOX_TYPE_MAILBOX: &str = "Mailbox";
pub const MAILBOX_TYPE_ONE_OFF: &str = "OneOff";

pub(crate) fn mailbox_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::text("name", "Name"),
        Field::text("email_address", "EmailAddress"),
        // Routing types are not restricted for this element.
        Field::text("routing_type", "RoutingType").with_default("SMTP"),
        Field::choice(
            "mailbox_type",
            "MailboxType",
            vec![
                Choice::new(MAILBOX_TYPE_MAILBOX),
                Choice::new("PublicDL"),
                Choice::new("PrivateDL"),
                Choice::new("Contact"),
                Choice::new("PublicFolder"),
                Choice::new("Unknown"),
                Choice::new(MAILBOX_TYPE_ONE_OFF),
                Choice::since("GroupMailbox", EXCHANGE_2013),
            ],
        )
        .with_default(MAILBOX_TYPE_MAILBOX),
        Field::element("item_id", &ITEM_ID).read_only(),
    ])
}

pub(crate) struct MailboxHooks;

impl ElementHooks for MailboxHooks {
    // Only one-off members of a personal distribution list may lack both.
    fn after_clean(&self, element: &mut Element, _version: Option<&Version>) -> ModelResult<()> {
        let mailbox_type = element.get_str("mailbox_type").unwrap_or(MAILBOX_TYPE_MAILBOX);
        let addressable = element.get("email_address").is_some() || element.get("item_id").is_some();
        if mailbox_type != MAILBOX_TYPE_ONE_OFF && !addressable {
            return Err(ModelError::InvalidValue {
                field: "email_address".to_string(),
                reason: format!("mailbox type {mailbox_type:?} must have either an email address or an item id"),
            });
        }
        Ok(())
    }

    fn hash_key(&self, element: &Element) -> Option<Hashable> {
        if let Some(item_id) = element.get_element("item_id") {
            return Some(Hashable::Element(item_id.structural_hash()));
        }
        element
            .get_str("email_address")
            .map(|address| Hashable::Text(address.to_lowercase()))
    }
}

pub static MAILBOX: ElementType = ElementType::new("Mailbox", "Mailbox", mailbox_fields).with_hooks(&MailboxHooks);
/// A mailbox emitted in the messages namespace.
pub static DL_MAILBOX: ElementType = ElementType::new("DLMailbox", "Mailbox", mailbox_fields)
    .in_messages()
    .with_hooks(&MailboxHooks);
pub static SENDING_AS: ElementType = ElementType::new("SendingAs", "SendingAs", mailbox_fields)
    .in_messages()
    .with_hooks(&MailboxHooks);
pub static RECIPIENT_ADDRESS: ElementType =
    ElementType::new("RecipientAddress", "RecipientAddress", mailbox_fields).with_hooks(&MailboxHooks);
pub static EMAIL_ADDRESS: ElementType =
    ElementType::new("EmailAddress", "EmailAddress", mailbox_fields).with_hooks(&MailboxHooks);
pub static ADDRESS: ElementType = ElementType::new("Address", "Address", mailbox_fields).with_hooks(&MailboxHooks);

/// Rooms arrive with their mailbox fields wrapped in an `Id` element.
struct RoomHooks;

impl ElementHooks for RoomHooks {
    fn before_clean(&self, element: &mut Element, version: Option<&Version>) -> ModelResult<()> {
        MailboxHooks.before_clean(element, version)
    }

    fn after_clean(&self, element: &mut Element, version: Option<&Version>) -> ModelResult<()> {
        MailboxHooks.after_clean(element, version)
    }

    fn before_from_wire(&self, wire: &mut XmlElement) -> ModelResult<()> {
        if let Some(mut id) = wire.take(&QName::types("Id")) {
            for name in ["Name", "EmailAddress", "RoutingType", "MailboxType", "ItemId"] {
                if let Some(child) = id.take(&QName::types(name)) {
                    wire.push(child);
                }
            }
        }
        Ok(())
    }

    fn hash_key(&self, element: &Element) -> Option<Hashable> {
        MailboxHooks.hash_key(element)
    }
}

pub static ROOM: ElementType = ElementType::new("Room", "Room", mailbox_fields).with_hooks(&RoomHooks);

static MAILBOX_FAMILY: [&ElementType; 8] = [
    &MAILBOX,
    &DL_MAILBOX,
    &SENDING_AS,
    &RECIPIENT_ADDRESS,
    &EMAIL_ADDRESS,
    &ADDRESS,
    &ROOM,
    &crate::contact::EMAIL_ADDRESS_VALUE,
];

/// True if `element` is one of the mailbox-shaped types.
#[must_use]
pub fn is_mailbox(element: &Element) -> bool {
    MAILBOX_FAMILY.iter().any(|ty| ptr::eq(*ty, element.element_type()))
}

// ── Availability ─────────────────────────────────────────────────

fn availability_mailbox_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::text("name", "Name"),
        Field::text("email_address", "Address").required(),
        Field::choice("routing_type", "RoutingType", vec![Choice::new("EX"), Choice::new("SMTP")]).with_default("SMTP"),
    ])
}

struct AvailabilityMailboxHooks;

impl ElementHooks for AvailabilityMailboxHooks {
    fn hash_key(&self, element: &Element) -> Option<Hashable> {
        element
            .get_str("email_address")
            .map(|address| Hashable::Text(address.to_lowercase()))
    }
}

/// A mailbox as the availability service expects it: the address is
/// required and the routing type is restricted to `EX` and `SMTP`.
pub static AVAILABILITY_MAILBOX: ElementType =
    ElementType::new("AvailabilityMailbox", "Mailbox", availability_mailbox_fields).with_hooks(&AvailabilityMailboxHooks);
pub static EMAIL: ElementType =
    ElementType::new("Email", "Email", availability_mailbox_fields).with_hooks(&AvailabilityMailboxHooks);

/// Converts a regular mailbox into an availability mailbox of type `ty`.
pub fn availability_mailbox_from(ty: &'static ElementType, mailbox: &Element) -> ModelResult<Element> {
    if !is_mailbox(mailbox) {
        return Err(ModelError::TypeMismatch {
            field: "mailbox".to_string(),
            expected: MAILBOX.type_name,
            found: mailbox.element_type().type_name,
        });
    }
    let mut converted = Element::empty(ty);
    for name in ["name", "email_address", "routing_type"] {
        if let Some(value) = mailbox.get(name) {
            converted.set(name, value.clone())?;
        }
    }
    Ok(converted)
}

fn mailbox_data_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("email", &EMAIL),
        Field::choice(
            "attendee_type",
            "AttendeeType",
            ["Optional", "Organizer", "Required", "Resource", "Room"].map(Choice::new).to_vec(),
        ),
        Field::boolean("exclude_conflicts", "ExcludeConflicts"),
    ])
}

pub static MAILBOX_DATA: ElementType = ElementType::new("MailboxData", "MailboxData", mailbox_data_fields);

// ── Wrappers ─────────────────────────────────────────────────────

/// Attendees and group members are identified by their mailbox alone.
struct ByMailboxHooks;

impl ElementHooks for ByMailboxHooks {
    fn hash_key(&self, element: &Element) -> Option<Hashable> {
        element
            .get_element("mailbox")
            .map(|mailbox| Hashable::Element(mailbox.structural_hash()))
    }
}

fn attendee_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("mailbox", &MAILBOX).required(),
        Field::choice(
            "response_type",
            "ResponseType",
            ["Unknown", "Organizer", "Tentative", "Accept", "Decline", "NoResponseReceived"]
                .map(Choice::new)
                .to_vec(),
        )
        .with_default("Unknown"),
        Field::datetime("last_response_time", "LastResponseTime"),
    ])
}

pub static ATTENDEE: ElementType = ElementType::new("Attendee", "Attendee", attendee_fields).with_hooks(&ByMailboxHooks);

fn member_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("mailbox", &MAILBOX).required(),
        Field::choice(
            "status",
            "Status",
            ["Unrecognized", "Normal", "Demoted"].map(Choice::new).to_vec(),
        )
        .with_default("Normal"),
    ])
}

pub static MEMBER: ElementType = ElementType::new("Member", "Member", member_fields).with_hooks(&ByMailboxHooks);

// ── Discovery results ────────────────────────────────────────────

fn searchable_mailbox_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::char("guid", "Guid"),
        Field::text("primary_smtp_address", "PrimarySmtpAddress"),
        Field::boolean("is_external", "IsExternalMailbox"),
        Field::text("external_email", "ExternalEmailAddress"),
        Field::char("display_name", "DisplayName"),
        Field::boolean("is_membership_group", "IsMembershipGroup"),
        Field::char("reference_id", "ReferenceId"),
    ])
}

pub static SEARCHABLE_MAILBOX: ElementType =
    ElementType::new("SearchableMailbox", "SearchableMailbox", searchable_mailbox_fields);

fn failed_mailbox_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::char("mailbox", "Mailbox"),
        Field::integer("error_code", "ErrorCode"),
        Field::char("error_message", "ErrorMessage"),
        Field::boolean("is_archive", "IsArchive"),
    ])
}

pub static FAILED_MAILBOX: ElementType = ElementType::new("FailedMailbox", "FailedMailbox", failed_mailbox_fields);
