//! Message-level values: headers, reminders, mail tips and response objects.

use crate::ids::{ASSOCIATED_CALENDAR_ITEM_ID, REFERENCE_ITEM_ID};
use crate::mailbox::RECIPIENT_ADDRESS;
use ews_model::{Choice, ElementHooks, ElementType, Field, Fields, ModelResult};
use ews_types::{Build, QName, XmlElement};

fn message_header_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::text("name", "HeaderName").attribute(),
        Field::text("value", "InternetMessageHeader").text_body(),
    ])
}

pub static MESSAGE_HEADER: ElementType =
    ElementType::new("InternetMessageHeader", "InternetMessageHeader", message_header_fields);

/// First build whose reminders name their calendar item.
const ASSOCIATED_CALENDAR_ITEM_ID_FROM: Build = Build::new(15, 0, 913, 9);

fn reminder_message_data_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::char("reminder_text", "ReminderText"),
        Field::char("location", "Location"),
        Field::datetime("start_time", "StartTime"),
        Field::datetime("end_time", "EndTime"),
        Field::element("associated_calendar_item_id", &ASSOCIATED_CALENDAR_ITEM_ID)
            .supported_from(ASSOCIATED_CALENDAR_ITEM_ID_FROM),
    ])
}

pub static REMINDER_MESSAGE_DATA: ElementType =
    ElementType::new("ReminderMessageData", "ReminderMessageData", reminder_message_data_fields);

// ── Mail tips ────────────────────────────────────────────────────

fn reply_body_fields() -> ModelResult<Fields> {
    Fields::new(vec![Field::text("message", "Message")])
}

pub static REPLY_BODY: ElementType = ElementType::new("ReplyBody", "ReplyBody", reply_body_fields);

fn out_of_office_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("reply_body", &REPLY_BODY),
        Field::datetime("start", "StartTime"),
        Field::datetime("end", "EndTime"),
    ])
}

/// Responses wrap the start and end in a `Duration` element.
struct OutOfOfficeHooks;

impl ElementHooks for OutOfOfficeHooks {
    fn before_from_wire(&self, wire: &mut XmlElement) -> ModelResult<()> {
        if let Some(mut duration) = wire.take(&QName::types("Duration")) {
            for name in ["StartTime", "EndTime"] {
                if let Some(child) = duration.take(&QName::types(name)) {
                    wire.push(child);
                }
            }
        }
        Ok(())
    }
}

pub static OUT_OF_OFFICE: ElementType =
    ElementType::new("OutOfOffice", "OutOfOffice", out_of_office_fields).with_hooks(&OutOfOfficeHooks);

pub const MAIL_TIPS_TYPES: [&str; 10] = [
    "All",
    "OutOfOfficeMessage",
    "MailboxFullStatus",
    "CustomMailTip",
    "ExternalMemberCount",
    "TotalMemberCount",
    "MaxMessageSize",
    "DeliveryRestriction",
    "ModerationStatus",
    "InvalidRecipient",
];

fn mail_tips_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("recipient_address", &RECIPIENT_ADDRESS),
        Field::choice("pending_mail_tips", "PendingMailTips", MAIL_TIPS_TYPES.map(Choice::new).to_vec()),
        Field::element("out_of_office", &OUT_OF_OFFICE),
        Field::boolean("mailbox_full", "MailboxFull"),
        Field::text("custom_mail_tip", "CustomMailTip"),
        Field::integer("total_member_count", "TotalMemberCount"),
        Field::integer("external_member_count", "ExternalMemberCount"),
        Field::integer("max_message_size", "MaxMessageSize"),
        Field::boolean("delivery_restricted", "DeliveryRestricted"),
        Field::boolean("is_moderated", "IsModerated"),
        Field::boolean("invalid_recipient", "InvalidRecipient"),
    ])
}

pub static MAIL_TIPS: ElementType = ElementType::new("MailTips", "MailTips", mail_tips_fields).in_messages();

// ── Response objects ─────────────────────────────────────────────

fn reference_item_fields() -> ModelResult<Fields> {
    Fields::new(vec![Field::element("reference_item_id", &REFERENCE_ITEM_ID)])
}

pub static ACCEPT_SHARING_INVITATION: ElementType =
    ElementType::new("AcceptSharingInvitation", "AcceptSharingInvitation", reference_item_fields);
pub static SUPPRESS_READ_RECEIPT: ElementType =
    ElementType::new("SuppressReadReceipt", "SuppressReadReceipt", reference_item_fields);
pub static REMOVE_ITEM: ElementType = ElementType::new("RemoveItem", "RemoveItem", reference_item_fields);
