//! Notification events delivered by push, pull and streaming subscriptions.
//!
//! A `Notification` carries a mixed list of event elements. The notification
//! itself only declares its scalar fields; [`notification_from_wire`] splits
//! the events off and unmarshals each by its tag.

use crate::ids::{FOLDER_ID, ITEM_ID, PARENT_FOLDER_ID};
use crate::PropertiesResult;
use ews_model::{Element, ElementType, Field, Fields, ModelResult};
use ews_types::{Version, XmlElement};
use std::ptr;
use tracing::debug;

fn event_fields() -> ModelResult<Fields> {
    Fields::new(vec![Field::char("watermark", "Watermark")])
}

fn timestamp_event_fields() -> ModelResult<Fields> {
    event_fields()?.concat(&Fields::new(vec![
        Field::datetime("timestamp", "TimeStamp"),
        Field::element("item_id", &ITEM_ID),
        Field::element("folder_id", &FOLDER_ID),
        Field::element("parent_folder_id", &PARENT_FOLDER_ID),
    ])?)
}

/// Copy and move events also name where the object came from.
fn old_timestamp_event_fields() -> ModelResult<Fields> {
    timestamp_event_fields()?.concat(&Fields::new(vec![
        Field::renamed_element("old_item_id", "OldItemId", &ITEM_ID),
        Field::renamed_element("old_folder_id", "OldFolderId", &FOLDER_ID),
        Field::renamed_element("old_parent_folder_id", "OldParentFolderId", &PARENT_FOLDER_ID),
    ])?)
}

fn modified_event_fields() -> ModelResult<Fields> {
    timestamp_event_fields()?.concat(&Fields::new(vec![Field::integer("unread_count", "UnreadCount")])?)
}

pub static COPIED_EVENT: ElementType = ElementType::new("CopiedEvent", "CopiedEvent", old_timestamp_event_fields);
pub static CREATED_EVENT: ElementType = ElementType::new("CreatedEvent", "CreatedEvent", timestamp_event_fields);
pub static DELETED_EVENT: ElementType = ElementType::new("DeletedEvent", "DeletedEvent", timestamp_event_fields);
pub static MODIFIED_EVENT: ElementType = ElementType::new("ModifiedEvent", "ModifiedEvent", modified_event_fields);
pub static MOVED_EVENT: ElementType = ElementType::new("MovedEvent", "MovedEvent", old_timestamp_event_fields);
pub static NEW_MAIL_EVENT: ElementType = ElementType::new("NewMailEvent", "NewMailEvent", event_fields);
pub static STATUS_EVENT: ElementType = ElementType::new("StatusEvent", "StatusEvent", event_fields);
pub static FREE_BUSY_CHANGED_EVENT: ElementType =
    ElementType::new("FreeBusyChangedEvent", "FreeBusyChangedEvent", timestamp_event_fields);

/// Every event type a notification may contain.
pub static EVENT_TYPES: [&ElementType; 8] = [
    &COPIED_EVENT,
    &CREATED_EVENT,
    &DELETED_EVENT,
    &MODIFIED_EVENT,
    &MOVED_EVENT,
    &NEW_MAIL_EVENT,
    &STATUS_EVENT,
    &FREE_BUSY_CHANGED_EVENT,
];

/// Whether an event concerns an item or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Item,
    Folder,
}

/// The kind of object an event is about, or `None` if it names neither.
#[must_use]
pub fn event_target(event: &Element) -> Option<EventTarget> {
    if event.get("item_id").is_some() {
        return Some(EventTarget::Item);
    }
    if event.get("folder_id").is_some() {
        return Some(EventTarget::Folder);
    }
    None
}

/// True if `event` is one of the notification event types.
#[must_use]
pub fn is_event(event: &Element) -> bool {
    EVENT_TYPES.iter().any(|ty| ptr::eq(*ty, event.element_type()))
}

fn notification_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::char("subscription_id", "SubscriptionId"),
        Field::char("previous_watermark", "PreviousWatermark"),
        Field::boolean("more_events", "MoreEvents"),
    ])
}

pub static NOTIFICATION: ElementType =
    ElementType::new("Notification", "Notification", notification_fields).in_messages();

fn event_type_for(wire: &XmlElement) -> Option<&'static ElementType> {
    EVENT_TYPES.iter().copied().find(|ty| ty.response_tag() == *wire.name())
}

/// Unmarshals a `Notification` and the events it carries, in wire order.
pub fn notification_from_wire(
    mut wire: XmlElement,
    version: &Version,
) -> PropertiesResult<(Element, Vec<Element>)> {
    let events = wire.take_where(|child| event_type_for(child).is_some());
    let notification = Element::from_wire(&NOTIFICATION, wire, version)?;
    let events = events
        .into_iter()
        .filter_map(|event| event_type_for(&event).map(|ty| Element::from_wire(ty, event, version)))
        .collect::<ModelResult<Vec<_>>>()?;
    debug!(
        subscription_id = notification.get_str("subscription_id").unwrap_or_default(),
        events = events.len(),
        "Parsed notification"
    );
    Ok((notification, events))
}

