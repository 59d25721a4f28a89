//! Free/busy requests and responses.

use crate::mailbox::MAILBOX_DATA;
use crate::timezone::TIME_ZONE;
use crate::WEEKDAY_NAMES;
use ews_model::{Choice, Element, ElementHooks, ElementType, Field, FieldValue, Fields, ModelError, ModelResult};
use ews_types::{QName, Version, XmlElement, EXCHANGE_2013};

/// Rejects elements whose `end` precedes their `start`.
struct DateRangeHooks;

impl ElementHooks for DateRangeHooks {
    fn after_clean(&self, element: &mut Element, _version: Option<&Version>) -> ModelResult<()> {
        if let (Some(start), Some(end)) = (element.get_datetime("start"), element.get_datetime("end"))
            && end < start
        {
            return Err(ModelError::InvalidValue {
                field: "end".to_string(),
                reason: format!("end {end} is before start {start}"),
            });
        }
        Ok(())
    }
}

fn time_window_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::datetime("start", "StartTime").required(),
        Field::datetime("end", "EndTime").required(),
    ])
}

pub static TIME_WINDOW: ElementType =
    ElementType::new("TimeWindow", "TimeWindow", time_window_fields).with_hooks(&DateRangeHooks);

const REQUESTED_VIEWS: [&str; 5] = ["MergedOnly", "FreeBusy", "FreeBusyMerged", "Detailed", "DetailedMerged"];

fn free_busy_view_options_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::element("time_window", &TIME_WINDOW).required(),
        // Minutes
        Field::integer("merged_free_busy_interval", "MergedFreeBusyIntervalInMinutes")
            .min(6)
            .max(1440)
            .with_default(30)
            .required(),
        // `None` is only valid in responses.
        Field::choice("requested_view", "RequestedView", REQUESTED_VIEWS.map(Choice::new).to_vec()).required(),
    ])
}

pub static FREE_BUSY_VIEW_OPTIONS: ElementType =
    ElementType::new("FreeBusyViewOptions", "FreeBusyViewOptions", free_busy_view_options_fields);

fn calendar_view_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::datetime("start", "StartDate").attribute().required(),
        Field::datetime("end", "EndDate").attribute().required(),
        Field::integer("max_items", "MaxEntriesReturned").attribute().min(1),
    ])
}

/// Expands recurring calendar items between `start` and `end`.
pub static CALENDAR_VIEW: ElementType = ElementType::new("CalendarView", "CalendarView", calendar_view_fields)
    .in_messages()
    .with_hooks(&DateRangeHooks);

// ── Responses ────────────────────────────────────────────────────

fn calendar_event_details_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::char("id", "ID"),
        Field::char("subject", "Subject"),
        Field::char("location", "Location"),
        Field::boolean("is_meeting", "IsMeeting"),
        Field::boolean("is_recurring", "IsRecurring"),
        Field::boolean("is_exception", "IsException"),
        Field::boolean("is_reminder_set", "IsReminderSet"),
        Field::boolean("is_private", "IsPrivate"),
    ])
}

pub static CALENDAR_EVENT_DETAILS: ElementType =
    ElementType::new("CalendarEventDetails", "CalendarEventDetails", calendar_event_details_fields);

fn busy_types() -> Vec<Choice> {
    vec![
        Choice::new("Free"),
        Choice::new("Tentative"),
        Choice::new("Busy"),
        Choice::new("OOF"),
        Choice::new("NoData"),
        Choice::since("WorkingElsewhere", EXCHANGE_2013),
    ]
}

fn calendar_event_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::datetime("start", "StartTime"),
        Field::datetime("end", "EndTime"),
        Field::choice("busy_type", "BusyType", busy_types()).required().with_default("Busy"),
        Field::element("details", &CALENDAR_EVENT_DETAILS),
    ])
}

pub static CALENDAR_EVENT: ElementType = ElementType::new("CalendarEvent", "CalendarEvent", calendar_event_fields);

fn working_period_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::enum_list("weekdays", "DayOfWeek", WEEKDAY_NAMES).required(),
        Field::time("start", "StartTimeInMinutes").required(),
        Field::time("end", "EndTimeInMinutes").required(),
    ])
}

pub static WORKING_PERIOD: ElementType = ElementType::new("WorkingPeriod", "WorkingPeriod", working_period_fields);

fn free_busy_view_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        Field::choice(
            "view_type",
            "FreeBusyViewType",
            std::iter::once("None").chain(REQUESTED_VIEWS).map(Choice::new).collect(),
        )
        .required(),
        // One digit per interval, indexing the busy types.
        Field::char("merged", "MergedFreeBusy"),
        Field::element_list("calendar_events", "CalendarEventArray", &CALENDAR_EVENT),
        Field::element_list("working_hours", "WorkingPeriodArray", &WORKING_PERIOD),
        Field::element("working_hours_timezone", &TIME_ZONE),
    ])
}

/// Working periods and their timezone arrive wrapped in `WorkingHours`.
struct FreeBusyViewHooks;

impl ElementHooks for FreeBusyViewHooks {
    fn before_from_wire(&self, wire: &mut XmlElement) -> ModelResult<()> {
        if let Some(mut working_hours) = wire.take(&QName::types("WorkingHours")) {
            for name in ["WorkingPeriodArray", "TimeZone"] {
                if let Some(child) = working_hours.take(&QName::types(name)) {
                    wire.push(child);
                }
            }
        }
        Ok(())
    }
}

pub static FREE_BUSY_VIEW: ElementType = ElementType::new("FreeBusyView", "FreeBusyView", free_busy_view_fields)
    .in_messages()
    .with_hooks(&FreeBusyViewHooks);

/// Maps a `merged` digit to its busy type.
#[must_use]
pub fn merged_busy_type(digit: char) -> Option<&'static str> {
    let idx = digit.to_digit(10)?;
    ["Free", "Tentative", "Busy", "OOF", "NoData", "WorkingElsewhere"]
        .get(usize::try_from(idx).ok()?)
        .copied()
}

/// A `MailboxData` list entry for `email`, as sent in availability requests.
pub fn mailbox_data(email: Element, attendee_type: &str, exclude_conflicts: bool) -> ModelResult<Element> {
    Element::new(
        &MAILBOX_DATA,
        [
            ("email", FieldValue::from(email)),
            ("attendee_type", FieldValue::from(attendee_type)),
            ("exclude_conflicts", FieldValue::from(exclude_conflicts)),
        ],
    )
}
