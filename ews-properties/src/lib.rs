//! EWS protocol entities built on the `ews-model` engine.
//!
//! Each entity is a static [`ElementType`](ews_model::ElementType) whose
//! schema is declared in the module for its area:
//! - [`ids`]: item and folder identifiers
//! - [`mailbox`]: mailboxes, attendees and availability mailboxes
//! - [`availability`]: free/busy requests and responses
//! - [`timezone`] and [`server_timezones`]: timezone descriptors and their
//!   reconciliation against server-published definitions
//! - [`permissions`]: folder permissions and delegates
//! - [`configuration`]: user configuration objects
//! - [`events`]: push/pull notification events
//! - [`contact`] and [`indexed`]: contact and persona values
//! - [`field_uris`]: property paths used in shapes and restrictions
//! - [`message`]: mail tips, out-of-office and other message-level values

pub mod availability;
pub mod configuration;
pub mod contact;
mod error;
pub mod events;
pub mod field_uris;
pub mod ids;
pub mod indexed;
pub mod mailbox;
pub mod message;
pub mod permissions;
pub mod server_timezones;
pub mod timezone;

pub use error::{PropertiesError, PropertiesResult};
pub use server_timezones::ServerTimezone;
pub use timezone::{to_server_timezone, DAYLIGHT_TIME, STANDARD_TIME, TIME_ZONE};

/// Weekday names as sent on the wire, Monday first. Enum fields store the
/// 1-based index into this list.
pub const WEEKDAY_NAMES: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
