//! Scalar text conversions used in attribute values and element text.
//!
//! - Booleans are `true`/`false` (`1`/`0` accepted on read)
//! - Date-times are UTC, `YYYY-MM-DDTHH:MM:SSZ`, with fractional seconds only when nonzero
//! - Times of day are `HH:MM:SS[.fff]`; a bare integer is read as minutes since midnight
//! - Durations use the `xs:duration` day/time subset (`-PT1H30M`, `P1DT2H`)
//! - Blobs are standard base64

use crate::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta, Utc};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn invalid(kind: &'static str, value: &str) -> Error {
    Error::InvalidWireValue {
        kind,
        value: value.to_string(),
    }
}

#[must_use]
pub const fn bool_to_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

pub fn text_to_bool(text: &str) -> Result<bool> {
    match text.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(invalid("boolean", other)),
    }
}

pub fn text_to_int(text: &str) -> Result<i64> {
    text.trim().parse().map_err(|_| invalid("integer", text))
}

#[must_use]
pub fn datetime_to_text(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses a timezone-aware date-time and converts it to UTC.
///
/// Naive values are rejected: the server always sends an offset, and guessing
/// one would silently shift appointments.
pub fn text_to_datetime(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| invalid("date-time", text))
}

#[must_use]
pub fn time_to_text(value: &NaiveTime) -> String {
    value.format("%H:%M:%S%.f").to_string()
}

pub fn text_to_time(text: &str) -> Result<NaiveTime> {
    let text = text.trim();
    if text.contains(':') {
        return NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
            .map_err(|_| invalid("time", text));
    }
    // Working hours are sent as minutes since midnight.
    let minutes: u32 = text.parse().map_err(|_| invalid("time", text))?;
    minutes
        .checked_mul(60)
        .and_then(|seconds| NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0))
        .ok_or_else(|| invalid("time", text))
}

#[must_use]
pub fn bytes_to_text(value: &[u8]) -> String {
    STANDARD.encode(value)
}

pub fn text_to_bytes(text: &str) -> Result<Vec<u8>> {
    STANDARD.decode(text.trim()).map_err(|_| invalid("base64", text))
}

/// Formats a duration as `xs:duration`, e.g. `-PT1H30M` or `PT0M`.
#[must_use]
pub fn duration_to_text(value: &TimeDelta) -> String {
    let sign = if *value < TimeDelta::zero() { "-" } else { "" };
    let total = value.num_seconds().unsigned_abs();
    let (days, rest) = (total / 86_400, total % 86_400);
    let (hours, minutes, seconds) = (rest / 3600, (rest % 3600) / 60, rest % 60);

    let mut out = format!("{sign}P");
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    out.push('T');
    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 || (hours == 0 && seconds == 0) {
        out.push_str(&format!("{minutes}M"));
    }
    if seconds > 0 {
        out.push_str(&format!("{seconds}S"));
    }
    out
}

/// Parses the day/time subset of `xs:duration`. Years and months have no
/// fixed length and are rejected.
pub fn text_to_duration(text: &str) -> Result<TimeDelta> {
    let trimmed = text.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let rest = rest.strip_prefix('P').ok_or_else(|| invalid("duration", text))?;

    let overflow = || invalid("duration", text);
    let mut seconds: i64 = 0;
    let mut in_time = false;
    let mut number = String::new();
    for c in rest.chars() {
        match c {
            'T' if !in_time && number.is_empty() => in_time = true,
            '0'..='9' => number.push(c),
            unit => {
                let n: i64 = number.parse().map_err(|_| invalid("duration", text))?;
                number.clear();
                let scale = match (in_time, unit) {
                    (false, 'D') => 86_400,
                    (true, 'H') => 3600,
                    (true, 'M') => 60,
                    (true, 'S') => 1,
                    _ => return Err(invalid("duration", text)),
                };
                seconds = n
                    .checked_mul(scale)
                    .and_then(|part| seconds.checked_add(part))
                    .ok_or_else(overflow)?;
            }
        }
    }
    if !number.is_empty() {
        return Err(invalid("duration", text));
    }
    let delta = TimeDelta::try_seconds(seconds).ok_or_else(overflow)?;
    Ok(if negative { -delta } else { delta })
}
