//! Timezone descriptors and reconciliation against server timezones.
//!
//! A [`TIME_ZONE`] element describes a zone the way the availability service
//! wants it: a base bias in minutes plus optional standard and daylight
//! transition rules. Servers instead publish their zones as tables of periods
//! and transition groups (see [`crate::server_timezones`]). This module
//! derives the descriptor a server table implies for a given year, and finds
//! the server zone matching a locally built descriptor.

use crate::server_timezones::{Periods, RecurringTransition, ServerTimezone, Transition, TransitionGroups, Transitions};
use crate::{PropertiesError, PropertiesResult, WEEKDAY_NAMES};
use chrono::{Datelike, NaiveTime, TimeDelta};
use ews_model::{Element, ElementHooks, ElementType, Field, Fields, ModelResult};
use ews_types::{wire, Version};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Occurrence value meaning "last occurrence in the month". Some responses
/// use `-1` instead; only this one is accepted in requests.
pub const LAST_OCCURRENCE: i64 = 5;

const STANDARD: &str = "Standard";
const DAYLIGHT: &str = "Daylight";

// ── Entity types ─────────────────────────────────────────────────

fn transition_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        // Offset from the base bias, in minutes.
        Field::integer("bias", "Bias").required(),
        Field::time("time", "Time").required(),
        // n'th occurrence of `weekday` in `iso_month`.
        Field::integer("occurrence", "DayOrder").required(),
        Field::integer("iso_month", "Month").required(),
        Field::enumeration("weekday", "DayOfWeek", WEEKDAY_NAMES).required(),
    ])
}

struct TransitionHooks;

impl TransitionHooks {
    fn normalize_occurrence(element: &mut Element) -> ModelResult<()> {
        if element.get_int("occurrence") == Some(-1) {
            element.set("occurrence", LAST_OCCURRENCE)?;
        }
        Ok(())
    }
}

impl ElementHooks for TransitionHooks {
    fn before_clean(&self, element: &mut Element, _version: Option<&Version>) -> ModelResult<()> {
        Self::normalize_occurrence(element)
    }

    fn after_from_wire(&self, element: &mut Element) -> ModelResult<()> {
        Self::normalize_occurrence(element)
    }
}

pub static STANDARD_TIME: ElementType =
    ElementType::new("StandardTime", "StandardTime", transition_fields).with_hooks(&TransitionHooks);
pub static DAYLIGHT_TIME: ElementType =
    ElementType::new("DaylightTime", "DaylightTime", transition_fields).with_hooks(&TransitionHooks);

fn time_zone_fields() -> ModelResult<Fields> {
    Fields::new(vec![
        // Standard (non-DST) offset from UTC, in minutes.
        Field::integer("bias", "Bias").required(),
        Field::element("standard_time", &STANDARD_TIME),
        Field::element("daylight_time", &DAYLIGHT_TIME),
    ])
}

pub static TIME_ZONE: ElementType = ElementType::new("TimeZone", "TimeZone", time_zone_fields);

/// Builds a [`STANDARD_TIME`] or [`DAYLIGHT_TIME`] rule. `weekday` is 1-based
/// starting at Monday.
pub fn transition(
    ty: &'static ElementType,
    bias: i64,
    time: NaiveTime,
    occurrence: i64,
    iso_month: i64,
    weekday: i64,
) -> ModelResult<Element> {
    let mut element = Element::empty(ty);
    element.set("bias", bias)?;
    element.set("time", time)?;
    element.set("occurrence", occurrence)?;
    element.set("iso_month", iso_month)?;
    element.set("weekday", weekday)?;
    Ok(element)
}

pub fn time_zone(bias: i64, standard_time: Option<Element>, daylight_time: Option<Element>) -> ModelResult<Element> {
    let mut element = Element::empty(&TIME_ZONE);
    element.set("bias", bias)?;
    if let Some(standard_time) = standard_time {
        element.set("standard_time", standard_time)?;
    }
    if let Some(daylight_time) = daylight_time {
        element.set("daylight_time", daylight_time)?;
    }
    Ok(element)
}

/// Zero-bias rules for zones without daylight saving. Some servers reject a
/// `TimeZone` that lacks either rule.
fn dummy_rules() -> ModelResult<(Element, Element)> {
    Ok((
        transition(&STANDARD_TIME, 0, NaiveTime::MIN, 1, 1, 1)?,
        transition(&DAYLIGHT_TIME, 0, NaiveTime::MIN, LAST_OCCURRENCE, 12, 7)?,
    ))
}

// ── Derive from server tables ────────────────────────────────────

/// Derives the [`TIME_ZONE`] a server's period and transition tables describe
/// for `for_year`.
///
/// With no transitions at all, or with a group of non-recurring transitions,
/// the zone gets dummy zero-bias rules. A transition group that is present
/// but empty yields a zone with neither rule.
pub fn from_server_tables(
    periods: &Periods,
    transitions: &Transitions,
    groups: &TransitionGroups,
    for_year: i32,
) -> PropertiesResult<Element> {
    let bias = base_bias(periods, for_year)?;

    let Some(group_id) = valid_group_id(transitions, for_year)? else {
        let (standard_time, daylight_time) = dummy_rules()?;
        return Ok(time_zone(bias, Some(standard_time), Some(daylight_time))?);
    };
    let group = groups.get(&group_id).ok_or_else(|| PropertiesError::InvalidTransitionGroup {
        id: group_id,
        reason: "group is not defined".to_string(),
    })?;
    if group.len() > 2 {
        return Err(PropertiesError::InvalidTransitionGroup {
            id: group_id,
            reason: format!("expected 0-2 transitions, found {}", group.len()),
        });
    }

    let (standard_time, daylight_time) = rules_for_group(group_id, group, periods, bias)?;
    Ok(time_zone(bias, standard_time, daylight_time)?)
}

/// Bias of the latest standard period starting no later than `for_year`.
fn base_bias(periods: &Periods, for_year: i32) -> PropertiesResult<i64> {
    periods
        .iter()
        .filter(|(key, _)| key.kind == STANDARD)
        .take_while(|(key, _)| key.year <= for_year)
        .last()
        .map(|(_, period)| minutes(period.bias))
        .ok_or(PropertiesError::NoStandardPeriod {
            year: for_year,
            periods: periods.len(),
        })
}

/// Id of the transition group in effect for `for_year`, or `None` if the
/// table is empty.
fn valid_group_id(transitions: &Transitions, for_year: i32) -> PropertiesResult<Option<i64>> {
    if transitions.is_empty() {
        return Ok(None);
    }
    transitions
        .iter()
        .take_while(|(_, from)| from.is_none_or(|date| date.year() <= for_year))
        .last()
        .map(|(id, _)| Some(*id))
        .ok_or(PropertiesError::NoValidTransition { year: for_year })
}

fn rules_for_group(
    group_id: i64,
    group: &[Transition],
    periods: &Periods,
    bias: i64,
) -> PropertiesResult<(Option<Element>, Option<Element>)> {
    let (mut standard_time, mut daylight_time) = (None, None);
    for transition in group {
        let to = transition.to();
        let period = periods.get(to).ok_or_else(|| PropertiesError::UnknownPeriod {
            year: to.year,
            kind: to.kind.clone(),
        })?;
        let rule = match transition {
            Transition::Simple { .. } => {
                let (standard, daylight) = dummy_rules()?;
                standard_time = Some(standard);
                daylight_time = Some(daylight);
                continue;
            }
            Transition::Recurring(rule) => rule,
        };
        let time = time_of_day(rule.offset)?;
        match period.name.as_str() {
            STANDARD => {
                standard_time = Some(transition_for(&STANDARD_TIME, 0, time, rule)?);
            }
            DAYLIGHT => {
                let daylight_bias = minutes(period.bias) - bias;
                daylight_time = Some(transition_for(&DAYLIGHT_TIME, daylight_bias, time, rule)?);
            }
            other => {
                return Err(PropertiesError::InvalidTransitionGroup {
                    id: group_id,
                    reason: format!("transition to period named {other:?}"),
                });
            }
        }
    }
    Ok((standard_time, daylight_time))
}

fn transition_for(
    ty: &'static ElementType,
    bias: i64,
    time: NaiveTime,
    rule: &RecurringTransition,
) -> ModelResult<Element> {
    transition(ty, bias, time, rule.occurrence, rule.iso_month, rule.iso_weekday)
}

fn time_of_day(offset: TimeDelta) -> PropertiesResult<NaiveTime> {
    let invalid = || PropertiesError::InvalidTransitionOffset {
        offset: wire::duration_to_text(&offset),
    };
    if offset < TimeDelta::zero() || offset >= TimeDelta::days(1) {
        return Err(invalid());
    }
    let seconds = u32::try_from(offset.num_seconds()).map_err(|_| invalid())?;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).ok_or_else(invalid)
}

/// Whole minutes, rounding towards negative infinity.
fn minutes(bias: TimeDelta) -> i64 {
    bias.num_seconds().div_euclid(60)
}

// ── Reconciliation ───────────────────────────────────────────────

/// Finds the id of the server timezone matching `local` in `for_year`.
///
/// An exact structural match wins immediately. Otherwise any zone whose base
/// bias and standard/daylight biases all match qualifies; if several do, any
/// one of them is returned since the server offers nothing finer to tell
/// them apart.
pub fn to_server_timezone(local: &Element, catalog: &[ServerTimezone], for_year: i32) -> PropertiesResult<String> {
    let mut local = local.clone();
    local.clean(None)?;

    let mut candidates = HashSet::new();
    for server_zone in catalog {
        let candidate = server_zone.to_time_zone(for_year)?;
        if candidate == local {
            debug!(id = %server_zone.id, name = %server_zone.name, "Found exact timezone match");
            return Ok(server_zone.id.clone());
        }
        if !biases_match(&candidate, &local) {
            continue;
        }
        debug!(id = %server_zone.id, name = %server_zone.name, "Found timezone candidate with matching biases");
        candidates.insert(server_zone.id.as_str());
    }

    let bias = local.get_int("bias").unwrap_or_default();
    match candidates.len() {
        0 => return Err(PropertiesError::NoMatchingTimezone { bias }),
        1 => info!(bias, "No exact timezone match, selecting the only candidate"),
        n => warn!(bias, candidates = n, "No exact timezone match, selecting an arbitrary candidate"),
    }
    candidates
        .into_iter()
        .next()
        .map(str::to_string)
        .ok_or(PropertiesError::NoMatchingTimezone { bias })
}

fn biases_match(candidate: &Element, local: &Element) -> bool {
    if candidate.get_int("bias") != local.get_int("bias") {
        return false;
    }
    ["standard_time", "daylight_time"].iter().all(|name| {
        match (candidate.get_element(name), local.get_element(name)) {
            (None, None) => true,
            (Some(a), Some(b)) => a.get_int("bias") == b.get_int("bias"),
            _ => false,
        }
    })
}
