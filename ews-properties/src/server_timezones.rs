//! Raw timezone tables as servers publish them.
//!
//! A full timezone definition lists:
//! - `Periods`: named offsets from UTC, keyed by the year they start and
//!   their kind (`Standard` or `Daylight`)
//! - `TransitionsGroups`: sets of at most two rules switching between periods
//! - `Transitions`: which group is in effect from which date
//!
//! These tables are reduced to a single [`TIME_ZONE`](crate::TIME_ZONE)
//! descriptor by [`ServerTimezone::to_time_zone`].

use crate::timezone::{from_server_tables, LAST_OCCURRENCE};
use crate::{PropertiesError, PropertiesResult, WEEKDAY_NAMES};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use ews_model::Element;
use ews_types::{wire, QName, XmlElement};
use std::collections::BTreeMap;
use tracing::debug;

/// Identifies a period by start year and kind.
///
/// Ordered by year first, so iterating a [`Periods`] table walks forward in
/// time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    pub year: i32,
    pub kind: String,
}

impl PeriodKey {
    pub fn new(year: i32, kind: impl Into<String>) -> Self {
        Self { year, kind: kind.into() }
    }

    /// Parses a period reference such as
    /// `trule:Microsoft/Registry/W. Europe Standard Time/2006-Daylight`.
    pub fn parse(reference: &str) -> PropertiesResult<Self> {
        let malformed = || PropertiesError::MalformedTimezoneDefinition(format!("invalid period id {reference:?}"));
        let last = reference.rsplit('/').next().unwrap_or(reference);
        let (year, kind) = last.split_once('-').ok_or_else(malformed)?;
        let year = year.parse().map_err(|_| malformed())?;
        Ok(Self::new(year, kind))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub name: String,
    /// Offset from UTC.
    pub bias: TimeDelta,
}

impl Period {
    pub fn new(name: impl Into<String>, bias: TimeDelta) -> Self {
        Self { name: name.into(), bias }
    }
}

/// A recurring switch into a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringTransition {
    pub to: PeriodKey,
    /// Time of day of the switch, as an offset from midnight.
    pub offset: TimeDelta,
    pub iso_month: i64,
    /// 1-based, starting at Monday.
    pub iso_weekday: i64,
    /// n'th occurrence of the weekday in the month; `5` means the last one.
    pub occurrence: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A switch with no recurrence rule. Zones without daylight saving have
    /// only these.
    Simple { to: PeriodKey },
    Recurring(RecurringTransition),
}

impl Transition {
    #[must_use]
    pub fn to(&self) -> &PeriodKey {
        match self {
            Self::Simple { to } | Self::Recurring(RecurringTransition { to, .. }) => to,
        }
    }
}

pub type Periods = BTreeMap<PeriodKey, Period>;
/// Transition groups by id.
pub type TransitionGroups = BTreeMap<i64, Vec<Transition>>;
/// Transition group ids and the date each takes effect; `None` means "since
/// the beginning".
pub type Transitions = BTreeMap<i64, Option<NaiveDate>>;

/// One server timezone with its full tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTimezone {
    pub id: String,
    pub name: String,
    pub periods: Periods,
    pub transitions: Transitions,
    pub transition_groups: TransitionGroups,
}

impl ServerTimezone {
    /// The descriptor these tables imply for `for_year`.
    pub fn to_time_zone(&self, for_year: i32) -> PropertiesResult<Element> {
        from_server_tables(&self.periods, &self.transitions, &self.transition_groups, for_year)
    }

    /// Parses a `TimeZoneDefinition` element.
    pub fn from_wire(definition: &XmlElement) -> PropertiesResult<Self> {
        let id = required_attr(definition, "Id")?.to_string();
        let name = definition.attr("Name").unwrap_or_default().to_string();
        let zone = Self {
            periods: parse_periods(definition)?,
            transitions: parse_transitions(definition)?,
            transition_groups: parse_transition_groups(definition)?,
            id,
            name,
        };
        debug!(
            id = %zone.id,
            periods = zone.periods.len(),
            groups = zone.transition_groups.len(),
            "Parsed server timezone definition"
        );
        Ok(zone)
    }
}

/// Parses every `TimeZoneDefinition` in a `TimeZoneDefinitions` container.
pub fn parse_definitions(container: &XmlElement) -> PropertiesResult<Vec<ServerTimezone>> {
    container
        .find_all(&QName::types("TimeZoneDefinition"))
        .map(ServerTimezone::from_wire)
        .collect()
}

// ── Parsing ──────────────────────────────────────────────────────

fn malformed(reason: impl Into<String>) -> PropertiesError {
    PropertiesError::MalformedTimezoneDefinition(reason.into())
}

fn required_attr<'a>(element: &'a XmlElement, name: &str) -> PropertiesResult<&'a str> {
    element
        .attr(name)
        .ok_or_else(|| malformed(format!("{} without {name} attribute", element.name().local_name())))
}

fn child_text<'a>(element: &'a XmlElement, name: &str) -> PropertiesResult<&'a str> {
    element
        .find(&QName::types(name))
        .and_then(XmlElement::text)
        .ok_or_else(|| malformed(format!("{} without {name}", element.name().local_name())))
}

fn parse_int(text: &str) -> PropertiesResult<i64> {
    Ok(wire::text_to_int(text)?)
}

fn parse_periods(definition: &XmlElement) -> PropertiesResult<Periods> {
    let container = definition
        .find(&QName::types("Periods"))
        .ok_or_else(|| malformed("definition without Periods"))?;
    let mut periods = Periods::new();
    for period in container.find_all(&QName::types("Period")) {
        let key = PeriodKey::parse(required_attr(period, "Id")?)?;
        let bias = wire::text_to_duration(required_attr(period, "Bias")?)?;
        let name = period.attr("Name").unwrap_or_default();
        periods.insert(key, Period::new(name, bias));
    }
    Ok(periods)
}

fn parse_transition_groups(definition: &XmlElement) -> PropertiesResult<TransitionGroups> {
    let mut groups = TransitionGroups::new();
    let Some(container) = definition.find(&QName::types("TransitionsGroups")) else {
        return Ok(groups);
    };
    for group in container.find_all(&QName::types("TransitionsGroup")) {
        let id = parse_int(required_attr(group, "Id")?)?;
        let mut transitions = Vec::new();
        for transition in group.find_all(&QName::types("Transition")) {
            transitions.push(Transition::Simple {
                to: PeriodKey::parse(child_text(transition, "To")?)?,
            });
        }
        for transition in group.find_all(&QName::types("RecurringDayTransition")) {
            transitions.push(Transition::Recurring(parse_recurring(transition)?));
        }
        groups.insert(id, transitions);
    }
    Ok(groups)
}

fn parse_recurring(transition: &XmlElement) -> PropertiesResult<RecurringTransition> {
    let weekday = child_text(transition, "DayOfWeek")?;
    let iso_weekday = WEEKDAY_NAMES
        .iter()
        .position(|name| *name == weekday)
        .and_then(|idx| i64::try_from(idx + 1).ok())
        .ok_or_else(|| malformed(format!("unknown weekday {weekday:?}")))?;
    let occurrence = match parse_int(child_text(transition, "Occurrence")?)? {
        -1 => LAST_OCCURRENCE,
        n => n,
    };
    Ok(RecurringTransition {
        to: PeriodKey::parse(child_text(transition, "To")?)?,
        offset: wire::text_to_duration(child_text(transition, "TimeOffset")?)?,
        iso_month: parse_int(child_text(transition, "Month")?)?,
        iso_weekday,
        occurrence,
    })
}

fn parse_transitions(definition: &XmlElement) -> PropertiesResult<Transitions> {
    let mut transitions = Transitions::new();
    let Some(container) = definition.find(&QName::types("Transitions")) else {
        return Ok(transitions);
    };
    for transition in container.find_all(&QName::types("Transition")) {
        transitions.insert(group_target(transition)?, None);
    }
    for transition in container.find_all(&QName::types("AbsoluteDateTransition")) {
        let date = transition_date(child_text(transition, "DateTime")?)?;
        transitions.insert(group_target(transition)?, Some(date));
    }
    Ok(transitions)
}

/// The transition group id a `Transitions` entry points to.
fn group_target(transition: &XmlElement) -> PropertiesResult<i64> {
    let to = transition
        .find(&QName::types("To"))
        .ok_or_else(|| malformed("transition without To"))?;
    match to.attr("Kind") {
        Some("Group") => parse_int(to.text().unwrap_or_default()),
        other => Err(malformed(format!("unexpected transition target kind {other:?}"))),
    }
}

// Absolute transitions are usually sent without an offset; only the date
// matters here.
fn transition_date(text: &str) -> PropertiesResult<NaiveDate> {
    if let Ok(dt) = wire::text_to_datetime(text) {
        return Ok(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .map_err(|_| malformed(format!("invalid transition date {text:?}")))
}
