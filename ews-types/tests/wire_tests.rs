use chrono::{NaiveTime, TimeDelta, TimeZone, Utc};
use ews_types::wire::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ── Booleans and integers ────────────────────────────────────────

#[test]
fn booleans_accept_numeric_forms() {
    assert_eq!(bool_to_text(true), "true");
    assert!(text_to_bool("1").unwrap());
    assert!(!text_to_bool(" false ").unwrap());
    assert!(text_to_bool("yes").is_err());
}

#[test]
fn integers_trim_whitespace() {
    assert_eq!(text_to_int(" -42 ").unwrap(), -42);
    assert!(text_to_int("4x").is_err());
}

// ── Date-times ───────────────────────────────────────────────────

#[test]
fn datetime_written_as_utc() {
    let dt = Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap();
    assert_eq!(datetime_to_text(&dt), "2024-03-10T08:30:00Z");
}

#[test]
fn datetime_with_offset_is_converted_to_utc() {
    let dt = text_to_datetime("2024-03-10T10:30:00+02:00").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap());
}

#[test]
fn datetime_keeps_fractional_seconds() {
    let dt = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    assert_eq!(datetime_to_text(&dt), "2023-11-14T22:13:20.123Z");
    assert_eq!(text_to_datetime(&datetime_to_text(&dt)).unwrap(), dt);
}

#[test]
fn naive_datetime_is_rejected() {
    assert!(text_to_datetime("2024-03-10T08:30:00").is_err());
}

// ── Times of day ─────────────────────────────────────────────────

#[test]
fn time_accepts_seconds_fractions_and_minutes() {
    let expected = NaiveTime::from_hms_opt(2, 0, 0).unwrap();
    assert_eq!(text_to_time("02:00:00").unwrap(), expected);
    assert_eq!(text_to_time("02:00").unwrap(), expected);
    assert_eq!(text_to_time("120").unwrap(), expected);
    assert_eq!(time_to_text(&expected), "02:00:00");
}

#[test]
fn time_rejects_out_of_range_minutes() {
    assert!(text_to_time("1440").is_err());
    assert!(text_to_time("4000000000").is_err());
    assert!(text_to_time("noon").is_err());
}

#[test]
fn time_keeps_fractional_seconds() {
    let time = NaiveTime::from_hms_milli_opt(8, 15, 30, 250).unwrap();
    assert_eq!(time_to_text(&time), "08:15:30.250");
    assert_eq!(text_to_time(&time_to_text(&time)).unwrap(), time);
}

// ── Durations ────────────────────────────────────────────────────

#[test]
fn duration_formatting() {
    assert_eq!(duration_to_text(&TimeDelta::zero()), "PT0M");
    assert_eq!(duration_to_text(&TimeDelta::minutes(-90)), "-PT1H30M");
    assert_eq!(duration_to_text(&TimeDelta::hours(26)), "P1DT2H");
    assert_eq!(duration_to_text(&TimeDelta::seconds(61)), "PT1M1S");
}

#[test]
fn duration_parsing() {
    assert_eq!(text_to_duration("-PT1H").unwrap(), TimeDelta::hours(-1));
    assert_eq!(text_to_duration("PT0M").unwrap(), TimeDelta::zero());
    assert_eq!(text_to_duration("P1DT30M").unwrap(), TimeDelta::minutes(24 * 60 + 30));
}

#[test]
fn duration_rejects_calendar_units() {
    assert!(text_to_duration("P1M").is_err());
    assert!(text_to_duration("P1Y").is_err());
    assert!(text_to_duration("PT5").is_err());
    assert!(text_to_duration("1H").is_err());
}

#[test]
fn duration_rejects_values_out_of_range() {
    assert!(text_to_duration("P999999999999999D").is_err());
    assert!(text_to_duration("PT9223372036854776S").is_err());
    assert!(text_to_duration("-PT9223372036854775807S").is_err());
    assert!(text_to_duration("PT99999999999999999999H").is_err());
    assert!(text_to_duration("PT9223372036854775S").is_ok());
}

// ── Base64 ───────────────────────────────────────────────────────

#[test]
fn base64_standard_alphabet() {
    assert_eq!(bytes_to_text(b"\xfb\xff"), "+/8=");
    assert_eq!(text_to_bytes("+/8=").unwrap(), b"\xfb\xff".to_vec());
    assert!(text_to_bytes("not base64!").is_err());
}

// ── Properties ───────────────────────────────────────────────────

mod properties {
    use super::*;

    proptest! {
        #[test]
        fn duration_text_is_stable(seconds in -10_000_000i64..10_000_000) {
            let delta = TimeDelta::seconds(seconds);
            prop_assert_eq!(text_to_duration(&duration_to_text(&delta)).unwrap(), delta);
        }

        #[test]
        fn datetime_text_is_stable(nanos in 0i64..4_000_000_000_000_000_000) {
            let dt = Utc.timestamp_nanos(nanos);
            prop_assert_eq!(text_to_datetime(&datetime_to_text(&dt)).unwrap(), dt);
        }

        #[test]
        fn time_text_is_stable(seconds in 0u32..86_400, nanos in 0u32..1_000_000_000) {
            let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos).unwrap();
            prop_assert_eq!(text_to_time(&time_to_text(&time)).unwrap(), time);
        }

        #[test]
        fn duration_text_never_panics(
            text in "-?P([0-9]{1,22}D)?(T([0-9]{1,22}H)?([0-9]{1,22}M)?([0-9]{1,22}S)?)?",
        ) {
            let _ = text_to_duration(&text);
        }

        #[test]
        fn base64_text_is_stable(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(text_to_bytes(&bytes_to_text(&bytes)).unwrap(), bytes);
        }

        #[test]
        fn minutes_since_midnight_match_clock_form(minutes in 0u32..1440) {
            let from_minutes = text_to_time(&minutes.to_string()).unwrap();
            let clock = format!("{:02}:{:02}:00", minutes / 60, minutes % 60);
            prop_assert_eq!(from_minutes, text_to_time(&clock).unwrap());
        }
    }
}
