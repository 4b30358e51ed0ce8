use chrono::{NaiveDate, NaiveDateTime};
use respcheck::config::{Margin, MarginUnit};
use respcheck::dates::*;
use respcheck::error::ErrorRecord;
use respcheck::types::Value;

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

// ─── normalization ──────────────────────────────────────────────────────────

#[test]
fn accepts_each_fixed_format() {
    let noon = at(12, 0, 0);
    assert_eq!(parse_date_str("2024-03-01T12:00:00", None), Some(noon));
    assert_eq!(parse_date_str("2024-03-01T12:00:00Z", None), Some(noon));
    assert_eq!(
        parse_date_str("2024-03-01T12:00:00.5", None),
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_micro_opt(12, 0, 0, 500_000)
    );
    assert_eq!(
        parse_date_str("2024-03-01T12:00:00.250Z", None),
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_micro_opt(12, 0, 0, 250_000)
    );
}

#[test]
fn long_fractions_truncate_to_microseconds() {
    let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_micro_opt(12, 0, 0, 123_456);
    assert_eq!(parse_date_str("2024-03-01T12:00:00.123456789", None), expected);
    assert_eq!(parse_date_str("2024-03-01T12:00:00.1234567891234Z", None), expected);
}

#[test]
fn utc_offset_is_discarded_not_applied() {
    assert_eq!(parse_date_str("2024-03-01T12:00:00+05:00", None), Some(at(12, 0, 0)));
    let west = parse_date_str("2024-03-01T12:00:00.5-0300", None).unwrap();
    assert_eq!(west.time().to_string(), "12:00:00.500");
}

#[test]
fn explicit_format_is_tried_first() {
    assert_eq!(
        parse_date_str("01/03/2024 12:00", Some("%d/%m/%Y %H:%M")),
        Some(at(12, 0, 0))
    );
    // A non-matching override still falls back to the fixed list.
    assert_eq!(
        parse_date_str("2024-03-01T12:00:00", Some("%d/%m/%Y")),
        Some(at(12, 0, 0))
    );
}

#[test]
fn datetime_values_pass_through_unchanged() {
    let dt = at(8, 30, 0);
    assert_eq!(normalize_date(&Value::DateTime(dt), "when", DateRole::Expected), Ok(dt));
}

#[test]
fn unparseable_string_reports_format_error() {
    let err = normalize_date(&Value::from("last tuesday"), "when", DateRole::Actual).unwrap_err();
    assert_eq!(err.key.as_deref(), Some("when"));
    assert_eq!(err.note.as_deref(), Some("Actual Date Not Correct Format"));
    assert_eq!(err.actual, Some(Value::from("last tuesday")));
    assert!(err.expected.is_none());
    let formats = err.field("accepted_formats").and_then(Value::as_list).unwrap();
    assert_eq!(formats.len(), ACCEPTED_FORMATS.len());
}

#[test]
fn override_is_listed_among_accepted_formats() {
    let err = normalize_date_with_format(&Value::from("nope"), "k", DateRole::Expected, Some("%d/%m/%Y"))
        .unwrap_err();
    assert_eq!(err.note.as_deref(), Some("Expected Date Not Correct Format"));
    let formats = err.field("accepted_formats").and_then(Value::as_list).unwrap();
    assert_eq!(formats[0], Value::from("%d/%m/%Y"));
    assert_eq!(formats.len(), ACCEPTED_FORMATS.len() + 1);
}

#[test]
fn non_string_values_are_format_errors() {
    let err = normalize_date(&Value::from(42), "k", DateRole::Expected).unwrap_err();
    assert_eq!(err.expected, Some(Value::from(42)));
}

// ─── sniffing ───────────────────────────────────────────────────────────────

#[test]
fn sniff_recognizes_date_shaped_strings() {
    assert!(looks_like_date("2024-03-01T10:00:00"));
    assert!(looks_like_date("2024-03-01T10:00:00.123Z"));
    assert!(looks_like_date("2024-03-01T10:00:00+02:00"));
    assert!(looks_like_date("2024-03-01T10:00:00.5-0300"));
    assert!(!looks_like_date("12"));
    assert!(!looks_like_date("hello"));
    assert!(!looks_like_date("2024"));
    assert!(is_date_like(&Value::DateTime(at(0, 0, 0))));
    assert!(!is_date_like(&Value::from(20240301)));
}

// ─── proximity ──────────────────────────────────────────────────────────────

#[test]
fn boundary_of_default_margin_is_inclusive() {
    let margin = Margin::default();
    let mut unmatched = Vec::new();
    compare_dates(at(12, 0, 0), at(12, 10, 0), "when", &mut unmatched, &margin);
    compare_dates(at(12, 0, 0), at(11, 50, 0), "when", &mut unmatched, &margin);
    assert!(unmatched.is_empty(), "{:?}", unmatched);
}

#[test]
fn one_unit_past_margin_fails() {
    let margin = Margin::default();
    let mut unmatched = Vec::new();
    compare_dates(at(12, 0, 0), at(12, 11, 0), "when", &mut unmatched, &margin);
    compare_dates(at(12, 0, 0), at(11, 49, 0), "when", &mut unmatched, &margin);
    assert_eq!(unmatched.len(), 2);
    assert_eq!(
        unmatched[0],
        "Key: when\n\
         Expected: 2024-03-01 12:00:00\n\
         Actual: 2024-03-01 12:11:00\n\
         Note: Dates Not Close Enough"
    );
}

#[test]
fn rendered_dates_drop_subseconds() {
    let margin = Margin::new(MarginUnit::Seconds, 1);
    let actual = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_micro_opt(12, 0, 5, 999_999)
        .unwrap();
    let mut unmatched = Vec::new();
    compare_dates(at(12, 0, 0), actual, "k", &mut unmatched, &margin);
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched[0].actual, Some(Value::from("2024-03-01 12:00:05")));
}

#[test]
fn combined_path_falls_back_when_expected_does_not_normalize() {
    let mut unmatched = Vec::new();
    let result = compare_date_values(
        &Value::from("2024-03-01"),
        &Value::from("2024-03-01"),
        "day",
        &mut unmatched,
        &Margin::default(),
    );
    assert_eq!(result, Err(NotADate));
    assert!(unmatched.is_empty());
}

#[test]
fn combined_path_records_bad_actual_format() {
    let mut unmatched: Vec<ErrorRecord> = Vec::new();
    let result = compare_date_values(
        &Value::from("2024-03-01T12:00:00"),
        &Value::from("yesterday"),
        "when",
        &mut unmatched,
        &Margin::default(),
    );
    assert_eq!(result, Ok(()));
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched[0].note.as_deref(), Some("Actual Date Not Correct Format"));
}

#[test]
fn combined_path_compares_mixed_representations() {
    let mut unmatched = Vec::new();
    compare_date_values(
        &Value::DateTime(at(12, 0, 0)),
        &Value::from("2024-03-01T12:05:00.000001Z"),
        "when",
        &mut unmatched,
        &Margin::default(),
    )
    .unwrap();
    assert!(unmatched.is_empty());
}

#[test]
fn sniff_rejects_layouts_the_parser_cannot_read() {
    for raw in [
        "2024-03-01",
        "2024-03-01 12:00:00",
        "2024-03-01 10:00",
        "2024-03-01T10:00",
        "2024-03-01T12:00:00-03",
        "2024-03-01T12:00:00,5",
    ] {
        assert!(!looks_like_date(raw), "{} should not look like a date", raw);
        assert_eq!(parse_date_str(raw, None), None, "{}", raw);
    }
}

#[test]
fn sniff_requires_two_digit_fields() {
    assert!(!looks_like_date("2024-3-1T12:00:00"));
}
