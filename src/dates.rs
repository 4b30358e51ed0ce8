//! Date normalization and proximity comparison.
//!
//! Date-like strings are parsed into timezone-naive timestamps against a fixed
//! list of ISO 8601 layouts, then compared within a [`Margin`].

use crate::config::Margin;
use crate::error::ErrorRecord;
use crate::types::Value;
use chrono::NaiveDateTime;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

/// Layouts tried, in order, when normalizing a date string.
pub const ACCEPTED_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
];

// The layouts `parse_date_str` can read: `T`-separated date and time with
// seconds, an optional fraction, then `Z` or a `+HH:MM` / `+HHMM` offset.
static DATE_SNIFF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})?$")
        .unwrap()
});

static LONG_FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(:\d{2}\.\d{6})\d+").unwrap());

static UTC_OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(T\d{2}:\d{2}:\d{2}(?:\.\d+)?)[+-]\d{2}:?\d{2}$").unwrap());

/// Which side of a comparison a date came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateRole {
    Expected,
    Actual,
}

impl fmt::Display for DateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRole::Expected => f.write_str("Expected"),
            DateRole::Actual => f.write_str("Actual"),
        }
    }
}

/// The expected value did not normalize to a timestamp; the caller falls
/// back to plain equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotADate;

/// Decides whether a string goes through date comparison at all.
///
/// Only the shapes [`parse_date_str`] reads are accepted, so a string that
/// passes can still fail on calendar values (month 13) but never on layout.
pub fn looks_like_date(raw: &str) -> bool {
    DATE_SNIFF_RE.is_match(raw.trim())
}

/// True for date-time values and date-like strings.
pub fn is_date_like(value: &Value) -> bool {
    match value {
        Value::DateTime(_) => true,
        Value::String(s) => looks_like_date(s),
        _ => false,
    }
}

/// Parses `raw` against `format` (if given) and then [`ACCEPTED_FORMATS`].
///
/// Fractional seconds beyond microsecond precision are truncated and a
/// trailing UTC offset is dropped without being applied.
pub fn parse_date_str(raw: &str, format: Option<&str>) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    let truncated = LONG_FRACTION_RE.replace(trimmed, "$1");

    if let Some(fmt) = format
        && let Ok(dt) = NaiveDateTime::parse_from_str(&truncated, fmt)
    {
        return Some(dt);
    }

    let wall_clock: Cow<'_, str> = UTC_OFFSET_RE.replace(&truncated, "$1");
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&wall_clock, fmt).ok())
}

/// Normalizes a date-time value or date string into a naive timestamp.
///
/// # Errors
///
/// Returns a record noted `"<role> Date Not Correct Format"` listing the
/// accepted formats and the offending value.
pub fn normalize_date(
    value: &Value,
    key: &str,
    role: DateRole,
) -> Result<NaiveDateTime, ErrorRecord> {
    normalize_date_with_format(value, key, role, None)
}

/// [`normalize_date`] with an explicit format tried before the fixed list.
pub fn normalize_date_with_format(
    value: &Value,
    key: &str,
    role: DateRole,
    format: Option<&str>,
) -> Result<NaiveDateTime, ErrorRecord> {
    let parsed = match value {
        Value::DateTime(dt) => return Ok(*dt),
        Value::String(raw) => parse_date_str(raw, format),
        _ => None,
    };
    parsed.ok_or_else(|| format_error(value, key, role, format))
}

fn format_error(value: &Value, key: &str, role: DateRole, format: Option<&str>) -> ErrorRecord {
    let accepted: Vec<Value> = format
        .into_iter()
        .chain(ACCEPTED_FORMATS)
        .map(Value::from)
        .collect();
    let record = ErrorRecord::new()
        .with_key(key)
        .with_note(format!("{} Date Not Correct Format", role));
    let record = match role {
        DateRole::Expected => record.with_expected(value.clone()),
        DateRole::Actual => record.with_actual(value.clone()),
    };
    record.with_field("accepted_formats", accepted)
}

/// Appends a `"Dates Not Close Enough"` record unless `actual` lies within
/// `expected ± margin` (inclusive).
pub fn compare_dates(
    expected: NaiveDateTime,
    actual: NaiveDateTime,
    key: &str,
    unmatched: &mut Vec<ErrorRecord>,
    margin: &Margin,
) {
    let window = margin.to_duration();
    let lower = expected
        .checked_sub_signed(window)
        .unwrap_or(NaiveDateTime::MIN);
    let upper = expected
        .checked_add_signed(window)
        .unwrap_or(NaiveDateTime::MAX);

    if actual < lower || actual > upper {
        unmatched.push(
            ErrorRecord::mismatch(key, to_second(&expected), to_second(&actual))
                .with_note("Dates Not Close Enough"),
        );
    }
}

fn to_second(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Normalizes both sides and compares them within `margin`.
///
/// An actual value that cannot be normalized is recorded as a format error.
///
/// # Errors
///
/// Returns [`NotADate`] when the expected value does not normalize; nothing
/// has been recorded in that case.
pub fn compare_date_values(
    expected: &Value,
    actual: &Value,
    key: &str,
    unmatched: &mut Vec<ErrorRecord>,
    margin: &Margin,
) -> Result<(), NotADate> {
    let expected_ts =
        normalize_date(expected, key, DateRole::Expected).map_err(|_| NotADate)?;
    match normalize_date(actual, key, DateRole::Actual) {
        Ok(actual_ts) => compare_dates(expected_ts, actual_ts, key, unmatched, margin),
        Err(record) => unmatched.push(record),
    }
    Ok(())
}
