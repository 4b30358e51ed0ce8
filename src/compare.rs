//! Recursive structural comparison of an actual mapping against an expected
//! one.
//!
//! The expected side drives the walk: every expected key is looked up in the
//! actual mapping and compared by shape (list, mapping, date-like, scalar).
//! Mismatches are appended to a caller-owned list of [`ErrorRecord`]s with a
//! path built while descending:
//!
//! ```text
//! {"a": {"b": {"c": 1}}}         → a.b.c
//! {"strawberry": [{"dog": 1}]}   → strawberry[0].dog
//! {"tags": ["x", {"y": 1}]}      → tags[0], tags[1].y
//! ```

use crate::config::CompareConfig;
use crate::dates;
use crate::error::ErrorRecord;
use crate::lists;
use crate::types::{Map, Value};

/// Key counts of two mappings differ; nothing inside them was compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LengthMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Compares two top-level mappings, appending every mismatch to `unmatched`.
///
/// # Errors
///
/// Returns a standalone `"Collections not the same length"` record when the
/// two mappings have a different number of keys. No key is compared in that
/// case. Mappings with equal counts but different key names proceed into the
/// walk and report `"Key not found in Actual"` instead.
pub fn compare_maps(
    actual: &Map,
    expected: &Map,
    config: &CompareConfig,
    unmatched: &mut Vec<ErrorRecord>,
) -> Result<(), ErrorRecord> {
    compare_maps_at(actual, expected, config, unmatched, None).map_err(|m| {
        ErrorRecord::fatal("Collections not the same length")
            .with_expected(expected.clone())
            .with_actual(actual.clone())
            .with_field("expected_length", m.expected)
            .with_field("actual_length", m.actual)
    })
}

pub(crate) fn compare_maps_at(
    actual: &Map,
    expected: &Map,
    config: &CompareConfig,
    unmatched: &mut Vec<ErrorRecord>,
    parent: Option<&str>,
) -> Result<(), LengthMismatch> {
    if actual.len() != expected.len() {
        return Err(LengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    for (key, expected_value) in expected.iter() {
        if config.is_ignored(key) {
            continue;
        }
        let path = join_key(parent, key);
        match actual.get(key) {
            Some(actual_value) => {
                compare_values(actual_value, expected_value, &path, config, unmatched)
            }
            None => unmatched.push(
                ErrorRecord::new()
                    .with_key(path)
                    .with_expected(expected_value.clone())
                    .with_actual(actual.clone())
                    .with_note("Key not found in Actual"),
            ),
        }
    }
    Ok(())
}

/// Compares one expected value against the actual value found at `path`.
pub(crate) fn compare_values(
    actual: &Value,
    expected: &Value,
    path: &str,
    config: &CompareConfig,
    unmatched: &mut Vec<ErrorRecord>,
) {
    match expected {
        Value::List(expected_items) => {
            lists::compare_lists(actual, expected_items, path, config, unmatched);
        }
        Value::Map(expected_map) => match actual {
            Value::Map(actual_map) => {
                let scoped =
                    compare_maps_at(actual_map, expected_map, config, unmatched, Some(path));
                if let Err(m) = scoped {
                    unmatched.push(
                        ErrorRecord::mismatch(path, expected.clone(), actual.clone())
                            .with_note("Collections not the same length")
                            .with_field("expected_length", m.expected)
                            .with_field("actual_length", m.actual),
                    );
                }
            }
            other => unmatched.push(
                ErrorRecord::mismatch(path, expected.clone(), "not a valid dictionary")
                    .with_note("Dicts do not match")
                    .with_field("actual_type", other.type_name()),
            ),
        },
        _ if dates::is_date_like(expected) => {
            // Date-shaped but unparseable expected values compare as plain
            // scalars.
            let margin = &config.margin;
            if dates::compare_date_values(expected, actual, path, unmatched, margin).is_err() {
                compare_scalars(actual, expected, path, unmatched);
            }
        }
        _ => compare_scalars(actual, expected, path, unmatched),
    }
}

fn compare_scalars(
    actual: &Value,
    expected: &Value,
    path: &str,
    unmatched: &mut Vec<ErrorRecord>,
) {
    if expected != actual {
        unmatched.push(ErrorRecord::mismatch(path, expected.clone(), actual.clone()));
    }
}

/// `parent.key`, or the bare key at the top level.
pub(crate) fn join_key(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(p) if !p.is_empty() => format!("{}.{}", p, key),
        _ => key.to_string(),
    }
}

/// `parent[index]`.
pub(crate) fn join_index(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}
