//! List matching: list-valued fields inside a mapping, and whole response
//! lists.

use crate::compare::{compare_maps, compare_values, join_index};
use crate::config::CompareConfig;
use crate::error::ErrorRecord;
use crate::types::{Value, canonical_cmp};
use tracing::trace;

/// Compares a list-valued field.
///
/// Lists of plain strings/numbers are compared as whole sequences (sorted
/// first when `sort_lists` is set). Any other list is compared element by
/// element in position order, recursing into mappings and nested lists.
pub(crate) fn compare_lists(
    actual: &Value,
    expected: &[Value],
    path: &str,
    config: &CompareConfig,
    unmatched: &mut Vec<ErrorRecord>,
) {
    let Value::List(actual_items) = actual else {
        unmatched.push(
            ErrorRecord::mismatch(path, expected.to_vec(), actual.clone())
                .with_note("Arrays do not match")
                .with_field("actual_type", actual.type_name()),
        );
        return;
    };

    if config.full_list_validation && actual_items.len() != expected.len() {
        unmatched.push(
            ErrorRecord::mismatch(path, expected.to_vec(), actual_items.clone())
                .with_note("Arrays not the same length")
                .with_field("expected_length", expected.len())
                .with_field("actual_length", actual_items.len()),
        );
        return;
    }

    if expected.iter().all(Value::is_plain_scalar) {
        compare_scalar_lists(actual_items, expected, path, config, unmatched);
    } else {
        compare_structured_lists(actual_items, expected, path, config, unmatched);
    }
}

fn compare_scalar_lists(
    actual: &[Value],
    expected: &[Value],
    path: &str,
    config: &CompareConfig,
    unmatched: &mut Vec<ErrorRecord>,
) {
    if config.sort_lists {
        let mut expected_sorted = expected.to_vec();
        let mut actual_sorted = actual.to_vec();
        expected_sorted.sort_by(canonical_cmp);
        actual_sorted.sort_by(canonical_cmp);
        if expected_sorted != actual_sorted {
            unmatched.push(
                ErrorRecord::mismatch(path, expected_sorted, actual_sorted)
                    .with_note("Arrays do not match"),
            );
        }
    } else if expected != actual {
        unmatched.push(
            ErrorRecord::mismatch(path, expected.to_vec(), actual.to_vec())
                .with_note("Arrays do not match")
                .with_field("hint", "enable sort_lists if element order does not matter"),
        );
    }
}

fn compare_structured_lists(
    actual: &[Value],
    expected: &[Value],
    path: &str,
    config: &CompareConfig,
    unmatched: &mut Vec<ErrorRecord>,
) {
    let mut expected_items = expected.to_vec();
    let mut actual_items = actual.to_vec();
    if config.sort_lists {
        expected_items.sort_by_cached_key(Value::canonical_key);
        actual_items.sort_by_cached_key(Value::canonical_key);
    }

    // A missing actual element compares as an empty string.
    let missing = Value::String(String::new());
    for (i, expected_item) in expected_items.iter().enumerate() {
        let actual_item = actual_items.get(i).unwrap_or(&missing);
        compare_values(actual_item, expected_item, &join_index(path, i), config, unmatched);
    }
}

/// Compares a whole response list against the expected list.
///
/// With `full_list_validation`, items are paired by position. Pairing stops
/// at the shorter list, so surplus items on either side go unreported.
/// Otherwise each expected item is paired with the first actual item whose
/// identity key holds the same value.
///
/// # Errors
///
/// Returns a standalone record when a paired mapping differs in key count,
/// when an item lacks the identity key, or when an expected item is not a
/// mapping in identity mode.
pub fn compare_response_lists(
    actual: &[Value],
    expected: &[Value],
    config: &CompareConfig,
    unmatched: &mut Vec<ErrorRecord>,
) -> Result<(), ErrorRecord> {
    if config.full_list_validation {
        for (i, (actual_item, expected_item)) in actual.iter().zip(expected).enumerate() {
            trace!(index = i, "pairing response items by position");
            compare_items(actual_item, expected_item, i, config, unmatched)?;
        }
        return Ok(());
    }

    let identity_key = config.identity_key.as_str();
    for expected_item in expected {
        let Value::Map(expected_map) = expected_item else {
            return Err(ErrorRecord::fatal(format!(
                "Expected items must be dictionaries to match on '{}'",
                identity_key
            ))
            .with_expected(expected_item.clone()));
        };
        let Some(expected_id) = expected_map.get(identity_key) else {
            return Err(ErrorRecord::fatal("Identity key not found in Expected item")
                .with_key(identity_key)
                .with_expected(expected_item.clone()));
        };

        let mut found = false;
        for actual_item in actual {
            let actual_map = actual_item.as_map();
            let Some(actual_id) = actual_map.and_then(|m| m.get(identity_key)) else {
                return Err(ErrorRecord::fatal("Identity key not found in Actual item")
                    .with_key(identity_key)
                    .with_actual(actual_item.clone()));
            };
            if actual_id == expected_id {
                trace!(identity = %expected_id, "pairing response items by identity key");
                if let Some(actual_map) = actual_map {
                    compare_maps(actual_map, expected_map, config, unmatched)?;
                }
                found = true;
                break;
            }
        }

        if !found {
            unmatched.push(
                ErrorRecord::new()
                    .with_key(identity_key)
                    .with_expected(expected_item.clone())
                    .with_note("Item was not within the response"),
            );
        }
    }
    Ok(())
}

fn compare_items(
    actual: &Value,
    expected: &Value,
    index: usize,
    config: &CompareConfig,
    unmatched: &mut Vec<ErrorRecord>,
) -> Result<(), ErrorRecord> {
    match (actual, expected) {
        (Value::Map(actual_map), Value::Map(expected_map)) => {
            compare_maps(actual_map, expected_map, config, unmatched)
        }
        _ => {
            compare_values(actual, expected, &format!("[{}]", index), config, unmatched);
            Ok(())
        }
    }
}
