//! Verification keywords: the entry points a test calls with a response
//! body and an expected structure.
//!
//! Every keyword returns `Ok(())` on success and a [`ValidationFailure`]
//! whose `message` is meant to be handed to the test framework's fail
//! mechanism.

use crate::compare::compare_maps;
use crate::config::CompareConfig;
use crate::error::*;
use crate::lists::compare_response_lists;
use crate::types::{Map, Repr, Value};
use std::str::FromStr;
use tracing::debug;

const EMPTY_RESPONSE: &str = "The Actual Response is Empty.";

fn empty_response() -> ValidationFailure {
    ValidationFailure::fatal(ErrorRecord::fatal(EMPTY_RESPONSE))
}

fn finish(unmatched: Vec<ErrorRecord>) -> Result<(), ValidationFailure> {
    debug!(mismatches = unmatched.len(), "validation finished");
    if unmatched.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure::mismatches(unmatched))
    }
}

/// Deserializes a serialized JSON response body.
///
/// # Errors
///
/// Fails with `"The Actual Response is Empty."` for blank input and with a
/// standalone record when the text is not JSON.
pub fn parse_actual(payload: &str) -> Result<Value, ValidationFailure> {
    if payload.trim().is_empty() {
        return Err(empty_response());
    }
    serde_json::from_str::<serde_json::Value>(payload)
        .map(Value::from)
        .map_err(|e| {
            ValidationFailure::fatal(
                ErrorRecord::fatal("The Actual Response is not valid JSON")
                    .with_actual(payload)
                    .with_field("reason", e.to_string()),
            )
        })
}

/// Loads an expected structure authored as YAML or JSON text.
pub fn parse_expected(input: &str) -> Result<Value, ConfigError> {
    serde_saphyr::from_str::<serde_json::Value>(input)
        .map(Value::from)
        .map_err(|e| ConfigError::new(format!("invalid expected structure: {}", e)))
}

/// [`validate_response`] on a serialized JSON body.
pub fn validate_json(
    actual: &str,
    expected: &Value,
    config: &CompareConfig,
) -> Result<(), ValidationFailure> {
    let actual = parse_actual(actual)?;
    validate_response(&actual, expected, config)
}

/// Validates a response body against an expected structure.
///
/// A mapping response is compared key by key; a list response is compared
/// by identity key, or by position when `full_list_validation` is set. An
/// empty response fails regardless of what was expected.
///
/// # Errors
///
/// Returns an aggregated [`FailureKind::Mismatch`] report when any values
/// differ, or a [`FailureKind::Fatal`] report when the comparison could not
/// proceed (empty response, shape or length mismatch, missing identity key).
pub fn validate_response(
    actual: &Value,
    expected: &Value,
    config: &CompareConfig,
) -> Result<(), ValidationFailure> {
    debug!(
        actual_type = actual.type_name(),
        expected_type = expected.type_name(),
        "validating response"
    );

    if actual.is_empty() {
        return Err(empty_response());
    }

    let mut unmatched = Vec::new();
    match actual {
        Value::Map(actual_map) => {
            if actual == expected {
                return Ok(());
            }
            let Value::Map(expected_map) = expected else {
                return Err(shape_mismatch("a dictionary", expected));
            };
            compare_maps(actual_map, expected_map, config, &mut unmatched)
                .map_err(ValidationFailure::fatal)?;
        }
        Value::List(actual_items) => {
            let Value::List(expected_items) = expected else {
                return Err(shape_mismatch("a list", expected));
            };
            debug!(
                full_list_validation = config.full_list_validation,
                identity_key = %config.identity_key,
                actual_items = actual_items.len(),
                expected_items = expected_items.len(),
                "validating response list"
            );
            compare_response_lists(actual_items, expected_items, config, &mut unmatched)
                .map_err(ValidationFailure::fatal)?;
        }
        other => {
            return Err(ValidationFailure::fatal(
                ErrorRecord::fatal("The Actual Response is not a list or dictionary")
                    .with_actual(other.clone()),
            ));
        }
    }

    finish(unmatched)
}

fn shape_mismatch(actual_shape: &str, expected: &Value) -> ValidationFailure {
    ValidationFailure::fatal(
        ErrorRecord::fatal(format!(
            "The Actual Response is {} but the Expected structure is a {}",
            actual_shape,
            expected.type_name()
        ))
        .with_expected(expected.clone()),
    )
}

/// Validates only `keys`: each must be present in the actual mapping and
/// equal to the expected value. No recursion and no date tolerance.
///
/// For list payloads the first element is checked.
pub fn validate_listed_keys<S: AsRef<str>>(
    actual: &Value,
    expected: &Value,
    keys: &[S],
) -> Result<(), ValidationFailure> {
    let actual_map = first_map(actual, "Actual")?;
    let expected_map = first_map(expected, "Expected")?;

    let mut unmatched = Vec::new();
    for key in keys {
        let key = key.as_ref();
        let Some(actual_value) = actual_map.get(key) else {
            unmatched.push(
                ErrorRecord::new()
                    .with_key(key)
                    .with_actual(actual_map.clone())
                    .with_note("Key not found in Actual"),
            );
            continue;
        };
        let Some(expected_value) = expected_map.get(key) else {
            unmatched.push(
                ErrorRecord::new()
                    .with_key(key)
                    .with_expected(expected_map.clone())
                    .with_note("Key not found in Expected"),
            );
            continue;
        };
        if actual_value != expected_value {
            unmatched.push(ErrorRecord::mismatch(
                key,
                expected_value.clone(),
                actual_value.clone(),
            ));
        }
    }

    finish(unmatched)
}

fn first_map<'a>(value: &'a Value, side: &str) -> Result<&'a Map, ValidationFailure> {
    let candidate = match value {
        Value::List(items) => items.first(),
        other => Some(other),
    };
    match candidate {
        Some(Value::Map(m)) if !m.is_empty() => Ok(m),
        Some(v) if !v.is_empty() => Err(ValidationFailure::fatal(
            ErrorRecord::fatal(format!("The {} value is not a dictionary", side))
                .with_field(side.to_lowercase(), v.clone()),
        )),
        _ if side == "Actual" => Err(empty_response()),
        _ => Err(ValidationFailure::usage("The Expected value is empty")),
    }
}

// ─── Item count ─────────────────────────────────────────────────────────────

/// Expected number of items in a list response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemCount {
    /// Skip the count check.
    Ignore,
    Exactly(usize),
}

impl From<usize> for ItemCount {
    fn from(n: usize) -> Self {
        ItemCount::Exactly(n)
    }
}

/// Accepts a non-negative integer or the string `"IGNORE"` in any case.
impl TryFrom<&Value> for ItemCount {
    type Error = ConfigError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(ItemCount::Exactly)
                .ok_or_else(|| {
                    ConfigError::new(format!(
                        "item count must be a non-negative integer, got {}",
                        n
                    ))
                }),
            Value::String(s) if s.eq_ignore_ascii_case("IGNORE") => Ok(ItemCount::Ignore),
            other => Err(ConfigError::new(format!(
                "item count must be an integer or 'IGNORE', got {} {}",
                other.type_name(),
                Repr(other)
            ))),
        }
    }
}

/// Accepts decimal digits or `"IGNORE"` in any case, as read from a test
/// data file or command line.
impl FromStr for ItemCount {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("IGNORE") {
            return Ok(ItemCount::Ignore);
        }
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::new(format!(
                "item count must be an integer or 'IGNORE', got '{}'",
                s
            )));
        }
        trimmed
            .parse::<usize>()
            .map(ItemCount::Exactly)
            .map_err(|e| ConfigError::new(format!("invalid item count '{}': {}", s, e)))
    }
}

/// Keyword form of [`check_item_count`]: `expected_count` is an integer or
/// `"IGNORE"`; anything else is a usage error.
pub fn validate_item_count(
    actual: &Value,
    expected_count: &Value,
) -> Result<(), ValidationFailure> {
    let count =
        ItemCount::try_from(expected_count).map_err(|e| ValidationFailure::usage(e.message))?;
    check_item_count(actual, count)
}

/// Fails unless `actual` is a list with exactly the expected number of items.
pub fn check_item_count(actual: &Value, count: ItemCount) -> Result<(), ValidationFailure> {
    let ItemCount::Exactly(expected) = count else {
        debug!("item count check ignored");
        return Ok(());
    };
    let Value::List(items) = actual else {
        return Err(ValidationFailure::fatal(
            ErrorRecord::fatal("The Actual Response is not a list")
                .with_actual(actual.clone()),
        ));
    };
    if items.len() != expected {
        return Err(ValidationFailure::fatal(
            ErrorRecord::fatal("Item count did not match")
                .with_expected(expected)
                .with_actual(items.len()),
        ));
    }
    Ok(())
}
