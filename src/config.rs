//! Comparison configuration threaded through every recursive call.
//!
//! A [`CompareConfig`] can be built in code or loaded from a YAML/JSON
//! document:
//!
//! ```rust
//! let config = respcheck::CompareConfig::from_yaml(
//!     "ignored_keys: [updatedAt]\nsort_lists: true\nmargin_type: seconds\nmargin_amt: 30\n",
//! )
//! .expect("valid config");
//! assert!(config.is_ignored("updatedAt"));
//! ```

use crate::error::ConfigError;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ─── MarginUnit ─────────────────────────────────────────────────────────────

/// Unit of a date tolerance window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MarginUnit {
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl MarginUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarginUnit::Microseconds => "microseconds",
            MarginUnit::Milliseconds => "milliseconds",
            MarginUnit::Seconds => "seconds",
            MarginUnit::Minutes => "minutes",
            MarginUnit::Hours => "hours",
            MarginUnit::Days => "days",
            MarginUnit::Weeks => "weeks",
        }
    }
}

/// Accepts the unit keyword in singular or plural form, case-insensitive.
impl FromStr for MarginUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        match singular {
            "microsecond" => Ok(MarginUnit::Microseconds),
            "millisecond" => Ok(MarginUnit::Milliseconds),
            "second" => Ok(MarginUnit::Seconds),
            "minute" => Ok(MarginUnit::Minutes),
            "hour" => Ok(MarginUnit::Hours),
            "day" => Ok(MarginUnit::Days),
            "week" => Ok(MarginUnit::Weeks),
            _ => Err(ConfigError::new(format!(
                "unknown margin unit: '{}' (expected one of microseconds, milliseconds, \
                 seconds, minutes, hours, days, weeks)",
                s
            ))),
        }
    }
}

impl TryFrom<String> for MarginUnit {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MarginUnit> for String {
    fn from(unit: MarginUnit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for MarginUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Margin ─────────────────────────────────────────────────────────────────

/// Tolerance window for date-time equivalence: two timestamps match when
/// they are at most `amount` `unit`s apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    #[serde(rename = "margin_type")]
    pub unit: MarginUnit,
    #[serde(rename = "margin_amt")]
    pub amount: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            unit: MarginUnit::Minutes,
            amount: 10,
        }
    }
}

impl Margin {
    pub fn new(unit: MarginUnit, amount: u32) -> Self {
        Self { unit, amount }
    }

    /// Builds a margin from a unit keyword, failing fast on unknown units.
    pub fn from_parts(unit: &str, amount: u32) -> Result<Self, ConfigError> {
        Ok(Self::new(unit.parse()?, amount))
    }

    pub fn to_duration(&self) -> TimeDelta {
        let n = i64::from(self.amount);
        let delta = match self.unit {
            MarginUnit::Microseconds => Some(TimeDelta::microseconds(n)),
            MarginUnit::Milliseconds => TimeDelta::try_milliseconds(n),
            MarginUnit::Seconds => TimeDelta::try_seconds(n),
            MarginUnit::Minutes => TimeDelta::try_minutes(n),
            MarginUnit::Hours => TimeDelta::try_hours(n),
            MarginUnit::Days => TimeDelta::try_days(n),
            MarginUnit::Weeks => TimeDelta::try_weeks(n),
        };
        delta.unwrap_or(TimeDelta::MAX)
    }

    /// Parses a margin from text.
    ///
    /// Accepted: `10 minutes`, `1 hour`, shorthand `30s`, `5m`, `1h`, `2d`,
    /// and ISO 8601 `PT30S`, `PT5M`, `P1DT12H30M15S`.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ConfigError::new("empty margin string"));
        }

        if let Some((amount, unit)) = input.split_once(char::is_whitespace) {
            let amount = parse_amount(amount, input)?;
            return Self::from_parts(unit.trim(), amount);
        }

        if input.starts_with('P') {
            parse_iso_margin(input)
        } else {
            parse_shorthand_margin(input)
        }
    }
}

impl FromStr for Margin {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Margin::parse(s)
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit)
    }
}

fn parse_amount(num_str: &str, input: &str) -> Result<u32, ConfigError> {
    num_str
        .parse()
        .map_err(|_| ConfigError::new(format!("invalid margin: '{}'", input)))
}

fn parse_shorthand_margin(input: &str) -> Result<Margin, ConfigError> {
    if input.len() < 2 {
        return Err(ConfigError::new(format!(
            "invalid shorthand margin: '{}'",
            input
        )));
    }

    // Split before the last character safely (handles multi-byte chars)
    let split_pos = input
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0);
    let (num_str, unit) = input.split_at(split_pos);
    let amount = parse_amount(num_str, input)?;

    let unit = match unit {
        "s" => MarginUnit::Seconds,
        "m" => MarginUnit::Minutes,
        "h" => MarginUnit::Hours,
        "d" => MarginUnit::Days,
        "w" => MarginUnit::Weeks,
        _ => {
            return Err(ConfigError::new(format!(
                "unknown margin unit: '{}'",
                unit
            )));
        }
    };
    Ok(Margin::new(unit, amount))
}

/// ISO 8601 durations collapse to whole seconds.
fn parse_iso_margin(input: &str) -> Result<Margin, ConfigError> {
    let invalid = || ConfigError::new(format!("invalid ISO margin: '{}'", input));
    let too_large = || ConfigError::new(format!("margin value too large: '{}'", input));

    let rest = &input[1..];
    let (date_part, time_part) = match rest.find('T') {
        Some(t_pos) => (&rest[..t_pos], Some(&rest[t_pos + 1..])),
        None => (rest, None),
    };
    if date_part.is_empty() && time_part.is_none() {
        return Err(invalid());
    }

    let mut total_secs: u64 = 0;
    let mut add = |num_str: &str, scale: u64| -> Result<(), ConfigError> {
        let n: u64 = num_str.parse().map_err(|_| invalid())?;
        total_secs = n
            .checked_mul(scale)
            .and_then(|v| total_secs.checked_add(v))
            .ok_or_else(too_large)?;
        Ok(())
    };

    if !date_part.is_empty() {
        let num_str = date_part.strip_suffix('D').ok_or_else(invalid)?;
        add(num_str, 86_400)?;
    }

    if let Some(time) = time_part {
        if time.is_empty() {
            return Err(invalid());
        }
        let mut remaining = time;
        for (designator, scale) in [('H', 3_600), ('M', 60), ('S', 1)] {
            if let Some(pos) = remaining.find(designator) {
                add(&remaining[..pos], scale)?;
                remaining = &remaining[pos + 1..];
            }
        }
        if !remaining.is_empty() {
            return Err(invalid());
        }
    }

    let amount = u32::try_from(total_secs).map_err(|_| too_large())?;
    Ok(Margin::new(MarginUnit::Seconds, amount))
}

// ─── CompareConfig ──────────────────────────────────────────────────────────

/// Options for one comparison. Immutable once a validation starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Keys skipped wherever they appear.
    pub ignored_keys: BTreeSet<String>,
    /// Lists must match element-for-element instead of by identity key.
    pub full_list_validation: bool,
    /// Field pairing items of top-level response lists.
    pub identity_key: String,
    /// Sort list copies before comparing them.
    pub sort_lists: bool,
    #[serde(flatten)]
    pub margin: Margin,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            ignored_keys: BTreeSet::new(),
            full_list_validation: false,
            identity_key: "id".to_string(),
            sort_lists: false,
            margin: Margin::default(),
        }
    }
}

impl CompareConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from YAML (or JSON) text. Missing fields take
    /// their defaults.
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(input)
            .map_err(|e| ConfigError::new(format!("invalid comparison config: {}", e)))
    }

    pub fn with_ignored_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_full_list_validation(mut self, enabled: bool) -> Self {
        self.full_list_validation = enabled;
        self
    }

    pub fn with_identity_key(mut self, key: impl Into<String>) -> Self {
        self.identity_key = key.into();
        self
    }

    pub fn with_sort_lists(mut self, enabled: bool) -> Self {
        self.sort_lists = enabled;
        self
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored_keys.contains(key)
    }
}
