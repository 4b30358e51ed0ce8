use crate::types::{Map, Value};
use std::fmt;

/// Line separating report sections and individual records.
pub const DIVIDER: &str = "------------------";

/// Header of an aggregated mismatch report.
pub const MISMATCH_HEADER: &str = "Key(s) Did Not Match:";

/// Closing line of an aggregated mismatch report.
pub const MISMATCH_FOOTER: &str = "Please see differing value(s)";

/// One diagnosed discrepancy, or a standalone failure.
///
/// `key` is the path to the offending value (`a.b.c`, `strawberry[0].dog`).
/// `error` is only set on records that are reported on their own; records
/// accumulated during comparison classify themselves through `note`.
///
/// Two records are equal when their fields are equal; extra fields compare
/// regardless of insertion order. A record also compares equal to a string
/// holding its rendered form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorRecord {
    pub error: Option<String>,
    pub key: Option<String>,
    pub expected: Option<Value>,
    pub actual: Option<Value>,
    pub note: Option<String>,
    pub extra: Map,
}

impl ErrorRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A standalone record carrying a top-level summary message.
    pub fn fatal(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// A plain value mismatch at `key`.
    pub fn mismatch(
        key: impl Into<String>,
        expected: impl Into<Value>,
        actual: impl Into<Value>,
    ) -> Self {
        Self::new()
            .with_key(key)
            .with_expected(expected)
            .with_actual(actual)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<Value>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Attaches a caller-specific field, e.g. `actual_length`.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name, value);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// Renders a field name for the report: names that already start with an
/// uppercase letter are kept, others become `Title Case` with underscores
/// turned into spaces.
pub fn field_label(name: &str) -> String {
    if name.chars().next().is_some_and(char::is_uppercase) {
        return name.to_string();
    }
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut body = Vec::new();
        if let Some(key) = &self.key {
            body.push(format!("Key: {}", key));
        }
        if let Some(expected) = &self.expected {
            body.push(format!("Expected: {}", expected));
        }
        if let Some(actual) = &self.actual {
            body.push(format!("Actual: {}", actual));
        }
        if let Some(note) = &self.note {
            body.push(format!("Note: {}", note));
        }
        for (name, value) in self.extra.iter() {
            body.push(format!("{}: {}", field_label(name), value));
        }

        let mut lines = Vec::new();
        if let Some(error) = &self.error {
            lines.push(format!("Error: {}", error));
            if !body.is_empty() {
                lines.push(DIVIDER.to_string());
            }
        }
        lines.extend(body);
        f.write_str(&lines.join("\n"))
    }
}

impl PartialEq<str> for ErrorRecord {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for ErrorRecord {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<String> for ErrorRecord {
    fn eq(&self, other: &String) -> bool {
        self.to_string() == *other
    }
}

// ─── Terminal failures ──────────────────────────────────────────────────────

/// Why a verification keyword failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// One or more accumulated mismatches.
    Mismatch,
    /// The comparison was aborted on a shape problem.
    Fatal,
    /// The keyword was called with an invalid argument.
    Usage,
}

/// Produced by the verification keywords when the actual value does not
/// satisfy the expected one. `message` is the text handed to the test
/// framework.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationFailure {
    pub kind: FailureKind,
    pub message: String,
    pub records: Vec<ErrorRecord>,
}

impl ValidationFailure {
    /// Aggregates accumulated records into one report.
    pub fn mismatches(records: Vec<ErrorRecord>) -> Self {
        let mut message = String::from(MISMATCH_HEADER);
        for record in &records {
            message.push('\n');
            message.push_str(DIVIDER);
            message.push('\n');
            message.push_str(&record.to_string());
        }
        message.push('\n');
        message.push_str(DIVIDER);
        message.push('\n');
        message.push_str(MISMATCH_FOOTER);
        Self {
            kind: FailureKind::Mismatch,
            message,
            records,
        }
    }

    /// A single record reported on its own.
    pub fn fatal(record: ErrorRecord) -> Self {
        Self {
            kind: FailureKind::Fatal,
            message: record.to_string(),
            records: vec![record],
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        let record = ErrorRecord::fatal(message);
        Self {
            kind: FailureKind::Usage,
            message: record.to_string(),
            records: vec![record],
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationFailure {}

/// Invalid configuration: unknown margin units, malformed margin strings,
/// item counts of the wrong type, or config documents that do not parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}
