//! Structural response verification for API and UI test automation.
//!
//! Test cases describe the response they expect as a nested structure;
//! the keywords in this crate compare it against the actual response and
//! report every difference with a path-qualified key:
//!
//! ```text
//! actual body ─┐
//!              ├─ validate_response ─→ compare_maps / compare_response_lists
//! expected ────┘        │                     │ (dates, lists, nested maps)
//!                       └─ ValidationFailure ←┘ Vec<ErrorRecord>
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use respcheck::{CompareConfig, Value, validate_json};
//!
//! let expected = Value::from(serde_json::json!({
//!     "userId": 1,
//!     "id": 1,
//!     "title": "delectus aut autem",
//!     "completed": true
//! }));
//! let body = r#"{"userId": 1, "id": 1, "title": "delectus aut autem", "completed": false}"#;
//!
//! let failure = validate_json(body, &expected, &CompareConfig::default()).unwrap_err();
//! assert!(failure.message.contains("Key: completed"));
//! assert!(failure.message.contains("Expected: True"));
//! assert!(failure.message.contains("Actual: False"));
//! ```
//!
//! # Date tolerance
//!
//! Expected values that look like ISO 8601 date-times match any actual
//! date-time within the configured [`Margin`] (10 minutes by default):
//!
//! ```rust
//! use respcheck::{CompareConfig, Margin, MarginUnit, Value, validate_response};
//!
//! let expected = Value::from(serde_json::json!({"createdAt": "2024-03-01T12:00:00"}));
//! let actual = Value::from(serde_json::json!({"createdAt": "2024-03-01T12:00:45.123456789Z"}));
//! let config = CompareConfig::default().with_margin(Margin::new(MarginUnit::Minutes, 1));
//!
//! assert!(validate_response(&actual, &expected, &config).is_ok());
//! ```

pub mod compare;
pub mod config;
pub mod dates;
pub mod error;
pub mod lists;
pub mod types;
pub mod validate;

pub use config::{CompareConfig, Margin, MarginUnit};
pub use error::*;
pub use types::*;

// Re-export entry-point functions at the crate root for convenience.
pub use compare::compare_maps;
pub use lists::compare_response_lists;
pub use validate::{
    ItemCount, check_item_count, parse_actual, parse_expected, validate_item_count, validate_json,
    validate_listed_keys, validate_response,
};
