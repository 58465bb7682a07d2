//! Normalization of values extracted by a language model
//!
//! Models frequently answer with sentinel strings instead of JSON literals:
//! `"null"` for a missing value, `"true"`/`"false"` for flags, numbers quoted
//! as strings. These helpers map those shapes onto typed values before
//! parameter validation runs.

use serde_json::Value;

const NULL_SENTINEL: &str = "null";

/// `"null"` becomes `None`, anything else is kept
pub fn cast_to_null(input: &str) -> Option<&str> {
    if input == NULL_SENTINEL {
        None
    } else {
        Some(input)
    }
}

/// `"null"` becomes the empty string, anything else is kept
pub fn cast_to_empty_string(input: &str) -> &str {
    if input == NULL_SENTINEL {
        ""
    } else {
        input
    }
}

/// Case-insensitive `"true"` is true, every other string is false
pub fn cast_to_boolean(input: &str) -> bool {
    input.eq_ignore_ascii_case("true")
}

/// Read a JSON value as a finite number, accepting numeric strings
///
/// Empty and non-numeric strings are rejected instead of becoming `0`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

/// Whether a JSON value is absent-like: `null` or the `"null"` sentinel
pub fn is_null_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => cast_to_null(text).is_none(),
        _ => false,
    }
}
