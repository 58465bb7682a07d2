//! Validation of model-extracted parameter objects
//!
//! Model output is untrusted. [`ObjectReader`] reads one field at a time,
//! applies the normalization helpers from `hedera_agent_core::normalize`, and
//! records a [`FieldIssue`] for every field with the wrong shape. A parameter
//! struct is only built when no issue was recorded.
//!
//! # Example
//!
//! ```
//! use hedera_agent_plugin::schema::ObjectReader;
//! use serde_json::json;
//!
//! let value = json!({ "tokenId": "0.0.42", "amount": "12.5" });
//! let mut reader = ObjectReader::new(&value);
//! let token_id = reader.string("tokenId");
//! let amount = reader.number("amount");
//! reader.finish().unwrap();
//!
//! assert_eq!(token_id, "0.0.42");
//! assert_eq!(amount, 12.5);
//! ```

use std::fmt;

use hedera_agent_core::normalize::{cast_to_boolean, cast_to_empty_string, coerce_number, is_null_like};
use serde_json::{Map, Value};

/// One field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// JSON field name
    pub field: String,
    /// What was wrong with it
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field \"{}\" failed validation: {}", self.field, self.message)
    }
}

/// All issues found in one extracted object
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationError {
    /// Issues in field order
    pub issues: Vec<FieldIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Validation failed: {}", joined)
    }
}

/// Parameters an action extracts from model output
pub trait ActionParams: Sized + fmt::Debug + Send {
    /// Validate and type a model-extracted object
    fn parse(value: &Value) -> Result<Self, ValidationError>;
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Field-by-field reader collecting validation issues
pub struct ObjectReader<'a> {
    object: Option<&'a Map<String, Value>>,
    issues: Vec<FieldIssue>,
}

impl<'a> ObjectReader<'a> {
    /// Start reading `value`, which must be a JSON object
    pub fn new(value: &'a Value) -> Self {
        let mut issues = Vec::new();
        let object = value.as_object();
        if object.is_none() {
            issues.push(FieldIssue {
                field: "(root)".to_string(),
                message: format!("expected object, received {}", type_name(value)),
            });
        }
        Self { object, issues }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.object.and_then(|o| o.get(field))
    }

    fn issue(&mut self, field: &str, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn mismatch(&mut self, field: &str, expected: &str, value: &Value) {
        let message = format!("expected {}, received {}", expected, type_name(value));
        self.issue(field, message);
    }

    /// Required string
    pub fn string(&mut self, field: &str) -> String {
        match self.get(field) {
            Some(Value::String(text)) => text.clone(),
            None | Some(Value::Null) => {
                self.issue(field, "Required");
                String::new()
            }
            Some(other) => {
                self.mismatch(field, "string", other);
                String::new()
            }
        }
    }

    /// Optional string where `null` and `"null"` mean absent
    pub fn nullable_string(&mut self, field: &str) -> Option<String> {
        match self.get(field) {
            None => None,
            Some(value) if is_null_like(value) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => {
                self.mismatch(field, "string", other);
                None
            }
        }
    }

    /// Optional string where `null` and `"null"` become the empty string
    pub fn string_or_empty(&mut self, field: &str) -> String {
        match self.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => cast_to_empty_string(text).to_string(),
            Some(other) => {
                self.mismatch(field, "string", other);
                String::new()
            }
        }
    }

    /// Required number, numeric strings accepted
    pub fn number(&mut self, field: &str) -> f64 {
        match self.get(field) {
            None | Some(Value::Null) => {
                self.issue(field, "Required");
                0.0
            }
            Some(value) => match coerce_number(value) {
                Some(number) => number,
                None => {
                    self.mismatch(field, "number", value);
                    0.0
                }
            },
        }
    }

    /// Optional number where `null` and `"null"` mean absent
    pub fn optional_number(&mut self, field: &str) -> Option<f64> {
        match self.get(field) {
            None => None,
            Some(value) if is_null_like(value) => None,
            Some(value) => match coerce_number(value) {
                Some(number) => Some(number),
                None => {
                    self.mismatch(field, "number", value);
                    None
                }
            },
        }
    }

    /// Flag: booleans pass through, strings go through `cast_to_boolean`,
    /// absent and `null` are false
    pub fn boolean(&mut self, field: &str) -> bool {
        match self.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => cast_to_boolean(text),
            Some(other) => {
                self.mismatch(field, "boolean", other);
                false
            }
        }
    }

    /// Required array of strings
    pub fn string_array(&mut self, field: &str) -> Vec<String> {
        match self.get(field) {
            None | Some(Value::Null) => {
                self.issue(field, "Required");
                Vec::new()
            }
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match item {
                        Value::String(text) => out.push(text.clone()),
                        other => {
                            let path = format!("{}.{}", field, index);
                            self.mismatch(&path, "string", other);
                        }
                    }
                }
                out
            }
            Some(other) => {
                self.mismatch(field, "array", other);
                Vec::new()
            }
        }
    }

    /// Fail if any field was invalid
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_valid_object() {
        let value = json!({
            "name": "MyToken",
            "decimals": "8",
            "isSupplyKey": "TRUE",
            "memo": "null",
            "maxSupply": "null",
            "recipients": ["0.0.1", "0.0.2"]
        });
        let mut reader = ObjectReader::new(&value);

        assert_eq!(reader.string("name"), "MyToken");
        assert_eq!(reader.number("decimals"), 8.0);
        assert!(reader.boolean("isSupplyKey"));
        assert!(!reader.boolean("isAdminKey"));
        assert_eq!(reader.string_or_empty("memo"), "");
        assert_eq!(reader.optional_number("maxSupply"), None);
        assert_eq!(reader.nullable_string("tokenMetadata"), None);
        assert_eq!(reader.string_array("recipients"), vec!["0.0.1", "0.0.2"]);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_null_sentinel_becomes_none() {
        let value = json!({ "tokenId": "null" });
        let mut reader = ObjectReader::new(&value);
        assert_eq!(reader.nullable_string("tokenId"), None);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_collects_every_issue() {
        let value = json!({ "amount": "lots", "accountId": 42, "recipients": ["0.0.1", 7] });
        let mut reader = ObjectReader::new(&value);
        reader.number("amount");
        reader.string("accountId");
        reader.string("tokenId");
        reader.string_array("recipients");

        let err = reader.finish().unwrap_err();
        assert_eq!(err.issues.len(), 4);
        assert_eq!(
            err.to_string(),
            "Validation failed: Field \"amount\" failed validation: expected number, received string, \
             Field \"accountId\" failed validation: expected string, received number, \
             Field \"tokenId\" failed validation: Required, \
             Field \"recipients.1\" failed validation: expected string, received number"
        );
    }

    #[test]
    fn test_rejects_non_object() {
        let value = json!(["not", "an", "object"]);
        let mut reader = ObjectReader::new(&value);
        reader.string("tokenId");
        let err = reader.finish().unwrap_err();
        assert_eq!(err.issues[0].field, "(root)");
        assert_eq!(err.issues[0].message, "expected object, received array");
    }

    #[test]
    fn test_boolean_rejects_numbers() {
        let value = json!({ "isSubmitKey": 1 });
        let mut reader = ObjectReader::new(&value);
        assert!(!reader.boolean("isSubmitKey"));
        assert!(reader.finish().is_err());
    }
}
