//! Error types for plugin actions
//!
//! Three kinds of failure reach the chat: a required parameter the model did
//! not supply, model output that fails validation, and anything the ledger
//! reports. The pipeline renders each as `Error during <action>: <message>`.

use crate::schema::ValidationError;

/// Result type alias for action operations
pub type Result<T> = std::result::Result<T, ActionError>;

/// Error raised while running an action
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// A required parameter is empty
    #[error("{0}")]
    MissingParameter(String),

    /// Extracted parameters failed validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Ledger, mirror node or settings failure
    #[error("{0}")]
    Ledger(#[from] hedera_agent_core::Error),

    /// The language model call failed
    #[error("Model error: {0}")]
    Model(String),
}

impl ActionError {
    /// Create a missing parameter error
    pub fn missing(msg: impl Into<String>) -> Self {
        Self::MissingParameter(msg.into())
    }

    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Transient ledger or mirror node failure worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Ledger(err) if err.is_recoverable())
    }

    /// Failure caused by the operator settings
    pub fn is_settings(&self) -> bool {
        matches!(self, Self::Ledger(err) if err.is_settings_error())
    }
}

/// Fail with `message` when `value` is blank
pub(crate) fn require<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ActionError::missing(message))
    } else {
        Ok(trimmed)
    }
}

/// Fail with `message` when `value` is not a positive amount
pub(crate) fn require_amount(value: f64, message: &str) -> Result<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ActionError::missing(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert_eq!(require(" 0.0.1 ", "Missing tokenId").ok(), Some("0.0.1"));
        let err = require("  ", "Missing tokenId").unwrap_err();
        assert_eq!(err.to_string(), "Missing tokenId");
    }

    #[test]
    fn test_require_amount() {
        assert!(require_amount(1.5, "Missing amount").is_ok());
        assert_eq!(
            require_amount(0.0, "Missing amount").unwrap_err().to_string(),
            "Missing amount"
        );
    }

    #[test]
    fn test_ledger_error_passthrough() {
        let err: ActionError = hedera_agent_core::Error::invalid_id("abc").into();
        assert_eq!(err.to_string(), "Invalid entity id 'abc'");
    }

    #[test]
    fn test_classification() {
        let transient: ActionError = hedera_agent_core::Error::network("connection reset").into();
        assert!(transient.is_transient());
        assert!(!transient.is_settings());

        let settings: ActionError = hedera_agent_core::Error::config("missing key").into();
        assert!(settings.is_settings());
        assert!(!ActionError::missing("Missing amount").is_transient());
    }
}
