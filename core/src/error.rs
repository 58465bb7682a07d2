//! Error types for the Hedera agent core library
//!
//! Every fallible operation in this crate returns [`Result`]. Errors coming
//! back from the ledger client, the mirror node or the local configuration
//! all end up here, so the plugin layer only has one type to turn into a chat
//! message.

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ledger, configuration and conversion failures
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration could not be loaded or is incomplete
    #[error("Configuration error: {0}")]
    Config(String),

    /// A `shard.realm.num` identifier could not be parsed
    #[error("Invalid entity id '{0}'")]
    InvalidEntityId(String),

    /// Unsupported key type setting
    #[error("Unsupported key type. Must be 'ECDSA' or 'ED25519'.")]
    UnsupportedKeyType(String),

    /// Private key could not be decoded for the configured key type
    #[error("Invalid private key or key type: {0}")]
    InvalidKey(String),

    /// Unknown network name
    #[error("Unsupported network type '{0}'. Must be 'mainnet', 'testnet' or 'previewnet'.")]
    UnsupportedNetwork(String),

    /// Amount cannot be represented in base units
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Date string could not be parsed
    #[error("Invalid date format")]
    InvalidDate(String),

    /// Mirror node answered with a non-success status
    #[error("Mirror node error ({status}): {message}")]
    MirrorNode {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The requested entity does not exist on the ledger
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transaction was submitted but did not succeed
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Ledger client does not implement this operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new invalid entity id error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidEntityId(id.into())
    }

    /// Create a new invalid key error
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create a new invalid amount error
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    /// Create a new transaction error
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// Create a new not supported error
    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::NotSupported(msg.into())
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Check if the error came from the user's settings rather than the ledger
    pub fn is_settings_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::UnsupportedKeyType(_)
                | Self::InvalidKey(_)
                | Self::UnsupportedNetwork(_)
        )
    }

    /// Check if error is transient (network or mirror node 5xx)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::MirrorNode { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::MirrorNode {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            Self::Serialization(format!("Failed to decode mirror node response: {}", err))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<hedera::Error> for Error {
    fn from(err: hedera::Error) -> Self {
        match err {
            hedera::Error::TimedOut(_) | hedera::Error::GrpcStatus(_) => {
                Self::Network(err.to_string())
            }
            other => Self::Transaction(other.to_string()),
        }
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Self::InvalidKey(format!("Hex decoding error: {}", err))
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Self::Serialization(format!("Base64 decoding error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_type_message() {
        let err = Error::UnsupportedKeyType("RSA".into());
        assert_eq!(
            err.to_string(),
            "Unsupported key type. Must be 'ECDSA' or 'ED25519'."
        );
        assert!(err.is_settings_error());
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(Error::network("connection reset").is_recoverable());
        assert!(Error::MirrorNode {
            status: 503,
            message: "unavailable".into()
        }
        .is_recoverable());
        assert!(!Error::MirrorNode {
            status: 404,
            message: "missing".into()
        }
        .is_recoverable());
        assert!(!Error::invalid_id("abc").is_recoverable());
    }
}
