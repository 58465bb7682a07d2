//! Operator private key decoding
//!
//! The operator key arrives as a hex string in the settings, either as the
//! raw 32-byte scalar or DER encoded. Decoding is delegated to the Hedera
//! SDK for the configured [`KeyType`], which validates the scalar for the
//! curve and derives the public key. The decoded key signs every
//! transaction the operator submits.
//!
//! # Example
//!
//! ```no_run
//! use hedera_agent_core::keypair::PrivateKey;
//! use hedera_agent_core::types::KeyType;
//!
//! let key = PrivateKey::from_str_with_type(
//!     "302e020100300506032b657004220420b3d2f7a5bb4e2c8f5d1e7c3a9b6f0e2d4c8a1b3e5f7d9c0a2b4e6f8a1c3d5e7f",
//!     KeyType::Ed25519,
//! )?;
//! println!("{}", key.public_key());
//! # Ok::<(), hedera_agent_core::Error>(())
//! ```

use std::fmt;

use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::types::KeyType;

/// A decoded operator private key
#[derive(Clone)]
pub struct PrivateKey {
    key_type: KeyType,
    inner: hedera::PrivateKey,
}

impl PrivateKey {
    /// Decode a hex or DER-hex private key of the given type
    pub fn from_str_with_type(input: &str, key_type: KeyType) -> Result<Self> {
        let trimmed = input.trim();
        let hex_str = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(hex::decode(hex_str)?);

        let inner = match key_type {
            KeyType::Ecdsa => hedera::PrivateKey::from_bytes_ecdsa(&bytes),
            KeyType::Ed25519 => hedera::PrivateKey::from_bytes_ed25519(&bytes),
        }
        .map_err(|err| Error::invalid_key(err.to_string()))?;

        let decoded_type = if inner.is_ed25519() {
            KeyType::Ed25519
        } else {
            KeyType::Ecdsa
        };
        if decoded_type != key_type {
            return Err(Error::invalid_key(format!(
                "key is DER encoded as {} but key type is {}",
                decoded_type, key_type
            )));
        }

        Ok(Self { key_type, inner })
    }

    /// Key algorithm
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Matching public key
    pub fn public_key(&self) -> hedera::PublicKey {
        self.inner.public_key()
    }

    /// SDK key used to sign transactions
    pub fn signer(&self) -> &hedera::PrivateKey {
        &self.inner
    }

    /// Raw 32-byte key as hex
    pub fn to_string_raw(&self) -> String {
        self.inner.to_string_raw()
    }

    /// DER encoding as hex
    pub fn to_string_der(&self) -> String {
        self.inner.to_string_der()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key_type", &self.key_type)
            .field("public_key", &self.public_key().to_string_der())
            .field("bytes", &"<redacted>")
            .finish()
    }
}
