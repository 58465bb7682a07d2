//! Core types shared by the ledger client and the plugin actions
//!
//! Identifiers follow the Hedera `shard.realm.num` notation and are parsed
//! from raw strings before they reach a [`LedgerClient`](crate::ledger::LedgerClient).
//! Result envelopes carry the receipt status and the transaction hash the
//! explorer link is built from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::units::Hbar;

/// A `shard.realm.num` ledger entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    /// Shard number
    pub shard: u64,
    /// Realm number
    pub realm: u64,
    /// Entity number
    pub num: u64,
}

impl EntityId {
    /// Create an identifier from its three components
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }
}

impl FromStr for EntityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        // `0.0.123-vfmkw` carries a checksum we do not verify
        let body = trimmed.split_once('-').map_or(trimmed, |(id, _)| id);

        let parts: Vec<&str> = body.split('.').collect();
        if parts.len() != 3 {
            return Err(Error::invalid_id(s));
        }

        let parse = |part: &str| part.parse::<u64>().map_err(|_| Error::invalid_id(s));
        Ok(Self {
            shard: parse(parts[0])?,
            realm: parse(parts[1])?,
            num: parse(parts[2])?,
        })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

macro_rules! entity_id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(pub EntityId);

        impl $name {
            /// Create an identifier from its three components
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self(EntityId::new(shard, realm, num))
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                s.parse().map(Self)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id_type!(
    /// Account identifier (`0.0.1234`)
    AccountId
);
entity_id_type!(
    /// HTS token identifier
    TokenId
);
entity_id_type!(
    /// HCS topic identifier
    TopicId
);

/// Hedera network the agent operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Production network
    Mainnet,
    /// Public test network
    Testnet,
    /// Preview network
    Previewnet,
}

impl NetworkType {
    /// Lowercase network name as used in explorer URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => "mainnet",
            NetworkType::Testnet => "testnet",
            NetworkType::Previewnet => "previewnet",
        }
    }

    /// Public mirror node REST base URL
    pub fn mirror_node_url(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => "https://mainnet.mirrornode.hedera.com",
            NetworkType::Testnet => "https://testnet.mirrornode.hedera.com",
            NetworkType::Previewnet => "https://previewnet.mirrornode.hedera.com",
        }
    }

    /// Hashscan link for a transaction
    pub fn hashscan_tx_url(&self, tx_hash: &str) -> String {
        format!("https://hashscan.io/{}/tx/{}", self.as_str(), tx_hash)
    }

    /// Hashscan link for a topic
    pub fn hashscan_topic_url(&self, topic_id: &TopicId) -> String {
        format!("https://hashscan.io/{}/topic/{}", self.as_str(), topic_id)
    }
}

impl Default for NetworkType {
    fn default() -> Self {
        NetworkType::Testnet
    }
}

impl FromStr for NetworkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(NetworkType::Mainnet),
            "testnet" => Ok(NetworkType::Testnet),
            "previewnet" => Ok(NetworkType::Previewnet),
            _ => Err(Error::UnsupportedNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Private key algorithm of the operator account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyType {
    /// ECDSA over secp256k1
    Ecdsa,
    /// Ed25519
    Ed25519,
}

impl FromStr for KeyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "ECDSA" => Ok(KeyType::Ecdsa),
            "ED25519" => Ok(KeyType::Ed25519),
            _ => Err(Error::UnsupportedKeyType(s.to_string())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Ecdsa => f.write_str("ECDSA"),
            KeyType::Ed25519 => f.write_str("ED25519"),
        }
    }
}

/// Receipt status of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TxStatus {
    /// `SUCCESS`
    Success,
    /// Any other receipt status, kept verbatim
    Other(String),
}

impl TxStatus {
    /// Whether the receipt reported `SUCCESS`
    pub fn is_success(&self) -> bool {
        matches!(self, TxStatus::Success)
    }
}

impl From<String> for TxStatus {
    fn from(value: String) -> Self {
        if value == "SUCCESS" {
            TxStatus::Success
        } else {
            TxStatus::Other(value)
        }
    }
}

impl From<TxStatus> for String {
    fn from(status: TxStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStatus::Success => f.write_str("SUCCESS"),
            TxStatus::Other(status) => f.write_str(status),
        }
    }
}

fn ensure_status(status: &TxStatus) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::transaction(format!(
            "transaction finished with status {}",
            status
        )))
    }
}

/// Outcome of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    /// Receipt status
    pub status: TxStatus,
    /// Transaction id/hash used in explorer links
    pub tx_hash: String,
}

impl TransactionResult {
    /// A successful result for `tx_hash`
    pub fn success(tx_hash: impl Into<String>) -> Self {
        Self {
            status: TxStatus::Success,
            tx_hash: tx_hash.into(),
        }
    }

    /// Fail unless the receipt status is `SUCCESS`
    pub fn ensure_success(self) -> Result<Self> {
        ensure_status(&self.status)?;
        Ok(self)
    }
}

/// Outcome of a token creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenResult {
    /// Receipt status
    pub status: TxStatus,
    /// Transaction hash
    pub tx_hash: String,
    /// Id of the new token
    pub token_id: TokenId,
}

impl CreateTokenResult {
    /// Fail unless the receipt status is `SUCCESS`
    pub fn ensure_success(self) -> Result<Self> {
        ensure_status(&self.status)?;
        Ok(self)
    }
}

/// Outcome of a topic creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicResult {
    /// Receipt status
    pub status: TxStatus,
    /// Transaction hash
    pub tx_hash: String,
    /// Id of the new topic
    pub topic_id: TopicId,
}

impl CreateTopicResult {
    /// Fail unless the receipt status is `SUCCESS`
    pub fn ensure_success(self) -> Result<Self> {
        ensure_status(&self.status)?;
        Ok(self)
    }
}

/// Parameters for a fungible token creation, amounts in base units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFtOptions {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Number of decimals
    pub decimals: u32,
    /// Initial supply in base units
    pub initial_supply: u64,
    /// Attach a supply key so more tokens can be minted
    pub is_supply_key: bool,
    /// Attach a metadata key
    pub is_metadata_key: bool,
    /// Attach an admin key
    pub is_admin_key: bool,
    /// Token metadata bytes
    pub token_metadata: Vec<u8>,
    /// Token memo
    pub memo: String,
}

/// Parameters for a non-fungible token creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNftOptions {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Maximum number of serials, infinite when `None`
    pub max_supply: Option<u64>,
    /// Attach a metadata key
    pub is_metadata_key: bool,
    /// Attach an admin key
    pub is_admin_key: bool,
    /// Token metadata bytes
    pub token_metadata: Vec<u8>,
    /// Token memo
    pub memo: String,
}

/// One leg of an airdrop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropRecipient {
    /// Receiving account
    pub account_id: AccountId,
    /// Amount in base units
    pub amount: u64,
}

/// Identifies one pending airdrop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAirdropId {
    /// Account that sent the airdrop
    pub sender_id: AccountId,
    /// Account that may claim it
    pub receiver_id: AccountId,
    /// Airdropped token
    pub token_id: TokenId,
}

/// Asset covered by a spending allowance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum AllowanceAsset {
    /// HBAR allowance
    Hbar {
        /// Allowed amount
        amount: Hbar,
    },
    /// Fungible token allowance
    Token {
        /// Token the allowance applies to
        token_id: TokenId,
        /// Allowed amount in base units
        amount: u64,
    },
}
