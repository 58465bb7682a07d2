//! Hedera Agent Core Library
//!
//! Ledger-facing building blocks for the Hedera agent plugin: typed entity
//! identifiers, display/base unit conversion, normalization of values
//! extracted by a language model, operator configuration, and the
//! [`LedgerClient`] seam the plugin's actions delegate to.
//!
//! # Features
//!
//! - **Typed identifiers**: `AccountId`, `TokenId`, `TopicId` parsed from `shard.realm.num`
//! - **Unit conversion**: `base = display × 10^decimals`, HBAR/tinybar arithmetic
//! - **Normalization**: `"null"`/`"true"` sentinels mapped onto real values
//! - **Mirror node client**: balances, token details, airdrops and topics over REST
//! - **Signing client**: transactions submitted through the Hedera SDK with the operator key
//! - **Configuration**: YAML/JSON files overlaid by runtime settings
//!
//! # Quick Start
//!
//! ```no_run
//! use hedera_agent_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = PluginConfig::from_file("config.yaml")?
//!         .with_settings(|key| std::env::var(key).ok());
//!     let credentials = config.validate()?;
//!
//!     let mirror = MirrorNodeClient::from_config(&config.mirror, credentials.network)?;
//!     let balance = mirror.hbar_balance(&credentials.account_id).await?;
//!     println!("Balance: {} HBAR", balance);
//!
//!     let token: TokenId = "0.0.5424086".parse()?;
//!     let amount = mirror.to_base_units(&token, 10.0).await?;
//!     println!("10 tokens = {} base units", amount);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

pub mod config;
pub mod error;
pub mod keypair;
pub mod ledger;
pub mod mirror;
pub mod network;
pub mod normalize;
pub mod time;
pub mod types;
pub mod units;

// Re-exports for convenience
pub use config::{HederaCredentials, HederaSettings, PluginConfig};
pub use error::{Error, Result};
pub use keypair::PrivateKey;
pub use ledger::{LedgerClient, MirrorQueries, ReadOnlyLedger};
pub use mirror::MirrorNodeClient;
pub use network::NetworkLedger;
pub use types::{AccountId, KeyType, NetworkType, TokenId, TopicId, TransactionResult, TxStatus};
pub use units::Hbar;

/// Prelude module for easy importing of common types
pub mod prelude {
    pub use super::{
        AccountId, Error, Hbar, HederaCredentials, HederaSettings, KeyType, LedgerClient,
        MirrorNodeClient, MirrorQueries, NetworkLedger, NetworkType, PluginConfig, PrivateKey,
        ReadOnlyLedger, Result, TokenId, TopicId, TransactionResult, TxStatus,
    };
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Library name
pub const NAME: &str = "hedera-agent-core";
