//! Ledger client construction
//!
//! Actions never build a ledger client themselves. The plugin holds a
//! [`LedgerFactory`] and asks it for a client per invocation, using the
//! credentials resolved from the runtime's settings.

use std::sync::Arc;

use async_trait::async_trait;
use hedera_agent_core::config::MirrorConfig;
use hedera_agent_core::{
    HederaCredentials, LedgerClient, MirrorNodeClient, NetworkLedger, ReadOnlyLedger, Result,
};
use tracing::debug;

/// Builds a ledger client for one set of operator credentials
#[async_trait]
pub trait LedgerFactory: Send + Sync {
    /// Connect on behalf of the operator described by `credentials`
    async fn connect(&self, credentials: &HederaCredentials) -> Result<Arc<dyn LedgerClient>>;

    /// Whether connected clients can submit transactions
    fn signs_transactions(&self) -> bool {
        true
    }
}

/// Factory signing transactions with the operator key through the Hedera SDK
///
/// Queries go to the public mirror node of the operator's network, or to
/// the configured mirror URL.
#[derive(Debug, Clone, Default)]
pub struct NetworkLedgerFactory {
    config: MirrorConfig,
}

impl NetworkLedgerFactory {
    /// Factory using `config` for every mirror connection
    pub fn new(config: MirrorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl LedgerFactory for NetworkLedgerFactory {
    async fn connect(&self, credentials: &HederaCredentials) -> Result<Arc<dyn LedgerClient>> {
        let mirror = MirrorNodeClient::from_config(&self.config, credentials.network)?;
        debug!(
            network = %credentials.network,
            mirror = mirror.base_url(),
            operator = %credentials.account_id,
            "Connected signing ledger"
        );
        Ok(Arc::new(NetworkLedger::new(credentials, mirror)))
    }
}

/// Factory serving queries from the mirror node only
///
/// Transactions are refused with `NotSupported`. Suits hosts that must
/// never move funds.
#[derive(Debug, Clone, Default)]
pub struct MirrorLedgerFactory {
    config: MirrorConfig,
}

impl MirrorLedgerFactory {
    /// Factory using `config` for every connection
    pub fn new(config: MirrorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl LedgerFactory for MirrorLedgerFactory {
    async fn connect(&self, credentials: &HederaCredentials) -> Result<Arc<dyn LedgerClient>> {
        let mirror = MirrorNodeClient::from_config(&self.config, credentials.network)?;
        debug!(
            network = %credentials.network,
            mirror = mirror.base_url(),
            operator = %credentials.account_id,
            "Connected read-only ledger"
        );
        Ok(Arc::new(ReadOnlyLedger::new(mirror)))
    }

    fn signs_transactions(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedera_agent_core::{AccountId, Hbar, HederaSettings, KeyType, PrivateKey};
    use hedera_agent_core::NetworkType;

    fn credentials(network: NetworkType) -> HederaCredentials {
        HederaCredentials {
            account_id: AccountId::new(0, 0, 1001),
            private_key: PrivateKey::from_str_with_type(&"11".repeat(32), KeyType::Ecdsa)
                .unwrap(),
            public_key: None,
            network,
        }
    }

    #[tokio::test]
    async fn test_mirror_factory_is_read_only() {
        let factory = MirrorLedgerFactory::new(MirrorConfig {
            url: Some("http://127.0.0.1:9".into()),
            ..MirrorConfig::default()
        });
        let ledger = factory.connect(&credentials(NetworkType::Testnet)).await.unwrap();

        let err = ledger
            .transfer_hbar(&AccountId::new(0, 0, 2), Hbar::from_tinybars(1))
            .await
            .unwrap_err();
        assert!(matches!(err, hedera_agent_core::Error::NotSupported(_)));
    }

    #[tokio::test]
    async fn test_network_factory_signs() {
        let factory = NetworkLedgerFactory::new(MirrorConfig {
            url: Some("http://127.0.0.1:9".into()),
            ..MirrorConfig::default()
        });
        assert!(factory.signs_transactions());
        assert!(!MirrorLedgerFactory::default().signs_transactions());

        let ledger = factory.connect(&credentials(NetworkType::Testnet)).await.unwrap();
        let err = ledger
            .transfer_token(
                &hedera_agent_core::TokenId::new(0, 0, 77),
                &AccountId::new(0, 0, 2),
                u64::MAX,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, hedera_agent_core::Error::InvalidAmount(_)));
    }

    #[test]
    fn test_settings_resolve_for_factory() {
        let settings = HederaSettings {
            account_id: Some("0.0.1001".into()),
            private_key: Some("11".repeat(32)),
            key_type: Some("ECDSA".into()),
            public_key: None,
            network: Some("previewnet".into()),
        };
        let resolved = settings.resolve().unwrap();
        assert_eq!(resolved.network, NetworkType::Previewnet);
        assert_eq!(resolved.private_key.key_type(), KeyType::Ecdsa);
    }
}
