//! Wallet context provider
//!
//! Hosts call the provider before composing the agent's reply so the model
//! knows which account it controls and how much HBAR it holds.

use tracing::{error, warn};

use crate::client::LedgerFactory;
use crate::runtime::{AgentRuntime, State};

const DEFAULT_AGENT_NAME: &str = "The agent";

/// Describes the operator wallet in one short block of text
#[derive(Debug, Clone, Copy, Default)]
pub struct WalletProvider;

impl WalletProvider {
    /// Address and HBAR balance of the operator account
    ///
    /// Returns `None` when the settings are incomplete or the balance cannot
    /// be fetched.
    pub async fn get(
        &self,
        runtime: &dyn AgentRuntime,
        ledgers: &dyn LedgerFactory,
        state: Option<&State>,
    ) -> Option<String> {
        let settings = runtime.hedera_settings();
        let credentials = match settings.resolve() {
            Ok(credentials) => credentials,
            Err(err) => {
                warn!(error = %err, missing = ?settings.missing_keys(), "Hedera settings unusable");
                return None;
            }
        };

        let balance = match ledgers.connect(&credentials).await {
            Ok(ledger) => ledger.hbar_balance(&credentials.account_id).await,
            Err(err) => Err(err),
        };
        let balance = match balance {
            Ok(balance) => balance,
            Err(err) => {
                error!(error = %err, "Error in Hedera wallet provider");
                return None;
            }
        };

        let agent_name = state
            .and_then(|s| s.agent_name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_AGENT_NAME);

        Some(format!(
            "{}'s Hedera Wallet Address: {}\nBalance: {} HBAR\n",
            agent_name, credentials.account_id, balance
        ))
    }
}
