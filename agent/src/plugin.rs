//! Plugin registration surface
//!
//! [`HederaPlugin`] bundles every action with the wallet provider and the
//! ledger factory the actions run against. Hosts either hand
//! [`HederaPlugin::actions`] to their own selector or call
//! [`HederaPlugin::dispatch`] with a name the model picked.
//!
//! # Example
//!
//! ```no_run
//! use hedera_agent_plugin::prelude::*;
//!
//! # async fn demo(runtime: &dyn AgentRuntime) {
//! let plugin = HederaPlugin::new();
//! let message = Memory::user("Show me my pending airdrops");
//! let mut state = State::for_agent("Hedy");
//! state.push(message.clone());
//!
//! let callback = CollectingCallback::new();
//! let handled = plugin
//!     .dispatch("GET_AIRDROPS", runtime, &message, &mut state, Some(&callback))
//!     .await;
//! println!("handled: {:?}", handled);
//! # }
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use crate::actions::{all_actions, Invocation, PluginAction};
use crate::client::{LedgerFactory, NetworkLedgerFactory};
use crate::provider::WalletProvider;
use crate::runtime::{AgentRuntime, HandlerCallback, Memory, State};

/// Plugin name
pub const PLUGIN_NAME: &str = "Hedera";
/// Plugin description
pub const PLUGIN_DESCRIPTION: &str = "Hedera blockchain integration plugin";

/// The Hedera plugin: actions, wallet provider and ledger access
pub struct HederaPlugin {
    actions: Vec<Box<dyn PluginAction>>,
    provider: WalletProvider,
    ledgers: Arc<dyn LedgerFactory>,
}

impl HederaPlugin {
    /// Plugin signing with the operator key and reading from the public
    /// mirror node of the operator's network
    pub fn new() -> Self {
        Self::with_ledgers(Arc::new(NetworkLedgerFactory::default()))
    }

    /// Plugin using `ledgers` to connect on every invocation
    pub fn with_ledgers(ledgers: Arc<dyn LedgerFactory>) -> Self {
        Self {
            actions: all_actions(),
            provider: WalletProvider,
            ledgers,
        }
    }

    /// Plugin name
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Plugin description
    pub fn description(&self) -> &'static str {
        PLUGIN_DESCRIPTION
    }

    /// Registered actions in catalogue order
    pub fn actions(&self) -> &[Box<dyn PluginAction>] {
        &self.actions
    }

    /// Ledger factory shared by all actions
    pub fn ledgers(&self) -> &dyn LedgerFactory {
        self.ledgers.as_ref()
    }

    /// Find an action by name or simile, ignoring case
    pub fn find(&self, name: &str) -> Option<&dyn PluginAction> {
        let name = name.trim();
        self.actions
            .iter()
            .find(|action| action.name().eq_ignore_ascii_case(name))
            .or_else(|| {
                self.actions.iter().find(|action| {
                    action
                        .similes()
                        .iter()
                        .any(|simile| simile.eq_ignore_ascii_case(name))
                })
            })
            .map(|action| action.as_ref())
    }

    /// Wallet description for the agent's context
    pub async fn wallet_context(
        &self,
        runtime: &dyn AgentRuntime,
        state: Option<&State>,
    ) -> Option<String> {
        self.provider.get(runtime, self.ledgers(), state).await
    }

    /// Run the action selected by `name`
    ///
    /// Returns `None` when no action matches or the runtime lacks the
    /// operator settings, otherwise the handler's success flag.
    pub async fn dispatch(
        &self,
        name: &str,
        runtime: &dyn AgentRuntime,
        message: &Memory,
        state: &mut State,
        callback: Option<&dyn HandlerCallback>,
    ) -> Option<bool> {
        let Some(action) = self.find(name) else {
            warn!(name, "No Hedera action matches");
            return None;
        };
        if !action.validate(runtime) {
            warn!(action = action.name(), "Hedera settings incomplete, skipping action");
            return None;
        }
        debug!(action = action.name(), "Dispatching");

        let mut invocation = Invocation::new(runtime, self.ledgers(), message);
        if let Some(callback) = callback {
            invocation = invocation.with_callback(callback);
        }
        Some(action.handle(invocation, state).await)
    }
}

impl Default for HederaPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use hedera_agent_core::config::keys;
    use hedera_agent_core::TokenId;
    use serde_json::json;

    use super::*;
    use crate::actions::testing::{ScriptedRuntime, SharedLedger};
    use crate::runtime::CollectingCallback;
    use crate::services::mock::{Call, MockLedger};

    #[test]
    fn test_plugin_surface() {
        let plugin = HederaPlugin::new();
        assert_eq!(plugin.name(), "Hedera");
        assert_eq!(plugin.description(), "Hedera blockchain integration plugin");
        assert_eq!(plugin.actions().len(), 22);
        assert!(plugin.ledgers().signs_transactions());
    }

    #[test]
    fn test_find_by_name_or_simile() {
        let plugin = HederaPlugin::new();
        assert_eq!(
            plugin.find("hedera_hbar_balance").map(|a| a.name()),
            Some("HEDERA_HBAR_BALANCE")
        );
        assert_eq!(
            plugin.find("GET_AIRDROPS").map(|a| a.name()),
            Some("HEDERA_PENDING_AIRDROPS")
        );
        assert_eq!(
            plugin.find("send_tokens").map(|a| a.name()),
            Some("TRANSFER_TOKEN")
        );
        assert!(plugin.find("LAUNCH_ROCKET").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_runs_action() {
        let token = TokenId::new(0, 0, 77);
        let ledger = Arc::new(MockLedger::new().with_token(token, 0));
        let plugin = HederaPlugin::with_ledgers(Arc::new(SharedLedger(ledger.clone())));
        let runtime = ScriptedRuntime::new(json!({ "tokenId": "0.0.77", "amount": 5 }));

        let message = Memory::user("mint 5 of 0.0.77");
        let mut state = State::for_agent("Hedy");
        state.push(message.clone());
        let callback = CollectingCallback::new();

        let handled = plugin
            .dispatch("HCS_MINT_TOKEN", &runtime, &message, &mut state, Some(&callback))
            .await;
        assert_eq!(handled, Some(true));
        assert_eq!(ledger.calls(), vec![Call::MintToken(token, 5)]);
        assert!(callback.last().await.is_some());
    }

    #[tokio::test]
    async fn test_dispatch_requires_settings() {
        let plugin = HederaPlugin::with_ledgers(Arc::new(SharedLedger(Arc::new(MockLedger::new()))));
        let runtime = ScriptedRuntime::new(json!({})).without(keys::ACCOUNT_ID);
        let message = Memory::user("balance");
        let mut state = State::default();

        let handled = plugin
            .dispatch("HBAR_BALANCE", &runtime, &message, &mut state, None)
            .await;
        assert_eq!(handled, None);
    }
}
