//! Natural-language actions
//!
//! An [`Action`] declares its metadata and what to do with validated
//! parameters. The shared pipeline in [`PluginAction::handle`] renders the
//! prompt, asks the model for parameters, validates them, connects a ledger
//! client and reports the outcome through the host's callback.
//!
//! # Example
//!
//! ```no_run
//! use hedera_agent_plugin::prelude::*;
//!
//! # async fn demo(runtime: &dyn AgentRuntime, ledgers: &dyn LedgerFactory) {
//! let message = Memory::user("What's my HBAR balance? My wallet is 0.0.4515512");
//! let mut state = State::for_agent("Hedy");
//! state.push(message.clone());
//!
//! let callback = CollectingCallback::new();
//! let action = HbarBalanceAction;
//! if action.validate(runtime) {
//!     let invocation = Invocation::new(runtime, ledgers, &message).with_callback(&callback);
//!     action.handle(invocation, &mut state).await;
//! }
//! # }
//! ```

pub mod airdrop;
pub mod balance;
pub mod token;
pub mod topic;
pub mod transfer;

pub use airdrop::{AirdropTokenAction, ClaimAirdropAction, PendingAirdropsAction};
pub use balance::{AllBalancesAction, HbarBalanceAction, HtsBalanceAction, TokenHoldersAction};
pub use token::{
    AssociateTokenAction, CreateNftAction, CreateTokenAction, DissociateTokenAction,
    MintNftAction, MintTokenAction, RejectTokenAction,
};
pub use topic::{
    CreateTopicAction, DeleteTopicAction, GetTopicMessagesAction, SubmitTopicMessageAction,
    TopicInfoAction,
};
pub use transfer::{SpendingApprovalAction, TransferHbarAction, TransferTokenAction};

use async_trait::async_trait;
use hedera_agent_core::{HederaCredentials, HederaSettings, LedgerClient, NetworkType};
use tracing::{debug, error, info_span, warn, Instrument};
use uuid::Uuid;

use crate::client::LedgerFactory;
use crate::error::{ActionError, Result};
use crate::runtime::{AgentRuntime, Content, HandlerCallback, Memory, ModelClass, State};
use crate::schema::ActionParams;
use crate::template::compose_context;

/// Static description of an action
#[derive(Debug)]
pub struct ActionMeta {
    /// Unique action name
    pub name: &'static str,
    /// Alternative names the runtime may select the action by
    pub similes: &'static [&'static str],
    /// What the action does
    pub description: &'static str,
    /// Extraction prompt
    pub template: &'static str,
    /// Sample user requests
    pub examples: &'static [&'static str],
    /// Noun phrase used in `Error during <failure>: ...`
    pub failure: &'static str,
    /// Whether the action submits a transaction
    pub writes: bool,
}

/// Everything an action needs once its parameters are validated
pub struct ActionContext<'a> {
    /// Ledger client for this invocation
    pub ledger: &'a dyn LedgerClient,
    /// Resolved operator credentials
    pub credentials: &'a HederaCredentials,
    /// Raw operator settings
    pub settings: &'a HederaSettings,
}

impl ActionContext<'_> {
    /// Network the operator is on
    pub fn network(&self) -> NetworkType {
        self.credentials.network
    }

    /// Explorer link of a transaction
    pub fn tx_link(&self, tx_hash: &str) -> String {
        self.network().hashscan_tx_url(tx_hash)
    }

    /// Operator account id as configured
    pub fn operator_account(&self) -> String {
        self.credentials.account_id.to_string()
    }
}

/// One concrete action
#[async_trait]
pub trait Action: Send + Sync {
    /// Parameters extracted from the model reply
    type Params: ActionParams;

    /// Static metadata
    fn meta(&self) -> &'static ActionMeta;

    /// Run the action with validated parameters
    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content>;
}

/// Collaborators of one handler run
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    /// Host runtime
    pub runtime: &'a dyn AgentRuntime,
    /// Builds the ledger client
    pub ledgers: &'a dyn LedgerFactory,
    /// Message that triggered the action
    pub message: &'a Memory,
    /// Where the reply goes
    pub callback: Option<&'a dyn HandlerCallback>,
}

impl<'a> Invocation<'a> {
    /// Invocation without a callback
    pub fn new(
        runtime: &'a dyn AgentRuntime,
        ledgers: &'a dyn LedgerFactory,
        message: &'a Memory,
    ) -> Self {
        Self {
            runtime,
            ledgers,
            message,
            callback: None,
        }
    }

    /// Deliver the reply to `callback`
    pub fn with_callback(mut self, callback: &'a dyn HandlerCallback) -> Self {
        self.callback = Some(callback);
        self
    }
}

/// Object-safe view of an action, as registered with the plugin
#[async_trait]
pub trait PluginAction: Send + Sync {
    /// Static metadata
    fn metadata(&self) -> &'static ActionMeta;

    /// Unique action name
    fn name(&self) -> &'static str {
        self.metadata().name
    }

    /// Alternative names
    fn similes(&self) -> &'static [&'static str] {
        self.metadata().similes
    }

    /// What the action does
    fn description(&self) -> &'static str {
        self.metadata().description
    }

    /// Sample user requests
    fn examples(&self) -> &'static [&'static str] {
        self.metadata().examples
    }

    /// Whether the three required operator settings are present
    fn validate(&self, runtime: &dyn AgentRuntime) -> bool {
        runtime.hedera_settings().is_complete()
    }

    /// Run the full pipeline, returning whether the action succeeded
    async fn handle(&self, invocation: Invocation<'_>, state: &mut State) -> bool;
}

#[async_trait]
impl<A: Action> PluginAction for A {
    fn metadata(&self) -> &'static ActionMeta {
        self.meta()
    }

    async fn handle(&self, invocation: Invocation<'_>, state: &mut State) -> bool {
        let meta = self.meta();
        let span = info_span!("action", name = meta.name, invocation = %Uuid::new_v4());

        async move {
            match execute(self, &invocation, state).await {
                Ok(content) => {
                    deliver(invocation.callback, content.with_action(meta.name)).await;
                    true
                }
                Err(err) => {
                    error!(
                        error = %err,
                        transient = err.is_transient(),
                        settings = err.is_settings(),
                        "Error during {}",
                        meta.failure
                    );
                    let message = err.to_string();
                    let text = format!("Error during {}: {}", meta.failure, message);
                    deliver(invocation.callback, Content::error(text, message)).await;
                    false
                }
            }
        }
        .instrument(span)
        .await
    }
}

async fn execute<A: Action>(
    action: &A,
    invocation: &Invocation<'_>,
    state: &mut State,
) -> Result<Content> {
    let meta = action.meta();
    if state.refresh_last_message().is_none() {
        state.last_message = Some(invocation.message.text.clone());
    }

    let context = compose_context(meta.template, state);
    let extracted = invocation
        .runtime
        .generate_object(&context, ModelClass::Small)
        .await
        .map_err(|err| ActionError::model(format!("{:#}", err)))?;
    debug!(extracted = %extracted, "Extracted data");

    let params = A::Params::parse(&extracted)?;

    let settings = invocation.runtime.hedera_settings();
    let credentials = settings.resolve()?;
    let ledger = invocation.ledgers.connect(&credentials).await?;

    let ctx = ActionContext {
        ledger: ledger.as_ref(),
        credentials: &credentials,
        settings: &settings,
    };
    action.perform(&ctx, params).await
}

async fn deliver(callback: Option<&dyn HandlerCallback>, content: Content) {
    if let Some(callback) = callback {
        if let Err(err) = callback.send(content).await {
            warn!(error = %err, "Failed to deliver action reply");
        }
    }
}

/// Every action the plugin ships, in registration order
pub fn all_actions() -> Vec<Box<dyn PluginAction>> {
    vec![
        Box::new(HbarBalanceAction),
        Box::new(HtsBalanceAction),
        Box::new(AllBalancesAction),
        Box::new(TokenHoldersAction),
        Box::new(TransferHbarAction),
        Box::new(TransferTokenAction),
        Box::new(CreateTokenAction),
        Box::new(CreateNftAction),
        Box::new(MintTokenAction),
        Box::new(MintNftAction),
        Box::new(AssociateTokenAction),
        Box::new(DissociateTokenAction),
        Box::new(RejectTokenAction),
        Box::new(AirdropTokenAction),
        Box::new(PendingAirdropsAction),
        Box::new(ClaimAirdropAction),
        Box::new(CreateTopicAction),
        Box::new(DeleteTopicAction),
        Box::new(TopicInfoAction),
        Box::new(SubmitTopicMessageAction),
        Box::new(GetTopicMessagesAction),
        Box::new(SpendingApprovalAction),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted runtime and a factory handing out a shared mock ledger

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use hedera_agent_core::config::keys;
    use hedera_agent_core::{HederaCredentials, LedgerClient};
    use serde_json::Value;

    use super::*;
    use crate::runtime::{CollectingCallback, ObjectGenerator};
    use crate::services::mock::MockLedger;

    /// DER-encoded Ed25519 test key
    pub const TEST_KEY: &str =
        "302e020100300506032b6570042204209b3f2c2bf3f0f2e8a1e3c7f1f0f5c3b2a1908f7e6d5c4b3a2918f7e6d5c4b3a2";

    pub struct ScriptedRuntime {
        pub settings: HashMap<String, String>,
        pub reply: Value,
        pub contexts: Mutex<Vec<String>>,
    }

    impl ScriptedRuntime {
        pub fn new(reply: Value) -> Self {
            let settings = [
                (keys::ACCOUNT_ID, "0.0.1001"),
                (keys::PRIVATE_KEY, TEST_KEY),
                (keys::KEY_TYPE, "ED25519"),
                (keys::NETWORK_TYPE, "testnet"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
            Self {
                settings,
                reply,
                contexts: Mutex::new(Vec::new()),
            }
        }

        pub fn without(mut self, key: &str) -> Self {
            self.settings.remove(key);
            self
        }

        pub fn last_context(&self) -> Option<String> {
            self.contexts.lock().ok().and_then(|c| c.last().cloned())
        }
    }

    #[async_trait]
    impl ObjectGenerator for ScriptedRuntime {
        async fn generate_object(&self, context: &str, _model: ModelClass) -> anyhow::Result<Value> {
            if let Ok(mut contexts) = self.contexts.lock() {
                contexts.push(context.to_string());
            }
            Ok(self.reply.clone())
        }
    }

    impl AgentRuntime for ScriptedRuntime {
        fn get_setting(&self, key: &str) -> Option<String> {
            self.settings.get(key).cloned()
        }
    }

    pub struct SharedLedger(pub Arc<MockLedger>);

    #[async_trait]
    impl LedgerFactory for SharedLedger {
        async fn connect(
            &self,
            _credentials: &HederaCredentials,
        ) -> hedera_agent_core::Result<Arc<dyn LedgerClient>> {
            Ok(self.0.clone())
        }
    }

    /// Run `action` for `text` against `ledger`, returning the success flag
    /// and the reply
    pub async fn run(
        action: &dyn PluginAction,
        runtime: &ScriptedRuntime,
        ledger: Arc<MockLedger>,
        text: &str,
    ) -> (bool, Content) {
        let factory = SharedLedger(ledger);
        let message = Memory::user(text);
        let mut state = State::for_agent("Hedy");
        state.push(message.clone());
        let callback = CollectingCallback::new();

        let ok = action
            .handle(
                Invocation::new(runtime, &factory, &message).with_callback(&callback),
                &mut state,
            )
            .await;
        let reply = callback
            .last()
            .await
            .unwrap_or_else(|| Content::text("<no reply>"));
        (ok, reply)
    }
}
