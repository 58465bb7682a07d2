//! Hedera Agent Plugin
//!
//! Natural-language actions that let a conversational agent query and
//! operate on the Hedera network. Each action renders an extraction prompt
//! from the conversation, asks the host's language model for a JSON object
//! of parameters, validates it, runs one ledger operation and reports the
//! result back through the host's callback.
//!
//! # Features
//!
//! - **Balances**: HBAR, single-token and all-token balances, token holders
//! - **Tokens**: create fungible and NFT tokens, mint, associate, dissociate, reject
//! - **Transfers**: HBAR and token transfers, spending approvals
//! - **Airdrops**: send, list pending and claim
//! - **Topics**: create, delete, inspect, post and read consensus messages
//! - **LLM client** (`llm` feature): OpenAI-compatible object generation
//!
//! # Quick Start
//!
//! ```no_run
//! use hedera_agent_plugin::prelude::*;
//!
//! # async fn demo(runtime: &dyn AgentRuntime) {
//! let plugin = HederaPlugin::new();
//!
//! if let Some(wallet) = plugin.wallet_context(runtime, None).await {
//!     println!("{}", wallet);
//! }
//!
//! let message = Memory::user("What's the HBAR balance of 0.0.4515512?");
//! let mut state = State::for_agent("Hedy");
//! state.push(message.clone());
//!
//! let callback = CollectingCallback::new();
//! plugin
//!     .dispatch("HBAR_BALANCE", runtime, &message, &mut state, Some(&callback))
//!     .await;
//! # }
//! ```
//!
//! # Ledger access
//!
//! Actions reach the network through a [`LedgerFactory`]. The default
//! [`NetworkLedgerFactory`] signs transactions with the operator key through
//! the Hedera SDK and answers queries from the public mirror node. Hosts
//! that must stay read-only pass a [`MirrorLedgerFactory`] to
//! [`HederaPlugin::with_ledgers`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

pub mod actions;
pub mod client;
pub mod error;
pub mod params;
pub mod plugin;
pub mod provider;
pub mod runtime;
pub mod schema;
pub mod services;
pub mod template;
pub mod templates;

#[cfg(feature = "llm")]
pub mod llm;

pub use actions::{all_actions, Action, ActionContext, ActionMeta, Invocation, PluginAction};
pub use client::{LedgerFactory, MirrorLedgerFactory, NetworkLedgerFactory};
pub use error::{ActionError, Result};
pub use plugin::HederaPlugin;
pub use provider::WalletProvider;
pub use runtime::{
    AgentRuntime, CollectingCallback, Content, HandlerCallback, Memory, ModelClass,
    ObjectGenerator, Role, State,
};
pub use schema::{ActionParams, ValidationError};

#[cfg(feature = "llm")]
pub use llm::OpenAiGenerator;

/// Prelude module for easy importing of common types
pub mod prelude {
    pub use super::actions::{
        AirdropTokenAction, AllBalancesAction, AssociateTokenAction, ClaimAirdropAction,
        CreateNftAction, CreateTokenAction, CreateTopicAction, DeleteTopicAction,
        DissociateTokenAction, GetTopicMessagesAction, HbarBalanceAction, HtsBalanceAction,
        MintNftAction, MintTokenAction, PendingAirdropsAction, RejectTokenAction,
        SpendingApprovalAction, SubmitTopicMessageAction, TokenHoldersAction,
        TopicInfoAction, TransferHbarAction, TransferTokenAction,
    };
    pub use super::{
        Action, ActionError, AgentRuntime, CollectingCallback, Content, HandlerCallback,
        HederaPlugin, Invocation, LedgerFactory, Memory, MirrorLedgerFactory, ModelClass,
        NetworkLedgerFactory, ObjectGenerator, PluginAction, Result, State, WalletProvider,
    };

    #[cfg(feature = "llm")]
    pub use super::OpenAiGenerator;
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Library name
pub const NAME: &str = "hedera-agent-plugin";
