//! Balance Query Example
//!
//! Runs the HBAR balance action against the public testnet mirror node.
//! The model is replaced by a fixed reply so no API key is needed; the
//! operator settings are read from the environment (`HEDERA_*`).

use anyhow::Result;
use async_trait::async_trait;
use hedera_agent_plugin::prelude::*;
use serde_json::{json, Value};

/// Runtime answering every extraction prompt with the same parameters
struct FixedRuntime {
    reply: Value,
}

#[async_trait]
impl ObjectGenerator for FixedRuntime {
    async fn generate_object(&self, _context: &str, _model: ModelClass) -> Result<Value> {
        Ok(self.reply.clone())
    }
}

impl AgentRuntime for FixedRuntime {
    fn get_setting(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let address = std::env::args().nth(1).unwrap_or_else(|| "0.0.2".to_string());
    let runtime = FixedRuntime {
        reply: json!({ "symbol": "HBAR", "address": address }),
    };

    let plugin = HederaPlugin::new();
    match plugin.wallet_context(&runtime, None).await {
        Some(wallet) => print!("{}", wallet),
        None => println!("Operator settings incomplete, set HEDERA_ACCOUNT_ID, HEDERA_PRIVATE_KEY and HEDERA_NETWORK_TYPE"),
    }

    let message = Memory::user(format!("What's the HBAR balance of {}?", address));
    let mut state = State::for_agent("Example agent");
    state.push(message.clone());

    let callback = CollectingCallback::new();
    let handled = plugin
        .dispatch("HBAR_BALANCE", &runtime, &message, &mut state, Some(&callback))
        .await;

    println!("Handled: {:?}", handled);
    for content in callback.contents().await {
        println!("{}", content.text);
    }

    Ok(())
}
