//! Airdrop actions

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use super::{Action, ActionContext, ActionMeta};
use crate::error::Result;
use crate::params::{AirdropTokenParams, ClaimAirdropParams, PendingAirdropsParams};
use crate::runtime::Content;
use crate::services::AirdropService;
use crate::templates;

static AIRDROP_TOKEN: ActionMeta = ActionMeta {
    name: "HEDERA_AIRDROP_TOKEN",
    similes: &[
        "HEDERA_DROP_TOKEN",
        "HEDERA_DROP_TOKENS",
        "HEDERA_AIRDROP_TOKENS",
    ],
    description: "Airdrops the same amount of a token to several accounts",
    template: templates::AIRDROP_TOKEN,
    examples: &[
        "Airdrop 10 tokens 0.0.5426001 for 0.0.5399001, 0.0.5399012, 0.0.5399023",
        "Airdrop 3.75 tokens 0.0.5432002 to wallets 0.0.5401005, 0.0.5402006",
    ],
    failure: "token airdrop",
    writes: true,
};

static PENDING_AIRDROPS: ActionMeta = ActionMeta {
    name: "HEDERA_PENDING_AIRDROPS",
    similes: &["PENDING_AIRDROPS", "GET_AIRDROPS", "GET_PENDING_AIRDROPS"],
    description: "Lists airdrops waiting to be claimed by an account",
    template: templates::PENDING_AIRDROPS,
    examples: &[
        "Show me my pending airdrops",
        "Show me pending airdrops for account 0.0.5393196",
    ],
    failure: "fetching pending airdrops",
    writes: false,
};

static CLAIM_AIRDROP: ActionMeta = ActionMeta {
    name: "HEDERA_CLAIM_AIRDROP",
    similes: &["CLAIM_AIRDROP", "CLAIM_TOKEN_AIRDROP", "CLAIM_TOKEN"],
    description: "Claims a pending airdrop sent to the agent's account",
    template: templates::CLAIM_AIRDROP,
    examples: &[
        "Claim airdrop (1) 5 Tokens (0.0.5445766) from 0.0.5393076",
        "Claim airdrop (2) 50 Tokens (0.0.5447843) from 0.0.5393076",
    ],
    failure: "claiming airdrop",
    writes: true,
};

/// `HEDERA_AIRDROP_TOKEN`
#[derive(Debug, Clone, Copy, Default)]
pub struct AirdropTokenAction;

#[async_trait]
impl Action for AirdropTokenAction {
    type Params = AirdropTokenParams;

    fn meta(&self) -> &'static ActionMeta {
        &AIRDROP_TOKEN
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = AirdropService::new(ctx.ledger).airdrop(&params).await?;

        Ok(Content::text(format!(
            "Airdrop token successfully executed.\nTransaction link: {}",
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "tokenId": params.token_id.trim(),
            "recipients": params.recipients,
            "amount": params.amount,
            "txHash": result.tx_hash,
        })))
    }
}

/// `HEDERA_PENDING_AIRDROPS`
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingAirdropsAction;

#[async_trait]
impl Action for PendingAirdropsAction {
    type Params = PendingAirdropsParams;

    fn meta(&self) -> &'static ActionMeta {
        &PENDING_AIRDROPS
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let account = match params.account_id {
            Some(account) => account,
            None => {
                warn!("No accountId extracted, using the connected wallet address");
                ctx.operator_account()
            }
        };
        let pending = AirdropService::new(ctx.ledger).pending(&account).await?;

        if pending.is_empty() {
            return Ok(Content::text(format!(
                "There are no pending airdrops for accountId {}",
                account
            )));
        }

        let lines: Vec<String> = pending
            .iter()
            .enumerate()
            .map(|(index, view)| {
                format!(
                    "({}) {} {} (token id: {}) from {}",
                    index + 1,
                    view.display_amount(),
                    view.details.symbol,
                    view.airdrop.token_id,
                    view.airdrop.sender_id
                )
            })
            .collect();
        let airdrops: Vec<_> = pending.into_iter().map(|view| view.airdrop).collect();

        Ok(Content::text(format!(
            "Here are pending airdrops for account {} \n\n {}",
            account,
            lines.join("\n")
        ))
        .with_payload(json!({ "availableAirdrops": airdrops })))
    }
}

/// `HEDERA_CLAIM_AIRDROP`
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimAirdropAction;

#[async_trait]
impl Action for ClaimAirdropAction {
    type Params = ClaimAirdropParams;

    fn meta(&self) -> &'static ActionMeta {
        &CLAIM_AIRDROP
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let receiver = ctx.operator_account();
        let result = AirdropService::new(ctx.ledger)
            .claim(&params, &receiver)
            .await?;

        Ok(Content::text(format!(
            "Successfully claimed airdrop for token {}.\nTransaction link: {}",
            params.token_id.trim(),
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "tokenId": params.token_id.trim(),
            "senderId": params.sender_id.trim(),
            "txHash": result.tx_hash,
        })))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hedera_agent_core::ledger::PendingAirdrop;
    use hedera_agent_core::types::PendingAirdropId;
    use hedera_agent_core::{AccountId, TokenId};
    use serde_json::json;

    use super::*;
    use crate::actions::testing::{run, ScriptedRuntime};
    use crate::services::mock::{Call, MockLedger};

    #[tokio::test]
    async fn test_airdrop_reply() {
        let token = TokenId::new(0, 0, 5_426_001);
        let ledger = Arc::new(MockLedger::new().with_token(token, 0));
        let runtime = ScriptedRuntime::new(json!({
            "tokenId": "0.0.5426001",
            "recipients": ["0.0.5399001", "0.0.5399012"],
            "amount": 10
        }));

        let (ok, reply) = run(&AirdropTokenAction, &runtime, ledger.clone(), "airdrop").await;
        assert!(ok);
        assert!(reply
            .text
            .starts_with("Airdrop token successfully executed.\nTransaction link: "));
        assert_eq!(ledger.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_pending_airdrops_listing() {
        let token = TokenId::new(0, 0, 5_445_766);
        let mut ledger = MockLedger::new().with_token(token, 1);
        ledger.airdrops = vec![PendingAirdrop {
            sender_id: AccountId::new(0, 0, 5_393_076),
            receiver_id: AccountId::new(0, 0, 1001),
            token_id: token,
            amount: Some(50),
            serial_number: None,
            timestamp: None,
        }];
        let runtime = ScriptedRuntime::new(json!({ "accountId": null }));

        let (ok, reply) = run(&PendingAirdropsAction, &runtime, Arc::new(ledger), "pending").await;
        assert!(ok);
        assert_eq!(
            reply.text,
            "Here are pending airdrops for account 0.0.1001 \n\n (1) 5 T5445766 (token id: 0.0.5445766) from 0.0.5393076"
        );
    }

    #[tokio::test]
    async fn test_no_pending_airdrops() {
        let runtime = ScriptedRuntime::new(json!({ "accountId": "0.0.42" }));
        let (ok, reply) =
            run(&PendingAirdropsAction, &runtime, Arc::new(MockLedger::new()), "pending").await;
        assert!(ok);
        assert_eq!(reply.text, "There are no pending airdrops for accountId 0.0.42");
    }

    #[tokio::test]
    async fn test_claim_uses_operator_as_receiver() {
        let runtime = ScriptedRuntime::new(
            json!({ "senderId": "0.0.5393076", "tokenId": "0.0.5445766" }),
        );
        let ledger = Arc::new(MockLedger::new());

        let (ok, reply) = run(&ClaimAirdropAction, &runtime, ledger.clone(), "claim").await;
        assert!(ok);
        assert!(reply
            .text
            .starts_with("Successfully claimed airdrop for token 0.0.5445766."));
        assert_eq!(
            ledger.calls(),
            vec![Call::Claim(PendingAirdropId {
                sender_id: AccountId::new(0, 0, 5_393_076),
                receiver_id: AccountId::new(0, 0, 1001),
                token_id: TokenId::new(0, 0, 5_445_766),
            })]
        );
    }
}
