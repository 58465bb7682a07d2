//! Value transfers and spending approvals

use async_trait::async_trait;
use serde_json::json;

use super::{Action, ActionContext, ActionMeta};
use crate::error::Result;
use crate::params::{SpendingApprovalParams, TransferHbarParams, TransferTokenParams};
use crate::runtime::Content;
use crate::services::TransferService;
use crate::templates;

static TRANSFER_HBAR: ActionMeta = ActionMeta {
    name: "TRANSFER_HBAR",
    similes: &["SEND_HBAR", "HBAR_TRANSFER", "MOVE_HBAR"],
    description: "Transfers HBAR from the agent's account to another account",
    template: templates::TRANSFER_HBAR,
    examples: &[
        "Send 0.10 HBAR to 0.0.4515512",
        "Transfer 5 HBAR to account 0.0.5393076",
    ],
    failure: "HBAR transfer",
    writes: true,
};

static TRANSFER_TOKEN: ActionMeta = ActionMeta {
    name: "TRANSFER_TOKEN",
    similes: &["SEND_TOKENS", "TOKEN_TRANSFER", "MOVE_TOKENS"],
    description: "Transfers a fungible token from the agent's account to another account",
    template: templates::TRANSFER_TOKEN,
    examples: &[
        "Transfer 3.10 of token 0.0.5425085 to 0.0.4515512",
        "Send 100 tokens 0.0.5422544 to account 0.0.5393076",
    ],
    failure: "token transfer",
    writes: true,
};

static SPENDING_APPROVAL: ActionMeta = ActionMeta {
    name: "HEDERA_SET_SPENDING_APPROVAL",
    similes: &[
        "HEDERA_SET_SPENDING_APPROVAL_HBAR",
        "HEDERA_SET_SPENDING_APPROVAL_HTS",
    ],
    description: "Allows another account to spend HBAR or a token on behalf of the agent",
    template: templates::SET_SPENDING_APPROVAL,
    examples: &[
        "Approve 0.0.4515512 to spend 12.5 HBAR",
        "Set spending approval for 0.0.5393076 of 100 tokens 0.0.5424086",
    ],
    failure: "setting the spending approval",
    writes: true,
};

/// `TRANSFER_HBAR`
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferHbarAction;

#[async_trait]
impl Action for TransferHbarAction {
    type Params = TransferHbarParams;

    fn meta(&self) -> &'static ActionMeta {
        &TRANSFER_HBAR
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TransferService::new(ctx.ledger).transfer_hbar(&params).await?;

        Ok(Content::text(format!(
            "Transfer of {} HBAR to {} completed.\nTransaction link: {}",
            params.amount.trim(),
            params.account_id.trim(),
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "amount": params.amount.trim(),
            "recipient": params.account_id.trim(),
            "txHash": result.tx_hash,
        })))
    }
}

/// `TRANSFER_TOKEN`
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferTokenAction;

#[async_trait]
impl Action for TransferTokenAction {
    type Params = TransferTokenParams;

    fn meta(&self) -> &'static ActionMeta {
        &TRANSFER_TOKEN
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TransferService::new(ctx.ledger).transfer_token(&params).await?;

        Ok(Content::text(format!(
            "Transfer of token {} to {} completed.\nTransaction link: {}",
            params.token_id.trim(),
            params.to_account_id.trim(),
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "tokenId": params.token_id.trim(),
            "amount": params.amount,
            "recipient": params.to_account_id.trim(),
            "txHash": result.tx_hash,
        })))
    }
}

/// `HEDERA_SET_SPENDING_APPROVAL`
#[derive(Debug, Clone, Copy, Default)]
pub struct SpendingApprovalAction;

#[async_trait]
impl Action for SpendingApprovalAction {
    type Params = SpendingApprovalParams;

    fn meta(&self) -> &'static ActionMeta {
        &SPENDING_APPROVAL
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TransferService::new(ctx.ledger)
            .approve_allowance(&params)
            .await?;
        let asset = params.token_id.as_deref().map(str::trim).unwrap_or("HBAR");

        Ok(Content::text(format!(
            "Successfully set the spending approval of {} of tokens {} for the account {}.\nTransaction link: {}",
            params.amount,
            asset,
            params.spender_account_id.trim(),
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "spender": params.spender_account_id.trim(),
            "asset": asset,
            "amount": params.amount,
            "txHash": result.tx_hash,
        })))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hedera_agent_core::{AccountId, Hbar, TokenId};
    use serde_json::json;

    use super::*;
    use crate::actions::testing::{run, ScriptedRuntime};
    use crate::services::mock::{Call, MockLedger};

    #[tokio::test]
    async fn test_transfer_hbar_reply() {
        let runtime = ScriptedRuntime::new(json!({ "amount": "0.10", "accountId": "0.0.4515512" }));
        let ledger = Arc::new(MockLedger::new());

        let (ok, reply) = run(&TransferHbarAction, &runtime, ledger.clone(), "send").await;
        assert!(ok);
        assert_eq!(
            reply.text,
            "Transfer of 0.10 HBAR to 0.0.4515512 completed.\nTransaction link: \
             https://hashscan.io/testnet/tx/0.0.1001@1738764854.144000000"
        );
        assert_eq!(
            ledger.calls(),
            vec![Call::TransferHbar(
                AccountId::new(0, 0, 4_515_512),
                Hbar::from_tinybars(10_000_000)
            )]
        );
    }

    #[tokio::test]
    async fn test_transfer_token_failed_receipt() {
        let token = TokenId::new(0, 0, 5);
        let ledger = Arc::new(
            MockLedger::new()
                .with_token(token, 0)
                .with_status("TOKEN_NOT_ASSOCIATED_TO_ACCOUNT"),
        );
        let runtime = ScriptedRuntime::new(
            json!({ "tokenId": "0.0.5", "toAccountId": "0.0.6", "amount": 1 }),
        );

        let (ok, reply) = run(&TransferTokenAction, &runtime, ledger, "send").await;
        assert!(!ok);
        assert!(reply.text.starts_with("Error during token transfer:"));
        assert!(reply.text.ends_with("status TOKEN_NOT_ASSOCIATED_TO_ACCOUNT"));
    }

    #[tokio::test]
    async fn test_spending_approval_hbar_reply() {
        let runtime = ScriptedRuntime::new(
            json!({ "spenderAccountId": "0.0.4515512", "amount": 12.5, "tokenId": "null" }),
        );
        let (ok, reply) =
            run(&SpendingApprovalAction, &runtime, Arc::new(MockLedger::new()), "approve").await;
        assert!(ok);
        assert!(reply.text.starts_with(
            "Successfully set the spending approval of 12.5 of tokens HBAR for the account 0.0.4515512."
        ));
    }
}
