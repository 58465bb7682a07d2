//! Balance and holder queries

use async_trait::async_trait;
use hedera_agent_core::units::display_units;
use serde_json::json;
use tracing::warn;

use super::{Action, ActionContext, ActionMeta};
use crate::error::Result;
use crate::params::{AllBalancesParams, HbarBalanceParams, HtsBalanceParams, TokenHoldersParams};
use crate::runtime::Content;
use crate::services::BalanceService;
use crate::templates;

static HBAR_BALANCE: ActionMeta = ActionMeta {
    name: "HEDERA_HBAR_BALANCE",
    similes: &["HBAR_BALANCE"],
    description: "Returns the HBAR balance of the requested Hedera account",
    template: templates::HBAR_BALANCE,
    examples: &[
        "What's the HBAR balance of 0.0.4515512?",
        "Show me my HBAR balance, my wallet is 0.0.5423981",
    ],
    failure: "fetching balance",
    writes: false,
};

static HTS_BALANCE: ActionMeta = ActionMeta {
    name: "HEDERA_HTS_BALANCE",
    similes: &["HTS_BALANCE", "HTS_AMOUNT", "HTS_BALANCE_HEDERA"],
    description: "Returns the balance of a given HTS token for a Hedera account",
    template: templates::HTS_BALANCE,
    examples: &[
        "Show balance of token 0.0.5424086 for wallet 0.0.4515512",
        "How many 0.0.5422544 tokens does 0.0.4515756 hold?",
    ],
    failure: "fetching HTS token balance",
    writes: false,
};

static ALL_BALANCES: ActionMeta = ActionMeta {
    name: "HEDERA_ALL_BALANCES",
    similes: &["ALL_TOKENS_BALANCE"],
    description: "Returns every token balance held by a Hedera account",
    template: templates::ALL_BALANCES,
    examples: &[
        "Show me the balances of all my tokens",
        "What tokens does 0.0.5393076 hold?",
    ],
    failure: "fetching balance",
    writes: false,
};

static TOKEN_HOLDERS: ActionMeta = ActionMeta {
    name: "HEDERA_TOKEN_HOLDERS",
    similes: &[
        "HEDERA_TOKEN_HOLDERS_BY_THRESHOLD",
        "HEDERA_ALL_TOKEN_HOLDERS",
        "HEDERA_HTS_HOLDERS",
    ],
    description: "Lists the holders of a token, optionally above a minimum balance",
    template: templates::TOKEN_HOLDERS,
    examples: &[
        "Who holds token 0.0.5424086?",
        "Show holders of 0.0.5424086 with more than 1000 tokens",
    ],
    failure: "fetching token holders",
    writes: false,
};

/// `HEDERA_HBAR_BALANCE`
#[derive(Debug, Clone, Copy, Default)]
pub struct HbarBalanceAction;

#[async_trait]
impl Action for HbarBalanceAction {
    type Params = HbarBalanceParams;

    fn meta(&self) -> &'static ActionMeta {
        &HBAR_BALANCE
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = BalanceService::new(ctx.ledger).hbar_balance(&params).await?;
        let amount = result.balance.to_hbar();

        Ok(Content::text(format!(
            "Address {} has balance of {} HBAR",
            result.address, amount
        ))
        .with_payload(json!({
            "success": true,
            "amount": amount,
            "address": result.address,
            "symbol": "HBAR",
        })))
    }
}

/// `HEDERA_HTS_BALANCE`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtsBalanceAction;

#[async_trait]
impl Action for HtsBalanceAction {
    type Params = HtsBalanceParams;

    fn meta(&self) -> &'static ActionMeta {
        &HTS_BALANCE
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = BalanceService::new(ctx.ledger).hts_balance(&params).await?;
        let balance = &result.balance;

        Ok(Content::text(format!(
            "Address {} has balance of token {} equal {} {} (token id: {})",
            result.address,
            balance.token_name,
            balance.balance_in_display_unit,
            balance.token_symbol,
            balance.token_id
        ))
        .with_payload(json!({
            "success": true,
            "amount": balance.balance_in_display_unit,
            "address": result.address,
            "symbol": balance.token_symbol,
            "tokenId": balance.token_id,
        })))
    }
}

/// `HEDERA_ALL_BALANCES`
#[derive(Debug, Clone, Copy, Default)]
pub struct AllBalancesAction;

#[async_trait]
impl Action for AllBalancesAction {
    type Params = AllBalancesParams;

    fn meta(&self) -> &'static ActionMeta {
        &ALL_BALANCES
    }

    async fn perform(&self, ctx: &ActionContext<'_>, mut params: Self::Params) -> Result<Content> {
        if params.address.is_none() {
            warn!("LLM couldn't extract agent's wallet from state. Manually assigning connected wallet address.");
            params.address = Some(ctx.operator_account());
        }
        let address = params.address.clone().unwrap_or_default();
        let balances = BalanceService::new(ctx.ledger).all_balances(&params).await?;

        let text = if balances.is_empty() {
            format!("Address {} does not have any token balances.", address)
        } else {
            let lines: String = balances
                .iter()
                .map(|b| {
                    format!(
                        "{}: {} {} ({})\n",
                        b.token_name, b.balance_in_display_unit, b.token_symbol, b.token_id
                    )
                })
                .collect();
            format!("Address {} has following token balances:\n{}", address, lines)
        };

        Ok(Content::text(text).with_payload(json!({
            "success": true,
            "amount": balances,
            "address": address,
        })))
    }
}

/// `HEDERA_TOKEN_HOLDERS`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenHoldersAction;

#[async_trait]
impl Action for TokenHoldersAction {
    type Params = TokenHoldersParams;

    fn meta(&self) -> &'static ActionMeta {
        &TOKEN_HOLDERS
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let report = BalanceService::new(ctx.ledger).token_holders(&params).await?;
        let details = &report.details;

        let text = if report.holders.is_empty() {
            format!(
                "Token {} ({}) does not have any holders.",
                details.token_id, details.name
            )
        } else {
            let lines: String = report
                .holders
                .iter()
                .map(|h| {
                    format!(
                        "{}: {} {}\n",
                        h.account,
                        display_units(h.balance, details.decimals),
                        details.symbol
                    )
                })
                .collect();
            format!(
                "Token {} ({}) has following holders:\n{}",
                details.token_id, details.name, lines
            )
        };

        Ok(Content::text(text).with_payload(json!({
            "success": true,
            "holdersArray": report.holders,
            "tokenId": details.token_id,
        })))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hedera_agent_core::ledger::{TokenBalance, TokenHolder};
    use hedera_agent_core::{AccountId, Hbar, TokenId};
    use serde_json::json;

    use super::*;
    use crate::actions::testing::{run, ScriptedRuntime};
    use crate::services::mock::MockLedger;

    #[tokio::test]
    async fn test_hbar_balance_reply() {
        let mut ledger = MockLedger::new();
        ledger.hbar = Hbar::from_tinybars(1_234_500_000);
        let runtime = ScriptedRuntime::new(json!({ "symbol": "HBAR", "address": "0.0.4515512" }));

        let (ok, reply) = run(&HbarBalanceAction, &runtime, Arc::new(ledger), "balance?").await;
        assert!(ok);
        assert_eq!(reply.text, "Address 0.0.4515512 has balance of 12.345 HBAR");
        assert_eq!(
            reply.payload,
            Some(json!({
                "success": true,
                "amount": 12.345,
                "address": "0.0.4515512",
                "symbol": "HBAR"
            }))
        );
    }

    #[tokio::test]
    async fn test_hts_balance_reply() {
        let token = TokenId::new(0, 0, 5_424_086);
        let mut ledger = MockLedger::new().with_token(token, 2);
        ledger.balances = vec![TokenBalance {
            token_id: token,
            balance: 1_050,
        }];
        let runtime =
            ScriptedRuntime::new(json!({ "tokenId": "0.0.5424086", "address": "0.0.4515512" }));

        let (ok, reply) = run(&HtsBalanceAction, &runtime, Arc::new(ledger), "balance").await;
        assert!(ok);
        assert_eq!(
            reply.text,
            "Address 0.0.4515512 has balance of token Token 5424086 equal 10.5 T5424086 (token id: 0.0.5424086)"
        );
    }

    #[tokio::test]
    async fn test_all_balances_falls_back_to_operator() {
        let token = TokenId::new(0, 0, 12);
        let mut ledger = MockLedger::new().with_token(token, 0);
        ledger.balances = vec![TokenBalance {
            token_id: token,
            balance: 3,
        }];
        let runtime = ScriptedRuntime::new(json!({ "address": "null" }));

        let (ok, reply) = run(&AllBalancesAction, &runtime, Arc::new(ledger), "my balances").await;
        assert!(ok);
        assert_eq!(
            reply.text,
            "Address 0.0.1001 has following token balances:\nToken 12: 3 T12 (0.0.12)\n"
        );
    }

    #[tokio::test]
    async fn test_all_balances_empty() {
        let runtime = ScriptedRuntime::new(json!({ "address": "0.0.77" }));
        let (ok, reply) =
            run(&AllBalancesAction, &runtime, Arc::new(MockLedger::new()), "balances").await;
        assert!(ok);
        assert_eq!(reply.text, "Address 0.0.77 does not have any token balances.");
    }

    #[tokio::test]
    async fn test_token_holders_reply() {
        let token = TokenId::new(0, 0, 9);
        let mut ledger = MockLedger::new().with_token(token, 1);
        ledger.holders = vec![TokenHolder {
            account: AccountId::new(0, 0, 3),
            balance: 25,
        }];
        let runtime = ScriptedRuntime::new(json!({ "tokenId": "0.0.9", "threshold": null }));

        let (ok, reply) = run(&TokenHoldersAction, &runtime, Arc::new(ledger), "holders").await;
        assert!(ok);
        assert_eq!(
            reply.text,
            "Token 0.0.9 (Token 9) has following holders:\n0.0.3: 2.5 T9\n"
        );
    }

    #[tokio::test]
    async fn test_unknown_token_error() {
        let runtime =
            ScriptedRuntime::new(json!({ "tokenId": "0.0.404", "address": "0.0.4515512" }));
        let (ok, reply) =
            run(&HtsBalanceAction, &runtime, Arc::new(MockLedger::new()), "balance").await;
        assert!(!ok);
        assert!(reply
            .text
            .starts_with("Error during fetching HTS token balance: Not found"));
    }
}
