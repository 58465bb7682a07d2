//! HBAR and token transfers, and spending allowances

use hedera_agent_core::types::AllowanceAsset;
use hedera_agent_core::{AccountId, Hbar, LedgerClient, TokenId, TransactionResult};
use tracing::{info, instrument};

use super::required_id;
use crate::error::{require, require_amount, ActionError, Result};
use crate::params::{SpendingApprovalParams, TransferHbarParams, TransferTokenParams};

/// Value transfers out of the operator account
pub struct TransferService<'a> {
    ledger: &'a dyn LedgerClient,
}

impl<'a> TransferService<'a> {
    /// Create a service over `ledger`
    pub fn new(ledger: &'a dyn LedgerClient) -> Self {
        Self { ledger }
    }

    /// Send HBAR
    #[instrument(skip(self))]
    pub async fn transfer_hbar(&self, params: &TransferHbarParams) -> Result<TransactionResult> {
        let amount: Hbar = require(&params.amount, "Missing amount")?.parse()?;
        if amount == Hbar::ZERO {
            return Err(ActionError::missing("Missing amount"));
        }
        let to: AccountId = required_id(&params.account_id, "Missing recipient accountId")?;

        let result = self.ledger.transfer_hbar(&to, amount).await?.ensure_success()?;
        info!(to = %to, tinybars = amount.to_tinybars(), "HBAR transfer completed");
        Ok(result)
    }

    /// Send a fungible token, converting the display amount with the token's decimals
    #[instrument(skip(self))]
    pub async fn transfer_token(&self, params: &TransferTokenParams) -> Result<TransactionResult> {
        let token: TokenId = required_id(&params.token_id, "Missing tokenId")?;
        let to: AccountId = required_id(&params.to_account_id, "Missing recipient accountId")?;
        let amount = require_amount(params.amount, "Missing amount of token")?;

        let base = self.ledger.to_base_units(&token, amount).await?;
        let result = self
            .ledger
            .transfer_token(&token, &to, base)
            .await?
            .ensure_success()?;
        info!(token = %token, to = %to, amount = base, "Token transfer completed");
        Ok(result)
    }

    /// Allow another account to spend HBAR, or a token when `token_id` is set
    #[instrument(skip(self))]
    pub async fn approve_allowance(
        &self,
        params: &SpendingApprovalParams,
    ) -> Result<TransactionResult> {
        let spender: AccountId =
            required_id(&params.spender_account_id, "Missing spender accountId")?;
        let amount = require_amount(params.amount, "Missing amount")?;

        let asset = match params.token_id.as_deref() {
            Some(raw) => {
                let token_id: TokenId = raw.trim().parse()?;
                AllowanceAsset::Token {
                    token_id,
                    amount: self.ledger.to_base_units(&token_id, amount).await?,
                }
            }
            None => AllowanceAsset::Hbar {
                amount: Hbar::from_hbar(amount)?,
            },
        };

        let result = self
            .ledger
            .approve_allowance(&spender, asset)
            .await?
            .ensure_success()?;
        info!(spender = %spender, "Spending approval set");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::{Call, MockLedger};

    #[tokio::test]
    async fn test_transfer_hbar() -> Result<()> {
        let ledger = MockLedger::new();
        TransferService::new(&ledger)
            .transfer_hbar(&TransferHbarParams {
                amount: "0.10".into(),
                account_id: "0.0.4515512".into(),
            })
            .await?;
        assert_eq!(
            ledger.calls(),
            vec![Call::TransferHbar(
                AccountId::new(0, 0, 4_515_512),
                Hbar::from_tinybars(10_000_000)
            )]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_hbar_missing_fields() {
        let ledger = MockLedger::new();
        let service = TransferService::new(&ledger);

        let err = service
            .transfer_hbar(&TransferHbarParams {
                amount: "".into(),
                account_id: "0.0.2".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing amount");

        let err = service
            .transfer_hbar(&TransferHbarParams {
                amount: "1".into(),
                account_id: "".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing recipient accountId");
        assert!(ledger.calls().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_token_uses_mirror_decimals() -> Result<()> {
        let token = TokenId::new(0, 0, 5_425_085);
        let ledger = MockLedger::new().with_token(token, 2);
        TransferService::new(&ledger)
            .transfer_token(&TransferTokenParams {
                token_id: "0.0.5425085".into(),
                to_account_id: "0.0.4515512".into(),
                amount: 3.10,
            })
            .await?;
        assert_eq!(
            ledger.calls(),
            vec![Call::TransferToken(token, AccountId::new(0, 0, 4_515_512), 310)]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_status_is_error() {
        let token = TokenId::new(0, 0, 9);
        let ledger = MockLedger::new()
            .with_token(token, 0)
            .with_status("INSUFFICIENT_TOKEN_BALANCE");
        let err = TransferService::new(&ledger)
            .transfer_token(&TransferTokenParams {
                token_id: "0.0.9".into(),
                to_account_id: "0.0.2".into(),
                amount: 1.0,
            })
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("transaction finished with status INSUFFICIENT_TOKEN_BALANCE"));
    }

    #[tokio::test]
    async fn test_allowance_assets() -> Result<()> {
        let token = TokenId::new(0, 0, 42);
        let spender = AccountId::new(0, 0, 7);
        let ledger = MockLedger::new().with_token(token, 4);
        let service = TransferService::new(&ledger);

        service
            .approve_allowance(&SpendingApprovalParams {
                spender_account_id: "0.0.7".into(),
                amount: 12.5,
                token_id: None,
            })
            .await?;
        service
            .approve_allowance(&SpendingApprovalParams {
                spender_account_id: "0.0.7".into(),
                amount: 2.0,
                token_id: Some("0.0.42".into()),
            })
            .await?;

        assert_eq!(
            ledger.calls(),
            vec![
                Call::Approve(
                    spender,
                    AllowanceAsset::Hbar {
                        amount: Hbar::from_tinybars(1_250_000_000)
                    }
                ),
                Call::Approve(
                    spender,
                    AllowanceAsset::Token {
                        token_id: token,
                        amount: 20_000
                    }
                ),
            ]
        );
        Ok(())
    }
}
