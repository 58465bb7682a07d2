//! Airdrops: sending, listing and claiming

use futures::future::try_join_all;
use hedera_agent_core::ledger::{PendingAirdrop, TokenDetails};
use hedera_agent_core::types::{AirdropRecipient, PendingAirdropId};
use hedera_agent_core::units::display_units;
use hedera_agent_core::{AccountId, LedgerClient, TokenId, TransactionResult};
use tracing::{info, instrument};

use super::required_id;
use crate::error::{require_amount, ActionError, Result};
use crate::params::{AirdropTokenParams, ClaimAirdropParams};

/// A pending airdrop with its token's metadata
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAirdropView {
    /// Raw airdrop record
    pub airdrop: PendingAirdrop,
    /// Metadata of the airdropped token
    pub details: TokenDetails,
}

impl PendingAirdropView {
    /// Amount in display units, 1 for an NFT serial
    pub fn display_amount(&self) -> f64 {
        match self.airdrop.amount {
            Some(amount) => display_units(amount, self.details.decimals),
            None => 1.0,
        }
    }
}

/// Airdrop operations
pub struct AirdropService<'a> {
    ledger: &'a dyn LedgerClient,
}

impl<'a> AirdropService<'a> {
    /// Create a service over `ledger`
    pub fn new(ledger: &'a dyn LedgerClient) -> Self {
        Self { ledger }
    }

    /// Airdrop the same display amount to every recipient
    #[instrument(skip(self))]
    pub async fn airdrop(&self, params: &AirdropTokenParams) -> Result<TransactionResult> {
        let token: TokenId = required_id(&params.token_id, "Missing tokenId")?;
        if params.recipients.iter().all(|r| r.trim().is_empty()) {
            return Err(ActionError::missing("Missing recipients"));
        }
        let amount = require_amount(params.amount, "Missing amount to airdrop")?;

        let base = self.ledger.to_base_units(&token, amount).await?;
        let recipients = params
            .recipients
            .iter()
            .filter(|r| !r.trim().is_empty())
            .map(|r| -> Result<AirdropRecipient> {
                Ok(AirdropRecipient {
                    account_id: r.trim().parse()?,
                    amount: base,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let count = recipients.len();
        let result = self
            .ledger
            .airdrop_token(&token, recipients)
            .await?
            .ensure_success()?;
        info!(token = %token, recipients = count, amount = base, "Airdrop executed");
        Ok(result)
    }

    /// Pending airdrops of `account`, with token metadata looked up concurrently
    #[instrument(skip(self))]
    pub async fn pending(&self, account: &str) -> Result<Vec<PendingAirdropView>> {
        let account: AccountId = required_id(account, "No accountId provided")?;

        let airdrops = self.ledger.pending_airdrops(&account).await?;
        let details = try_join_all(
            airdrops
                .iter()
                .map(|airdrop| self.ledger.token_details(&airdrop.token_id)),
        )
        .await?;

        Ok(airdrops
            .into_iter()
            .zip(details)
            .map(|(airdrop, details)| PendingAirdropView { airdrop, details })
            .collect())
    }

    /// Claim an airdrop sent to `receiver`
    #[instrument(skip(self))]
    pub async fn claim(&self, params: &ClaimAirdropParams, receiver: &str) -> Result<TransactionResult> {
        let token_id: TokenId = required_id(&params.token_id, "No tokenId provided")?;
        let sender_id: AccountId = required_id(&params.sender_id, "No senderId provided")?;
        let receiver_id: AccountId = required_id(receiver, "No accountId provided")?;

        let result = self
            .ledger
            .claim_airdrop(PendingAirdropId {
                sender_id,
                receiver_id,
                token_id,
            })
            .await?
            .ensure_success()?;
        info!(token = %token_id, sender = %sender_id, "Airdrop claimed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::{Call, MockLedger};

    #[tokio::test]
    async fn test_airdrop_converts_per_recipient() -> Result<()> {
        let token = TokenId::new(0, 0, 5_425_085);
        let ledger = MockLedger::new().with_token(token, 3);
        AirdropService::new(&ledger)
            .airdrop(&AirdropTokenParams {
                token_id: "0.0.5425085".into(),
                recipients: vec!["0.0.5398121".into(), "0.0.5393967".into()],
                amount: 50.0,
            })
            .await?;

        assert_eq!(
            ledger.calls(),
            vec![Call::Airdrop(
                token,
                vec![
                    AirdropRecipient {
                        account_id: AccountId::new(0, 0, 5_398_121),
                        amount: 50_000
                    },
                    AirdropRecipient {
                        account_id: AccountId::new(0, 0, 5_393_967),
                        amount: 50_000
                    },
                ]
            )]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_airdrop_missing_recipients() {
        let ledger = MockLedger::new();
        let err = AirdropService::new(&ledger)
            .airdrop(&AirdropTokenParams {
                token_id: "0.0.1".into(),
                recipients: vec![],
                amount: 5.0,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing recipients");
    }

    #[tokio::test]
    async fn test_pending_airdrops_with_details() -> Result<()> {
        let token = TokenId::new(0, 0, 5_445_766);
        let mut ledger = MockLedger::new().with_token(token, 2);
        ledger.airdrops = vec![PendingAirdrop {
            sender_id: AccountId::new(0, 0, 5_393_076),
            receiver_id: AccountId::new(0, 0, 1001),
            token_id: token,
            amount: Some(500),
            serial_number: None,
            timestamp: None,
        }];

        let pending = AirdropService::new(&ledger).pending("0.0.1001").await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].display_amount(), 5.0);
        assert_eq!(pending[0].details.symbol, "T5445766");
        Ok(())
    }

    #[tokio::test]
    async fn test_claim_uses_receiver() -> Result<()> {
        let ledger = MockLedger::new();
        AirdropService::new(&ledger)
            .claim(
                &ClaimAirdropParams {
                    sender_id: "0.0.5393076".into(),
                    token_id: "0.0.5445766".into(),
                },
                "0.0.1001",
            )
            .await?;
        assert_eq!(
            ledger.calls(),
            vec![Call::Claim(PendingAirdropId {
                sender_id: AccountId::new(0, 0, 5_393_076),
                receiver_id: AccountId::new(0, 0, 1001),
                token_id: TokenId::new(0, 0, 5_445_766),
            })]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_claim_requires_sender() {
        let ledger = MockLedger::new();
        let err = AirdropService::new(&ledger)
            .claim(
                &ClaimAirdropParams {
                    sender_id: "".into(),
                    token_id: "0.0.1".into(),
                },
                "0.0.1001",
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No senderId provided");
    }
}
