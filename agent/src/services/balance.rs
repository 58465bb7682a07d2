//! Balance and holder queries

use futures::future::try_join_all;
use hedera_agent_core::ledger::{DetailedTokenBalance, TokenBalance, TokenDetails, TokenHolder};
use hedera_agent_core::units::base_units;
use hedera_agent_core::{AccountId, Hbar, LedgerClient, TokenId};
use tracing::instrument;

use super::required_id;
use crate::error::{require, Result};
use crate::params::{AllBalancesParams, HbarBalanceParams, HtsBalanceParams, TokenHoldersParams};

/// HBAR balance of one account
#[derive(Debug, Clone, PartialEq)]
pub struct HbarBalance {
    /// Queried account
    pub address: AccountId,
    /// Balance
    pub balance: Hbar,
}

/// Token balance of one account
#[derive(Debug, Clone, PartialEq)]
pub struct HtsBalance {
    /// Queried account
    pub address: AccountId,
    /// Balance with token metadata
    pub balance: DetailedTokenBalance,
}

/// Holders of a token with the token's metadata
#[derive(Debug, Clone, PartialEq)]
pub struct HoldersReport {
    /// Token metadata
    pub details: TokenDetails,
    /// Holders, balances in base units
    pub holders: Vec<TokenHolder>,
}

/// Balance queries
pub struct BalanceService<'a> {
    ledger: &'a dyn LedgerClient,
}

impl<'a> BalanceService<'a> {
    /// Create a service over `ledger`
    pub fn new(ledger: &'a dyn LedgerClient) -> Self {
        Self { ledger }
    }

    /// HBAR balance of `params.address`
    #[instrument(skip(self))]
    pub async fn hbar_balance(&self, params: &HbarBalanceParams) -> Result<HbarBalance> {
        let address: AccountId = required_id(&params.address, "No receiver address")?;
        require(&params.symbol, "No symbol")?;

        let balance = self.ledger.hbar_balance(&address).await?;
        Ok(HbarBalance { address, balance })
    }

    /// Balance of one token for `params.address`
    #[instrument(skip(self))]
    pub async fn hts_balance(&self, params: &HtsBalanceParams) -> Result<HtsBalance> {
        let token: TokenId = required_id(&params.token_id, "Missing tokenId")?;
        let address: AccountId = required_id(&params.address, "No receiver address")?;

        let (raw, details) = futures::try_join!(
            self.ledger.token_balance(&address, &token),
            self.ledger.token_details(&token),
        )?;
        let raw = TokenBalance {
            token_id: token,
            balance: raw,
        };
        let balance = DetailedTokenBalance::new(&raw, &details);
        Ok(HtsBalance { address, balance })
    }

    /// Every token balance of an account, enriched with token metadata
    #[instrument(skip(self))]
    pub async fn all_balances(&self, params: &AllBalancesParams) -> Result<Vec<DetailedTokenBalance>> {
        let address: AccountId =
            required_id(params.address.as_deref().unwrap_or_default(), "No receiver address")?;

        let balances = self.ledger.account_token_balances(&address).await?;
        let details = try_join_all(
            balances
                .iter()
                .map(|balance| self.ledger.token_details(&balance.token_id)),
        )
        .await?;

        Ok(balances
            .iter()
            .zip(details.iter())
            .map(|(balance, details)| DetailedTokenBalance::new(balance, details))
            .collect())
    }

    /// Holders of a token, optionally above a display-unit threshold
    #[instrument(skip(self))]
    pub async fn token_holders(&self, params: &TokenHoldersParams) -> Result<HoldersReport> {
        let token: TokenId = required_id(&params.token_id, "No token id provided!")?;

        let details = self.ledger.token_details(&token).await?;
        let min_balance = params
            .threshold
            .map(|threshold| base_units(threshold, details.decimals))
            .transpose()?;

        let holders = self.ledger.token_holders(&token, min_balance).await?;
        Ok(HoldersReport { details, holders })
    }
}
