//! Token lifecycle: creation, minting, association and rejection

use hedera_agent_core::types::{CreateFtOptions, CreateNftOptions, CreateTokenResult};
use hedera_agent_core::units::base_units;
use hedera_agent_core::{LedgerClient, TokenId, TransactionResult};
use tracing::{info, instrument};

use super::required_id;
use crate::error::{require, require_amount, ActionError, Result};
use crate::params::{
    CreateNftParams, CreateTokenParams, MintNftParams, MintTokenParams, RejectTokenParams,
    TokenAssociationParams,
};

/// Token operations on behalf of the operator account
pub struct TokenService<'a> {
    ledger: &'a dyn LedgerClient,
}

fn whole_number(value: f64, missing: &str) -> Result<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as u32)
    } else {
        Err(ActionError::missing(missing))
    }
}

impl<'a> TokenService<'a> {
    /// Create a service over `ledger`
    pub fn new(ledger: &'a dyn LedgerClient) -> Self {
        Self { ledger }
    }

    /// Create a fungible token; the initial supply is scaled by the requested decimals
    #[instrument(skip(self))]
    pub async fn create_fungible_token(&self, params: &CreateTokenParams) -> Result<CreateTokenResult> {
        let name = require(&params.name, "Missing name of token")?;
        let symbol = require(&params.symbol, "Missing symbol of token")?;
        let decimals = whole_number(params.decimals, "Missing decimals of token")?;
        if !params.initial_supply.is_finite() || params.initial_supply < 0.0 {
            return Err(ActionError::missing("Missing initial supply of token"));
        }

        let options = CreateFtOptions {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            initial_supply: base_units(params.initial_supply, decimals)?,
            is_supply_key: params.is_supply_key,
            is_metadata_key: params.is_metadata_key,
            is_admin_key: params.is_admin_key,
            token_metadata: params.token_metadata.clone().into_bytes(),
            memo: params.memo.clone(),
        };

        let result = self
            .ledger
            .create_fungible_token(options)
            .await?
            .ensure_success()?;
        info!(token = %result.token_id, "Fungible token created");
        Ok(result)
    }

    /// Create a non-fungible token, infinite supply when no positive max is given
    #[instrument(skip(self))]
    pub async fn create_nft(&self, params: &CreateNftParams) -> Result<CreateTokenResult> {
        let name = require(&params.name, "Missing name of token")?;
        let symbol = require(&params.symbol, "Missing symbol of token")?;
        let max_supply = match params.max_supply {
            Some(max) if max > 0.0 => Some(base_units(max, 0)?),
            _ => None,
        };

        let options = CreateNftOptions {
            name: name.to_string(),
            symbol: symbol.to_string(),
            max_supply,
            is_metadata_key: params.is_metadata_key,
            is_admin_key: params.is_admin_key,
            token_metadata: params.token_metadata.clone().into_bytes(),
            memo: params.memo.clone(),
        };

        let result = self.ledger.create_nft(options).await?.ensure_success()?;
        info!(token = %result.token_id, "NFT token created");
        Ok(result)
    }

    /// Mint fungible supply, converting with the token's decimals
    #[instrument(skip(self))]
    pub async fn mint_token(&self, params: &MintTokenParams) -> Result<TransactionResult> {
        let token: TokenId = required_id(&params.token_id, "Missing tokenId")?;
        let amount = require_amount(params.amount, "Missing amount")?;

        let base = self.ledger.to_base_units(&token, amount).await?;
        let result = self.ledger.mint_token(&token, base).await?.ensure_success()?;
        info!(token = %token, amount = base, "Tokens minted");
        Ok(result)
    }

    /// Mint one NFT with the given metadata
    #[instrument(skip(self))]
    pub async fn mint_nft(&self, params: &MintNftParams) -> Result<TransactionResult> {
        let token: TokenId = required_id(&params.token_id, "Missing tokenId")?;
        let metadata = require(&params.token_metadata, "Missing NFT metadata")?;

        let result = self
            .ledger
            .mint_nft(&token, metadata.as_bytes().to_vec())
            .await?
            .ensure_success()?;
        info!(token = %token, "NFT minted");
        Ok(result)
    }

    /// Associate the operator account with a token
    #[instrument(skip(self))]
    pub async fn associate(&self, params: &TokenAssociationParams) -> Result<TransactionResult> {
        let token: TokenId = required_id(params.token_id.as_deref().unwrap_or_default(), "No token id")?;
        Ok(self.ledger.associate_token(&token).await?.ensure_success()?)
    }

    /// Dissociate the operator account from a token
    #[instrument(skip(self))]
    pub async fn dissociate(&self, params: &TokenAssociationParams) -> Result<TransactionResult> {
        let token: TokenId = required_id(params.token_id.as_deref().unwrap_or_default(), "No token id")?;
        Ok(self.ledger.dissociate_token(&token).await?.ensure_success()?)
    }

    /// Send the operator's whole balance of a token back to its treasury
    #[instrument(skip(self))]
    pub async fn reject(&self, params: &RejectTokenParams) -> Result<TransactionResult> {
        let token: TokenId = required_id(&params.token_id, "Missing tokenId")?;
        Ok(self.ledger.reject_token(&token).await?.ensure_success()?)
    }
}
