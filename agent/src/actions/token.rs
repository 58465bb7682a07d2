//! Token lifecycle actions

use async_trait::async_trait;
use serde_json::json;

use super::{Action, ActionContext, ActionMeta};
use crate::error::Result;
use crate::params::{
    CreateNftParams, CreateTokenParams, MintNftParams, MintTokenParams, RejectTokenParams,
    TokenAssociationParams,
};
use crate::runtime::Content;
use crate::services::TokenService;
use crate::templates;

static CREATE_TOKEN: ActionMeta = ActionMeta {
    name: "HEDERA_CREATE_TOKEN",
    similes: &[
        "HEDERA_NEW_TOKEN",
        "HEDERA_CREATE_NEW_TOKEN",
        "HEDERA_NEW_FUNGIBLE_TOKEN",
    ],
    description: "Creates a new fungible token on the Hedera Token Service",
    template: templates::CREATE_TOKEN,
    examples: &[
        "Create token GameGold with symbol GG, 2 decimal places, and starting supply of 750000",
        "Create token Hello World with symbol HW, 4 decimal places, starting supply of 100000, supply key enabled and memo 'This is a memo'",
    ],
    failure: "token creation",
    writes: true,
};

static CREATE_NFT_TOKEN: ActionMeta = ActionMeta {
    name: "HEDERA_CREATE_NFT_TOKEN",
    similes: &[
        "HEDERA_NEW_NFT_TOKEN",
        "HEDERA_CREATE_NEW_NFT",
        "HEDERA_NEW_NON_FUNGIBLE_TOKEN",
    ],
    description: "Creates a new non-fungible token on the Hedera Token Service",
    template: templates::CREATE_NFT_TOKEN,
    examples: &[
        "Create NFT token with name MyNFT and symbol MNFT",
        "Create NFT token Lions with symbol LION, max supply 100 and metadata key",
    ],
    failure: "NFT token creation",
    writes: true,
};

static MINT_TOKEN: ActionMeta = ActionMeta {
    name: "HEDERA_MINT_TOKEN",
    similes: &[
        "HEDERA_MINT_TOKEN_ACTION",
        "HEDERA_MINT_FUNGIBLE_TOKEN",
        "HCS_MINT_TOKEN",
    ],
    description: "Mints additional supply of a fungible token",
    template: templates::MINT_TOKEN,
    examples: &["Mint 2500 tokens 0.0.999888", "Generate 150 tokens 0.0.567123"],
    failure: "minting tokens",
    writes: true,
};

static MINT_NFT_TOKEN: ActionMeta = ActionMeta {
    name: "HEDERA_MINT_NFT_TOKEN",
    similes: &[
        "HEDERA_MINT_NFT_TOKEN_ACTION",
        "HEDERA_MINT_NON_FUNGIBLE_TOKEN",
        "HCS_MINT_NFT",
    ],
    description: "Mints a single NFT with the given metadata",
    template: templates::MINT_NFT_TOKEN,
    examples: &[
        "Mint NFT 0.0.5478757. Set it's metadata to 'https://example.com/nft-image.png'.",
        "Mint NFT 0.0.5512318 with metadata 'Testing this nft'",
    ],
    failure: "minting NFT",
    writes: true,
};

static ASSOCIATE_TOKEN: ActionMeta = ActionMeta {
    name: "HEDERA_ASSOCIATE_TOKEN",
    similes: &["HEDERA_ASSOCIATE_HTS"],
    description: "Associates the agent's account with a token so it can receive it",
    template: templates::ASSOCIATE_TOKEN,
    examples: &[
        "Associate my wallet with token 0.0.123456.",
        "Can you link my wallet to token 0.0.654321?",
    ],
    failure: "associating token",
    writes: true,
};

static DISSOCIATE_TOKEN: ActionMeta = ActionMeta {
    name: "HEDERA_DISSOCIATE_TOKEN",
    similes: &["HEDERA_DISSOCIATE_HTS", "HEDERA_UNLINK_TOKEN"],
    description: "Removes the association between the agent's account and a token",
    template: templates::DISSOCIATE_TOKEN,
    examples: &[
        "Disassociate my wallet from token 0.0.123456.",
        "Detach token 0.0.777888 from my wallet.",
    ],
    failure: "dissociating token",
    writes: true,
};

static REJECT_TOKEN: ActionMeta = ActionMeta {
    name: "HEDERA_REJECT_TOKEN",
    similes: &["HEDERA_REJECT_AIRDROP", "HEDERA_REJECT_HTS", "REJECT_HTS"],
    description: "Returns an unwanted token to its treasury",
    template: templates::REJECT_TOKEN,
    examples: &[
        "Reject token 0.0.5424086.",
        "I don't want to accept the token 0.0.542086 from airdrop. Reject it.",
    ],
    failure: "rejecting token",
    writes: true,
};

fn flag(enabled: bool) -> &'static str {
    if enabled {
        "Enabled"
    } else {
        "not set"
    }
}

fn or_not_set(value: &str) -> &str {
    if value.is_empty() {
        "not set"
    } else {
        value
    }
}

fn fungible_details(params: &CreateTokenParams) -> String {
    [
        format!("Name: {}", params.name),
        format!("Symbol: {}", params.symbol),
        format!("Decimals: {}", params.decimals),
        format!("Initial supply: {}", params.initial_supply),
        format!("Supply Key: {}", flag(params.is_supply_key)),
        format!("Metadata Key: {}", flag(params.is_metadata_key)),
        format!("Admin Key: {}", flag(params.is_admin_key)),
        format!("Token Metadata: {}", or_not_set(&params.token_metadata)),
        format!("Memo: {}", or_not_set(&params.memo)),
    ]
    .join("\n")
}

fn nft_details(params: &CreateNftParams) -> String {
    let max_supply = match params.max_supply {
        Some(max) if max > 0.0 => max.to_string(),
        _ => "not set".to_string(),
    };
    [
        format!("Name: {}", params.name),
        format!("Symbol: {}", params.symbol),
        format!("Max Supply: {}", max_supply),
        format!("Metadata Key: {}", flag(params.is_metadata_key)),
        format!("Admin Key: {}", flag(params.is_admin_key)),
        format!("Token Metadata: {}", or_not_set(&params.token_metadata)),
        format!("Memo: {}", or_not_set(&params.memo)),
    ]
    .join("\n")
}

/// `HEDERA_CREATE_TOKEN`
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateTokenAction;

#[async_trait]
impl Action for CreateTokenAction {
    type Params = CreateTokenParams;

    fn meta(&self) -> &'static ActionMeta {
        &CREATE_TOKEN
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TokenService::new(ctx.ledger)
            .create_fungible_token(&params)
            .await?;

        let text = [
            "Created a new fungible token!".to_string(),
            format!("Token ID: {}", result.token_id),
            String::new(),
            "Details:".to_string(),
            fungible_details(&params),
            String::new(),
            format!("Transaction link: {}", ctx.tx_link(&result.tx_hash)),
        ]
        .join("\n");

        Ok(Content::text(text).with_payload(json!({
            "success": true,
            "tokenId": result.token_id,
            "txHash": result.tx_hash,
        })))
    }
}

/// `HEDERA_CREATE_NFT_TOKEN`
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateNftAction;

#[async_trait]
impl Action for CreateNftAction {
    type Params = CreateNftParams;

    fn meta(&self) -> &'static ActionMeta {
        &CREATE_NFT_TOKEN
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TokenService::new(ctx.ledger).create_nft(&params).await?;

        Ok(Content::text(format!(
            "Created new NFT token with id: {}\n\nDetails:\n{}\n\nTransaction link: {}",
            result.token_id,
            nft_details(&params),
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "tokenId": result.token_id,
            "txHash": result.tx_hash,
        })))
    }
}

/// `HEDERA_MINT_TOKEN`
#[derive(Debug, Clone, Copy, Default)]
pub struct MintTokenAction;

#[async_trait]
impl Action for MintTokenAction {
    type Params = MintTokenParams;

    fn meta(&self) -> &'static ActionMeta {
        &MINT_TOKEN
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TokenService::new(ctx.ledger).mint_token(&params).await?;

        Ok(Content::text(format!(
            "Successfully minted {} of tokens {}\nTransaction link: {}",
            params.amount,
            params.token_id.trim(),
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "tokenId": params.token_id.trim(),
            "amount": params.amount,
            "txHash": result.tx_hash,
        })))
    }
}

/// `HEDERA_MINT_NFT_TOKEN`
#[derive(Debug, Clone, Copy, Default)]
pub struct MintNftAction;

#[async_trait]
impl Action for MintNftAction {
    type Params = MintNftParams;

    fn meta(&self) -> &'static ActionMeta {
        &MINT_NFT_TOKEN
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TokenService::new(ctx.ledger).mint_nft(&params).await?;

        Ok(Content::text(format!(
            "Successfully minted NFT {}\nTransaction link: {}",
            params.token_id.trim(),
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "tokenId": params.token_id.trim(),
            "txHash": result.tx_hash,
        })))
    }
}

/// `HEDERA_ASSOCIATE_TOKEN`
#[derive(Debug, Clone, Copy, Default)]
pub struct AssociateTokenAction;

#[async_trait]
impl Action for AssociateTokenAction {
    type Params = TokenAssociationParams;

    fn meta(&self) -> &'static ActionMeta {
        &ASSOCIATE_TOKEN
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TokenService::new(ctx.ledger).associate(&params).await?;
        let token = params.token_id.as_deref().unwrap_or_default().trim();

        Ok(Content::text(format!(
            "Token {} has been associated with the account.\nTransaction link: {}",
            token,
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "tokenId": token,
            "txHash": result.tx_hash,
        })))
    }
}

/// `HEDERA_DISSOCIATE_TOKEN`
#[derive(Debug, Clone, Copy, Default)]
pub struct DissociateTokenAction;

#[async_trait]
impl Action for DissociateTokenAction {
    type Params = TokenAssociationParams;

    fn meta(&self) -> &'static ActionMeta {
        &DISSOCIATE_TOKEN
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TokenService::new(ctx.ledger).dissociate(&params).await?;
        let token = params.token_id.as_deref().unwrap_or_default().trim();

        Ok(Content::text(format!(
            "Token {} has been dissociated from the account.\nTransaction link: {}",
            token,
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "tokenId": token,
            "txHash": result.tx_hash,
        })))
    }
}

/// `HEDERA_REJECT_TOKEN`
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectTokenAction;

#[async_trait]
impl Action for RejectTokenAction {
    type Params = RejectTokenParams;

    fn meta(&self) -> &'static ActionMeta {
        &REJECT_TOKEN
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TokenService::new(ctx.ledger).reject(&params).await?;

        Ok(Content::text(format!(
            "Successfully rejected token: {}.\nTransaction link: {}",
            params.token_id.trim(),
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "tokenId": params.token_id.trim(),
            "txHash": result.tx_hash,
        })))
    }
}
