//! Ledger client seam
//!
//! [`MirrorQueries`] covers the read-only queries answered by a mirror node,
//! [`LedgerClient`] adds the transactions that need the operator key. The
//! plugin only talks to these traits; signing and submission belong to
//! whichever implementation the host plugs in. [`ReadOnlyLedger`] serves
//! queries from a mirror node and refuses to submit anything.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{
    AccountId, AirdropRecipient, AllowanceAsset, CreateFtOptions, CreateNftOptions,
    CreateTokenResult, CreateTopicResult, PendingAirdropId, TokenId, TopicId, TransactionResult,
};
use crate::units::{base_units, display_units, Hbar};

/// Token metadata as reported by the mirror node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    /// Token id
    pub token_id: TokenId,
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Decimals, 0 for NFTs
    pub decimals: u32,
    /// `FUNGIBLE_COMMON` or `NON_FUNGIBLE_UNIQUE`
    pub token_type: String,
    /// Total supply in base units
    pub total_supply: Option<u64>,
    /// Max supply in base units, 0 means infinite
    pub max_supply: Option<u64>,
    /// Token memo
    pub memo: Option<String>,
    /// Treasury account
    pub treasury_account_id: Option<AccountId>,
}

/// Balance of one token held by an account, in base units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    /// Token id
    pub token_id: TokenId,
    /// Balance in base units
    pub balance: u64,
}

/// Token balance enriched with token metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedTokenBalance {
    /// Token id
    pub token_id: TokenId,
    /// Token name
    pub token_name: String,
    /// Token symbol
    pub token_symbol: String,
    /// Token decimals
    pub token_decimals: u32,
    /// Balance in base units
    pub balance: u64,
    /// Balance in display units
    pub balance_in_display_unit: f64,
}

impl DetailedTokenBalance {
    /// Combine a raw balance with the token's details
    pub fn new(balance: &TokenBalance, details: &TokenDetails) -> Self {
        Self {
            token_id: balance.token_id,
            token_name: details.name.clone(),
            token_symbol: details.symbol.clone(),
            token_decimals: details.decimals,
            balance: balance.balance,
            balance_in_display_unit: display_units(balance.balance, details.decimals),
        }
    }
}

/// One holder of a token, in base units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHolder {
    /// Holder account
    pub account: AccountId,
    /// Balance in base units
    pub balance: u64,
}

/// An airdrop waiting to be claimed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAirdrop {
    /// Sender
    pub sender_id: AccountId,
    /// Receiver
    pub receiver_id: AccountId,
    /// Token
    pub token_id: TokenId,
    /// Amount in base units, absent for NFTs
    pub amount: Option<u64>,
    /// NFT serial, absent for fungible tokens
    pub serial_number: Option<u64>,
    /// Consensus timestamp the airdrop was created at
    pub timestamp: Option<String>,
}

impl PendingAirdrop {
    /// Identifier used to claim or cancel this airdrop
    pub fn id(&self) -> PendingAirdropId {
        PendingAirdropId {
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            token_id: self.token_id,
        }
    }
}

/// A key attached to a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicKey {
    /// Key algorithm (`ED25519`, `ECDSA_SECP256K1`, `ProtobufEncoded`)
    pub key_type: String,
    /// Hex encoded key
    pub key: String,
}

/// Topic metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicInfo {
    /// Topic id
    pub topic_id: TopicId,
    /// Topic memo
    pub memo: String,
    /// `seconds.nanos` creation timestamp
    pub created_timestamp: Option<String>,
    /// `seconds.nanos` end of the topic's validity, if any
    pub expiration_timestamp: Option<String>,
    /// Admin key
    pub admin_key: Option<TopicKey>,
    /// Submit key
    pub submit_key: Option<TopicKey>,
    /// Whether the topic was deleted
    pub deleted: bool,
}

/// A message posted to a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMessage {
    /// `seconds.nanos` consensus timestamp
    pub consensus_timestamp: String,
    /// Decoded message body
    pub message: String,
    /// Account that paid for the submission
    pub payer_account_id: String,
    /// Sequence number within the topic
    pub sequence_number: u64,
}

/// Inclusive consensus-time bounds in Unix seconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimestampRange {
    /// Lower bound
    pub lower: Option<f64>,
    /// Upper bound
    pub upper: Option<f64>,
}

/// Read-only ledger queries
#[async_trait]
pub trait MirrorQueries: Send + Sync {
    /// HBAR balance of an account
    async fn hbar_balance(&self, account: &AccountId) -> Result<Hbar>;

    /// Token metadata
    async fn token_details(&self, token: &TokenId) -> Result<TokenDetails>;

    /// Balance of one token for an account, 0 when not associated
    async fn token_balance(&self, account: &AccountId, token: &TokenId) -> Result<u64>;

    /// Every token balance of an account
    async fn account_token_balances(&self, account: &AccountId) -> Result<Vec<TokenBalance>>;

    /// Accounts holding a token, optionally at least `min_balance` base units
    async fn token_holders(
        &self,
        token: &TokenId,
        min_balance: Option<u64>,
    ) -> Result<Vec<TokenHolder>>;

    /// Airdrops waiting for `account` to claim them
    async fn pending_airdrops(&self, account: &AccountId) -> Result<Vec<PendingAirdrop>>;

    /// Topic metadata
    async fn topic_info(&self, topic: &TopicId) -> Result<TopicInfo>;

    /// Messages posted to a topic within `range`
    async fn topic_messages(
        &self,
        topic: &TopicId,
        range: TimestampRange,
    ) -> Result<Vec<TopicMessage>>;

    /// Decimals of a token
    async fn token_decimals(&self, token: &TokenId) -> Result<u32> {
        Ok(self.token_details(token).await?.decimals)
    }

    /// Convert a display amount of `token` to base units
    async fn to_base_units(&self, token: &TokenId, display_amount: f64) -> Result<u64> {
        let decimals = self.token_decimals(token).await?;
        base_units(display_amount, decimals)
    }
}

/// Ledger operations that need the operator key
#[async_trait]
pub trait LedgerClient: MirrorQueries {
    /// Send HBAR from the operator account
    async fn transfer_hbar(&self, to: &AccountId, amount: Hbar) -> Result<TransactionResult>;

    /// Send a fungible token from the operator account
    async fn transfer_token(
        &self,
        token: &TokenId,
        to: &AccountId,
        amount: u64,
    ) -> Result<TransactionResult>;

    /// Create a fungible token with the operator as treasury
    async fn create_fungible_token(&self, options: CreateFtOptions) -> Result<CreateTokenResult>;

    /// Create a non-fungible token with the operator as treasury
    async fn create_nft(&self, options: CreateNftOptions) -> Result<CreateTokenResult>;

    /// Mint fungible supply
    async fn mint_token(&self, token: &TokenId, amount: u64) -> Result<TransactionResult>;

    /// Mint one NFT serial
    async fn mint_nft(&self, token: &TokenId, metadata: Vec<u8>) -> Result<TransactionResult>;

    /// Associate the operator account with a token
    async fn associate_token(&self, token: &TokenId) -> Result<TransactionResult>;

    /// Dissociate the operator account from a token
    async fn dissociate_token(&self, token: &TokenId) -> Result<TransactionResult>;

    /// Return a token's full balance to its treasury
    async fn reject_token(&self, token: &TokenId) -> Result<TransactionResult>;

    /// Airdrop a token to several accounts
    async fn airdrop_token(
        &self,
        token: &TokenId,
        recipients: Vec<AirdropRecipient>,
    ) -> Result<TransactionResult>;

    /// Claim a pending airdrop
    async fn claim_airdrop(&self, airdrop: PendingAirdropId) -> Result<TransactionResult>;

    /// Create a topic, optionally restricting submissions to the operator key
    async fn create_topic(&self, memo: &str, is_submit_key: bool) -> Result<CreateTopicResult>;

    /// Delete a topic
    async fn delete_topic(&self, topic: &TopicId) -> Result<TransactionResult>;

    /// Post a message to a topic
    async fn submit_topic_message(&self, topic: &TopicId, message: &str)
        -> Result<TransactionResult>;

    /// Allow `spender` to spend the operator's HBAR or tokens
    async fn approve_allowance(
        &self,
        spender: &AccountId,
        asset: AllowanceAsset,
    ) -> Result<TransactionResult>;
}

/// A ledger that answers queries and rejects transactions
pub struct ReadOnlyLedger<M> {
    mirror: M,
}

impl<M: MirrorQueries> ReadOnlyLedger<M> {
    /// Wrap a query backend
    pub fn new(mirror: M) -> Self {
        Self { mirror }
    }

    /// The wrapped query backend
    pub fn mirror(&self) -> &M {
        &self.mirror
    }

    fn refuse<T>(operation: &str) -> Result<T> {
        Err(Error::not_supported(format!(
            "{} requires a signing ledger client; this host is read-only",
            operation
        )))
    }
}

#[async_trait]
impl<M: MirrorQueries> MirrorQueries for ReadOnlyLedger<M> {
    async fn hbar_balance(&self, account: &AccountId) -> Result<Hbar> {
        self.mirror.hbar_balance(account).await
    }

    async fn token_details(&self, token: &TokenId) -> Result<TokenDetails> {
        self.mirror.token_details(token).await
    }

    async fn token_balance(&self, account: &AccountId, token: &TokenId) -> Result<u64> {
        self.mirror.token_balance(account, token).await
    }

    async fn account_token_balances(&self, account: &AccountId) -> Result<Vec<TokenBalance>> {
        self.mirror.account_token_balances(account).await
    }

    async fn token_holders(
        &self,
        token: &TokenId,
        min_balance: Option<u64>,
    ) -> Result<Vec<TokenHolder>> {
        self.mirror.token_holders(token, min_balance).await
    }

    async fn pending_airdrops(&self, account: &AccountId) -> Result<Vec<PendingAirdrop>> {
        self.mirror.pending_airdrops(account).await
    }

    async fn topic_info(&self, topic: &TopicId) -> Result<TopicInfo> {
        self.mirror.topic_info(topic).await
    }

    async fn topic_messages(
        &self,
        topic: &TopicId,
        range: TimestampRange,
    ) -> Result<Vec<TopicMessage>> {
        self.mirror.topic_messages(topic, range).await
    }
}

#[async_trait]
impl<M: MirrorQueries> LedgerClient for ReadOnlyLedger<M> {
    async fn transfer_hbar(&self, _to: &AccountId, _amount: Hbar) -> Result<TransactionResult> {
        Self::refuse("HBAR transfer")
    }

    async fn transfer_token(
        &self,
        _token: &TokenId,
        _to: &AccountId,
        _amount: u64,
    ) -> Result<TransactionResult> {
        Self::refuse("Token transfer")
    }

    async fn create_fungible_token(&self, _options: CreateFtOptions) -> Result<CreateTokenResult> {
        Self::refuse("Token creation")
    }

    async fn create_nft(&self, _options: CreateNftOptions) -> Result<CreateTokenResult> {
        Self::refuse("NFT creation")
    }

    async fn mint_token(&self, _token: &TokenId, _amount: u64) -> Result<TransactionResult> {
        Self::refuse("Token minting")
    }

    async fn mint_nft(&self, _token: &TokenId, _metadata: Vec<u8>) -> Result<TransactionResult> {
        Self::refuse("NFT minting")
    }

    async fn associate_token(&self, _token: &TokenId) -> Result<TransactionResult> {
        Self::refuse("Token association")
    }

    async fn dissociate_token(&self, _token: &TokenId) -> Result<TransactionResult> {
        Self::refuse("Token dissociation")
    }

    async fn reject_token(&self, _token: &TokenId) -> Result<TransactionResult> {
        Self::refuse("Token rejection")
    }

    async fn airdrop_token(
        &self,
        _token: &TokenId,
        _recipients: Vec<AirdropRecipient>,
    ) -> Result<TransactionResult> {
        Self::refuse("Token airdrop")
    }

    async fn claim_airdrop(&self, _airdrop: PendingAirdropId) -> Result<TransactionResult> {
        Self::refuse("Airdrop claim")
    }

    async fn create_topic(&self, _memo: &str, _is_submit_key: bool) -> Result<CreateTopicResult> {
        Self::refuse("Topic creation")
    }

    async fn delete_topic(&self, _topic: &TopicId) -> Result<TransactionResult> {
        Self::refuse("Topic deletion")
    }

    async fn submit_topic_message(
        &self,
        _topic: &TopicId,
        _message: &str,
    ) -> Result<TransactionResult> {
        Self::refuse("Topic message submission")
    }

    async fn approve_allowance(
        &self,
        _spender: &AccountId,
        _asset: AllowanceAsset,
    ) -> Result<TransactionResult> {
        Self::refuse("Allowance approval")
    }
}
