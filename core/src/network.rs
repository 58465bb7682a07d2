//! Signing ledger client over the Hedera SDK
//!
//! [`NetworkLedger`] submits every write as one SDK transaction signed by the
//! operator key and waits for its receipt. Queries are answered by the
//! wrapped [`MirrorQueries`] backend, normally a [`MirrorNodeClient`].
//!
//! A receipt that reports anything other than `SUCCESS` is returned as a
//! result carrying that status; the caller decides whether it is an error.
//!
//! # Example
//!
//! ```no_run
//! use hedera_agent_core::ledger::LedgerClient;
//! use hedera_agent_core::network::NetworkLedger;
//! use hedera_agent_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = PluginConfig::from_file("config.yaml")?;
//!     let credentials = config.validate()?;
//!     let mirror = MirrorNodeClient::from_config(&config.mirror, credentials.network)?;
//!
//!     let ledger = NetworkLedger::new(&credentials, mirror);
//!     let result = ledger
//!         .transfer_hbar(&"0.0.2".parse()?, Hbar::from_hbar(1.0)?)
//!         .await?;
//!     println!("{} {}", result.status, result.tx_hash);
//!     Ok(())
//! }
//! ```
//!
//! [`MirrorNodeClient`]: crate::mirror::MirrorNodeClient

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::config::HederaCredentials;
use crate::error::{Error, Result};
use crate::keypair::PrivateKey;
use crate::ledger::{
    LedgerClient, MirrorQueries, PendingAirdrop, TimestampRange, TokenBalance, TokenDetails,
    TokenHolder, TopicInfo, TopicMessage,
};
use crate::types::{
    AccountId, AirdropRecipient, AllowanceAsset, CreateFtOptions, CreateNftOptions,
    CreateTokenResult, CreateTopicResult, NetworkType, PendingAirdropId, TokenId, TopicId,
    TransactionResult, TxStatus,
};
use crate::units::Hbar;

/// Receipt of a submitted transaction
struct Settled {
    status: TxStatus,
    tx_hash: String,
    receipt: Option<hedera::TransactionReceipt>,
}

impl Settled {
    fn into_result(self) -> TransactionResult {
        TransactionResult {
            status: self.status,
            tx_hash: self.tx_hash,
        }
    }

    /// Receipt of a successful transaction, the status as an error otherwise
    fn receipt(&self) -> Result<&hedera::TransactionReceipt> {
        self.receipt.as_ref().ok_or_else(|| {
            Error::transaction(format!("transaction finished with status {}", self.status))
        })
    }
}

/// Ledger client signing with the operator key
pub struct NetworkLedger<M> {
    client: hedera::Client,
    operator: AccountId,
    operator_key: PrivateKey,
    mirror: M,
}

impl<M: MirrorQueries> NetworkLedger<M> {
    /// Client for the operator's network, answering queries from `mirror`
    pub fn new(credentials: &HederaCredentials, mirror: M) -> Self {
        let client = match credentials.network {
            NetworkType::Mainnet => hedera::Client::for_mainnet(),
            NetworkType::Testnet => hedera::Client::for_testnet(),
            NetworkType::Previewnet => hedera::Client::for_previewnet(),
        };
        client.set_operator(
            sdk_account(&credentials.account_id),
            credentials.private_key.signer().clone(),
        );

        Self {
            client,
            operator: credentials.account_id,
            operator_key: credentials.private_key.clone(),
            mirror,
        }
    }

    /// Operator account paying for and signing transactions
    pub fn operator(&self) -> AccountId {
        self.operator
    }

    /// The wrapped query backend
    pub fn mirror(&self) -> &M {
        &self.mirror
    }

    fn operator_sdk(&self) -> hedera::AccountId {
        sdk_account(&self.operator)
    }

    async fn settle(&self, response: hedera::TransactionResponse) -> Result<Settled> {
        let tx_hash = response.transaction_id.to_string();
        match response.get_receipt(&self.client).await {
            Ok(receipt) => Ok(Settled {
                status: status_of(receipt.status),
                tx_hash,
                receipt: Some(receipt),
            }),
            Err(hedera::Error::ReceiptStatus { status, .. }) => Ok(Settled {
                status: status_of(status),
                tx_hash,
                receipt: None,
            }),
            Err(err) => Err(err.into()),
        }
    }
}

fn sdk_account(id: &AccountId) -> hedera::AccountId {
    hedera::AccountId::new(id.0.shard, id.0.realm, id.0.num)
}

fn sdk_token(id: &TokenId) -> hedera::TokenId {
    hedera::TokenId::new(id.0.shard, id.0.realm, id.0.num)
}

fn sdk_topic(id: &TopicId) -> hedera::TopicId {
    hedera::TopicId::new(id.0.shard, id.0.realm, id.0.num)
}

fn status_of(status: hedera::Status) -> TxStatus {
    TxStatus::from(status.as_str_name().to_string())
}

/// Base units as the signed amount a transfer leg carries
fn signed(amount: u64) -> Result<i64> {
    i64::try_from(amount)
        .map_err(|_| Error::invalid_amount(format!("{} exceeds the largest transferable amount", amount)))
}

fn sdk_hbar(amount: Hbar) -> Result<hedera::Hbar> {
    Ok(hedera::Hbar::from_tinybars(signed(amount.to_tinybars())?))
}

#[async_trait]
impl<M: MirrorQueries> MirrorQueries for NetworkLedger<M> {
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
impl<M: MirrorQueries> LedgerClient for NetworkLedger<M> {
    #[instrument(skip(self))]
    async fn transfer_hbar(&self, to: &AccountId, amount: Hbar) -> Result<TransactionResult> {
        let tinybars = signed(amount.to_tinybars())?;
        let response = hedera::TransferTransaction::new()
            .hbar_transfer(self.operator_sdk(), hedera::Hbar::from_tinybars(-tinybars))
            .hbar_transfer(sdk_account(to), hedera::Hbar::from_tinybars(tinybars))
            .execute(&self.client)
            .await?;
        let settled = self.settle(response).await?;
        info!(status = %settled.status, tx = %settled.tx_hash, "HBAR transfer submitted");
        Ok(settled.into_result())
    }

    #[instrument(skip(self))]
    async fn transfer_token(
        &self,
        token: &TokenId,
        to: &AccountId,
        amount: u64,
    ) -> Result<TransactionResult> {
        let amount = signed(amount)?;
        let response = hedera::TransferTransaction::new()
            .token_transfer(sdk_token(token), self.operator_sdk(), -amount)
            .token_transfer(sdk_token(token), sdk_account(to), amount)
            .execute(&self.client)
            .await?;
        let settled = self.settle(response).await?;
        info!(status = %settled.status, tx = %settled.tx_hash, "Token transfer submitted");
        Ok(settled.into_result())
    }

    #[instrument(skip(self, options), fields(name = %options.name, symbol = %options.symbol))]
    async fn create_fungible_token(&self, options: CreateFtOptions) -> Result<CreateTokenResult> {
        let key = self.operator_key.public_key();
        let mut tx = hedera::TokenCreateTransaction::new();
        tx.name(options.name)
            .symbol(options.symbol)
            .decimals(options.decimals)
            .initial_supply(options.initial_supply)
            .treasury_account_id(self.operator_sdk())
            .token_type(hedera::TokenType::FungibleCommon)
            .token_memo(options.memo)
            .metadata(options.token_metadata);
        if options.is_supply_key {
            tx.supply_key(key.clone());
        }
        if options.is_metadata_key {
            tx.metadata_key(key.clone());
        }
        if options.is_admin_key {
            tx.admin_key(key);
        }

        let response = tx.execute(&self.client).await?;
        let settled = self.settle(response).await?;
        let token_id = created_token(settled.receipt()?)?;
        info!(token = %token_id, tx = %settled.tx_hash, "Fungible token created");
        Ok(CreateTokenResult {
            status: settled.status,
            tx_hash: settled.tx_hash,
            token_id,
        })
    }

    #[instrument(skip(self, options), fields(name = %options.name, symbol = %options.symbol))]
    async fn create_nft(&self, options: CreateNftOptions) -> Result<CreateTokenResult> {
        let key = self.operator_key.public_key();
        let mut tx = hedera::TokenCreateTransaction::new();
        tx.name(options.name)
            .symbol(options.symbol)
            .treasury_account_id(self.operator_sdk())
            .token_type(hedera::TokenType::NonFungibleUnique)
            .supply_key(key.clone())
            .token_memo(options.memo)
            .metadata(options.token_metadata);
        match options.max_supply {
            Some(max_supply) => {
                tx.token_supply_type(hedera::TokenSupplyType::Finite)
                    .max_supply(max_supply);
            }
            None => {
                tx.token_supply_type(hedera::TokenSupplyType::Infinite);
            }
        }
        if options.is_metadata_key {
            tx.metadata_key(key.clone());
        }
        if options.is_admin_key {
            tx.admin_key(key);
        }

        let response = tx.execute(&self.client).await?;
        let settled = self.settle(response).await?;
        let token_id = created_token(settled.receipt()?)?;
        info!(token = %token_id, tx = %settled.tx_hash, "NFT token created");
        Ok(CreateTokenResult {
            status: settled.status,
            tx_hash: settled.tx_hash,
            token_id,
        })
    }

    #[instrument(skip(self))]
    async fn mint_token(&self, token: &TokenId, amount: u64) -> Result<TransactionResult> {
        let response = hedera::TokenMintTransaction::new()
            .token_id(sdk_token(token))
            .amount(amount)
            .execute(&self.client)
            .await?;
        Ok(self.settle(response).await?.into_result())
    }

    #[instrument(skip(self, metadata))]
    async fn mint_nft(&self, token: &TokenId, metadata: Vec<u8>) -> Result<TransactionResult> {
        let response = hedera::TokenMintTransaction::new()
            .token_id(sdk_token(token))
            .metadata(vec![metadata])
            .execute(&self.client)
            .await?;
        Ok(self.settle(response).await?.into_result())
    }

    #[instrument(skip(self))]
    async fn associate_token(&self, token: &TokenId) -> Result<TransactionResult> {
        let response = hedera::TokenAssociateTransaction::new()
            .account_id(self.operator_sdk())
            .token_ids([sdk_token(token)])
            .execute(&self.client)
            .await?;
        Ok(self.settle(response).await?.into_result())
    }

    #[instrument(skip(self))]
    async fn dissociate_token(&self, token: &TokenId) -> Result<TransactionResult> {
        let response = hedera::TokenDissociateTransaction::new()
            .account_id(self.operator_sdk())
            .token_ids([sdk_token(token)])
            .execute(&self.client)
            .await?;
        Ok(self.settle(response).await?.into_result())
    }

    #[instrument(skip(self))]
    async fn reject_token(&self, token: &TokenId) -> Result<TransactionResult> {
        let response = hedera::TokenRejectTransaction::new()
            .owner(self.operator_sdk())
            .token_ids([sdk_token(token)])
            .execute(&self.client)
            .await?;
        Ok(self.settle(response).await?.into_result())
    }

    #[instrument(skip(self, recipients), fields(recipients = recipients.len()))]
    async fn airdrop_token(
        &self,
        token: &TokenId,
        recipients: Vec<AirdropRecipient>,
    ) -> Result<TransactionResult> {
        let token = sdk_token(token);
        let mut tx = hedera::TokenAirdropTransaction::new();
        let mut total: i64 = 0;
        for recipient in &recipients {
            let amount = signed(recipient.amount)?;
            total = total
                .checked_add(amount)
                .ok_or_else(|| Error::invalid_amount("airdrop total overflows"))?;
            tx.token_transfer(token, sdk_account(&recipient.account_id), amount);
        }
        tx.token_transfer(token, self.operator_sdk(), -total);

        let response = tx.execute(&self.client).await?;
        Ok(self.settle(response).await?.into_result())
    }

    #[instrument(skip(self))]
    async fn claim_airdrop(&self, airdrop: PendingAirdropId) -> Result<TransactionResult> {
        let pending = hedera::PendingAirdropId::new_token_id(
            sdk_account(&airdrop.sender_id),
            sdk_account(&airdrop.receiver_id),
            sdk_token(&airdrop.token_id),
        );
        let response = hedera::TokenClaimAirdropTransaction::new()
            .add_pending_airdrop_id(pending)
            .execute(&self.client)
            .await?;
        Ok(self.settle(response).await?.into_result())
    }

    #[instrument(skip(self))]
    async fn create_topic(&self, memo: &str, is_submit_key: bool) -> Result<CreateTopicResult> {
        let key = self.operator_key.public_key();
        let mut tx = hedera::TopicCreateTransaction::new();
        tx.topic_memo(memo).admin_key(key.clone());
        if is_submit_key {
            tx.submit_key(key);
        }

        let response = tx.execute(&self.client).await?;
        let settled = self.settle(response).await?;
        let topic_id = settled
            .receipt()?
            .topic_id
            .map(|id| TopicId::new(id.shard, id.realm, id.num))
            .ok_or_else(|| Error::transaction("receipt carries no topic id"))?;
        info!(topic = %topic_id, tx = %settled.tx_hash, "Topic created");
        Ok(CreateTopicResult {
            status: settled.status,
            tx_hash: settled.tx_hash,
            topic_id,
        })
    }

    #[instrument(skip(self))]
    async fn delete_topic(&self, topic: &TopicId) -> Result<TransactionResult> {
        let response = hedera::TopicDeleteTransaction::new()
            .topic_id(sdk_topic(topic))
            .execute(&self.client)
            .await?;
        Ok(self.settle(response).await?.into_result())
    }

    #[instrument(skip(self, message))]
    async fn submit_topic_message(
        &self,
        topic: &TopicId,
        message: &str,
    ) -> Result<TransactionResult> {
        let response = hedera::TopicMessageSubmitTransaction::new()
            .topic_id(sdk_topic(topic))
            .message(message.as_bytes().to_vec())
            .execute(&self.client)
            .await?;
        Ok(self.settle(response).await?.into_result())
    }

    #[instrument(skip(self))]
    async fn approve_allowance(
        &self,
        spender: &AccountId,
        asset: AllowanceAsset,
    ) -> Result<TransactionResult> {
        let mut tx = hedera::AccountAllowanceApproveTransaction::new();
        match asset {
            AllowanceAsset::Hbar { amount } => {
                tx.approve_hbar_allowance(self.operator_sdk(), sdk_account(spender), sdk_hbar(amount)?);
            }
            AllowanceAsset::Token { token_id, amount } => {
                tx.approve_token_allowance(
                    sdk_token(&token_id),
                    self.operator_sdk(),
                    sdk_account(spender),
                    amount,
                );
            }
        }

        let response = tx.execute(&self.client).await?;
        Ok(self.settle(response).await?.into_result())
    }
}

fn created_token(receipt: &hedera::TransactionReceipt) -> Result<TokenId> {
    receipt
        .token_id
        .map(|id| TokenId::new(id.shard, id.realm, id.num))
        .ok_or_else(|| Error::transaction("receipt carries no token id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MirrorConfig;
    use crate::mirror::MirrorNodeClient;
    use crate::types::KeyType;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "302e020100300506032b657004220420b3d2f7a5bb4e2c8f5d1e7c3a9b6f0e2d4c8a1b3e5f7d9c0a2b4e6f8a1c3d5e7f";

    fn credentials() -> HederaCredentials {
        HederaCredentials {
            account_id: AccountId::new(0, 0, 1001),
            private_key: PrivateKey::from_str_with_type(KEY, KeyType::Ed25519).unwrap(),
            public_key: None,
            network: NetworkType::Testnet,
        }
    }

    fn ledger(url: &str) -> NetworkLedger<MirrorNodeClient> {
        let mirror = MirrorNodeClient::from_config(
            &MirrorConfig {
                url: Some(url.to_string()),
                ..MirrorConfig::default()
            },
            NetworkType::Testnet,
        )
        .unwrap();
        NetworkLedger::new(&credentials(), mirror)
    }

    #[test]
    fn test_id_conversion() {
        let account = sdk_account(&AccountId::new(0, 0, 1001));
        assert_eq!(account.to_string(), "0.0.1001");
        assert_eq!(sdk_token(&TokenId::new(0, 0, 77)).to_string(), "0.0.77");
        assert_eq!(sdk_topic(&TopicId::new(1, 2, 3)).to_string(), "1.2.3");
    }

    #[test]
    fn test_receipt_status_names() {
        assert_eq!(status_of(hedera::Status::Success), TxStatus::Success);
        assert_eq!(
            status_of(hedera::Status::InsufficientAccountBalance),
            TxStatus::Other("INSUFFICIENT_ACCOUNT_BALANCE".into())
        );
    }

    #[test]
    fn test_signed_amounts() {
        assert_eq!(signed(5).unwrap(), 5);
        assert!(matches!(signed(u64::MAX), Err(Error::InvalidAmount(_))));
        assert_eq!(
            sdk_hbar(Hbar::from_tinybars(250)).unwrap(),
            hedera::Hbar::from_tinybars(250)
        );
    }

    #[test]
    fn test_failed_receipt_has_no_token() {
        let settled = Settled {
            status: TxStatus::Other("TOKEN_HAS_NO_SUPPLY_KEY".into()),
            tx_hash: "0.0.1001@1700000000.000000001".into(),
            receipt: None,
        };
        assert_eq!(
            settled.receipt().unwrap_err().to_string(),
            "Transaction error: transaction finished with status TOKEN_HAS_NO_SUPPLY_KEY"
        );
        let result = settled.into_result();
        assert!(!result.status.is_success());
        assert_eq!(result.tx_hash, "0.0.1001@1700000000.000000001");
    }

    #[tokio::test]
    async fn test_queries_go_to_mirror() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/0.0.1001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "account": "0.0.1001",
                "balance": { "balance": 250_000_000u64, "tokens": [] }
            })))
            .mount(&server)
            .await;

        let ledger = ledger(&server.uri());
        assert_eq!(ledger.operator(), AccountId::new(0, 0, 1001));
        let balance = ledger.hbar_balance(&ledger.operator()).await.unwrap();
        assert_eq!(balance, Hbar::from_tinybars(250_000_000));
    }

    #[tokio::test]
    async fn test_oversized_transfer_rejected_before_submission() {
        let ledger = ledger("http://127.0.0.1:9");
        let err = ledger
            .transfer_token(&TokenId::new(0, 0, 77), &AccountId::new(0, 0, 2), u64::MAX)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));
    }
}
