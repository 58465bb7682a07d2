//! Mirror node REST client
//!
//! Answers every [`MirrorQueries`] call from the public mirror node API
//! (`/api/v1/...`). List endpoints are followed through `links.next` until
//! exhausted. Topic message bodies arrive base64 encoded and are decoded to
//! text.
//!
//! # Example
//!
//! ```no_run
//! use hedera_agent_core::ledger::MirrorQueries;
//! use hedera_agent_core::mirror::MirrorNodeClient;
//! use hedera_agent_core::types::{AccountId, NetworkType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mirror = MirrorNodeClient::for_network(NetworkType::Testnet)?;
//!     let account: AccountId = "0.0.5423981".parse()?;
//!
//!     let balance = mirror.hbar_balance(&account).await?;
//!     println!("Balance: {} HBAR", balance);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::MirrorConfig;
use crate::error::{Error, Result};
use crate::ledger::{
    MirrorQueries, PendingAirdrop, TimestampRange, TokenBalance, TokenDetails, TokenHolder,
    TopicInfo, TopicKey, TopicMessage,
};
use crate::time::to_mirror_timestamp;
use crate::types::{AccountId, NetworkType, TokenId, TopicId};
use crate::units::Hbar;

const DEFAULT_PAGE_LIMIT: u32 = 100;

/// HTTP client for the mirror node REST API
#[derive(Debug, Clone)]
pub struct MirrorNodeClient {
    http: reqwest::Client,
    base_url: String,
    page_limit: u32,
}

impl MirrorNodeClient {
    /// Create a client for `base_url` with a request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    /// Create a client for the public mirror of `network`
    pub fn for_network(network: NetworkType) -> Result<Self> {
        Self::from_config(&MirrorConfig::default(), network)
    }

    /// Create a client from configuration
    pub fn from_config(config: &MirrorConfig, network: NetworkType) -> Result<Self> {
        let mut client = Self::new(config.base_url(network), config.timeout())?;
        client.page_limit = config.page_limit.max(1);
        Ok(client)
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::MirrorNode {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn get_all<P: Page>(&self, first_path: String) -> Result<Vec<P::Item>> {
        let mut items = Vec::new();
        let mut next = Some(first_path);

        while let Some(path) = next.take() {
            let page: P = self.get_json(&path).await?;
            let (mut page_items, links) = page.into_parts();
            items.append(&mut page_items);
            next = links.and_then(|l| l.next).filter(|n| !n.is_empty());
        }

        Ok(items)
    }
}

trait Page: DeserializeOwned {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<Links>);
}

#[derive(Debug, Deserialize)]
struct Links {
    next: Option<String>,
}

fn u64_from_any<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(de::Error::custom),
    }
}

fn opt_u64_from_any<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    balance: AccountBalance,
}

#[derive(Debug, Deserialize)]
struct AccountBalance {
    #[serde(deserialize_with = "u64_from_any")]
    balance: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token_id: TokenId,
    name: String,
    symbol: String,
    #[serde(deserialize_with = "u64_from_any")]
    decimals: u64,
    #[serde(rename = "type")]
    token_type: String,
    #[serde(default, deserialize_with = "opt_u64_from_any")]
    total_supply: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64_from_any")]
    max_supply: Option<u64>,
    #[serde(default)]
    memo: Option<String>,
    #[serde(default)]
    treasury_account_id: Option<AccountId>,
}

#[derive(Debug, Deserialize)]
struct AccountTokensPage {
    tokens: Vec<AccountTokenEntry>,
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct AccountTokenEntry {
    token_id: TokenId,
    #[serde(deserialize_with = "u64_from_any")]
    balance: u64,
}

impl Page for AccountTokensPage {
    type Item = TokenBalance;

    fn into_parts(self) -> (Vec<TokenBalance>, Option<Links>) {
        let items = self
            .tokens
            .into_iter()
            .map(|t| TokenBalance {
                token_id: t.token_id,
                balance: t.balance,
            })
            .collect();
        (items, self.links)
    }
}

#[derive(Debug, Deserialize)]
struct TokenBalancesPage {
    balances: Vec<HolderEntry>,
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct HolderEntry {
    account: AccountId,
    #[serde(deserialize_with = "u64_from_any")]
    balance: u64,
}

impl Page for TokenBalancesPage {
    type Item = TokenHolder;

    fn into_parts(self) -> (Vec<TokenHolder>, Option<Links>) {
        let items = self
            .balances
            .into_iter()
            .map(|b| TokenHolder {
                account: b.account,
                balance: b.balance,
            })
            .collect();
        (items, self.links)
    }
}

#[derive(Debug, Deserialize)]
struct AirdropsPage {
    airdrops: Vec<AirdropEntry>,
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct AirdropEntry {
    sender_id: AccountId,
    receiver_id: AccountId,
    token_id: TokenId,
    #[serde(default, deserialize_with = "opt_u64_from_any")]
    amount: Option<u64>,
    #[serde(default)]
    serial_number: Option<u64>,
    #[serde(default)]
    timestamp: Option<TimestampWindow>,
}

#[derive(Debug, Deserialize)]
struct TimestampWindow {
    from: Option<String>,
    to: Option<String>,
}

impl Page for AirdropsPage {
    type Item = PendingAirdrop;

    fn into_parts(self) -> (Vec<PendingAirdrop>, Option<Links>) {
        let items = self
            .airdrops
            .into_iter()
            .map(|a| PendingAirdrop {
                sender_id: a.sender_id,
                receiver_id: a.receiver_id,
                token_id: a.token_id,
                amount: a.amount,
                serial_number: a.serial_number,
                timestamp: a.timestamp.and_then(|t| t.from),
            })
            .collect();
        (items, self.links)
    }
}

#[derive(Debug, Deserialize)]
struct TopicResponse {
    topic_id: TopicId,
    #[serde(default)]
    memo: String,
    #[serde(default)]
    created_timestamp: Option<String>,
    #[serde(default)]
    timestamp: Option<TimestampWindow>,
    #[serde(default)]
    admin_key: Option<KeyEntry>,
    #[serde(default)]
    submit_key: Option<KeyEntry>,
    #[serde(default)]
    deleted: bool,
}

#[derive(Debug, Deserialize)]
struct KeyEntry {
    #[serde(rename = "_type")]
    key_type: String,
    key: String,
}

#[derive(Debug, Deserialize)]
struct TopicMessagesPage {
    messages: Vec<MessageEntry>,
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct MessageEntry {
    consensus_timestamp: String,
    message: String,
    payer_account_id: String,
    sequence_number: u64,
}

impl Page for TopicMessagesPage {
    type Item = TopicMessage;

    fn into_parts(self) -> (Vec<TopicMessage>, Option<Links>) {
        let items = self
            .messages
            .into_iter()
            .map(|m| TopicMessage {
                message: decode_message(&m.message),
                consensus_timestamp: m.consensus_timestamp,
                payer_account_id: m.payer_account_id,
                sequence_number: m.sequence_number,
            })
            .collect();
        (items, self.links)
    }
}

/// Decode a base64 message body, keeping the raw text when it is not base64
fn decode_message(encoded: &str) -> String {
    match STANDARD.decode(encoded) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => encoded.to_string(),
    }
}

#[async_trait]
impl MirrorQueries for MirrorNodeClient {
    #[instrument(skip(self))]
    async fn hbar_balance(&self, account: &AccountId) -> Result<Hbar> {
        let response: AccountResponse = self
            .get_json(&format!("/api/v1/accounts/{}", account))
            .await?;
        Ok(Hbar::from_tinybars(response.balance.balance))
    }

    #[instrument(skip(self))]
    async fn token_details(&self, token: &TokenId) -> Result<TokenDetails> {
        let response: TokenResponse = self.get_json(&format!("/api/v1/tokens/{}", token)).await?;
        let decimals = u32::try_from(response.decimals)
            .map_err(|_| Error::serialization(format!("decimals out of range for {}", token)))?;

        Ok(TokenDetails {
            token_id: response.token_id,
            name: response.name,
            symbol: response.symbol,
            decimals,
            token_type: response.token_type,
            total_supply: response.total_supply,
            max_supply: response.max_supply,
            memo: response.memo.filter(|m| !m.is_empty()),
            treasury_account_id: response.treasury_account_id,
        })
    }

    #[instrument(skip(self))]
    async fn token_balance(&self, account: &AccountId, token: &TokenId) -> Result<u64> {
        let page: AccountTokensPage = self
            .get_json(&format!(
                "/api/v1/accounts/{}/tokens?token.id={}",
                account, token
            ))
            .await?;
        Ok(page
            .tokens
            .iter()
            .find(|t| t.token_id == *token)
            .map(|t| t.balance)
            .unwrap_or(0))
    }

    #[instrument(skip(self))]
    async fn account_token_balances(&self, account: &AccountId) -> Result<Vec<TokenBalance>> {
        self.get_all::<AccountTokensPage>(format!(
            "/api/v1/accounts/{}/tokens?limit={}",
            account, self.page_limit
        ))
        .await
    }

    #[instrument(skip(self))]
    async fn token_holders(
        &self,
        token: &TokenId,
        min_balance: Option<u64>,
    ) -> Result<Vec<TokenHolder>> {
        let mut path = format!("/api/v1/tokens/{}/balances?limit={}", token, self.page_limit);
        if let Some(min) = min_balance {
            path.push_str(&format!("&account.balance=gte:{}", min));
        }
        self.get_all::<TokenBalancesPage>(path).await
    }

    #[instrument(skip(self))]
    async fn pending_airdrops(&self, account: &AccountId) -> Result<Vec<PendingAirdrop>> {
        self.get_all::<AirdropsPage>(format!(
            "/api/v1/accounts/{}/airdrops/pending?limit={}",
            account, self.page_limit
        ))
        .await
    }

    #[instrument(skip(self))]
    async fn topic_info(&self, topic: &TopicId) -> Result<TopicInfo> {
        let response: TopicResponse = self.get_json(&format!("/api/v1/topics/{}", topic)).await?;
        let to_key = |entry: KeyEntry| TopicKey {
            key_type: entry.key_type,
            key: entry.key,
        };

        Ok(TopicInfo {
            topic_id: response.topic_id,
            memo: response.memo,
            created_timestamp: response.created_timestamp,
            expiration_timestamp: response.timestamp.and_then(|t| t.to),
            admin_key: response.admin_key.map(to_key),
            submit_key: response.submit_key.map(to_key),
            deleted: response.deleted,
        })
    }

    #[instrument(skip(self))]
    async fn topic_messages(
        &self,
        topic: &TopicId,
        range: TimestampRange,
    ) -> Result<Vec<TopicMessage>> {
        let mut path = format!(
            "/api/v1/topics/{}/messages?limit={}&order=asc",
            topic, self.page_limit
        );
        if let Some(lower) = range.lower {
            path.push_str(&format!("&timestamp=gte:{}", to_mirror_timestamp(lower)));
        }
        if let Some(upper) = range.upper {
            path.push_str(&format!("&timestamp=lte:{}", to_mirror_timestamp(upper)));
        }
        self.get_all::<TopicMessagesPage>(path).await
    }
}
