//! Consensus topics

use hedera_agent_core::ledger::{TimestampRange, TopicInfo, TopicKey, TopicMessage};
use hedera_agent_core::time::{convert_string_to_timestamp, convert_timestamp_to_utc};
use hedera_agent_core::types::CreateTopicResult;
use hedera_agent_core::{LedgerClient, TopicId, TransactionResult};
use tracing::{info, instrument};

use super::required_id;
use crate::error::{require, Result};
use crate::params::{CreateTopicParams, GetTopicMessagesParams, SubmitTopicMessageParams, TopicIdParams};

const SEPARATOR: &str = "--------------------------------------";

/// Messages of a topic and the bounds they were fetched with
#[derive(Debug, Clone, PartialEq)]
pub struct TopicMessages {
    /// Topic
    pub topic_id: TopicId,
    /// Messages in consensus order
    pub messages: Vec<TopicMessage>,
}

/// Topic operations
pub struct TopicService<'a> {
    ledger: &'a dyn LedgerClient,
}

impl<'a> TopicService<'a> {
    /// Create a service over `ledger`
    pub fn new(ledger: &'a dyn LedgerClient) -> Self {
        Self { ledger }
    }

    /// Create a topic
    #[instrument(skip(self))]
    pub async fn create(&self, params: &CreateTopicParams) -> Result<CreateTopicResult> {
        let memo = require(&params.memo, "Missing memo of new topic")?;

        let result = self
            .ledger
            .create_topic(memo, params.is_submit_key)
            .await?
            .ensure_success()?;
        info!(topic = %result.topic_id, "Topic created");
        Ok(result)
    }

    /// Delete a topic
    #[instrument(skip(self))]
    pub async fn delete(&self, params: &TopicIdParams) -> Result<TransactionResult> {
        let topic: TopicId = required_id(&params.topic_id, "Missing topicId")?;

        let result = self.ledger.delete_topic(&topic).await?.ensure_success()?;
        info!(topic = %topic, "Topic deleted");
        Ok(result)
    }

    /// Topic metadata
    #[instrument(skip(self))]
    pub async fn info(&self, params: &TopicIdParams) -> Result<TopicInfo> {
        let topic: TopicId = required_id(&params.topic_id, "Missing topicId")?;
        Ok(self.ledger.topic_info(&topic).await?)
    }

    /// Post a message
    #[instrument(skip(self))]
    pub async fn submit(&self, params: &SubmitTopicMessageParams) -> Result<TransactionResult> {
        let topic: TopicId = required_id(&params.topic_id, "Missing topicId")?;
        let message = require(&params.message, "Missing message")?;

        let result = self
            .ledger
            .submit_topic_message(&topic, message)
            .await?
            .ensure_success()?;
        info!(topic = %topic, "Message submitted");
        Ok(result)
    }

    /// Messages posted between the optional date bounds
    #[instrument(skip(self))]
    pub async fn messages(&self, params: &GetTopicMessagesParams) -> Result<TopicMessages> {
        let topic_id: TopicId = required_id(&params.topic_id, "Missing topicId")?;
        let range = TimestampRange {
            lower: params
                .lower_threshold
                .as_deref()
                .map(convert_string_to_timestamp)
                .transpose()?,
            upper: params
                .upper_threshold
                .as_deref()
                .map(convert_string_to_timestamp)
                .transpose()?,
        };

        let messages = self.ledger.topic_messages(&topic_id, range).await?;
        Ok(TopicMessages { topic_id, messages })
    }
}

fn format_key(key: Option<&TopicKey>) -> String {
    match key {
        Some(key) if !key.key.is_empty() => format!("{}\n   type: {}", key.key, key.key_type),
        _ => "not available".to_string(),
    }
}

/// Render topic metadata as the dashed block shown in chat
pub fn format_topic_info(info: &TopicInfo) -> hedera_agent_core::Result<String> {
    let memo = if info.memo.is_empty() {
        "not available"
    } else {
        info.memo.as_str()
    };
    let created = match info.created_timestamp.as_deref() {
        Some(ts) => convert_timestamp_to_utc(ts)?,
        None => "not available".to_string(),
    };
    let expires = match info.expiration_timestamp.as_deref() {
        Some(ts) => convert_timestamp_to_utc(ts)?,
        None => "null".to_string(),
    };

    Ok([
        SEPARATOR.to_string(),
        format!("Memo: {}", memo),
        format!("Creation time: {}", created),
        format!("Expiration time: {}", expires),
        "Admin key:".to_string(),
        format!("   {}", format_key(info.admin_key.as_ref())),
        "Submit key:".to_string(),
        format!("   {}", format_key(info.submit_key.as_ref())),
        format!("Deleted: {}", info.deleted),
        SEPARATOR.to_string(),
    ]
    .join("\n"))
}
