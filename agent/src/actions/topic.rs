//! Consensus service actions

use async_trait::async_trait;
use hedera_agent_core::time::convert_timestamp_to_utc;
use serde_json::json;

use super::{Action, ActionContext, ActionMeta};
use crate::error::Result;
use crate::params::{
    CreateTopicParams, GetTopicMessagesParams, SubmitTopicMessageParams, TopicIdParams,
};
use crate::runtime::Content;
use crate::services::{format_topic_info, TopicService};
use crate::templates;

const MESSAGE_SEPARATOR: &str = "-----------------------";

static CREATE_TOPIC: ActionMeta = ActionMeta {
    name: "HEDERA_CREATE_TOPIC",
    similes: &["CREATE_TOPIC", "NEW_TOPIC", "HEDERA_NEW_TOPIC"],
    description: "Creates a new consensus topic, optionally restricted by a submit key",
    template: templates::CREATE_TOPIC,
    examples: &[
        "Create a new topic with memo 'blockchain logs'",
        "Create a new topic with memo 'DeFi logs'. Use a submit key.",
    ],
    failure: "topic creation",
    writes: true,
};

static DELETE_TOPIC: ActionMeta = ActionMeta {
    name: "HEDERA_DELETE_TOPIC",
    similes: &["DELETE_TOPIC", "REMOVE_TOPIC", "HEDERA_REMOVE_TOPIC"],
    description: "Deletes a consensus topic administered by the agent",
    template: templates::DELETE_TOPIC,
    examples: &["Delete topic with id 0.0.5464449"],
    failure: "topic deletion",
    writes: true,
};

static TOPIC_INFO: ActionMeta = ActionMeta {
    name: "HEDERA_TOPIC_INFO",
    similes: &[
        "HCS_TOPIC_INFO",
        "HEDERA_HCS_INFO",
        "HEDERA_TOPIC_DETAILS",
        "HCS_TOPIC_DETAILS",
    ],
    description: "Shows the memo, keys and lifetime of a consensus topic",
    template: templates::TOPIC_INFO,
    examples: &[
        "Give me the info for topic 0.0.12345.",
        "What can you tell me about topic 0.0.445566?",
    ],
    failure: "fetching topic info",
    writes: false,
};

static SUBMIT_TOPIC_MESSAGE: ActionMeta = ActionMeta {
    name: "HEDERA_SUBMIT_TOPIC_MESSAGE",
    similes: &["HEDERA_NEW_MESSAGE", "HCS_MESSAGE", "HCS_TOPIC_SUBMIT_MESSAGE"],
    description: "Posts a message to a consensus topic",
    template: templates::SUBMIT_TOPIC_MESSAGE,
    examples: &[
        "Submit message: 'hello world' to topic 0.0.123456.",
        "Post 'Security alert: suspicious activity' to topic 0.0.112233.",
    ],
    failure: "submitting message (you might not have the submitting privileges for this topic)",
    writes: true,
};

static GET_TOPIC_MESSAGES: ActionMeta = ActionMeta {
    name: "HEDERA_GET_TOPIC_MESSAGES",
    similes: &["HEDERA_GET_HCS_MESSAGES", "HCS_FETCH_MESSAGES"],
    description: "Reads the messages posted to a topic, optionally within a date range",
    template: templates::GET_TOPIC_MESSAGES,
    examples: &[
        "Get messages from a topic 0.0.123456.",
        "Show me messages from topic 0.0.123456 posted between 2025-01-02 and 2025-01-06",
    ],
    failure: "fetching messages",
    writes: false,
};

/// `HEDERA_CREATE_TOPIC`
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateTopicAction;

#[async_trait]
impl Action for CreateTopicAction {
    type Params = CreateTopicParams;

    fn meta(&self) -> &'static ActionMeta {
        &CREATE_TOPIC
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TopicService::new(ctx.ledger).create(&params).await?;

        Ok(Content::text(format!(
            "Successfully created topic: {}.\nTransaction link: {}\n",
            result.topic_id,
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "topicId": result.topic_id,
            "txHash": result.tx_hash,
        })))
    }
}

/// `HEDERA_DELETE_TOPIC`
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteTopicAction;

#[async_trait]
impl Action for DeleteTopicAction {
    type Params = TopicIdParams;

    fn meta(&self) -> &'static ActionMeta {
        &DELETE_TOPIC
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TopicService::new(ctx.ledger).delete(&params).await?;

        Ok(Content::text(format!(
            "Successfully deleted topic {}.\nTransaction link: {}",
            params.topic_id.trim(),
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "topicId": params.topic_id.trim(),
            "txHash": result.tx_hash,
        })))
    }
}

/// `HEDERA_TOPIC_INFO`
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicInfoAction;

#[async_trait]
impl Action for TopicInfoAction {
    type Params = TopicIdParams;

    fn meta(&self) -> &'static ActionMeta {
        &TOPIC_INFO
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let info = TopicService::new(ctx.ledger).info(&params).await?;
        let body = format_topic_info(&info)?;

        Ok(Content::text(format!(
            "Topic info for topic with id {}:\n{}\nLink: {}",
            info.topic_id,
            body,
            ctx.network().hashscan_topic_url(&info.topic_id)
        ))
        .with_payload(json!({ "success": true, "topic": info })))
    }
}

/// `HEDERA_SUBMIT_TOPIC_MESSAGE`
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmitTopicMessageAction;

#[async_trait]
impl Action for SubmitTopicMessageAction {
    type Params = SubmitTopicMessageParams;

    fn meta(&self) -> &'static ActionMeta {
        &SUBMIT_TOPIC_MESSAGE
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let result = TopicService::new(ctx.ledger).submit(&params).await?;

        Ok(Content::text(format!(
            "Successfully submitted message to topic: {}\nTransaction link: {}",
            params.topic_id.trim(),
            ctx.tx_link(&result.tx_hash)
        ))
        .with_payload(json!({
            "success": true,
            "topicId": params.topic_id.trim(),
            "txHash": result.tx_hash,
        })))
    }
}

/// `HEDERA_GET_TOPIC_MESSAGES`
#[derive(Debug, Clone, Copy, Default)]
pub struct GetTopicMessagesAction;

#[async_trait]
impl Action for GetTopicMessagesAction {
    type Params = GetTopicMessagesParams;

    fn meta(&self) -> &'static ActionMeta {
        &GET_TOPIC_MESSAGES
    }

    async fn perform(&self, ctx: &ActionContext<'_>, params: Self::Params) -> Result<Content> {
        let found = TopicService::new(ctx.ledger).messages(&params).await?;

        let body = if found.messages.is_empty() {
            "No messages found.".to_string()
        } else {
            let mut body = String::new();
            for message in &found.messages {
                body.push_str(&format!(
                    "{}\nAuthor: {}\nBody: {}\nTimestamp: {}\n",
                    MESSAGE_SEPARATOR,
                    message.payer_account_id,
                    message.message,
                    convert_timestamp_to_utc(&message.consensus_timestamp)?
                ));
            }
            body
        };

        Ok(Content::text(format!(
            "Messages for topic {} posted between {} and {}:\n{}",
            found.topic_id,
            params.lower_threshold.as_deref().unwrap_or("topic creation"),
            params.upper_threshold.as_deref().unwrap_or("this moment"),
            body
        ))
        .with_payload(json!({
            "success": true,
            "topicId": found.topic_id,
            "messages": found.messages,
        })))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hedera_agent_core::ledger::{TopicInfo, TopicMessage};
    use hedera_agent_core::TopicId;
    use serde_json::json;

    use super::*;
    use crate::actions::testing::{run, ScriptedRuntime};
    use crate::services::mock::{Call, MockLedger};

    #[tokio::test]
    async fn test_create_topic_reply() {
        let runtime = ScriptedRuntime::new(json!({ "memo": "blockchain logs", "isSubmitKey": "false" }));
        let ledger = Arc::new(MockLedger::new());

        let (ok, reply) = run(&CreateTopicAction, &runtime, ledger.clone(), "create topic").await;
        assert!(ok);
        assert_eq!(
            reply.text,
            "Successfully created topic: 0.0.5464449.\nTransaction link: \
             https://hashscan.io/testnet/tx/0.0.1001@1738764854.144000000\n"
        );
        assert_eq!(
            ledger.calls(),
            vec![Call::CreateTopic("blockchain logs".into(), false)]
        );
    }

    #[tokio::test]
    async fn test_topic_info_reply() {
        let mut ledger = MockLedger::new();
        ledger.topic = Some(TopicInfo {
            topic_id: TopicId::new(0, 0, 12_345),
            memo: "weather".into(),
            created_timestamp: Some("1738764854.144000000".into()),
            expiration_timestamp: None,
            admin_key: None,
            submit_key: None,
            deleted: false,
        });
        let runtime = ScriptedRuntime::new(json!({ "topicId": "0.0.12345" }));

        let (ok, reply) = run(&TopicInfoAction, &runtime, Arc::new(ledger), "info").await;
        assert!(ok);
        assert!(reply
            .text
            .starts_with("Topic info for topic with id 0.0.12345:\n---"));
        assert!(reply.text.contains("Memo: weather"));
        assert!(reply
            .text
            .ends_with("\nLink: https://hashscan.io/testnet/topic/0.0.12345"));
    }

    #[tokio::test]
    async fn test_submit_failure_mentions_privileges() {
        let ledger = Arc::new(MockLedger::new().with_status("INVALID_SIGNATURE"));
        let runtime = ScriptedRuntime::new(json!({ "topicId": "0.0.5", "message": "hello" }));

        let (ok, reply) = run(&SubmitTopicMessageAction, &runtime, ledger, "post").await;
        assert!(!ok);
        assert!(reply.text.starts_with(
            "Error during submitting message (you might not have the submitting privileges for this topic):"
        ));
    }

    #[tokio::test]
    async fn test_messages_listing() {
        let mut ledger = MockLedger::new();
        ledger.messages = vec![TopicMessage {
            consensus_timestamp: "1738764854.144000000".into(),
            message: "hello".into(),
            payer_account_id: "0.0.1001".into(),
            sequence_number: 1,
        }];
        let runtime = ScriptedRuntime::new(json!({
            "topicId": "0.0.5464449",
            "lowerThreshold": null,
            "upperThreshold": null
        }));

        let (ok, reply) = run(&GetTopicMessagesAction, &runtime, Arc::new(ledger), "messages").await;
        assert!(ok);
        assert_eq!(
            reply.text,
            "Messages for topic 0.0.5464449 posted between topic creation and this moment:\n\
             -----------------------\nAuthor: 0.0.1001\nBody: hello\n\
             Timestamp: 2025-02-05T14:14:14.144Z\n"
        );
    }

    #[tokio::test]
    async fn test_no_messages() {
        let runtime = ScriptedRuntime::new(json!({
            "topicId": "0.0.5464449",
            "lowerThreshold": "2025-01-02",
            "upperThreshold": "null"
        }));
        let (ok, reply) =
            run(&GetTopicMessagesAction, &runtime, Arc::new(MockLedger::new()), "messages").await;
        assert!(ok);
        assert_eq!(
            reply.text,
            "Messages for topic 0.0.5464449 posted between 2025-01-02 and this moment:\nNo messages found."
        );
    }
}
