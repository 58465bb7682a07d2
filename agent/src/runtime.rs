//! Agent runtime seam
//!
//! The plugin does not own conversation memory or model hosting. The host
//! supplies both through [`AgentRuntime`] and receives replies through a
//! [`HandlerCallback`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hedera_agent_core::HederaSettings;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;

/// Size class of the model used for extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelClass {
    /// Small, fast model
    #[default]
    Small,
    /// Medium model
    Medium,
    /// Large model
    Large,
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human talking to the agent
    User,
    /// The agent itself
    Agent,
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Author
    pub role: Role,
    /// Message text
    pub text: String,
    /// When the message was posted
    pub created_at: DateTime<Utc>,
}

impl Memory {
    /// A user message posted now
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// An agent message posted now
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Conversation state handed to an action
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    /// Display name of the agent
    pub agent_name: Option<String>,
    /// Recent messages, oldest first
    pub recent_messages: Vec<Memory>,
    /// Message the current action responds to
    pub last_message: Option<String>,
}

impl State {
    /// Empty state for a named agent
    pub fn for_agent(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: Some(agent_name.into()),
            ..Self::default()
        }
    }

    /// Append a message
    pub fn push(&mut self, memory: Memory) {
        self.recent_messages.push(memory);
    }

    /// Point `last_message` at the newest user message
    pub fn refresh_last_message(&mut self) -> Option<&str> {
        self.last_message = self
            .recent_messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.text.clone());
        self.last_message.as_deref()
    }

    /// Render recent messages as `name: text` lines
    pub fn format_recent_messages(&self) -> String {
        let agent = self.agent_name.as_deref().unwrap_or("Agent");
        self.recent_messages
            .iter()
            .map(|m| {
                let author = match m.role {
                    Role::User => "User",
                    Role::Agent => agent,
                };
                format!("{}: {}", author, m.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Reply posted back to the chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Human-readable text
    pub text: String,
    /// Action that produced the reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Structured payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Content {
    /// Plain text reply
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: None,
            payload: None,
        }
    }

    /// Attach a structured payload
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Tag the reply with the action that produced it
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Error reply carrying `{"error": message}`
    pub fn error(text: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::text(text).with_payload(json!({ "error": message }))
    }
}

/// Turns a rendered prompt into a JSON object
#[async_trait]
pub trait ObjectGenerator: Send + Sync {
    /// Ask the model for a JSON object answering `context`
    async fn generate_object(&self, context: &str, model: ModelClass) -> anyhow::Result<Value>;
}

/// What an action needs from its host
pub trait AgentRuntime: ObjectGenerator {
    /// Look up a setting such as `HEDERA_ACCOUNT_ID`
    fn get_setting(&self, key: &str) -> Option<String>;

    /// The operator settings visible through [`AgentRuntime::get_setting`]
    fn hedera_settings(&self) -> HederaSettings {
        HederaSettings::from_lookup(|key| self.get_setting(key))
    }
}

/// Receives the reply of a handler run
#[async_trait]
pub trait HandlerCallback: Send + Sync {
    /// Post a reply
    async fn send(&self, content: Content) -> anyhow::Result<()>;
}

/// Callback that keeps every reply in memory
#[derive(Debug, Default)]
pub struct CollectingCallback {
    sent: Mutex<Vec<Content>>,
}

impl CollectingCallback {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies received so far
    pub async fn contents(&self) -> Vec<Content> {
        self.sent.lock().await.clone()
    }

    /// The most recent reply
    pub async fn last(&self) -> Option<Content> {
        self.sent.lock().await.last().cloned()
    }
}

#[async_trait]
impl HandlerCallback for CollectingCallback {
    async fn send(&self, content: Content) -> anyhow::Result<()> {
        self.sent.lock().await.push(content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_message_is_newest_user_message() {
        let mut state = State::for_agent("Hedy");
        state.push(Memory::user("what is my balance?"));
        state.push(Memory::agent("Address 0.0.1 has balance of 1 HBAR"));
        state.push(Memory::user("send 2 HBAR to 0.0.2"));
        state.push(Memory::agent("working on it"));

        assert_eq!(state.refresh_last_message(), Some("send 2 HBAR to 0.0.2"));
        assert_eq!(
            state.format_recent_messages().lines().nth(1),
            Some("Hedy: Address 0.0.1 has balance of 1 HBAR")
        );
    }

    #[test]
    fn test_empty_state_has_no_last_message() {
        let mut state = State::default();
        assert_eq!(state.refresh_last_message(), None);
        assert_eq!(state.format_recent_messages(), "");
    }

    #[test]
    fn test_error_content_payload() {
        let content = Content::error("Error during token transfer: boom", "boom");
        assert_eq!(content.payload, Some(json!({ "error": "boom" })));
        assert!(content.action.is_none());
    }

    #[tokio::test]
    async fn test_collecting_callback() -> anyhow::Result<()> {
        let callback = CollectingCallback::new();
        callback.send(Content::text("one")).await?;
        callback.send(Content::text("two")).await?;
        assert_eq!(callback.contents().await.len(), 2);
        assert_eq!(callback.last().await.map(|c| c.text), Some("two".to_string()));
        Ok(())
    }
}
