//! OpenAI-compatible object generation
//!
//! [`OpenAiGenerator`] sends the composed extraction prompt to a
//! `/chat/completions` endpoint and parses the JSON block in the reply.
//! Any OpenAI-compatible server works (OpenAI, vLLM, Ollama, LM Studio).
//!
//! # Example
//!
//! ```no_run
//! use hedera_agent_core::config::LlmConfig;
//! use hedera_agent_plugin::llm::OpenAiGenerator;
//! use hedera_agent_plugin::prelude::*;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let generator = OpenAiGenerator::new(LlmConfig::default())?;
//! let params = generator
//!     .generate_object("Given the last message: ...", ModelClass::Small)
//!     .await?;
//! println!("{}", params);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use hedera_agent_core::config::LlmConfig;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::runtime::{ModelClass, ObjectGenerator};
use crate::template::extract_json_block;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client that turns prompts into JSON objects
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    http: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiGenerator {
    /// Build a client with the configured timeout
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http, config })
    }

    /// Model used for requests
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send `prompt` as a single user message and return the reply text
    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'));
        let body = json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let resp = request.send().await.context("LLM API request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("LLM API error ({}): {}", status, body_text);
        }

        let response: ChatCompletionResponse = resp
            .json()
            .await
            .context("Failed to parse LLM API response")?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("LLM API returned no content")
    }
}

#[async_trait]
impl ObjectGenerator for OpenAiGenerator {
    async fn generate_object(&self, context: &str, model: ModelClass) -> Result<Value> {
        debug!(?model, "Generating object");
        let reply = self.complete(context).await?;
        let block = extract_json_block(&reply);
        serde_json::from_str(block)
            .with_context(|| format!("Model reply is not a JSON object: {}", reply.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> LlmConfig {
        LlmConfig {
            api_base: format!("{}/v1", server.uri()),
            api_key: Some("sk-test".into()),
            model: "gpt-4o-mini".into(),
            ..LlmConfig::default()
        }
    }

    fn reply(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
    }

    #[tokio::test]
    async fn test_generate_object_from_fenced_reply() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(reply(
                "Sure:\n```json\n{\"tokenId\": \"0.0.5\", \"amount\": 10}\n```",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let generator = OpenAiGenerator::new(config(&server))?;
        let value = generator.generate_object("prompt", ModelClass::Small).await?;
        assert_eq!(value, json!({ "tokenId": "0.0.5", "amount": 10 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_api_error_surfaces_status() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let generator = OpenAiGenerator::new(config(&server))?;
        let err = generator
            .generate_object("prompt", ModelClass::Small)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("bad key"));
        Ok(())
    }

    #[tokio::test]
    async fn test_non_json_reply_is_error() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(reply("I cannot help with that."))
            .mount(&server)
            .await;

        let generator = OpenAiGenerator::new(config(&server))?;
        let err = generator
            .generate_object("prompt", ModelClass::Small)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Model reply is not a JSON object"));
        Ok(())
    }
}
