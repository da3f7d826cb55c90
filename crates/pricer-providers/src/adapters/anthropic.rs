//! Anthropic Messages API adapter.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::adapters::execute;
use crate::envelope::{extract_reply, Step};
use crate::traits::{ClientError, LlmClient};

pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const PROVIDER: &str = "Anthropic";

/// `content[0].text`
const REPLY_PATH: &[Step] = &[Step::Key("content"), Step::Index(0), Step::Key("text")];

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

pub struct AnthropicClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl AnthropicClient {
    pub fn new(
        client: reqwest::Client,
        api_key: &str,
        api_base: Option<&str>,
        model: &str,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            api_base: api_base.unwrap_or(ANTHROPIC_API_BASE).to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn send_prompt(&self, prompt: &str) -> Result<String, ClientError> {
        debug!(provider = PROVIDER, model = %self.model, "Sending prompt");

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let request = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let raw = execute(PROVIDER, request).await?;
        extract_reply(PROVIDER, &raw, REPLY_PATH)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        PROVIDER
    }
}
