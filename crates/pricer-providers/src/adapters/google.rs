//! Google Gemini `generateContent` adapter.
//!
//! The model is part of the URL path and the key travels as a `key` query
//! parameter; the body carries only the prompt.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::adapters::execute;
use crate::envelope::{extract_reply, Step};
use crate::traits::{ClientError, LlmClient};

pub const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const PROVIDER: &str = "Google";

/// `candidates[0].content.parts[0].text`
const REPLY_PATH: &[Step] = &[
    Step::Key("candidates"),
    Step::Index(0),
    Step::Key("content"),
    Step::Key("parts"),
    Step::Index(0),
    Step::Key("text"),
];

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

pub struct GoogleClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for GoogleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GoogleClient {
    pub fn new(client: reqwest::Client, api_key: &str, api_base: Option<&str>, model: &str) -> Self {
        Self {
            client,
            api_base: api_base.unwrap_or(GOOGLE_API_BASE).to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// `{base}/models/{model}:generateContent`, without the key.
    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl LlmClient for GoogleClient {
    async fn send_prompt(&self, prompt: &str) -> Result<String, ClientError> {
        debug!(provider = PROVIDER, model = %self.model, "Sending prompt");

        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let request = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
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
