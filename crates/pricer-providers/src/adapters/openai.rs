//! OpenAI-style `/chat/completions` adapter.
//!
//! Used for OpenAI and Mistral: same envelope, same Bearer auth, different
//! base URL. Mistral's request omits `max_tokens`.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::adapters::execute;
use crate::envelope::{extract_reply, Step};
use crate::traits::{ClientError, LlmClient};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const MISTRAL_API_BASE: &str = "https://api.mistral.ai/v1";

/// `choices[0].message.content`
const REPLY_PATH: &[Step] = &[
    Step::Key("choices"),
    Step::Index(0),
    Step::Key("message"),
    Step::Key("content"),
];

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Client for any OpenAI-compatible chat completions endpoint.
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    provider: &'static str,
    api_base: String,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("provider", &self.provider)
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl ChatCompletionsClient {
    /// OpenAI client. `api_base` overrides [`OPENAI_API_BASE`].
    pub fn openai(
        client: reqwest::Client,
        api_key: &str,
        api_base: Option<&str>,
        model: &str,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            provider: "OpenAI",
            api_base: api_base.unwrap_or(OPENAI_API_BASE).to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens: Some(max_tokens),
        }
    }

    /// Mistral client. `api_base` overrides [`MISTRAL_API_BASE`].
    pub fn mistral(
        client: reqwest::Client,
        api_key: &str,
        api_base: Option<&str>,
        model: &str,
    ) -> Self {
        Self {
            client,
            provider: "Mistral",
            api_base: api_base.unwrap_or(MISTRAL_API_BASE).to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens: None,
        }
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn send_prompt(&self, prompt: &str) -> Result<String, ClientError> {
        debug!(provider = self.provider, model = %self.model, "Sending prompt");

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };

        let request = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body);

        let raw = execute(self.provider, request).await?;
        extract_reply(self.provider, &raw, REPLY_PATH)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        self.provider
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{build_http_client, ClientOptions};
    use crate::traits::ErrorKind;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn http() -> reqwest::Client {
        build_http_client(&ClientOptions::default()).unwrap()
    }

    #[test]
    fn test_completions_url_trailing_slash() {
        let client =
            ChatCompletionsClient::openai(http(), "key", Some("https://api.openai.com/v1/"), "gpt-4o", 1000);
        assert_eq!(
            client.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_bases() {
        let openai = ChatCompletionsClient::openai(http(), "k", None, "gpt-4o", 1000);
        assert_eq!(openai.api_base, OPENAI_API_BASE);
        let mistral = ChatCompletionsClient::mistral(http(), "k", None, "mistral-tiny");
        assert_eq!(mistral.api_base, MISTRAL_API_BASE);
        assert_eq!(mistral.provider_name(), "Mistral");
        assert_eq!(mistral.model_name(), "mistral-tiny");
    }

    #[tokio::test]
    async fn test_send_prompt_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 1000,
                "messages": [{"role": "user", "content": "Hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-test",
                "choices": [{
                    "message": { "role": "assistant", "content": "Hi from OpenAI" },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&mock_server)
            .await;

        let client = ChatCompletionsClient::openai(
            http(),
            "test-key-123",
            Some(&mock_server.uri()),
            "gpt-4o-mini",
            1000,
        );

        let reply = client.send_prompt("Hello").await.unwrap();
        assert_eq!(reply, "Hi from OpenAI");
    }

    #[tokio::test]
    async fn test_mistral_omits_max_tokens() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(|req: &Request| {
                let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
                let content = if body.get("max_tokens").is_none() {
                    "no max_tokens"
                } else {
                    "max_tokens present"
                };
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "choices": [{ "message": { "content": content } }]
                }))
            })
            .mount(&mock_server)
            .await;

        let client =
            ChatCompletionsClient::mistral(http(), "m-key", Some(&mock_server.uri()), "mistral-tiny");
        assert_eq!(client.send_prompt("x").await.unwrap(), "no max_tokens");
    }

    #[tokio::test]
    async fn test_send_prompt_api_error_keeps_raw_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"error":{"message":"Incorrect API key provided"}}"#,
            ))
            .mount(&mock_server)
            .await;

        let client =
            ChatCompletionsClient::openai(http(), "bad", Some(&mock_server.uri()), "gpt-4o", 1000);

        let err = client.send_prompt("Hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);
        match &err {
            ClientError::Api { status, body, .. } => {
                assert_eq!(*status, 401);
                assert!(body.contains("Incorrect API key provided"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert!(err.to_string().contains("Incorrect API key provided"));
    }

    #[tokio::test]
    async fn test_send_prompt_missing_content_is_format_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": []
            })))
            .mount(&mock_server)
            .await;

        let client =
            ChatCompletionsClient::openai(http(), "key", Some(&mock_server.uri()), "gpt-4o", 1000);

        let err = client.send_prompt("Hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[tokio::test]
    async fn test_send_prompt_network_error() {
        // Point to a port that's not listening
        let client =
            ChatCompletionsClient::openai(http(), "key", Some("http://127.0.0.1:1"), "gpt-4o", 1000);

        let err = client.send_prompt("Hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_send_prompt_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(serde_json::json!({
                        "choices": [{ "message": { "content": "late" } }]
                    })),
            )
            .mount(&mock_server)
            .await;

        let options = ClientOptions {
            timeout: Duration::from_millis(200),
            ..ClientOptions::default()
        };
        let client = ChatCompletionsClient::openai(
            build_http_client(&options).unwrap(),
            "key",
            Some(&mock_server.uri()),
            "gpt-4o",
            1000,
        );

        let err = client.send_prompt("Hello").await.unwrap_err();
        assert!(err.is_timeout());
        assert!(err.to_string().contains("timeout"));
    }
}
