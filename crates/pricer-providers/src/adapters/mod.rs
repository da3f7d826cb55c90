//! Provider adapters: one `LlmClient` implementation per wire protocol.
//!
//! - [`openai::ChatCompletionsClient`]: OpenAI and Mistral (`/chat/completions`)
//! - [`anthropic::AnthropicClient`]: Anthropic Messages API
//! - [`google::GoogleClient`]: Gemini `generateContent`
//! - [`unimplemented::UnimplementedClient`]: AWS, Azure, Meta (no live integration)

pub mod anthropic;
pub mod google;
pub mod openai;
pub mod unimplemented;

use std::time::Duration;

use tracing::debug;

use pricer_core::utils::truncate_string;

use crate::traits::ClientError;

/// Per-call settings shared by every adapter a factory builds.
#[derive(Clone, Debug)]
pub struct ClientOptions {
    /// Upper bound on one outbound call, connect through body.
    pub timeout: Duration,
    /// `max_tokens` for providers whose request envelope carries it.
    pub max_tokens: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_tokens: 1000,
        }
    }
}

/// Build the HTTP client adapters share. The timeout applies per request.
pub fn build_http_client(options: &ClientOptions) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(options.timeout).build()
}

/// Send a prepared request and return the raw body of a 2xx response.
///
/// Transport failures and non-2xx statuses become [`ClientError`]s carrying
/// the provider tag and, for statuses, the raw body.
pub(crate) async fn execute(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<String, ClientError> {
    let response = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            let err = ClientError::transport(provider, e);
            debug!(provider, error = %err, timeout = err.is_timeout(), "HTTP request failed");
            return Err(err);
        }
    };

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        let err = ClientError::transport(provider, e);
        debug!(provider, error = %err, "Failed to read response body");
        err
    })?;

    if !status.is_success() {
        debug!(
            provider,
            status = %status,
            body = %truncate_string(&body, 200),
            "API error"
        );
        return Err(ClientError::Api {
            provider: provider.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    debug!(provider, bytes = body.len(), "Provider response received");
    Ok(body)
}
