//! LLM client trait: the one capability every provider adapter offers:
//! send a prompt, get text back.
//!
//! Adapters differ in request envelope, auth headers, URL template and reply
//! path; callers only ever see this trait and [`ClientError`].

use async_trait::async_trait;
use thiserror::Error;

/// Coarse classification of a [`ClientError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure, timeout, or non-2xx response.
    Provider,
    /// Response body did not have the expected envelope shape.
    Format,
    /// Provider is recognized but has no live integration.
    NotImplemented,
}

/// Failure of a single `send_prompt` call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The provider answered with a non-2xx status. `body` is the raw response body.
    #[error("{provider} API error (HTTP {status}): {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (connect error, timeout, ...).
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: String,
        message: String,
        timed_out: bool,
    },

    #[error("unexpected response format from {provider}")]
    Format { provider: String },

    #[error("{provider} integration not yet implemented")]
    NotImplemented { provider: String },
}

impl ClientError {
    /// Build a transport error from a `reqwest` failure.
    ///
    /// The request URL is stripped first: some providers carry the API key
    /// in the query string.
    pub fn transport(provider: &str, err: reqwest::Error) -> Self {
        let err = err.without_url();
        let timed_out = err.is_timeout();
        let message = if timed_out {
            format!("timeout: {err}")
        } else {
            err.to_string()
        };
        ClientError::Transport {
            provider: provider.to_string(),
            message,
            timed_out,
        }
    }

    pub fn format(provider: &str) -> Self {
        ClientError::Format {
            provider: provider.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Api { .. } | ClientError::Transport { .. } => ErrorKind::Provider,
            ClientError::Format { .. } => ErrorKind::Format,
            ClientError::NotImplemented { .. } => ErrorKind::NotImplemented,
        }
    }

    /// Whether the call was cut off by the per-call timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport { timed_out: true, .. })
    }
}

/// Trait that all provider adapters implement.
///
/// An instance is bound to exactly one `(credential, model)` pair when it is
/// built by the client factory. It carries no per-request state.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send `prompt` as a single user message and return the reply text.
    async fn send_prompt(&self, prompt: &str) -> Result<String, ClientError>;

    /// The model identifier this client is bound to.
    fn model_name(&self) -> &str;

    /// Provider tag for logs and results (e.g. `"OpenAI"`).
    fn provider_name(&self) -> &str;
}
