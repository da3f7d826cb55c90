//! Provider registry: the fixed set of known provider tags and the client
//! factory that maps a catalog record to a live adapter.
//!
//! Selection is a case-insensitive match of the record's provider tag against
//! [`PROVIDERS`], guarded by credential presence. A missing credential or an
//! unknown tag yields no client; that is a silent skip, not an error.

use tracing::debug;

use pricer_core::config::{DispatchConfig, ProvidersConfig};
use pricer_core::types::ModelRecord;

use crate::adapters::anthropic::AnthropicClient;
use crate::adapters::google::GoogleClient;
use crate::adapters::openai::ChatCompletionsClient;
use crate::adapters::unimplemented::UnimplementedClient;
use crate::adapters::{build_http_client, ClientOptions};
use crate::traits::LlmClient;

// ─────────────────────────────────────────────
// ProviderSpec: static metadata for one provider
// ─────────────────────────────────────────────

/// Which adapter serves a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterKind {
    OpenAi,
    Anthropic,
    Google,
    Mistral,
    /// Recognized, but every call fails with `NotImplemented`.
    Unimplemented,
}

/// Static specification describing one provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Lowercase tag matched against catalog records (e.g. `"openai"`).
    pub name: &'static str,
    /// Human-readable name used in logs and results (e.g. `"OpenAI"`).
    pub display_name: &'static str,
    /// Config field that gates client construction, for status output.
    pub credential_field: &'static str,
    pub adapter: AdapterKind,
}

impl ProviderSpec {
    pub fn is_live(&self) -> bool {
        self.adapter != AdapterKind::Unimplemented
    }
}

/// Every provider tag the gateway knows about.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "openai",
        display_name: "OpenAI",
        credential_field: "apiKey",
        adapter: AdapterKind::OpenAi,
    },
    ProviderSpec {
        name: "anthropic",
        display_name: "Anthropic",
        credential_field: "apiKey",
        adapter: AdapterKind::Anthropic,
    },
    ProviderSpec {
        name: "google",
        display_name: "Google",
        credential_field: "apiKey",
        adapter: AdapterKind::Google,
    },
    ProviderSpec {
        name: "aws",
        display_name: "AWS",
        credential_field: "accessKeyId",
        adapter: AdapterKind::Unimplemented,
    },
    ProviderSpec {
        name: "azure",
        display_name: "Azure",
        credential_field: "apiKey",
        adapter: AdapterKind::Unimplemented,
    },
    ProviderSpec {
        name: "meta",
        display_name: "Meta",
        credential_field: "apiKey",
        adapter: AdapterKind::Unimplemented,
    },
    ProviderSpec {
        name: "mistral",
        display_name: "Mistral",
        credential_field: "apiKey",
        adapter: AdapterKind::Mistral,
    },
];

/// Find a provider spec by tag, ignoring ASCII case.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name.trim()))
}

// ─────────────────────────────────────────────
// Client factory
// ─────────────────────────────────────────────

/// Builds adapters for catalog records from the configured credentials.
///
/// Holds one pooled `reqwest::Client` that every adapter it creates shares.
#[derive(Clone, Debug)]
pub struct ClientFactory {
    credentials: ProvidersConfig,
    options: ClientOptions,
    http: reqwest::Client,
}

impl ClientFactory {
    pub fn new(credentials: ProvidersConfig, options: ClientOptions) -> reqwest::Result<Self> {
        let http = build_http_client(&options)?;
        Ok(Self {
            credentials,
            options,
            http,
        })
    }

    /// Factory using the timeout and token settings from `dispatch`.
    pub fn from_config(
        credentials: ProvidersConfig,
        dispatch: &DispatchConfig,
    ) -> reqwest::Result<Self> {
        let options = ClientOptions {
            timeout: std::time::Duration::from_secs(dispatch.timeout_secs),
            max_tokens: dispatch.max_tokens,
        };
        Self::new(credentials, options)
    }

    /// Build the adapter for `record`, or `None` if its provider is unknown
    /// or has no credential configured.
    pub fn create(&self, record: &ModelRecord) -> Option<Box<dyn LlmClient>> {
        let Some(spec) = find_by_name(&record.provider) else {
            debug!(provider = %record.provider, model = %record.name, "Unknown provider, skipping");
            return None;
        };

        if !self.credentials.is_configured(spec.name) {
            debug!(provider = spec.display_name, model = %record.name, "No credential configured, skipping");
            return None;
        }

        let creds = &self.credentials;
        let model = record.name.as_str();
        let http = self.http.clone();
        let max_tokens = self.options.max_tokens;

        let client: Box<dyn LlmClient> = match spec.adapter {
            AdapterKind::OpenAi => Box::new(ChatCompletionsClient::openai(
                http,
                &creds.openai.api_key,
                creds.openai.api_base.as_deref(),
                model,
                max_tokens,
            )),
            AdapterKind::Mistral => Box::new(ChatCompletionsClient::mistral(
                http,
                &creds.mistral.api_key,
                creds.mistral.api_base.as_deref(),
                model,
            )),
            AdapterKind::Anthropic => Box::new(AnthropicClient::new(
                http,
                &creds.anthropic.api_key,
                creds.anthropic.api_base.as_deref(),
                model,
                max_tokens,
            )),
            AdapterKind::Google => Box::new(GoogleClient::new(
                http,
                &creds.google.api_key,
                creds.google.api_base.as_deref(),
                model,
            )),
            AdapterKind::Unimplemented => {
                Box::new(UnimplementedClient::new(spec.display_name, model))
            }
        };

        debug!(provider = spec.display_name, model, "Created LLM client");
        Some(client)
    }
}

/// Convenience wrapper: build a one-off factory with default options and
/// resolve `record` against `credentials`.
pub fn create_client(
    record: &ModelRecord,
    credentials: &ProvidersConfig,
) -> reqwest::Result<Option<Box<dyn LlmClient>>> {
    let factory = ClientFactory::new(credentials.clone(), ClientOptions::default())?;
    Ok(factory.create(record))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
