//! Configuration schema: catalog location, provider credentials, gateway
//! bind address, and dispatch tuning.
//!
//! Hierarchy: `Config` → `CatalogConfig`, `ProvidersConfig`, `GatewayConfig`,
//! `DispatchConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.pricer/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub providers: ProvidersConfig,
    pub gateway: GatewayConfig,
    pub dispatch: DispatchConfig,
}

// ─────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────

/// Where the pricing CSV lives.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogConfig {
    /// Path to the CSV file (`~` is expanded).
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "llm_models_pricing.csv".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Credential for a provider authenticated by a single API key.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiKeyConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Custom API base URL (overrides the provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ApiKeyConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: None,
        }
    }

    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for ApiKeyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// AWS Bedrock credential (access key pair + region).
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

impl AwsConfig {
    /// The access key id is the field that gates the AWS client.
    pub fn is_configured(&self) -> bool {
        !self.access_key_id.is_empty()
    }
}

impl std::fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsConfig")
            .field("access_key_id", &redact(&self.access_key_id))
            .field("secret_access_key", &redact(&self.secret_access_key))
            .field("region", &self.region)
            .finish()
    }
}

/// Azure OpenAI credential (key + resource endpoint + API version).
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureConfig {
    pub api_key: String,
    pub endpoint: String,
    pub api_version: String,
}

impl AzureConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureConfig")
            .field("api_key", &redact(&self.api_key))
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// All provider credentials. Missing sections default to "not configured".
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    pub openai: ApiKeyConfig,
    pub anthropic: ApiKeyConfig,
    pub google: ApiKeyConfig,
    pub aws: AwsConfig,
    pub azure: AzureConfig,
    pub meta: ApiKeyConfig,
    pub mistral: ApiKeyConfig,
}

impl ProvidersConfig {
    /// Get a single-key provider config by lowercase name (e.g. `"anthropic"`).
    ///
    /// Returns `None` for multi-field providers (`aws`, `azure`) and unknown names.
    pub fn api_key_config(&self, name: &str) -> Option<&ApiKeyConfig> {
        match name {
            "openai" => Some(&self.openai),
            "anthropic" => Some(&self.anthropic),
            "google" => Some(&self.google),
            "meta" => Some(&self.meta),
            "mistral" => Some(&self.mistral),
            _ => None,
        }
    }

    /// Whether the credential gating provider `name` is present.
    pub fn is_configured(&self, name: &str) -> bool {
        match name {
            "aws" => self.aws.is_configured(),
            "azure" => self.azure.is_configured(),
            other => self
                .api_key_config(other)
                .is_some_and(ApiKeyConfig::is_configured),
        }
    }

    /// True when no provider has a credential: cost-estimation-only mode.
    pub fn is_empty(&self) -> bool {
        ["openai", "anthropic", "google", "aws", "azure", "meta", "mistral"]
            .iter()
            .all(|name| !self.is_configured(name))
    }
}

// ─────────────────────────────────────────────
// Gateway
// ─────────────────────────────────────────────

/// HTTP gateway bind address.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

// ─────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────

/// Live-dispatch tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatchConfig {
    /// Maximum in-flight provider calls. `1` means strictly sequential.
    pub concurrency: usize,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
    /// `max_tokens` sent to providers that accept it.
    pub max_tokens: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            timeout_secs: 30,
            max_tokens: 1000,
        }
    }
}

/// Show only whether a secret is set.
fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "***"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
