//! Config loader: reads `~/.pricer/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.pricer/config.json` (or an explicit path)
//! 3. Environment variables `PRICER_<SECTION>__<FIELD>` (override JSON)
//!
//! A missing or unreadable file is not an error: the gateway keeps running
//! without credentials and only answers cost queries.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{ApiKeyConfig, Config};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path (or `path`) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        warn!(
            "No config file found at {}; continuing without API keys (cost estimation only)",
            path.display()
        );
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    info!("Loaded config from {}", path.display());
    apply_env_overrides(config)
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `PRICER_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `PRICER_CATALOG__PATH` → `catalog.path`
/// - `PRICER_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `PRICER_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
/// - `PRICER_PROVIDERS__AWS__{ACCESS_KEY_ID,SECRET_ACCESS_KEY,REGION}`
/// - `PRICER_PROVIDERS__AZURE__{API_KEY,ENDPOINT,API_VERSION}`
/// - `PRICER_GATEWAY__HOST`, `PRICER_GATEWAY__PORT` (and plain `PORT`)
/// - `PRICER_DISPATCH__CONCURRENCY`, `PRICER_DISPATCH__TIMEOUT_SECS`,
///   `PRICER_DISPATCH__MAX_TOKENS`
fn apply_env_overrides(mut config: Config) -> Config {
    // Catalog
    if let Ok(val) = std::env::var("PRICER_CATALOG__PATH") {
        config.catalog.path = val;
    }

    // Single-key providers
    apply_provider_env(&mut config.providers.openai, "OPENAI");
    apply_provider_env(&mut config.providers.anthropic, "ANTHROPIC");
    apply_provider_env(&mut config.providers.google, "GOOGLE");
    apply_provider_env(&mut config.providers.meta, "META");
    apply_provider_env(&mut config.providers.mistral, "MISTRAL");

    // AWS
    if let Ok(val) = std::env::var("PRICER_PROVIDERS__AWS__ACCESS_KEY_ID") {
        config.providers.aws.access_key_id = val;
    }
    if let Ok(val) = std::env::var("PRICER_PROVIDERS__AWS__SECRET_ACCESS_KEY") {
        config.providers.aws.secret_access_key = val;
    }
    if let Ok(val) = std::env::var("PRICER_PROVIDERS__AWS__REGION") {
        config.providers.aws.region = val;
    }

    // Azure
    if let Ok(val) = std::env::var("PRICER_PROVIDERS__AZURE__API_KEY") {
        config.providers.azure.api_key = val;
    }
    if let Ok(val) = std::env::var("PRICER_PROVIDERS__AZURE__ENDPOINT") {
        config.providers.azure.endpoint = val;
    }
    if let Ok(val) = std::env::var("PRICER_PROVIDERS__AZURE__API_VERSION") {
        config.providers.azure.api_version = val;
    }

    // Gateway
    if let Ok(val) = std::env::var("PRICER_GATEWAY__HOST") {
        config.gateway.host = val;
    }
    let port = std::env::var("PRICER_GATEWAY__PORT").or_else(|_| std::env::var("PORT"));
    if let Ok(val) = port {
        if let Ok(p) = val.parse::<u16>() {
            config.gateway.port = p;
        }
    }

    // Dispatch
    if let Ok(val) = std::env::var("PRICER_DISPATCH__CONCURRENCY") {
        if let Ok(n) = val.parse::<usize>() {
            config.dispatch.concurrency = n.max(1);
        }
    }
    if let Ok(val) = std::env::var("PRICER_DISPATCH__TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.dispatch.timeout_secs = n;
        }
    }
    if let Ok(val) = std::env::var("PRICER_DISPATCH__MAX_TOKENS") {
        if let Ok(n) = val.parse::<u32>() {
            config.dispatch.max_tokens = n;
        }
    }

    config
}

/// Apply env var overrides for a single-key provider.
fn apply_provider_env(provider: &mut ApiKeyConfig, name: &str) {
    if let Ok(val) = std::env::var(format!("PRICER_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Ok(val) = std::env::var(format!("PRICER_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
