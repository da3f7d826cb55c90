//! Configuration system: schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use pricer_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Catalog: {}", cfg.catalog.path);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{get_config_path, load_config};
pub use schema::{
    ApiKeyConfig, AwsConfig, AzureConfig, CatalogConfig, Config, DispatchConfig, GatewayConfig,
    ProvidersConfig,
};
