//! Pricer CLI: entry point.
//!
//! # Commands
//!
//! - `pricer serve [--port N] [--logs]`: start the HTTP gateway
//! - `pricer estimate <PROMPT> [--top N]`: rank catalog models by prompt cost
//! - `pricer send <PROMPT> [--model M]... [--provider P]...`: live dispatch
//! - `pricer models [--provider P]` / `pricer providers`: catalog listings
//! - `pricer status`: show configuration and credential status

mod gateway;
mod helpers;
mod query_cmd;
mod routes;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use pricer_core::catalog::Catalog;
use pricer_core::config::{load_config, Config};
use pricer_core::utils::expand_home;
use pricer_engine::QueryEngine;
use pricer_providers::ClientFactory;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Pricer: compare LLM prices and fan a prompt out to many models
#[derive(Parser)]
#[command(name = "pricer", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.pricer/config.json)
    #[arg(long, global = true, env = "PRICER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Port to listen on (overrides config and $PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Rank every catalog model by the estimated cost of a prompt
    Estimate {
        prompt: String,

        /// Only show the N cheapest models
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Send a prompt to every configured model and print the replies
    Send {
        prompt: String,

        /// Target a model by exact name (repeatable)
        #[arg(short, long = "model")]
        models: Vec<String>,

        /// Target a provider tag (repeatable, ignored when --model is given)
        #[arg(short, long = "provider")]
        providers: Vec<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List catalog models
    Models {
        /// Only models from this provider
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// List provider tags present in the catalog
    Providers,

    /// Show configuration and credential status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve { port, logs } => {
            init_logging(logs);
            let mut config = load_config(config_path);
            if let Some(port) = port {
                config.gateway.port = port;
            }
            let engine = build_engine(&config)?;
            gateway::run(Arc::new(engine), &config.gateway).await
        }
        Commands::Estimate { prompt, top } => {
            init_logging(false);
            let engine = build_engine(&load_config(config_path))?;
            query_cmd::estimate(&engine, &prompt, top)
        }
        Commands::Send {
            prompt,
            models,
            providers,
            logs,
        } => {
            init_logging(logs);
            let engine = build_engine(&load_config(config_path))?;
            query_cmd::send(&engine, prompt, models, providers).await
        }
        Commands::Models { provider } => {
            init_logging(false);
            let engine = build_engine(&load_config(config_path))?;
            query_cmd::models(&engine, provider.as_deref());
            Ok(())
        }
        Commands::Providers => {
            init_logging(false);
            let engine = build_engine(&load_config(config_path))?;
            query_cmd::providers(&engine);
            Ok(())
        }
        Commands::Status => status::run(config_path),
    }
}

/// Build a `QueryEngine` from the loaded configuration.
///
/// A catalog that cannot be loaded is fatal; missing credentials are not.
pub fn build_engine(config: &Config) -> Result<QueryEngine> {
    let catalog_path = expand_home(&config.catalog.path);
    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("failed to load catalog: {}", catalog_path.display()))?;

    let factory = ClientFactory::from_config(config.providers.clone(), &config.dispatch)
        .context("failed to build HTTP client")?;

    info!(
        models = catalog.len(),
        concurrency = config.dispatch.concurrency,
        "Query engine ready"
    );

    Ok(QueryEngine::new(
        Arc::new(catalog),
        Arc::new(factory),
        config.dispatch.concurrency,
    ))
}

/// Initialize tracing/logging.
///
/// `RUST_LOG` wins when set; otherwise `--logs` selects debug output for the
/// pricer crates and the default is warnings only.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("pricer=debug,pricer_core=debug,pricer_providers=debug,pricer_engine=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
