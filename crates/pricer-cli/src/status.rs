//! `pricer status`: show configuration, catalog, and credential status.

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;

use pricer_core::config::{get_config_path, load_config};
use pricer_core::utils::expand_home;
use pricer_providers::PROVIDERS;

use crate::helpers::display_path;

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let config_path = config_path.map(PathBuf::from).unwrap_or_else(get_config_path);

    println!();
    println!("{}", "Pricer Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        display_path(&config_path),
        found_marker(config_path.exists())
    );

    let catalog_path = expand_home(&config.catalog.path);
    println!(
        "  {:<18} {} {}",
        "Catalog:".bold(),
        display_path(&catalog_path),
        found_marker(catalog_path.exists())
    );

    println!(
        "  {:<18} {}:{}",
        "Gateway:".bold(),
        config.gateway.host,
        config.gateway.port
    );

    println!(
        "  {:<18} {} | timeout: {}s | max_tokens: {}",
        "Dispatch:".bold(),
        format!("concurrency: {}", config.dispatch.concurrency).dimmed(),
        config.dispatch.timeout_secs,
        config.dispatch.max_tokens,
    );

    println!();
    println!("  {}", "Providers:".bold());
    for spec in PROVIDERS {
        let status = if config.providers.is_configured(spec.name) {
            format!("{} ({} set)", "✓".green(), spec.credential_field)
        } else {
            format!("{}", "· not configured".dimmed())
        };
        let note = if spec.is_live() {
            String::new()
        } else {
            format!(" {}", "[not yet implemented]".yellow())
        };
        println!("    {:<20} {}{}", spec.display_name, status, note);
    }

    println!();
    Ok(())
}

fn found_marker(exists: bool) -> String {
    if exists {
        "✓".green().to_string()
    } else {
        "(not found)".red().to_string()
    }
}
