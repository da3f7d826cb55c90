//! `pricer estimate | send | models | providers`: catalog queries from the terminal.

use anyhow::Result;
use colored::Colorize;

use pricer_engine::{DispatchRequest, QueryEngine};

use crate::helpers;

/// Print the cost ranking for `prompt`, optionally capped at `top` rows.
pub fn estimate(engine: &QueryEngine, prompt: &str, top: Option<usize>) -> Result<()> {
    let ranking = engine.rank_by_cost(prompt)?;

    helpers::print_heading("Cost estimate");
    println!(
        "  {} {}  {} {}  {} {:.1}%",
        "Estimated tokens:".bold(),
        ranking.estimated_units,
        "Models:".bold(),
        ranking.count,
        "Savings:".bold(),
        ranking.savings_percentage
    );
    println!();

    let shown = top.unwrap_or(ranking.ranked.len()).min(ranking.ranked.len());
    helpers::print_cost_table(&ranking.ranked[..shown]);
    println!();
    Ok(())
}

/// Dispatch `prompt` and print every per-model outcome.
pub async fn send(
    engine: &QueryEngine,
    prompt: String,
    models: Vec<String>,
    providers: Vec<String>,
) -> Result<()> {
    let request = DispatchRequest::new(prompt)
        .with_models(models)
        .with_providers(providers);
    let report = engine.dispatch(&request).await?;

    helpers::print_heading("Responses");
    if report.results.is_empty() {
        println!(
            "  {}",
            "No models matched, or none of their providers has a credential configured.".dimmed()
        );
        println!();
        return Ok(());
    }

    for result in &report.results {
        helpers::print_dispatch_result(result);
    }
    println!(
        "{}",
        format!("{}/{} models answered", report.succeeded(), report.count).dimmed()
    );
    Ok(())
}

/// List catalog records, optionally for one provider.
pub fn models(engine: &QueryEngine, provider: Option<&str>) {
    let records = match provider {
        Some(p) => engine.models_by_provider(p),
        None => engine.models().to_vec(),
    };

    helpers::print_heading(&format!("Models ({})", records.len()));
    helpers::print_model_table(&records);
    println!();
}

/// List distinct provider tags in the catalog.
pub fn providers(engine: &QueryEngine) {
    let providers = engine.providers();
    helpers::print_heading(&format!("Providers ({})", providers.len()));
    for provider in providers {
        let count = engine.models_by_provider(&provider).len();
        println!("  {:<16} {}", provider, format!("{count} models").dimmed());
    }
    println!();
}
