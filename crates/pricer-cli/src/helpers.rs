//! Shared CLI helpers: table formatting and path display.

use std::path::Path;

use colored::Colorize;

use pricer_core::types::{CostEstimate, DispatchResult, ModelRecord};
use pricer_core::utils::truncate_string;

/// Show `path` with the home directory collapsed to `~`.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs_next::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}

/// Quality score as shown in tables (`N/A` when unknown).
pub fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "N/A".to_string(), |s| format!("{s:.1}"))
}

/// Print a section heading.
pub fn print_heading(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
    println!();
}

pub fn print_model_table(records: &[ModelRecord]) {
    println!(
        "  {:<32} {:<12} {:>14} {:>6}  {}",
        "Model".bold(),
        "Provider".bold(),
        "Price/token".bold(),
        "MMLU".bold(),
        "Size".bold()
    );
    for record in records {
        println!(
            "  {:<32} {:<12} {:>14.8} {:>6}  {}",
            truncate_string(&record.name, 32),
            record.provider,
            record.price_per_unit,
            format_score(record.quality_score),
            record.size_class.dimmed()
        );
    }
}

pub fn print_cost_table(entries: &[CostEstimate]) {
    println!(
        "  {:>3}  {:<32} {:<12} {:>14} {:>6}",
        "#".bold(),
        "Model".bold(),
        "Provider".bold(),
        "Total cost".bold(),
        "MMLU".bold()
    );
    for (rank, entry) in entries.iter().enumerate() {
        let cost = format!("${:.8}", entry.total_cost);
        let cost = if rank == 0 {
            cost.green().to_string()
        } else {
            cost
        };
        println!(
            "  {:>3}  {:<32} {:<12} {:>14} {:>6}",
            rank + 1,
            truncate_string(&entry.model_name, 32),
            entry.provider,
            cost,
            format_score(entry.quality_score)
        );
    }
}

pub fn print_dispatch_result(result: &DispatchResult) {
    let marker = if result.success {
        "✓".green()
    } else {
        "✗".red()
    };
    println!(
        "{} {} {}",
        marker,
        result.model_name.bold(),
        format!("({})", result.provider).dimmed()
    );
    match (&result.reply_text, &result.error) {
        (Some(reply), _) => println!("{reply}"),
        (None, Some(error)) => println!("{}", error.red()),
        (None, None) => println!("{}", "(no response)".dimmed()),
    }
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn display_path_collapses_home() {
        if let Some(home) = dirs_next::home_dir() {
            let shown = display_path(&home.join(".pricer/config.json"));
            assert_eq!(shown, "~/.pricer/config.json");
        }
    }

    #[test]
    fn display_path_keeps_other_paths() {
        let shown = display_path(&PathBuf::from("/etc/pricer.csv"));
        assert_eq!(shown, "/etc/pricer.csv");
    }

    #[test]
    fn format_score_unknown() {
        assert_eq!(format_score(None), "N/A");
        assert_eq!(format_score(Some(86.44)), "86.4");
    }
}
