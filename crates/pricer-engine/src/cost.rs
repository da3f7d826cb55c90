//! Cost estimation: coarse unit count and cheapest-first ranking.

use pricer_core::types::{CostEstimate, ModelRecord};

/// Characters per billing unit in the estimate.
pub const CHARS_PER_UNIT: usize = 4;

/// Approximate unit (token) count of `prompt`: `ceil(chars / 4)`.
///
/// This is a heuristic, not a tokenizer. Characters are Unicode scalar
/// values, so multi-byte text is not over-counted.
pub fn estimate_units(prompt: &str) -> u64 {
    prompt.chars().count().div_ceil(CHARS_PER_UNIT) as u64
}

/// Price every record for `estimated_units` and sort cheapest first.
///
/// The sort is stable: records with equal `total_cost` keep catalog order.
pub fn rank_records(records: &[ModelRecord], estimated_units: u64) -> Vec<CostEstimate> {
    let mut ranked: Vec<CostEstimate> = records
        .iter()
        .map(|record| CostEstimate::for_record(record, estimated_units))
        .collect();
    ranked.sort_by(|a, b| a.total_cost.total_cmp(&b.total_cost));
    ranked
}

/// Percent saved by picking the first entry of a ranked list over the last.
///
/// Returns 0 for an empty list or when the most expensive total is 0.
pub fn savings_percentage(ranked: &[CostEstimate]) -> f64 {
    match (ranked.first(), ranked.last()) {
        (Some(cheapest), Some(priciest)) if priciest.total_cost > 0.0 => {
            (priciest.total_cost - cheapest.total_cost) / priciest.total_cost * 100.0
        }
        _ => 0.0,
    }
}
