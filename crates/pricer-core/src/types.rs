//! Core types for Pricer: catalog records and the derived query results.
//!
//! Field names on the wire keep the historical gateway JSON shape
//! (`model_name`, `price_per_token`, `mmlu_score`, `model_size`) so existing
//! frontends keep working; Rust names describe what the values mean.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Catalog record
// ─────────────────────────────────────────────

/// One priced model from the catalog.
///
/// Immutable after load. `name` is unique within a provider, not globally:
/// the same model id may be listed under several providers (e.g. `gpt-4o`
/// under both OpenAI and Azure).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ModelRecord {
    #[serde(rename = "model_name")]
    pub name: String,
    #[serde(rename = "price_per_token")]
    pub price_per_unit: f64,
    pub provider: String,
    #[serde(rename = "mmlu_score")]
    pub quality_score: Option<f64>,
    #[serde(rename = "model_size")]
    pub size_class: String,
}

impl ModelRecord {
    /// Create a record with no quality score and an unknown size class.
    pub fn new(name: impl Into<String>, provider: impl Into<String>, price_per_unit: f64) -> Self {
        Self {
            name: name.into(),
            price_per_unit,
            provider: provider.into(),
            quality_score: None,
            size_class: "Unknown".to_string(),
        }
    }

    /// Builder-style setter for the quality score.
    pub fn with_quality_score(mut self, score: f64) -> Self {
        self.quality_score = Some(score);
        self
    }

    /// Builder-style setter for the size class.
    pub fn with_size_class(mut self, size_class: impl Into<String>) -> Self {
        self.size_class = size_class.into();
        self
    }

    /// Case-insensitive provider comparison.
    pub fn is_from(&self, provider: &str) -> bool {
        self.provider.eq_ignore_ascii_case(provider)
    }
}

// ─────────────────────────────────────────────
// Cost estimation
// ─────────────────────────────────────────────

/// Estimated price of running one prompt through one model.
///
/// Always satisfies `total_cost == price_per_unit * estimated_units`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CostEstimate {
    pub model_name: String,
    pub provider: String,
    #[serde(rename = "price_per_token")]
    pub price_per_unit: f64,
    #[serde(rename = "estimated_tokens")]
    pub estimated_units: u64,
    pub total_cost: f64,
    #[serde(rename = "mmlu_score")]
    pub quality_score: Option<f64>,
    #[serde(rename = "model_size")]
    pub size_class: String,
}

impl CostEstimate {
    /// Price `record` for a prompt of `estimated_units` units.
    pub fn for_record(record: &ModelRecord, estimated_units: u64) -> Self {
        Self {
            model_name: record.name.clone(),
            provider: record.provider.clone(),
            price_per_unit: record.price_per_unit,
            estimated_units,
            total_cost: record.price_per_unit * estimated_units as f64,
            quality_score: record.quality_score,
            size_class: record.size_class.clone(),
        }
    }
}

/// Result of a cost-ranking query: every catalog model, cheapest first.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CostRanking {
    pub prompt: String,
    #[serde(rename = "estimated_tokens")]
    pub estimated_units: u64,
    pub count: usize,
    pub ranked: Vec<CostEstimate>,
    /// How much cheaper the cheapest model is than the most expensive one,
    /// in percent. 0 when the catalog is empty or every total is 0.
    pub savings_percentage: f64,
}

// ─────────────────────────────────────────────
// Live dispatch
// ─────────────────────────────────────────────

/// Outcome of sending a prompt to one model.
///
/// Serializes as `{model_name, provider, success, response}` on success and
/// `{model_name, provider, success, error}` on failure.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DispatchResult {
    pub model_name: String,
    pub provider: String,
    pub success: bool,
    #[serde(rename = "response", skip_serializing_if = "Option::is_none", default)]
    pub reply_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl DispatchResult {
    /// A successful reply from `record`'s model.
    pub fn ok(record: &ModelRecord, reply_text: impl Into<String>) -> Self {
        Self {
            model_name: record.name.clone(),
            provider: record.provider.clone(),
            success: true,
            reply_text: Some(reply_text.into()),
            error: None,
        }
    }

    /// A failed attempt against `record`'s model.
    pub fn failed(record: &ModelRecord, error: impl Into<String>) -> Self {
        Self {
            model_name: record.name.clone(),
            provider: record.provider.clone(),
            success: false,
            reply_text: None,
            error: Some(error.into()),
        }
    }
}

/// All outcomes of one live dispatch, in catalog order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DispatchReport {
    pub count: usize,
    pub results: Vec<DispatchResult>,
}

impl DispatchReport {
    pub fn new(results: Vec<DispatchResult>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }

    /// Number of entries that produced a reply.
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_record_wire_names() {
        let record = ModelRecord::new("gpt-4o", "OpenAI", 0.0000025)
            .with_quality_score(88.7)
            .with_size_class("Unknown");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["model_name"], "gpt-4o");
        assert_eq!(json["price_per_token"], 0.0000025);
        assert_eq!(json["mmlu_score"], 88.7);
        assert_eq!(json["model_size"], "Unknown");
    }

    #[test]
    fn test_model_record_absent_score_is_null() {
        let record = ModelRecord::new("tiny", "Meta", 0.1);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["mmlu_score"].is_null());
    }

    #[test]
    fn test_is_from_ignores_case() {
        let record = ModelRecord::new("claude-3", "Anthropic", 0.1);
        assert!(record.is_from("anthropic"));
        assert!(record.is_from("ANTHROPIC"));
        assert!(!record.is_from("openai"));
    }

    #[test]
    fn test_cost_estimate_total() {
        let record = ModelRecord::new("gpt-x", "OpenAI", 0.001).with_quality_score(70.0);
        let estimate = CostEstimate::for_record(&record, 2);
        assert_eq!(estimate.total_cost, 0.002);
        assert_eq!(estimate.estimated_units, 2);
        assert_eq!(estimate.quality_score, Some(70.0));
    }

    #[test]
    fn test_dispatch_result_success_shape() {
        let record = ModelRecord::new("gpt-x", "OpenAI", 0.001);
        let json = serde_json::to_value(DispatchResult::ok(&record, "hi")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["response"], "hi");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_dispatch_result_failure_shape() {
        let record = ModelRecord::new("gpt-x", "OpenAI", 0.001);
        let json = serde_json::to_value(DispatchResult::failed(&record, "boom")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("response").is_none());
    }

    #[test]
    fn test_dispatch_report_counts() {
        let record = ModelRecord::new("m", "OpenAI", 0.0);
        let report = DispatchReport::new(vec![
            DispatchResult::ok(&record, "a"),
            DispatchResult::failed(&record, "b"),
        ]);
        assert_eq!(report.count, 2);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(DispatchReport::default().count, 0);
    }
}
