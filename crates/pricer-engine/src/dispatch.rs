//! Live dispatch: model selection and per-model prompt execution.

use serde::Deserialize;
use tracing::{info, warn};

use pricer_core::types::{DispatchResult, ModelRecord};
use pricer_providers::{ClientFactory, LlmClient};

/// Inbound dispatch request.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DispatchRequest {
    #[serde(default)]
    pub prompt: String,
    /// Exact model names to target. Takes precedence over `providers`.
    #[serde(default)]
    pub model_names: Vec<String>,
    /// Provider tags to target (case-insensitive). Used only when
    /// `model_names` is empty.
    #[serde(default)]
    pub providers: Vec<String>,
}

impl DispatchRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_models<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = providers.into_iter().map(Into::into).collect();
        self
    }
}

/// Pick the catalog records a request targets, preserving catalog order.
///
/// A non-empty `model_names` list wins and `providers` is ignored; otherwise a
/// non-empty `providers` list filters by tag; otherwise every record is used.
pub fn select_models<'a>(records: &'a [ModelRecord], request: &DispatchRequest) -> Vec<&'a ModelRecord> {
    if !request.model_names.is_empty() {
        records
            .iter()
            .filter(|r| request.model_names.iter().any(|name| name == &r.name))
            .collect()
    } else if !request.providers.is_empty() {
        records
            .iter()
            .filter(|r| request.providers.iter().any(|p| r.is_from(p)))
            .collect()
    } else {
        records.iter().collect()
    }
}

/// Source of adapters for catalog records.
///
/// [`ClientFactory`] is the production implementation; tests substitute
/// scripted clients.
pub trait ClientResolver: Send + Sync {
    fn resolve(&self, record: &ModelRecord) -> Option<Box<dyn LlmClient>>;
}

impl ClientResolver for ClientFactory {
    fn resolve(&self, record: &ModelRecord) -> Option<Box<dyn LlmClient>> {
        self.create(record)
    }
}

/// Send `prompt` through one client and fold the outcome into a result entry.
pub(crate) async fn run_one(
    record: ModelRecord,
    client: Box<dyn LlmClient>,
    prompt: String,
) -> DispatchResult {
    match client.send_prompt(&prompt).await {
        Ok(reply) => {
            info!(provider = client.provider_name(), model = client.model_name(), "Prompt answered");
            DispatchResult::ok(&record, reply)
        }
        Err(e) => {
            warn!(
                provider = client.provider_name(),
                model = client.model_name(),
                kind = ?e.kind(),
                error = %e,
                "Prompt failed"
            );
            DispatchResult::failed(&record, e.to_string())
        }
    }
}
