//! Query engine: the two user-facing operations over the catalog:
//! cost ranking and live multi-model dispatch.
//!
//! The engine owns no mutable state. The catalog and credentials are fixed at
//! construction and shared read-only across requests.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info};

use pricer_core::catalog::Catalog;
use pricer_core::types::{CostRanking, DispatchReport, ModelRecord};

use crate::cost::{estimate_units, rank_records, savings_percentage};
use crate::dispatch::{run_one, select_models, ClientResolver, DispatchRequest};

/// Request-level failure. Per-model provider errors never surface here.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{0}")]
    Validation(String),
}

/// Cost ranking and live dispatch over one catalog.
pub struct QueryEngine {
    catalog: Arc<Catalog>,
    resolver: Arc<dyn ClientResolver>,
    /// Maximum provider calls in flight during one dispatch (>= 1).
    concurrency: usize,
}

impl QueryEngine {
    /// Create an engine. `concurrency` of 0 is treated as 1 (sequential).
    pub fn new(catalog: Arc<Catalog>, resolver: Arc<dyn ClientResolver>, concurrency: usize) -> Self {
        Self {
            catalog,
            resolver,
            concurrency: concurrency.max(1),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Rank every catalog model by the estimated cost of `prompt`, cheapest first.
    pub fn rank_by_cost(&self, prompt: &str) -> Result<CostRanking, QueryError> {
        validate_prompt(prompt, "Prompt is required and must be a non-empty string")?;

        let estimated_units = estimate_units(prompt);
        let ranked = rank_records(self.catalog.records(), estimated_units);
        let savings_percentage = savings_percentage(&ranked);

        debug!(
            estimated_units,
            models = ranked.len(),
            cheapest = ranked.first().map(|e| e.model_name.as_str()).unwrap_or("-"),
            "Ranked catalog by cost"
        );

        Ok(CostRanking {
            prompt: prompt.to_string(),
            estimated_units,
            count: ranked.len(),
            ranked,
            savings_percentage,
        })
    }

    /// Send the prompt to every selected model that has a client and collect
    /// the outcomes in catalog order.
    ///
    /// Models whose provider has no credential are skipped without a result
    /// entry. A failing model never stops the others.
    pub async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReport, QueryError> {
        validate_prompt(&request.prompt, "Prompt is required")?;

        let selected = select_models(self.catalog.records(), request);
        let jobs: Vec<_> = selected
            .into_iter()
            .filter_map(|record| {
                self.resolver
                    .resolve(record)
                    .map(|client| (record.clone(), client))
            })
            .collect();

        info!(
            targets = jobs.len(),
            concurrency = self.concurrency,
            "Dispatching prompt"
        );

        // `buffered` keeps input order regardless of completion order
        let futures: Vec<_> = jobs
            .into_iter()
            .map(|(record, client)| run_one(record, client, request.prompt.clone()))
            .collect();
        let results = stream::iter(futures)
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let report = DispatchReport::new(results);
        info!(
            count = report.count,
            succeeded = report.succeeded(),
            "Dispatch complete"
        );
        Ok(report)
    }

    /// Every catalog record, in catalog order.
    pub fn models(&self) -> &[ModelRecord] {
        self.catalog.records()
    }

    /// Records for one provider tag (case-insensitive).
    pub fn models_by_provider(&self, provider: &str) -> Vec<ModelRecord> {
        self.catalog.by_provider(provider)
    }

    /// Distinct provider tags present in the catalog.
    pub fn providers(&self) -> Vec<String> {
        self.catalog.providers()
    }
}

fn validate_prompt(prompt: &str, message: &str) -> Result<(), QueryError> {
    if prompt.trim().is_empty() {
        return Err(QueryError::Validation(message.to_string()));
    }
    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use pricer_core::config::{ApiKeyConfig, ProvidersConfig};
    use pricer_providers::{ClientError, ClientFactory, ClientOptions, LlmClient};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ── Scripted clients ──

    #[derive(Clone)]
    enum Script {
        Reply(&'static str),
        Fail(u16, &'static str),
        Malformed,
        Slow(u64, &'static str),
    }

    struct ScriptedClient {
        provider: String,
        model: String,
        script: Script,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn send_prompt(&self, _prompt: &str) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                Script::Reply(text) => Ok(text.to_string()),
                Script::Fail(status, body) => Err(ClientError::Api {
                    provider: self.provider.clone(),
                    status: *status,
                    body: body.to_string(),
                }),
                Script::Malformed => Err(ClientError::format(&self.provider)),
                Script::Slow(ms, text) => {
                    tokio::time::sleep(Duration::from_millis(*ms)).await;
                    Ok(text.to_string())
                }
            }
        }

        fn model_name(&self) -> &str {
            &self.model
        }

        fn provider_name(&self) -> &str {
            &self.provider
        }
    }

    /// Resolves models by name; unknown names have "no credential".
    #[derive(Default)]
    struct ScriptedResolver {
        scripts: HashMap<String, Script>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedResolver {
        fn with(mut self, model: &str, script: Script) -> Self {
            self.scripts.insert(model.to_string(), script);
            self
        }
    }

    impl ClientResolver for ScriptedResolver {
        fn resolve(&self, record: &ModelRecord) -> Option<Box<dyn LlmClient>> {
            let script = self.scripts.get(&record.name)?.clone();
            Some(Box::new(ScriptedClient {
                provider: record.provider.clone(),
                model: record.name.clone(),
                script,
                calls: self.calls.clone(),
            }))
        }
    }

    fn sample_catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(vec![
            ModelRecord::new("gpt-x", "OpenAI", 0.001),
            ModelRecord::new("claude-y", "Anthropic", 0.0005),
        ]))
    }

    fn engine(catalog: Arc<Catalog>, resolver: ScriptedResolver, concurrency: usize) -> QueryEngine {
        QueryEngine::new(catalog, Arc::new(resolver), concurrency)
    }

    // ── Cost ranking ──

    #[test]
    fn test_rank_by_cost_example() {
        let engine = engine(sample_catalog(), ScriptedResolver::default(), 1);
        let ranking = engine.rank_by_cost("abcdefgh").unwrap();

        assert_eq!(ranking.estimated_units, 2);
        assert_eq!(ranking.count, 2);
        assert_eq!(ranking.prompt, "abcdefgh");
        assert_eq!(ranking.ranked[0].model_name, "claude-y");
        assert_eq!(ranking.ranked[0].total_cost, 0.001);
        assert_eq!(ranking.ranked[1].model_name, "gpt-x");
        assert_eq!(ranking.ranked[1].total_cost, 0.002);
        assert!((ranking.savings_percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rank_by_cost_rejects_empty_prompt() {
        let engine = engine(sample_catalog(), ScriptedResolver::default(), 1);
        assert!(matches!(engine.rank_by_cost(""), Err(QueryError::Validation(_))));
        assert!(matches!(engine.rank_by_cost("   \n"), Err(QueryError::Validation(_))));
    }

    #[test]
    fn test_rank_by_cost_empty_catalog() {
        let engine = engine(Arc::new(Catalog::default()), ScriptedResolver::default(), 1);
        let ranking = engine.rank_by_cost("hello").unwrap();
        assert_eq!(ranking.count, 0);
        assert!(ranking.ranked.is_empty());
        assert_eq!(ranking.savings_percentage, 0.0);
    }

    #[test]
    fn test_rank_by_cost_all_free_catalog() {
        let catalog = Arc::new(Catalog::new(vec![
            ModelRecord::new("llama-local", "Meta", 0.0),
            ModelRecord::new("mistral-local", "Mistral", 0.0),
        ]));
        let engine = engine(catalog, ScriptedResolver::default(), 1);
        let ranking = engine.rank_by_cost("hello world").unwrap();
        assert_eq!(ranking.count, 2);
        assert_eq!(ranking.savings_percentage, 0.0);
    }

    // ── Dispatch ──

    #[tokio::test]
    async fn test_dispatch_empty_prompt_makes_no_calls() {
        let resolver = ScriptedResolver::default().with("gpt-x", Script::Reply("hi"));
        let calls = resolver.calls.clone();
        let engine = engine(sample_catalog(), resolver, 1);

        let err = engine.dispatch(&DispatchRequest::new("")).await.unwrap_err();
        assert!(matches!(err, QueryError::Validation(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dispatch_empty_catalog() {
        let engine = engine(Arc::new(Catalog::default()), ScriptedResolver::default(), 1);
        let report = engine.dispatch(&DispatchRequest::new("hi")).await.unwrap();
        assert_eq!(report.count, 0);
        assert!(report.results.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_without_credentials_yields_nothing() {
        let engine = engine(sample_catalog(), ScriptedResolver::default(), 1);
        let report = engine.dispatch(&DispatchRequest::new("hi")).await.unwrap();
        assert_eq!(report.count, 0);
        assert!(report.results.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_model_name() {
        let resolver = ScriptedResolver::default()
            .with("gpt-x", Script::Reply("a"))
            .with("claude-y", Script::Reply("b"));
        let engine = engine(sample_catalog(), resolver, 1);

        let request = DispatchRequest::new("hi").with_models(["X"]);
        let report = engine.dispatch(&request).await.unwrap();
        assert_eq!(report.count, 0);
    }

    #[tokio::test]
    async fn test_dispatch_failure_does_not_stop_later_models() {
        let catalog = Arc::new(Catalog::new(vec![
            ModelRecord::new("broken", "OpenAI", 0.1),
            ModelRecord::new("garbled", "Google", 0.1),
            ModelRecord::new("healthy", "Anthropic", 0.1),
        ]));
        let resolver = ScriptedResolver::default()
            .with("broken", Script::Fail(500, "upstream exploded"))
            .with("garbled", Script::Malformed)
            .with("healthy", Script::Reply("fine"));
        let calls = resolver.calls.clone();
        let engine = engine(catalog, resolver, 1);

        let report = engine.dispatch(&DispatchRequest::new("hi")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.count, 3);

        let broken = &report.results[0];
        assert!(!broken.success);
        assert!(broken.error.as_deref().unwrap().contains("upstream exploded"));

        let garbled = &report.results[1];
        assert!(!garbled.success);
        assert!(garbled.error.as_deref().unwrap().contains("unexpected response format"));

        let healthy = &report.results[2];
        assert!(healthy.success);
        assert_eq!(healthy.reply_text.as_deref(), Some("fine"));
    }

    #[tokio::test]
    async fn test_dispatch_skips_unresolved_models_silently() {
        let resolver = ScriptedResolver::default().with("claude-y", Script::Reply("only me"));
        let engine = engine(sample_catalog(), resolver, 1);

        let report = engine.dispatch(&DispatchRequest::new("hi")).await.unwrap();
        assert_eq!(report.count, 1);
        assert_eq!(report.results[0].model_name, "claude-y");
        assert_eq!(report.results[0].provider, "Anthropic");
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_keeps_catalog_order() {
        let catalog = Arc::new(Catalog::new(vec![
            ModelRecord::new("slow", "OpenAI", 0.1),
            ModelRecord::new("medium", "Anthropic", 0.1),
            ModelRecord::new("fast", "Google", 0.1),
        ]));
        let resolver = ScriptedResolver::default()
            .with("slow", Script::Slow(150, "s"))
            .with("medium", Script::Slow(75, "m"))
            .with("fast", Script::Reply("f"));
        let engine = engine(catalog, resolver, 3);

        let report = engine.dispatch(&DispatchRequest::new("hi")).await.unwrap();
        let order: Vec<&str> = report.results.iter().map(|r| r.model_name.as_str()).collect();
        assert_eq!(order, vec!["slow", "medium", "fast"]);
        assert_eq!(report.succeeded(), 3);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_sequential() {
        let engine = engine(sample_catalog(), ScriptedResolver::default(), 0);
        assert_eq!(engine.concurrency, 1);
    }

    // ── End to end through the real factory ──

    #[tokio::test]
    async fn test_dispatch_with_factory_against_mock_provider() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{ "type": "text", "text": "from claude" }]
            })))
            .mount(&mock_server)
            .await;

        let mut creds = ProvidersConfig::default();
        creds.openai = ApiKeyConfig {
            api_key: "sk-test".into(),
            api_base: Some(mock_server.uri()),
        };
        creds.anthropic = ApiKeyConfig {
            api_key: "sk-ant-test".into(),
            api_base: Some(mock_server.uri()),
        };

        let factory = ClientFactory::new(creds, ClientOptions::default()).unwrap();
        let engine = QueryEngine::new(sample_catalog(), Arc::new(factory), 1);

        let report = engine.dispatch(&DispatchRequest::new("hi")).await.unwrap();
        assert_eq!(report.count, 2);

        assert_eq!(report.results[0].model_name, "gpt-x");
        assert!(!report.results[0].success);
        assert!(report.results[0]
            .error
            .as_deref()
            .unwrap()
            .contains("service unavailable"));

        assert_eq!(report.results[1].model_name, "claude-y");
        assert_eq!(report.results[1].reply_text.as_deref(), Some("from claude"));
    }

    #[tokio::test]
    async fn test_dispatch_error_never_carries_api_key() {
        let mut creds = ProvidersConfig::default();
        creds.google = ApiKeyConfig {
            api_key: "GOOGLE-KEY-DO-NOT-ECHO".into(),
            api_base: Some("http://127.0.0.1:1".into()),
        };
        let catalog = Arc::new(Catalog::new(vec![ModelRecord::new("gemini-pro", "Google", 0.0000005)]));
        let factory = ClientFactory::new(creds, ClientOptions::default()).unwrap();
        let engine = QueryEngine::new(catalog, Arc::new(factory), 1);

        let report = engine.dispatch(&DispatchRequest::new("hi")).await.unwrap();
        assert_eq!(report.count, 1);
        let error = report.results[0].error.as_deref().unwrap();
        assert!(error.starts_with("Google request failed"), "{error}");
        assert!(!error.contains("GOOGLE-KEY-DO-NOT-ECHO"), "{error}");
    }

    #[test]
    fn test_catalog_queries() {
        let engine = engine(sample_catalog(), ScriptedResolver::default(), 1);
        assert_eq!(engine.models().len(), 2);
        assert_eq!(engine.models_by_provider("openai").len(), 1);
        assert_eq!(engine.providers(), vec!["OpenAI", "Anthropic"]);
    }
}
