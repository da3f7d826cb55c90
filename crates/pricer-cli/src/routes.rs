//! Gateway HTTP handlers and their JSON envelopes.
//!
//! Every listing and query response carries `success: true`. Request-level
//! validation failures answer HTTP 400 with `{success: false, error}`;
//! per-model provider failures stay inside the dispatch results.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use pricer_core::types::{CostEstimate, DispatchResult, ModelRecord};
use pricer_core::utils::timestamp;
use pricer_engine::{DispatchRequest, QueryError};

use crate::gateway::AppState;

const COST_PROMPT_ERROR: &str = "Prompt is required and must be a non-empty string";
const SEND_PROMPT_ERROR: &str = "Prompt is required";

// ─────────────────────────────────────────────
// Envelopes
// ─────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            success: false,
            error: message.into(),
        }),
    )
}

impl From<QueryError> for ErrorResponse {
    fn from(err: QueryError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            provider: None,
            data,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct CostResponse {
    pub success: bool,
    pub prompt: String,
    pub estimated_tokens: u64,
    pub count: usize,
    pub data: Vec<CostEstimate>,
    pub savings_percentage: f64,
}

// ─────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": timestamp() }))
}

pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ListResponse<ModelRecord>> {
    Json(ListResponse::new(state.engine().models().to_vec()))
}

pub async fn list_models_by_provider(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
) -> Json<ListResponse<ModelRecord>> {
    let mut response = ListResponse::new(state.engine().models_by_provider(&provider));
    response.provider = Some(provider);
    Json(response)
}

pub async fn list_providers(State(state): State<Arc<AppState>>) -> Json<ListResponse<String>> {
    Json(ListResponse::new(state.engine().providers()))
}

pub async fn best_price_for_prompt(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<CostResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Rejecting cost query with unreadable body");
        bad_request(COST_PROMPT_ERROR)
    })?;

    let ranking = state
        .engine()
        .rank_by_cost(&request.prompt)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(e))))?;

    info!(
        estimated_tokens = ranking.estimated_units,
        models = ranking.count,
        "Answered cost query"
    );

    Ok(Json(CostResponse {
        success: true,
        prompt: ranking.prompt,
        estimated_tokens: ranking.estimated_units,
        count: ranking.count,
        data: ranking.ranked,
        savings_percentage: ranking.savings_percentage,
    }))
}

pub async fn send_prompt(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DispatchRequest>, JsonRejection>,
) -> Result<Json<ListResponse<DispatchResult>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Rejecting dispatch with unreadable body");
        bad_request(SEND_PROMPT_ERROR)
    })?;

    let report = state
        .engine()
        .dispatch(&request)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(e))))?;

    Ok(Json(ListResponse::new(report.results)))
}

pub async fn api_docs() -> Json<Value> {
    Json(json!({
        "message": "Pricer gateway endpoints",
        "endpoints": [
            "GET /health",
            "GET /api/models",
            "GET /api/models/provider/{provider}",
            "GET /api/providers",
            "POST /api/get_best_price_for_prompt",
            "POST /api/send_prompt",
        ],
    }))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
