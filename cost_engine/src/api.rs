//! HTTP API for the Cost Engine.
//!
//! This module exposes the comparison engine as a small stateless JSON
//! API using the [`axum`](https://crates.io/crates/axum) framework, so
//! the site's calculator widget can fetch results instead of carrying
//! its own copy of the rates.  Request bodies hold raw form values; the
//! handlers normalise them before calling the engine, so no request
//! with a well-formed JSON body is rejected.

use crate::engine::CostEngine;
use crate::format::ComparisonReport;
use crate::models::ComparisonResult;
use crate::normalize::{normalize, normalize_employees, normalize_salary, RawInput};
use crate::tax::RateTable;
use anyhow::Result;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Most headcounts evaluated by one batch request; extra entries are
/// dropped.
pub const MAX_BATCH_HEADCOUNTS: usize = 32;

/// Application state shared across requests.
pub struct AppState {
    pub engine: CostEngine,
}

/// Body of `POST /api/compare/batch`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub salary: Value,
    /// Raw headcount values, each normalised like the form's field.
    #[serde(default)]
    pub headcounts: Vec<Value>,
}

/// Build the API router around an engine using `rates`.
pub fn build_router(rates: RateTable) -> Router {
    let state = Arc::new(AppState {
        engine: CostEngine::new(rates),
    });
    Router::new()
        .route("/api/compare", post(compare_handler))
        .route("/api/compare/batch", post(batch_handler))
        .route("/api/report", post(report_handler))
        .route("/api/rates", get(rates_handler))
        .with_state(state)
}

/// Handler for POST /api/compare
async fn compare_handler(
    State(app_state): State<Arc<AppState>>,
    Json(raw): Json<RawInput>,
) -> Json<ComparisonResult> {
    Json(app_state.engine.compare(&normalize(&raw)))
}

/// Handler for POST /api/compare/batch
async fn batch_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> Json<Vec<ComparisonResult>> {
    let salary = normalize_salary(&request.salary);
    if request.headcounts.len() > MAX_BATCH_HEADCOUNTS {
        warn!(
            requested = request.headcounts.len(),
            limit = MAX_BATCH_HEADCOUNTS,
            "truncating headcount batch"
        );
    }
    let headcounts: Vec<u32> = request
        .headcounts
        .iter()
        .take(MAX_BATCH_HEADCOUNTS)
        .map(normalize_employees)
        .collect();
    Json(app_state.engine.compare_headcounts(salary, &headcounts))
}

/// Handler for POST /api/report
async fn report_handler(
    State(app_state): State<Arc<AppState>>,
    Json(raw): Json<RawInput>,
) -> Json<ComparisonReport> {
    let result = app_state.engine.compare(&normalize(&raw));
    Json(ComparisonReport::from(&result))
}

/// Handler for GET /api/rates
async fn rates_handler(State(app_state): State<Arc<AppState>>) -> Json<RateTable> {
    Json(*app_state.engine.rates())
}

/// Launch the API server.  Binds to `addr` and blocks until the server
/// terminates (e.g. when interrupted).
pub async fn serve(addr: &str, rates: RateTable) -> Result<()> {
    let router = build_router(rates);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
