//! HTTP surface polled by the dashboard renderer.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Local;
use tower_http::cors::CorsLayer;

use crate::analyze::{analyze_keyword, KeywordAnalysis};
use crate::dashboard::{refresh_once, DashboardCache, DashboardParams, DashboardSnapshot};
use crate::related::{RelatedBoard, RelatedEntry};
use crate::report::format_report;
use crate::store::HistoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<HistoryStore>,
    pub related: Arc<RelatedBoard>,
    pub dashboard: DashboardCache,
    pub params: DashboardParams,
    pub report_horizon: usize,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/dashboard", get(dashboard))
        .route("/report", get(report))
        .route("/keywords/{keyword}", get(keyword_analysis))
        .route("/related", get(related))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn dashboard(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    // Before the first refresher tick, build one on demand.
    let snap = match state.dashboard.latest() {
        Some(s) => s,
        None => refresh_once(&state.store, &state.dashboard, state.params),
    };
    Json((*snap).clone())
}

async fn report(State(state): State<AppState>) -> String {
    let snap = state.store.snapshot();
    format_report(
        &snap,
        state.store.keywords(),
        state.report_horizon,
        Local::now(),
    )
}

async fn keyword_analysis(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Json<KeywordAnalysis>, StatusCode> {
    if !state.store.is_tracked(&keyword) {
        return Err(StatusCode::NOT_FOUND);
    }
    let snap = state.store.snapshot();
    Ok(Json(analyze_keyword(
        &keyword,
        snap.scores(&keyword),
        state.params.horizon,
    )))
}

async fn related(State(state): State<AppState>) -> Json<BTreeMap<String, RelatedEntry>> {
    Json(state.related.snapshot())
}
