// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod event;
pub mod ingest;
pub mod related;
pub mod report;
pub mod store;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::AppConfig;
pub use crate::event::TrendEvent;
pub use crate::store::{HistorySnapshot, HistoryStore};

use std::sync::Arc;

use crate::dashboard::{DashboardCache, DashboardParams};
use crate::related::RelatedBoard;

/// Shared state for one process, built from the configuration.
pub fn build_state(cfg: &AppConfig) -> AppState {
    AppState {
        store: Arc::new(HistoryStore::new(cfg.keywords.iter().cloned())),
        related: Arc::new(RelatedBoard::new()),
        dashboard: DashboardCache::new(),
        params: DashboardParams {
            horizon: cfg.dashboard_horizon,
            rolling_window: cfg.rolling_window,
        },
        report_horizon: cfg.report_horizon,
    }
}
