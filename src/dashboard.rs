//! Dashboard side of the presentation adapter.
//!
//! A timer task rebuilds a [`DashboardSnapshot`] from the history store and
//! parks it in a shared cache; the renderer polls that cache over HTTP.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::analyze::{classify, forecast, round1, stats, summarize, StatSummary, TrendResult};
use crate::store::{HistorySnapshot, HistoryStore};

/// Structured result handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub generated_at: String,
    pub data_points: usize,
    pub timestamps: Vec<String>,
    pub series: BTreeMap<String, Vec<u8>>,
    /// Per-keyword timestamps aligned with `series`.
    pub series_timestamps: BTreeMap<String, Vec<String>>,
    pub current: BTreeMap<String, u8>,
    pub rolling_average: BTreeMap<String, f64>,
    /// Keywords with no samples are absent (undefined summary).
    pub summaries: BTreeMap<String, StatSummary>,
    pub trends: BTreeMap<String, TrendResult>,
    pub forecasts: BTreeMap<String, Vec<f64>>,
}

#[derive(Clone, Copy, Debug)]
pub struct DashboardParams {
    pub horizon: usize,
    pub rolling_window: usize,
}

/// Compute the dashboard view of `snapshot`. Pure; no store access.
pub fn build_dashboard(
    snapshot: &HistorySnapshot,
    keywords: &[String],
    params: DashboardParams,
) -> DashboardSnapshot {
    let mut out = DashboardSnapshot {
        generated_at: Utc::now().to_rfc3339(),
        data_points: snapshot.event_count(),
        timestamps: snapshot.timestamps.clone(),
        series: BTreeMap::new(),
        series_timestamps: BTreeMap::new(),
        current: BTreeMap::new(),
        rolling_average: BTreeMap::new(),
        summaries: BTreeMap::new(),
        trends: BTreeMap::new(),
        forecasts: BTreeMap::new(),
    };

    for kw in keywords {
        let Some(series) = snapshot.series.get(kw) else {
            continue;
        };
        let scores = series.scores.as_slice();

        out.series.insert(kw.clone(), scores.to_vec());
        out.series_timestamps
            .insert(kw.clone(), series.timestamps.clone());
        if let Some(last) = series.latest() {
            out.current.insert(kw.clone(), last);
        }
        out.rolling_average
            .insert(kw.clone(), rolling_average(scores, params.rolling_window));
        if let Some(s) = summarize(scores) {
            out.summaries.insert(kw.clone(), s);
        }
        out.trends.insert(kw.clone(), classify(scores));
        out.forecasts
            .insert(kw.clone(), forecast(scores, params.horizon));
    }

    out
}

/// Mean of the last `window` scores, 1 decimal; 0 when empty.
pub fn rolling_average(scores: &[u8], window: usize) -> f64 {
    let start = scores.len().saturating_sub(window);
    stats::mean(&scores[start..]).map(round1).unwrap_or(0.0)
}

/// Latest dashboard snapshot, shared between the refresher and the HTTP side.
#[derive(Debug, Clone, Default)]
pub struct DashboardCache {
    inner: Arc<RwLock<Option<Arc<DashboardSnapshot>>>>,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<Arc<DashboardSnapshot>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn publish(&self, snap: Arc<DashboardSnapshot>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(snap);
    }
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("dashboard_refresh_total", "Dashboard snapshots rebuilt.");
    });
}

/// Take a snapshot and rebuild the cache once.
pub fn refresh_once(
    store: &HistoryStore,
    cache: &DashboardCache,
    params: DashboardParams,
) -> Arc<DashboardSnapshot> {
    // store lock is released before any analytics run
    let snap = store.snapshot();
    let built = Arc::new(build_dashboard(&snap, store.keywords(), params));
    cache.publish(built.clone());
    ensure_metrics_described();
    counter!("dashboard_refresh_total").increment(1);
    built
}

/// Rebuild the cache every `period` until the runtime shuts down.
pub fn spawn_refresher(
    store: Arc<HistoryStore>,
    cache: DashboardCache,
    params: DashboardParams,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let built = refresh_once(&store, &cache, params);
            tracing::debug!(
                target: "dashboard",
                data_points = built.data_points,
                "dashboard refreshed"
            );
        }
    })
}
