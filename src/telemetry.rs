//! Prometheus recorder and the `/metrics` route.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and publish the static configuration gauges.
    pub fn init(refresh_interval_ms: u64, tracked_keywords: usize) -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_gauge!(
            "dashboard_refresh_interval_ms",
            "Configured dashboard refresh period in milliseconds."
        );
        describe_gauge!("tracked_keywords", "Keywords tracked by this process.");
        gauge!("dashboard_refresh_interval_ms").set(refresh_interval_ms as f64);
        gauge!("tracked_keywords").set(tracked_keywords as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
