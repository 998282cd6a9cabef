//! Trends Analyzer — Binary Entrypoint
//! Reads interest events from the transport, keeps per-keyword history, logs a
//! periodic report and serves the dashboard snapshot over HTTP.

use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trends_analyzer::dashboard::spawn_refresher;
use trends_analyzer::ingest::source::JsonLinesSource;
use trends_analyzer::ingest::{spawn_ingest, Ingestor};
use trends_analyzer::telemetry::Metrics;
use trends_analyzer::report::{LogReportSink, ReportCadence};
use trends_analyzer::{build_state, create_router, AppConfig};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trends_analyzer=info,report=info,ingest=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load_default()?;
    tracing::info!(keywords = ?cfg.keywords, bind = %cfg.bind_addr, "configuration loaded");

    let metrics = Metrics::init(cfg.refresh_interval_ms, cfg.keywords.len())?;
    let state = build_state(&cfg);

    let refresher = spawn_refresher(
        state.store.clone(),
        state.dashboard.clone(),
        state.params,
        cfg.refresh_interval(),
    );

    let ingestor = Ingestor::new(
        state.store.clone(),
        state.related.clone(),
        ReportCadence::every(cfg.report_every),
        cfg.report_horizon,
        Arc::new(LogReportSink),
    );
    let mut ingest = match &cfg.events_path {
        Some(p) => spawn_ingest(ingestor, JsonLinesSource::open(p).await?),
        None => spawn_ingest(ingestor, JsonLinesSource::stdin()),
    };

    let app = create_router(state).merge(metrics.router());
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.bind_addr))?;
    tracing::info!("dashboard API listening on http://{}", cfg.bind_addr);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
        })
        .into_future();
    tokio::pin!(server);

    // A clean end of stream keeps the dashboard up; a transport failure is fatal.
    let result = tokio::select! {
        res = &mut server => res.context("http server"),
        joined = &mut ingest => match joined.context("ingest task panicked")? {
            Ok(stats) => {
                tracing::info!(?stats, "ingestion finished; still serving dashboard");
                server.await.context("http server")
            }
            Err(e) => Err(e.context("ingestion stopped on transport failure")),
        },
    };

    refresher.abort();
    ingest.abort();
    result
}
