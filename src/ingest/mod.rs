// src/ingest/mod.rs
//! Write side: transport messages → event filter → history store.
//!
//! Every Nth accepted interest event also triggers the periodic text report.
//! The report runs on a private snapshot, never under the store lock.

pub mod source;

use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;

use crate::event::{filter_interest, TrendEvent};
use crate::related::RelatedBoard;
use crate::report::{format_report, ReportCadence, ReportSink};
use crate::store::HistoryStore;
use source::EventSource;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_events_total", "Messages received from the transport.");
        describe_counter!(
            "ingest_kept_total",
            "Interest-over-time events appended to history."
        );
        describe_counter!(
            "ingest_related_total",
            "Related-queries events forwarded to the board."
        );
        describe_counter!(
            "ingest_discarded_total",
            "Malformed or unrecognized messages dropped."
        );
        describe_counter!("reports_emitted_total", "Periodic text reports emitted.");
        describe_gauge!("history_event_count", "Accepted interest events held in memory.");
    });
}

/// What happened to one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Appended,
    Related,
    Discarded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub received: u64,
    pub appended: u64,
    pub related: u64,
    pub discarded: u64,
    pub reports: u64,
}

pub struct Ingestor {
    store: Arc<HistoryStore>,
    related: Arc<RelatedBoard>,
    cadence: ReportCadence,
    report_horizon: usize,
    sink: Arc<dyn ReportSink>,
    stats: IngestStats,
}

impl Ingestor {
    pub fn new(
        store: Arc<HistoryStore>,
        related: Arc<RelatedBoard>,
        cadence: ReportCadence,
        report_horizon: usize,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        ensure_metrics_described();
        Self {
            store,
            related,
            cadence,
            report_horizon,
            sink,
            stats: IngestStats::default(),
        }
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Decode, filter and store one raw transport message.
    pub fn handle_message(&mut self, raw: &str) -> Handled {
        self.stats.received += 1;
        counter!("ingest_events_total").increment(1);

        let event = TrendEvent::decode(raw);
        let keywords = self.store.keywords();

        if let Some(sample) = filter_interest(&event, keywords) {
            self.store.append(&sample.timestamp, sample.score_pairs());
            self.stats.appended += 1;
            counter!("ingest_kept_total").increment(1);
            gauge!("history_event_count").set(self.stats.appended as f64);

            tracing::debug!(
                target: "ingest",
                n = self.stats.appended,
                timestamp = %sample.timestamp,
                scores = ?sample.scores,
                "received"
            );

            if self.cadence.is_due(self.stats.appended) {
                self.emit_report();
            }
            return Handled::Appended;
        }

        if self.related.record(&event, keywords) {
            self.stats.related += 1;
            counter!("ingest_related_total").increment(1);
            return Handled::Related;
        }

        self.stats.discarded += 1;
        counter!("ingest_discarded_total").increment(1);
        tracing::debug!(target: "ingest", kind = event.kind(), "discarded");
        Handled::Discarded
    }

    fn emit_report(&mut self) {
        let snap = self.store.snapshot();
        let text = format_report(&snap, self.store.keywords(), self.report_horizon, Local::now());
        self.sink.emit(&text);
        self.stats.reports += 1;
        counter!("reports_emitted_total").increment(1);
    }

    /// Consume `source` until it ends. A transport error stops the loop and is
    /// returned to the caller unchanged.
    pub async fn run<S>(&mut self, source: &mut S) -> Result<IngestStats>
    where
        S: EventSource + ?Sized,
    {
        tracing::info!(target: "ingest", source = source.name(), "ingestion started");
        loop {
            match source.next_message().await {
                Ok(Some(raw)) => {
                    self.handle_message(&raw);
                }
                Ok(None) => {
                    tracing::info!(
                        target: "ingest",
                        source = source.name(),
                        received = self.stats.received,
                        appended = self.stats.appended,
                        "event stream ended"
                    );
                    return Ok(self.stats);
                }
                Err(e) => {
                    tracing::error!(target: "ingest", source = source.name(), error = ?e, "transport failure");
                    return Err(e);
                }
            }
        }
    }
}

/// Spawn the ingestion loop on the runtime.
pub fn spawn_ingest<S>(mut ingestor: Ingestor, mut source: S) -> tokio::task::JoinHandle<Result<IngestStats>>
where
    S: EventSource + 'static,
{
    tokio::spawn(async move { ingestor.run(&mut source).await })
}
