// tests/ingest_pipeline.rs
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use trends_analyzer::ingest::source::{ChannelSource, EventSource, JsonLinesSource};
use trends_analyzer::ingest::{spawn_ingest, Ingestor};
use trends_analyzer::related::RelatedBoard;
use trends_analyzer::report::{MemoryReportSink, ReportCadence};
use trends_analyzer::HistoryStore;

fn interest(ts: &str, ai: u8, gpt: Option<u8>) -> String {
    match gpt {
        Some(g) => format!(
            r#"{{"type":"interest_over_time","fetched_at":"now","timestamp":"{ts}","data":{{"AI":{ai},"ChatGPT":{g}}}}}"#
        ),
        None => format!(
            r#"{{"type":"interest_over_time","fetched_at":"now","timestamp":"{ts}","data":{{"AI":{ai}}}}}"#
        ),
    }
}

fn ingestor(store: &Arc<HistoryStore>, sink: &Arc<MemoryReportSink>, every: u64) -> Ingestor {
    Ingestor::new(
        store.clone(),
        Arc::new(RelatedBoard::new()),
        ReportCadence::every(every),
        3,
        sink.clone(),
    )
}

#[tokio::test]
async fn channel_stream_feeds_history_and_reports() {
    let store = Arc::new(HistoryStore::new(["AI", "ChatGPT"]));
    let sink = Arc::new(MemoryReportSink::new());
    let (tx, src) = ChannelSource::channel(64);

    let handle = spawn_ingest(ingestor(&store, &sink, 10), src);

    for i in 0..12u8 {
        tx.send(interest(&format!("t{i}"), 10 + 2 * i, Some(50))).await.unwrap();
        tx.send(r#"{"type":"related_queries_top","keyword":"AI","data":[]}"#.into())
            .await
            .unwrap();
    }
    tx.send("{broken".into()).await.unwrap();
    drop(tx);

    let stats = handle.await.unwrap().unwrap();
    assert_eq!(stats.received, 25);
    assert_eq!(stats.appended, 12);
    assert_eq!(stats.related, 12);
    assert_eq!(stats.discarded, 1);
    assert_eq!(stats.reports, 1);

    let snap = store.snapshot();
    assert_eq!(snap.scores("AI").len(), 12);
    assert_eq!(snap.scores("AI")[..3], [10, 12, 14]);

    let reports = sink.take();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].contains("Data points : 10"));
    assert!(reports[0].contains("Forecast    : [30.0, 32.0, 34.0]"));
}

#[tokio::test]
async fn omitted_keyword_advances_only_global_timestamps() {
    let store = Arc::new(HistoryStore::new(["AI", "ChatGPT"]));
    let sink = Arc::new(MemoryReportSink::new());
    let lines = format!(
        "{}\n{}\n",
        interest("t0", 1, Some(2)),
        interest("t1", 3, None)
    );
    let mut src = JsonLinesSource::new(lines.as_bytes());
    ingestor(&store, &sink, 0).run(&mut src).await.unwrap();

    let snap = store.snapshot();
    assert_eq!(snap.timestamps, vec!["t0", "t1"]);
    assert_eq!(snap.series["AI"].timestamps, vec!["t0", "t1"]);
    assert_eq!(snap.series["ChatGPT"].timestamps, vec!["t0"]);
    assert_eq!(snap.scores("ChatGPT"), &[2]);
}

struct BrokenTransport {
    sent: bool,
}

#[async_trait]
impl EventSource for BrokenTransport {
    async fn next_message(&mut self) -> Result<Option<String>> {
        if !self.sent {
            self.sent = true;
            return Ok(Some(interest("t0", 5, Some(5))));
        }
        Err(anyhow!("broker connection reset"))
    }
    fn name(&self) -> &'static str {
        "BrokenTransport"
    }
}

#[tokio::test]
async fn transport_failure_stops_ingestion_with_error() {
    let store = Arc::new(HistoryStore::new(["AI"]));
    let sink = Arc::new(MemoryReportSink::new());
    let mut src = BrokenTransport { sent: false };

    let err = ingestor(&store, &sink, 0)
        .run(&mut src)
        .await
        .expect_err("transport failure must surface");
    assert!(format!("{err:#}").contains("broker connection reset"));
    // what arrived before the failure is kept
    assert_eq!(store.event_count(), 1);
}

#[tokio::test]
async fn invalid_utf8_line_is_discarded_not_fatal() {
    let store = Arc::new(HistoryStore::new(["AI", "ChatGPT"]));
    let sink = Arc::new(MemoryReportSink::new());
    let mut bytes = interest("t0", 10, Some(20)).into_bytes();
    bytes.extend_from_slice(b"\n{\"type\":\"x\xff\"}\n");
    bytes.extend_from_slice(interest("t1", 11, Some(21)).as_bytes());
    bytes.push(b'\n');
    let mut src = JsonLinesSource::new(bytes.as_slice());

    let stats = ingestor(&store, &sink, 0)
        .run(&mut src)
        .await
        .expect("a corrupt record is not a transport failure");
    assert_eq!(stats.received, 3);
    assert_eq!(stats.appended, 2);
    assert_eq!(stats.discarded, 1);

    let snap = store.snapshot();
    assert_eq!(snap.timestamps, vec!["t0", "t1"]);
    assert_eq!(snap.scores("AI"), &[10, 11]);
}
