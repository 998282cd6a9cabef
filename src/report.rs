//! Periodic text report (console/log side of the presentation adapter).

use std::fmt::Write as _;
use std::sync::Mutex;

use chrono::{DateTime, Local};

use crate::analyze::{analyze_keyword, KeywordAnalysis, TrendLabel};
use crate::store::HistorySnapshot;

const RULE_WIDTH: usize = 50;

/// Fires on every Nth accepted event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportCadence {
    every: u64,
}

impl ReportCadence {
    /// `every == 0` never fires.
    pub fn every(every: u64) -> Self {
        Self { every }
    }

    pub fn is_due(&self, accepted: u64) -> bool {
        self.every > 0 && accepted > 0 && accepted % self.every == 0
    }
}

/// Where finished report blocks go.
pub trait ReportSink: Send + Sync {
    fn emit(&self, report: &str);
}

/// Default sink: the `report` tracing target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReportSink;

impl ReportSink for LogReportSink {
    fn emit(&self, report: &str) {
        tracing::info!(target: "report", "\n{report}");
    }
}

/// Collects reports in memory (tests, embedding).
#[derive(Debug, Default)]
pub struct MemoryReportSink {
    pub reports: Mutex<Vec<String>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(
            &mut *self
                .reports
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        )
    }
}

impl ReportSink for MemoryReportSink {
    fn emit(&self, report: &str) {
        self.reports
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(report.to_string());
    }
}

/// Analyze every tracked keyword that has data.
pub fn analyze_snapshot(
    snapshot: &HistorySnapshot,
    keywords: &[String],
    horizon: usize,
) -> Vec<KeywordAnalysis> {
    keywords
        .iter()
        .map(|kw| analyze_keyword(kw, snapshot.scores(kw), horizon))
        .filter(|a| a.samples > 0)
        .collect()
}

/// Render the report block for `snapshot`. Keywords without data are skipped.
pub fn format_report(
    snapshot: &HistorySnapshot,
    keywords: &[String],
    horizon: usize,
    now: DateTime<Local>,
) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "📊 ANALYSIS  |  {}", now.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "{rule}");

    for a in analyze_snapshot(snapshot, keywords, horizon) {
        write_keyword_block(&mut out, &a, horizon);
    }

    let _ = write!(out, "{rule}");
    out
}

fn write_keyword_block(out: &mut String, a: &KeywordAnalysis, horizon: usize) {
    let _ = writeln!(out);
    let _ = writeln!(out, "🔑 Keyword: {}", a.keyword);
    let _ = writeln!(out, "   Data points : {}", a.samples);
    if let Some(s) = &a.summary {
        let _ = writeln!(out, "   Mean        : {:?} | Median: {:?}", s.mean, s.median);
        let _ = writeln!(
            out,
            "   Min/Max     : {:?} / {:?} | Std: {:?}",
            s.min, s.max, s.std_dev
        );
    }
    let _ = writeln!(out, "   Trend       : {}", trend_line(a));
    if !a.forecast.is_empty() {
        let _ = writeln!(
            out,
            "   Forecast    : {:?} (next {} points)",
            a.forecast, horizon
        );
    }
}

fn trend_line(a: &KeywordAnalysis) -> String {
    match (a.trend.label, a.trend.slope) {
        (TrendLabel::InsufficientData, _) | (_, None) => {
            TrendLabel::InsufficientData.as_str().to_string()
        }
        (label, Some(slope)) => format!(
            "{} {} (slope: {:+.2})",
            label.glyph(),
            label.as_str(),
            slope
        ),
    }
}
