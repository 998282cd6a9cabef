// src/analyze/mod.rs
//! Pure analytics over immutable score sequences.
//!
//! Nothing in here touches the history store. Callers take a snapshot first and
//! hand the copied slices in, so no lock is ever held while these run.

pub mod forecast;
pub mod regression;
pub mod stats;
pub mod trend;

use serde::Serialize;

pub use crate::analyze::forecast::{forecast, MAX_FORECAST_STEPS, MIN_FORECAST_SAMPLES};
pub use crate::analyze::regression::{fit_linear, LinearFit};
pub use crate::analyze::stats::{summarize, StatSummary};
pub use crate::analyze::trend::{classify, TrendLabel, TrendResult, MIN_TREND_SAMPLES};

/// Round half away from zero to 2 decimals.
#[inline]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Round half away from zero to 1 decimal.
#[inline]
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Everything the presentation side needs for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordAnalysis {
    pub keyword: String,
    pub samples: usize,
    pub summary: Option<StatSummary>,
    pub trend: TrendResult,
    pub forecast: Vec<f64>,
}

/// Run summary, trend and a `horizon`-step forecast over one keyword's scores.
pub fn analyze_keyword(keyword: &str, scores: &[u8], horizon: usize) -> KeywordAnalysis {
    KeywordAnalysis {
        keyword: keyword.to_string(),
        samples: scores.len(),
        summary: summarize(scores),
        trend: classify(scores),
        forecast: forecast(scores, horizon),
    }
}
