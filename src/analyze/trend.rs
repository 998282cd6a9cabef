//! Trend classification from the least-squares slope.
//!
//! Labels are plain tags. Glyphs and wording belong to whoever renders them
//! (see `TrendLabel::glyph` for the console report).

use serde::Serialize;

use super::regression::fit_linear;
use super::round2;

/// Fewer samples than this yields `InsufficientData`.
pub const MIN_TREND_SAMPLES: usize = 5;
/// Slope (score points per sample) beyond which a series counts as moving.
pub const SLOPE_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Up,
    Down,
    Stable,
    InsufficientData,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Up => "up",
            TrendLabel::Down => "down",
            TrendLabel::Stable => "stable",
            TrendLabel::InsufficientData => "insufficient data",
        }
    }

    /// Console decoration for the text report.
    pub fn glyph(&self) -> &'static str {
        match self {
            TrendLabel::Up => "📈",
            TrendLabel::Down => "📉",
            TrendLabel::Stable => "➡️",
            TrendLabel::InsufficientData => "…",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendResult {
    /// Full-precision slope; `None` below the sample threshold.
    pub slope: Option<f64>,
    pub label: TrendLabel,
}

impl TrendResult {
    pub fn insufficient() -> Self {
        Self {
            slope: None,
            label: TrendLabel::InsufficientData,
        }
    }

    /// Slope rounded for display.
    pub fn display_slope(&self) -> Option<f64> {
        self.slope.map(round2)
    }
}

/// Classify the direction of `scores` over sample index.
pub fn classify(scores: &[u8]) -> TrendResult {
    if scores.len() < MIN_TREND_SAMPLES {
        return TrendResult::insufficient();
    }
    let Some(fit) = fit_linear(scores) else {
        return TrendResult::insufficient();
    };

    let label = if fit.slope > SLOPE_THRESHOLD {
        TrendLabel::Up
    } else if fit.slope < -SLOPE_THRESHOLD {
        TrendLabel::Down
    } else {
        TrendLabel::Stable
    };

    TrendResult {
        slope: Some(fit.slope),
        label,
    }
}
