//! Short-horizon linear forecast, clamped to the score domain.

use super::regression::fit_linear;
use super::round2;

/// Fewer samples than this yields an empty forecast ("not yet available").
pub const MIN_FORECAST_SAMPLES: usize = 10;

/// Longest horizon produced; larger requests are truncated.
pub const MAX_FORECAST_STEPS: usize = 1000;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// Extrapolate the least-squares line to `x = n .. n+steps-1`.
///
/// Each point is clamped into `[0, 100]` and rounded to 2 decimals.
/// Empty when `steps == 0` or there are fewer than `MIN_FORECAST_SAMPLES` scores.
/// At most `MAX_FORECAST_STEPS` points are returned.
pub fn forecast(scores: &[u8], steps: usize) -> Vec<f64> {
    if steps == 0 || scores.len() < MIN_FORECAST_SAMPLES {
        return Vec::new();
    }
    let Some(fit) = fit_linear(scores) else {
        return Vec::new();
    };

    let n = scores.len();
    let steps = steps.min(MAX_FORECAST_STEPS);
    (n..n.saturating_add(steps))
        .map(|x| round2(fit.at(x as f64).clamp(SCORE_MIN, SCORE_MAX)))
        .collect()
}
