//! Ordinary least-squares fit of a degree-1 polynomial over sample index.
//!
//! `x = [0, 1, .., n-1]`, `y = scores`. Both the trend classifier and the
//! forecaster share this fit so their slopes always agree.

/// Fitted line `y ≈ slope·x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Evaluate the fitted line at sample index `x`.
    #[inline]
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `scores` against their index. Returns `None` for fewer than two samples.
///
/// Uses the centered form (deviations from the means), which keeps the sums
/// exact for the small integer inputs this engine sees.
pub fn fit_linear(scores: &[u8]) -> Option<LinearFit> {
    let n = scores.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = scores.iter().map(|&s| f64::from(s)).sum::<f64>() / nf;

    let mut sxx = 0.0f64;
    let mut sxy = 0.0f64;
    for (i, &s) in scores.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (f64::from(s) - mean_y);
    }

    // n >= 2 guarantees sxx > 0
    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}
