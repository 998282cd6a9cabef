//! Descriptive statistics over one keyword's score sequence.

use serde::Serialize;

use super::round2;

/// Summary of a non-empty score sequence. Every field is rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatSummary {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation (divides by `n`).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarize `scores`. `None` is the "undefined" result for an empty sequence.
pub fn summarize(scores: &[u8]) -> Option<StatSummary> {
    let min = *scores.iter().min()?;
    let max = *scores.iter().max()?;

    let n = scores.len() as f64;
    let mean = scores.iter().map(|&s| f64::from(s)).sum::<f64>() / n;
    let variance = scores
        .iter()
        .map(|&s| {
            let d = f64::from(s) - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    Some(StatSummary {
        mean: round2(mean),
        median: round2(median(scores)),
        std_dev: round2(variance.sqrt()),
        min: f64::from(min),
        max: f64::from(max),
    })
}

/// Arithmetic mean, `None` when empty. Unrounded.
pub fn mean(scores: &[u8]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64)
}

// Caller guarantees a non-empty slice.
fn median(scores: &[u8]) -> f64 {
    let mut sorted = scores.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
    } else {
        f64::from(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_undefined() {
        assert_eq!(summarize(&[]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn linear_series_summary() {
        let s = summarize(&[10, 12, 14, 16, 18, 20, 22, 24, 26, 28]).unwrap();
        assert_eq!(s.mean, 19.0);
        assert_eq!(s.median, 19.0);
        assert_eq!(s.min, 10.0);
        assert_eq!(s.max, 28.0);
        // sqrt(33) = 5.7445..
        assert_eq!(s.std_dev, 5.74);
    }

    #[test]
    fn odd_count_median_is_middle_element() {
        let s = summarize(&[7, 1, 100]).unwrap();
        assert_eq!(s.median, 7.0);
        assert_eq!(s.mean, 36.0);
    }

    #[test]
    fn even_count_median_interpolates() {
        let s = summarize(&[1, 2, 3, 4]).unwrap();
        assert_eq!(s.median, 2.5);
    }

    #[test]
    fn single_sample_has_zero_spread() {
        let s = summarize(&[42]).unwrap();
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.min, s.max);
    }

    #[test]
    fn mean_rounds_to_two_decimals() {
        // 10/3 = 3.333..
        let s = summarize(&[3, 3, 4]).unwrap();
        assert_eq!(s.mean, 3.33);
    }
}
