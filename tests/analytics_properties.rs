// tests/analytics_properties.rs
//
// Threshold, clamping and idempotence properties of the pure analytics,
// plus the worked scenarios they were designed against.

use trends_analyzer::analyze::{
    analyze_keyword, classify, forecast, summarize, TrendLabel, MIN_FORECAST_SAMPLES,
    MIN_TREND_SAMPLES,
};

/// Small deterministic LCG so the sweep needs no extra crates.
fn pseudo_series(seed: u64, len: usize) -> Vec<u8> {
    let mut x = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..len)
        .map(|_| {
            x = x
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((x >> 33) % 101) as u8
        })
        .collect()
}

#[test]
fn scenario_perfect_linear_series() {
    let scores = [10, 12, 14, 16, 18, 20, 22, 24, 26, 28];

    let s = summarize(&scores).expect("non-empty");
    assert_eq!(s.mean, 19.0);
    assert_eq!(s.median, 19.0);
    assert_eq!(s.min, 10.0);
    assert_eq!(s.max, 28.0);

    let t = classify(&scores);
    assert_eq!(t.label, TrendLabel::Up);
    assert_eq!(t.display_slope(), Some(2.0));

    assert_eq!(forecast(&scores, 3), vec![30.0, 32.0, 34.0]);
}

#[test]
fn scenario_short_flat_series() {
    let scores = [50, 50, 50, 50];
    assert_eq!(classify(&scores).label, TrendLabel::InsufficientData);
    assert!(forecast(&scores, 3).is_empty());
}

#[test]
fn scenario_near_ceiling_clamps() {
    let scores = [98, 99, 100, 100, 100, 100, 100, 100, 100, 100];
    let out = forecast(&scores, 5);
    assert_eq!(out, vec![100.0; 5]);
    assert_eq!(classify(&scores).label, TrendLabel::Stable);
}

#[test]
fn short_sequences_never_classify_or_forecast() {
    for len in 0..MIN_FORECAST_SAMPLES {
        let scores = pseudo_series(len as u64, len);
        if len < MIN_TREND_SAMPLES {
            let t = classify(&scores);
            assert_eq!(t.label, TrendLabel::InsufficientData, "len {len}");
            assert!(t.slope.is_none());
        }
        for steps in [0, 1, 3, 10, 50] {
            assert!(forecast(&scores, steps).is_empty(), "len {len} steps {steps}");
        }
    }
}

#[test]
fn zero_horizon_is_always_empty() {
    for seed in 0..20 {
        assert!(forecast(&pseudo_series(seed, 30), 0).is_empty());
    }
}

#[test]
fn forecasts_stay_in_score_domain() {
    for seed in 0..200 {
        let len = MIN_FORECAST_SAMPLES + (seed as usize % 40);
        let scores = pseudo_series(seed, len);
        let out = forecast(&scores, 25);
        assert_eq!(out.len(), 25);
        assert!(
            out.iter().all(|v| (0.0..=100.0).contains(v)),
            "seed {seed}: {out:?}"
        );
    }
    // steep ramps push the raw line far outside the domain
    let up: Vec<u8> = (0..10).map(|i| i * 11).collect();
    assert!(forecast(&up, 20).iter().all(|&v| v <= 100.0));
    let down: Vec<u8> = (0..10).map(|i| 99 - i * 11).collect();
    assert!(forecast(&down, 20).iter().all(|&v| v >= 0.0));
}

#[test]
fn empty_summary_is_undefined_not_nan() {
    assert!(summarize(&[]).is_none());
    let a = analyze_keyword("AI", &[], 3);
    assert!(a.summary.is_none());
}

#[test]
fn repeated_analysis_is_bit_identical() {
    for seed in 0..50 {
        let scores = pseudo_series(seed, 5 + seed as usize);
        let a = analyze_keyword("AI", &scores, 10);
        let b = analyze_keyword("AI", &scores, 10);
        assert_eq!(a, b);
        if let (Some(x), Some(y)) = (a.trend.slope, b.trend.slope) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
        for (x, y) in a.forecast.iter().zip(&b.forecast) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}
