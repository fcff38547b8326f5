//! Percentile/moment aggregation over finite numeric samples.

use serde::{Deserialize, Serialize};

/// The canonical per-KPI summary: mean/std/extrema plus a fixed percentile
/// ladder, matching the result JSON contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    pub n: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Nearest-rank percentile over an already-sorted ascending slice.
///
/// `p` is in `[0, 1]`. Index is `max(0, ceil(p * n) - 1)`, clamped so an
/// empty slice never panics (callers on empty data should not reach here;
/// see [`compute_stats`]).
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    let rank = (p * n as f64).ceil() as isize - 1;
    let idx = rank.max(0) as usize;
    sorted[idx.min(n - 1)]
}

/// Compute the full [`StatSummary`] over an unsorted sample. Population
/// standard deviation (divide by `n`, not `n - 1`).
pub fn compute_stats(samples: &[f64]) -> StatSummary {
    if samples.is_empty() {
        return StatSummary::default();
    }
    let n = samples.len();
    let mean = samples.iter().sum::<f64>() / n as f64;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
    let std = variance.sqrt();

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    StatSummary {
        n,
        mean,
        std,
        min: sorted[0],
        max: sorted[n - 1],
        p5: percentile(&sorted, 0.05),
        p10: percentile(&sorted, 0.10),
        p25: percentile(&sorted, 0.25),
        p50: percentile(&sorted, 0.50),
        p75: percentile(&sorted, 0.75),
        p90: percentile(&sorted, 0.90),
        p95: percentile(&sorted, 0.95),
        p99: percentile(&sorted, 0.99),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn deciles_of_ten_through_hundred() {
        let data: Vec<f64> = (1..=10).map(|i| (i * 10) as f64).collect();
        let s = compute_stats(&data);
        assert_eq!(s.mean, 55.0);
        assert_eq!(s.p50, 50.0);
    }

    #[test]
    fn percentiles_of_one_through_hundred() {
        let data: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        let s = compute_stats(&data);
        assert_eq!(s.p10, 10.0);
        assert_eq!(s.p90, 90.0);
        assert_eq!(s.p50, 50.0);
    }

    #[test]
    fn singleton_sample_is_degenerate() {
        let s = compute_stats(&[42.0]);
        assert_eq!(s.mean, 42.0);
        assert_eq!(s.std, 0.0);
        assert_eq!(s.min, 42.0);
        assert_eq!(s.max, 42.0);
        assert_eq!(s.p99, 42.0);
    }

    #[test]
    fn empty_sample_does_not_panic() {
        let s = compute_stats(&[]);
        assert_eq!(s.n, 0);
        assert_eq!(s.mean, 0.0);
    }

    proptest! {
        #[test]
        fn percentiles_always_fall_within_the_sample_range(
            mut samples in prop::collection::vec(-1_000.0f64..1_000.0, 1..200),
        ) {
            let s = compute_stats(&samples);
            samples.sort_by(|a, b| a.partial_cmp(b).unwrap());
            prop_assert!(s.min >= samples[0] - f64::EPSILON);
            prop_assert!(s.max <= samples[samples.len() - 1] + f64::EPSILON);
            for p in [s.p5, s.p10, s.p25, s.p50, s.p75, s.p90, s.p95, s.p99] {
                prop_assert!(p >= s.min - f64::EPSILON && p <= s.max + f64::EPSILON);
            }
        }

        #[test]
        fn percentile_ladder_is_non_decreasing(
            mut samples in prop::collection::vec(-1_000.0f64..1_000.0, 1..200),
        ) {
            samples.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let ladder = [0.05, 0.10, 0.25, 0.50, 0.75, 0.90, 0.95, 0.99];
            let values: Vec<f64> = ladder.iter().map(|&p| percentile(&samples, p)).collect();
            for w in values.windows(2) {
                prop_assert!(w[0] <= w[1]);
            }
        }
    }
}
