//! The six analytic distribution families used to model uncertain
//! parameters, plus their JSON wire format.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::DistributionError;
use crate::prng::Prng;

/// A tagged uncertain parameter. Every variant samples from `prng`, reports
/// analytic mean/variance, and evaluates a (possibly non-normalized, in the
/// truncated case) density.
///
/// Wire format: `{"type": "normal", "params": {"mu": 0.0, "sigma": 1.0}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum Distribution {
    Normal {
        mu: f64,
        sigma: f64,
    },
    TruncatedNormal {
        mu: f64,
        sigma: f64,
        lo: f64,
        hi: f64,
    },
    Beta {
        alpha: f64,
        beta: f64,
    },
    Triangular {
        lo: f64,
        mode: f64,
        hi: f64,
    },
    Uniform {
        lo: f64,
        hi: f64,
    },
    #[serde(rename = "lognormal")]
    LogNormal {
        mu: f64,
        sigma: f64,
    },
}

/// Decode a `Distribution` from a JSON value, reporting an
/// `UnknownDistribution` error for any tag outside the six known variants
/// instead of a generic parse failure.
pub fn distribution_from_json(value: &serde_json::Value) -> Result<Distribution, DistributionError> {
    let tag = value.get("type").and_then(|v| v.as_str()).ok_or_else(|| DistributionError::UnknownType("<missing>".to_string()))?;
    match tag {
        "normal" | "truncated_normal" | "beta" | "triangular" | "uniform" | "lognormal" => {
            serde_json::from_value(value.clone()).map_err(|e| DistributionError::Malformed(e.to_string()))
        }
        other => Err(DistributionError::UnknownType(other.to_string())),
    }
}

/// Box–Muller sample of a standard normal, rejecting `u1 == 0`. Consumes two
/// PRNG draws per call (three in the rare rejection case).
fn sample_standard_normal(prng: &mut Prng) -> f64 {
    loop {
        let u1 = prng.next_f64();
        if u1 == 0.0 {
            continue;
        }
        let u2 = prng.next_f64();
        return (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    }
}

/// Marsaglia–Tsang gamma sampling, with the Boost-style `alpha < 1` fallback
/// `gamma(alpha) = gamma(alpha + 1) * U^(1/alpha)`.
fn sample_gamma(prng: &mut Prng, shape: f64) -> f64 {
    if shape < 1.0 {
        let u = prng.next_f64().max(1e-12);
        return sample_gamma(prng, shape + 1.0) * u.powf(1.0 / shape);
    }
    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        let mut x;
        let mut v;
        loop {
            x = sample_standard_normal(prng);
            v = 1.0 + c * x;
            if v > 0.0 {
                break;
            }
        }
        v = v * v * v;
        let u = prng.next_f64();
        if u < 1.0 - 0.0331 * x * x * x * x {
            return d * v;
        }
        if u.ln() < 0.5 * x * x + d * (1.0 - v + v.ln()) {
            return d * v;
        }
    }
}

fn normal_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 {
        return if (x - mu).abs() < f64::EPSILON { f64::INFINITY } else { 0.0 };
    }
    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp() / (sigma * (2.0 * PI).sqrt())
}

/// Lanczos approximation of `ln(Gamma(x))`, used for the Beta density.
fn ln_gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut a = COEFFS[0];
    let t = x + G + 0.5;
    for (i, c) in COEFFS.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
}

fn beta_fn(alpha: f64, beta: f64) -> f64 {
    (ln_gamma(alpha) + ln_gamma(beta) - ln_gamma(alpha + beta)).exp()
}

impl Distribution {
    /// Draw one sample, advancing `prng`.
    pub fn sample(&self, prng: &mut Prng) -> f64 {
        match *self {
            Distribution::Normal { mu, sigma } => {
                if sigma <= 0.0 {
                    return mu;
                }
                mu + sigma * sample_standard_normal(prng)
            }
            Distribution::TruncatedNormal { mu, sigma, lo, hi } => {
                if sigma <= 0.0 {
                    return mu.clamp(lo, hi);
                }
                loop {
                    let x = mu + sigma * sample_standard_normal(prng);
                    if x >= lo && x <= hi {
                        return x;
                    }
                }
            }
            Distribution::Beta { alpha, beta } => {
                if alpha <= 0.0 || beta <= 0.0 {
                    return 0.5;
                }
                let ga = sample_gamma(prng, alpha);
                let gb = sample_gamma(prng, beta);
                if ga + gb <= 0.0 {
                    0.5
                } else {
                    ga / (ga + gb)
                }
            }
            Distribution::Triangular { lo, mode, hi } => {
                if (hi - lo).abs() < f64::EPSILON {
                    return lo;
                }
                let u = prng.next_f64();
                let fc = (mode - lo) / (hi - lo);
                if u < fc {
                    lo + (u * (hi - lo) * (mode - lo)).sqrt()
                } else {
                    hi - ((1.0 - u) * (hi - lo) * (hi - mode)).sqrt()
                }
            }
            Distribution::Uniform { lo, hi } => {
                if (hi - lo).abs() < f64::EPSILON {
                    return lo;
                }
                lo + prng.next_f64() * (hi - lo)
            }
            Distribution::LogNormal { mu, sigma } => {
                if sigma <= 0.0 {
                    return mu.exp();
                }
                (mu + sigma * sample_standard_normal(prng)).exp()
            }
        }
    }

    /// Analytic mean. For `TruncatedNormal` this is the *untruncated* mean —
    /// a documented approximation, see the design notes.
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Normal { mu, .. } => mu,
            Distribution::TruncatedNormal { mu, .. } => mu,
            Distribution::Beta { alpha, beta } => alpha / (alpha + beta),
            Distribution::Triangular { lo, mode, hi } => (lo + mode + hi) / 3.0,
            Distribution::Uniform { lo, hi } => (lo + hi) / 2.0,
            Distribution::LogNormal { mu, sigma } => (mu + sigma * sigma / 2.0).exp(),
        }
    }

    /// Analytic variance. For `TruncatedNormal` this is the *untruncated*
    /// variance, per the same documented approximation as `mean`.
    pub fn variance(&self) -> f64 {
        match *self {
            Distribution::Normal { sigma, .. } => sigma * sigma,
            Distribution::TruncatedNormal { sigma, .. } => sigma * sigma,
            Distribution::Beta { alpha, beta } => {
                (alpha * beta) / ((alpha + beta).powi(2) * (alpha + beta + 1.0))
            }
            Distribution::Triangular { lo, mode, hi } => {
                (lo * lo + mode * mode + hi * hi - lo * mode - lo * hi - mode * hi) / 18.0
            }
            Distribution::Uniform { lo, hi } => (hi - lo).powi(2) / 12.0,
            Distribution::LogNormal { mu, sigma } => {
                ((sigma * sigma).exp() - 1.0) * (2.0 * mu + sigma * sigma).exp()
            }
        }
    }

    /// Probability density at `x`. Visualization-grade, not guaranteed to
    /// integrate to 1 for the truncated case (see design notes).
    pub fn pdf(&self, x: f64) -> f64 {
        match *self {
            Distribution::Normal { mu, sigma } => normal_pdf(x, mu, sigma),
            Distribution::TruncatedNormal { mu, sigma, lo, hi } => {
                if x < lo || x > hi {
                    0.0
                } else {
                    normal_pdf(x, mu, sigma)
                }
            }
            Distribution::Beta { alpha, beta } => {
                if !(0.0..=1.0).contains(&x) || alpha <= 0.0 || beta <= 0.0 {
                    0.0
                } else if x == 0.0 || x == 1.0 {
                    0.0
                } else {
                    x.powf(alpha - 1.0) * (1.0 - x).powf(beta - 1.0) / beta_fn(alpha, beta)
                }
            }
            Distribution::Triangular { lo, mode, hi } => {
                if x < lo || x > hi || (hi - lo).abs() < f64::EPSILON {
                    0.0
                } else if x < mode {
                    2.0 * (x - lo) / ((hi - lo) * (mode - lo).max(f64::EPSILON))
                } else if x > mode {
                    2.0 * (hi - x) / ((hi - lo) * (hi - mode).max(f64::EPSILON))
                } else {
                    2.0 / (hi - lo)
                }
            }
            Distribution::Uniform { lo, hi } => {
                if x < lo || x > hi || (hi - lo).abs() < f64::EPSILON {
                    0.0
                } else {
                    1.0 / (hi - lo)
                }
            }
            Distribution::LogNormal { mu, sigma } => {
                if x <= 0.0 || sigma <= 0.0 {
                    0.0
                } else {
                    let z = (x.ln() - mu) / sigma;
                    (-0.5 * z * z).exp() / (x * sigma * (2.0 * PI).sqrt())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compute_stats;
    use proptest::prelude::*;

    fn sample_n(d: &Distribution, seed: u32, n: usize) -> Vec<f64> {
        let mut prng = Prng::new(seed);
        (0..n).map(|_| d.sample(&mut prng)).collect()
    }

    #[test]
    fn normal_moments_match_expected_tolerances() {
        let d = Distribution::Normal { mu: 100.0, sigma: 10.0 };
        let samples = sample_n(&d, 42, 10_000);
        let s = compute_stats(&samples);
        assert!((s.mean - 100.0).abs() <= 1.0);
        assert!((s.std - 10.0).abs() <= 0.5);
    }

    #[test]
    fn normal_pdf_decreases_away_from_mean() {
        let d = Distribution::Normal { mu: 10.0, sigma: 2.0 };
        assert!(d.pdf(10.0) > d.pdf(12.0));
    }

    #[test]
    fn truncated_normal_stays_in_bounds() {
        let d = Distribution::TruncatedNormal { mu: 50.0, sigma: 20.0, lo: 30.0, hi: 70.0 };
        let samples = sample_n(&d, 42, 10_000);
        for x in &samples {
            assert!(*x >= 30.0 && *x <= 70.0);
        }
        assert_eq!(d.pdf(29.0), 0.0);
        assert_eq!(d.pdf(71.0), 0.0);
        assert!(d.pdf(50.0) > 0.0);
    }

    #[test]
    fn beta_mean_and_support() {
        let d = Distribution::Beta { alpha: 2.0, beta: 5.0 };
        let samples = sample_n(&d, 42, 10_000);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!((mean - 2.0 / 7.0).abs() < 0.01);
        for x in &samples {
            assert!(*x >= 0.0 && *x <= 1.0);
        }
    }

    #[test]
    fn triangular_mean_and_pdf_shape() {
        let d = Distribution::Triangular { lo: 10.0, mode: 30.0, hi: 50.0 };
        assert!((d.mean() - 30.0).abs() < f64::EPSILON);
        assert!(d.pdf(30.0) > d.pdf(10.0));
        assert_eq!(d.pdf(9.0), 0.0);
        assert_eq!(d.pdf(51.0), 0.0);
    }

    #[test]
    fn uniform_variance_and_pdf() {
        let d = Distribution::Uniform { lo: 0.0, hi: 12.0 };
        assert!((d.variance() - 12.0).abs() < 1e-9);
        assert!((d.pdf(3.0) - 1.0 / 12.0).abs() < 1e-6);
        assert!((d.pdf(7.0) - 1.0 / 12.0).abs() < 1e-6);
        assert_eq!(d.pdf(-1.0), 0.0);
        assert_eq!(d.pdf(13.0), 0.0);
    }

    #[test]
    fn lognormal_empirical_mean() {
        let d = Distribution::LogNormal { mu: 1.0, sigma: 0.5 };
        let samples = sample_n(&d, 42, 20_000);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let expected = (1.0f64 + 0.125).exp();
        assert!((mean - expected).abs() < 0.5);
    }

    #[test]
    fn json_round_trip_and_unknown_tag() {
        let d = Distribution::Normal { mu: 1.0, sigma: 2.0 };
        let v = serde_json::to_value(&d).unwrap();
        let back = distribution_from_json(&v).unwrap();
        assert_eq!(d, back);

        let bad = serde_json::json!({"type": "exponential", "params": {"lambda": 1.0}});
        assert!(distribution_from_json(&bad).is_err());
    }

    #[test]
    fn degenerate_sigma_returns_mean() {
        let d = Distribution::Normal { mu: 5.0, sigma: 0.0 };
        let mut prng = Prng::new(1);
        assert_eq!(d.sample(&mut prng), 5.0);
    }

    proptest! {
        #[test]
        fn truncated_normal_samples_always_in_bounds(
            mu in -50.0f64..50.0,
            sigma in 0.01f64..30.0,
            lo in -100.0f64..0.0,
            hi in 0.0f64..100.0,
            seed: u32,
        ) {
            let d = Distribution::TruncatedNormal { mu, sigma, lo, hi };
            let mut prng = Prng::new(seed);
            let x = d.sample(&mut prng);
            prop_assert!(x >= lo && x <= hi);
        }

        #[test]
        fn beta_samples_always_in_unit_interval(
            alpha in 0.1f64..20.0,
            beta in 0.1f64..20.0,
            seed: u32,
        ) {
            let d = Distribution::Beta { alpha, beta };
            let mut prng = Prng::new(seed);
            let x = d.sample(&mut prng);
            prop_assert!((0.0..=1.0).contains(&x));
        }

        #[test]
        fn triangular_samples_always_in_bounds(
            lo in -50.0f64..0.0,
            mode_frac in 0.0f64..1.0,
            hi in 0.01f64..50.0,
            seed: u32,
        ) {
            let mode = lo + mode_frac * (hi - lo);
            let d = Distribution::Triangular { lo, mode, hi };
            let mut prng = Prng::new(seed);
            let x = d.sample(&mut prng);
            prop_assert!(x >= lo && x <= hi);
        }

        #[test]
        fn sampling_never_panics_or_produces_nan(
            mu in -100.0f64..100.0,
            sigma in 0.0f64..20.0,
            seed: u32,
        ) {
            let d = Distribution::Normal { mu, sigma };
            let mut prng = Prng::new(seed);
            let x = d.sample(&mut prng);
            prop_assert!(!x.is_nan());
        }
    }
}
