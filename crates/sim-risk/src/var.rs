//! Generic Value-at-Risk / Conditional-Value-at-Risk over a loss sample.

use sim_core::percentile;

/// Nearest-rank VaR at `confidence` over `losses` (higher magnitude = worse).
/// Reuses the same rank formula as [`sim_core::percentile`] so this and
/// every KPI percentile in the driver agree on tie-breaking.
pub fn value_at_risk(losses: &[f64], confidence: f64) -> f64 {
    let mut sorted = losses.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    percentile(&sorted, confidence)
}

/// Mean of the losses at or beyond the VaR threshold. Falls back to the VaR
/// value itself when nothing clears the threshold (can happen with ties at
/// the tail).
pub fn conditional_value_at_risk(losses: &[f64], confidence: f64) -> f64 {
    let var = value_at_risk(losses, confidence);
    let tail: Vec<f64> = losses.iter().copied().filter(|&l| l >= var).collect();
    if tail.is_empty() {
        var
    } else {
        tail.iter().sum::<f64>() / tail.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn var_and_cvar_over_one_through_hundred() {
        let losses: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        assert_eq!(value_at_risk(&losses, 0.95), 95.0);
        assert_eq!(conditional_value_at_risk(&losses, 0.95), 97.5);
    }

    #[test]
    fn var_and_cvar_with_a_concentrated_tail() {
        let losses = vec![0.0, 0.0, 0.0, 0.0, 100.0];
        assert_eq!(value_at_risk(&losses, 0.8), 0.0);
        assert_eq!(value_at_risk(&losses, 0.99), 100.0);
        assert_eq!(conditional_value_at_risk(&losses, 0.99), 100.0);
    }

    #[test]
    fn empty_losses_do_not_panic() {
        assert_eq!(value_at_risk(&[], 0.95), 0.0);
        assert_eq!(conditional_value_at_risk(&[], 0.95), 0.0);
    }

    proptest! {
        #[test]
        fn var_and_cvar_never_exceed_the_worst_loss(
            losses in prop::collection::vec(0.0f64..1_000_000.0, 1..100),
            confidence in 0.5f64..0.999,
        ) {
            let max_loss = losses.iter().cloned().fold(f64::MIN, f64::max);
            let var = value_at_risk(&losses, confidence);
            let cvar = conditional_value_at_risk(&losses, confidence);
            prop_assert!(var <= max_loss + 1e-9);
            prop_assert!(cvar <= max_loss + 1e-9);
            prop_assert!(cvar >= var - 1e-9);
        }
    }
}
