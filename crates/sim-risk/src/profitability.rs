//! Profitability risk over a completed Monte Carlo run.

use serde::{Deserialize, Serialize};
use sim_core::{compute_stats, IterationResult, StatSummary};

use crate::var::value_at_risk;

/// Distributional and tail-risk view of ROI, net profit, and break-even
/// timing across a batch of iterations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityRisk {
    pub roi: StatSummary,
    pub net_profit: StatSummary,
    /// Excludes iterations that never broke even (`breakEvenWeek == -1`).
    pub break_even_week: StatSummary,
    /// VaR95 over negated ROI: the worst-case downside, expressed as a
    /// positive magnitude.
    pub roi_var95: f64,
    pub net_profit_var95: f64,
    pub prob_break_even_never: f64,
    pub prob_roi_negative: f64,
    pub prob_roi_over_100: f64,
}

/// `None` when `results` is empty.
pub fn profitability_risk(results: &[IterationResult]) -> Option<ProfitabilityRisk> {
    if results.is_empty() {
        return None;
    }
    let n = results.len() as f64;

    let roi: Vec<f64> = results.iter().map(|r| r.roi).collect();
    let net_profit: Vec<f64> = results.iter().map(|r| r.net_profit).collect();
    let break_even: Vec<f64> =
        results.iter().filter(|r| r.break_even_week >= 0).map(|r| r.break_even_week as f64).collect();

    let negated_roi: Vec<f64> = roi.iter().map(|v| -v).collect();
    let negated_net_profit: Vec<f64> = net_profit.iter().map(|v| -v).collect();

    Some(ProfitabilityRisk {
        roi: compute_stats(&roi),
        net_profit: compute_stats(&net_profit),
        break_even_week: compute_stats(&break_even),
        roi_var95: value_at_risk(&negated_roi, 0.95),
        net_profit_var95: value_at_risk(&negated_net_profit, 0.95),
        prob_break_even_never: results.iter().filter(|r| r.break_even_week < 0).count() as f64 / n,
        prob_roi_negative: roi.iter().filter(|&&v| v < 0.0).count() as f64 / n,
        prob_roi_over_100: roi.iter().filter(|&&v| v > 100.0).count() as f64 / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(roi: f64, net_profit: f64, break_even_week: i32) -> IterationResult {
        IterationResult {
            total_units_sold: 100,
            total_revenue: 10_000.0,
            total_cost: 4_000.0,
            gross_profit: 6_000.0,
            net_profit,
            roi,
            margin_pct: 60.0,
            inventory_remaining: 0,
            inventory_value: 0.0,
            unsold_pct: 0.0,
            break_even_week,
            total_marketing_spent: 1_000.0,
            total_subscribers: 0,
            subscription_revenue: 0.0,
            weekly_metrics: vec![],
        }
    }

    #[test]
    fn empty_batch_returns_none() {
        assert!(profitability_risk(&[]).is_none());
    }

    #[test]
    fn break_even_stats_exclude_never_profitable_runs() {
        let results = vec![result(10.0, 100.0, 3), result(-5.0, -50.0, -1), result(20.0, 200.0, 5)];
        let risk = profitability_risk(&results).unwrap();
        assert_eq!(risk.break_even_week.n, 2);
        assert_eq!(risk.break_even_week.mean, 4.0);
    }

    #[test]
    fn probabilities_match_fractions_over_threshold() {
        let results = vec![result(-10.0, -50.0, -1), result(150.0, 500.0, 2), result(5.0, 10.0, 1), result(5.0, 10.0, 1)];
        let risk = profitability_risk(&results).unwrap();
        assert!((risk.prob_roi_negative - 0.25).abs() < 1e-9);
        assert!((risk.prob_roi_over_100 - 0.25).abs() < 1e-9);
        assert!((risk.prob_break_even_never - 0.25).abs() < 1e-9);
    }
}
