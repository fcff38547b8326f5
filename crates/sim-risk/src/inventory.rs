//! Inventory and capital-at-risk over a completed Monte Carlo run.

use serde::{Deserialize, Serialize};
use sim_core::IterationResult;

use crate::var::{conditional_value_at_risk, value_at_risk};

/// Inventory/capital risk over a batch of iterations.
///
/// `var95`/`cvar95`/`var99`/`cvar99` are computed over `unprofitableLosses`:
/// leftover inventory valued at COGS when the iteration's per-unit margin
/// was negative, or at `COGS - 0.3 * per-unit margin` (floored at zero)
/// otherwise. That is the most risk-adjusted of the three candidate loss
/// figures; `inventoryLosses` (plain leftover stock at COGS) and
/// `capitalAtRisk` (inventory value plus marketing spend) are reported
/// alongside as their batch means rather than run through VaR again, since
/// only one loss figure drives the VaR/CVaR pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryRisk {
    pub inventory_loss_mean: f64,
    pub capital_at_risk_mean: f64,
    pub var95: f64,
    pub cvar95: f64,
    pub var99: f64,
    pub cvar99: f64,
    pub prob_unsold_over_10pct: f64,
    pub prob_unsold_over_25pct: f64,
    pub prob_net_profit_negative: f64,
    pub prob_margin_below_15: f64,
    pub prob_margin_below_20: f64,
}

/// `None` when `results` is empty (no batch to assess), matching the
/// driver's `EmptyResults` convention elsewhere in the risk layer.
pub fn inventory_risk(results: &[IterationResult], offer_cogs: f64) -> Option<InventoryRisk> {
    if results.is_empty() {
        return None;
    }
    let n = results.len() as f64;

    let inventory_losses: Vec<f64> = results.iter().map(|r| r.inventory_value).collect();
    let capital_at_risk: Vec<f64> =
        results.iter().map(|r| r.inventory_value + r.total_marketing_spent).collect();

    let unprofitable_losses: Vec<f64> = results.iter().map(|r| {
        let per_unit_margin =
            if r.total_units_sold > 0 { r.gross_profit / r.total_units_sold as f64 } else { 0.0 };
        if per_unit_margin < 0.0 {
            r.inventory_remaining as f64 * offer_cogs
        } else {
            r.inventory_remaining as f64 * (offer_cogs - 0.3 * per_unit_margin).max(0.0)
        }
    }).collect();

    Some(InventoryRisk {
        inventory_loss_mean: inventory_losses.iter().sum::<f64>() / n,
        capital_at_risk_mean: capital_at_risk.iter().sum::<f64>() / n,
        var95: value_at_risk(&unprofitable_losses, 0.95),
        cvar95: conditional_value_at_risk(&unprofitable_losses, 0.95),
        var99: value_at_risk(&unprofitable_losses, 0.99),
        cvar99: conditional_value_at_risk(&unprofitable_losses, 0.99),
        prob_unsold_over_10pct: results.iter().filter(|r| r.unsold_pct > 10.0).count() as f64 / n,
        prob_unsold_over_25pct: results.iter().filter(|r| r.unsold_pct > 25.0).count() as f64 / n,
        prob_net_profit_negative: results.iter().filter(|r| r.net_profit < 0.0).count() as f64 / n,
        prob_margin_below_15: results.iter().filter(|r| r.margin_pct < 15.0).count() as f64 / n,
        prob_margin_below_20: results.iter().filter(|r| r.margin_pct < 20.0).count() as f64 / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(inventory_remaining: i64, gross_profit: f64, units: u64, net_profit: f64, margin: f64) -> IterationResult {
        IterationResult {
            total_units_sold: units,
            total_revenue: 0.0,
            total_cost: 0.0,
            gross_profit,
            net_profit,
            roi: 0.0,
            margin_pct: margin,
            inventory_remaining,
            inventory_value: inventory_remaining as f64 * 30.0,
            unsold_pct: 0.0,
            break_even_week: -1,
            total_marketing_spent: 1_000.0,
            total_subscribers: 0,
            subscription_revenue: 0.0,
            weekly_metrics: vec![],
        }
    }

    #[test]
    fn empty_batch_returns_none() {
        assert!(inventory_risk(&[], 30.0).is_none());
    }

    #[test]
    fn unprofitable_run_is_valued_at_full_cogs() {
        let results = vec![result(100, -500.0, 50, -500.0, -10.0)];
        let risk = inventory_risk(&results, 30.0).unwrap();
        assert_eq!(risk.var95, 100.0 * 30.0);
    }

    #[test]
    fn profitable_run_gets_a_margin_discount() {
        // per-unit margin = 1000/100 = 10, so loss is 100 * max(0, 30 - 3) = 2700
        let results = vec![result(100, 1_000.0, 100, 500.0, 20.0)];
        let risk = inventory_risk(&results, 30.0).unwrap();
        assert_eq!(risk.var95, 2_700.0);
    }

    #[test]
    fn probabilities_count_over_threshold_iterations() {
        let mut results = vec![result(0, 100.0, 10, 100.0, 30.0); 8];
        results.extend(vec![result(0, -100.0, 10, -100.0, 5.0); 2]);
        let risk = inventory_risk(&results, 30.0).unwrap();
        assert!((risk.prob_net_profit_negative - 0.2).abs() < 1e-9);
        assert!((risk.prob_margin_below_15 - 0.2).abs() < 1e-9);
    }
}
