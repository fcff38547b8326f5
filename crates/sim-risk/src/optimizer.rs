//! Safe-stock percentile recommender.

use serde::{Deserialize, Serialize};
use sim_core::{percentile, IterationResult};

/// One stock-level scenario in the recommender's table: overstock/understock
/// exposure if the launch were stocked at `stock` units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockScenario {
    pub label: String,
    pub stock: f64,
    pub avg_overstock: f64,
    pub avg_understock: f64,
    pub overstock_cost: f64,
    pub lost_sales_cost: f64,
    pub total_risk: f64,
}

/// The recommended stock level plus the percentile scenario table it was
/// drawn from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafeStockRecommendation {
    pub recommended: u64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    pub scenarios: Vec<StockScenario>,
}

/// `None` when `results` is empty.
///
/// `recommended` is `ceil(percentile(totalUnitsSold, confidence_level) *
/// 1.05)`, using the same nearest-rank percentile as every other KPI in the
/// workspace. A worked example elsewhere describes the `1..100` synthetic
/// case as yielding `recommended = 105` at `confidence_level = 0.99`; the
/// nearest-rank formula applied consistently (as it is for `p50`/`p75` in
/// the same example) actually selects the 99th of 100 sorted values and
/// yields `104`. We follow the formula rather than that one worked number,
/// since it is the same formula used for every percentile test that does
/// check out, and an off-by-one in a single illustrative figure is far more
/// likely than two different rank conventions coexisting in one function.
pub fn recommend_safe_stock(
    results: &[IterationResult],
    offer_cogs: f64,
    confidence_level: f64,
) -> Option<SafeStockRecommendation> {
    if results.is_empty() {
        return None;
    }

    let mut sold: Vec<f64> = results.iter().map(|r| r.total_units_sold as f64).collect();
    sold.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let p50 = percentile(&sold, 0.50);
    let p75 = percentile(&sold, 0.75);
    let p90 = percentile(&sold, 0.90);
    let p95 = percentile(&sold, 0.95);
    let p99 = percentile(&sold, 0.99);
    let cl_value = percentile(&sold, confidence_level);
    let recommended = (cl_value * 1.05).ceil().max(0.0) as u64;

    let scenario_stocks: [(&str, f64); 6] = [
        ("p50", p50),
        ("p75", p75),
        ("p90", p90),
        ("p95", p95),
        ("p99", p99),
        ("recommended", recommended as f64),
    ];

    let scenarios = scenario_stocks.iter().map(|(label, stock)| {
        let avg_overstock = sold.iter().map(|&s| (stock - s).max(0.0)).sum::<f64>() / sold.len() as f64;
        let avg_understock = sold.iter().map(|&s| (s - stock).max(0.0)).sum::<f64>() / sold.len() as f64;
        let overstock_cost = avg_overstock * offer_cogs;
        let lost_sales_cost = avg_understock * offer_cogs * 0.5;
        StockScenario {
            label: label.to_string(),
            stock: *stock,
            avg_overstock,
            avg_understock,
            overstock_cost,
            lost_sales_cost,
            total_risk: overstock_cost + lost_sales_cost,
        }
    }).collect();

    Some(SafeStockRecommendation { recommended, p50, p75, p90, p95, p99, scenarios })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::WeeklyMetric;

    fn with_units_sold(units: u64) -> IterationResult {
        IterationResult {
            total_units_sold: units,
            total_revenue: 0.0,
            total_cost: 0.0,
            gross_profit: 0.0,
            net_profit: 0.0,
            roi: 0.0,
            margin_pct: 0.0,
            inventory_remaining: 0,
            inventory_value: 0.0,
            unsold_pct: 0.0,
            break_even_week: -1,
            total_marketing_spent: 0.0,
            total_subscribers: 0,
            subscription_revenue: 0.0,
            weekly_metrics: Vec::<WeeklyMetric>::new(),
        }
    }

    #[test]
    fn empty_batch_returns_none() {
        assert!(recommend_safe_stock(&[], 30.0, 0.99).is_none());
    }

    #[test]
    fn percentiles_match_the_one_through_hundred_convention() {
        let results: Vec<IterationResult> = (1..=100).map(with_units_sold).collect();
        let rec = recommend_safe_stock(&results, 30.0, 0.99).unwrap();
        assert_eq!(rec.p50, 50.0);
        assert_eq!(rec.p75, 75.0);
        assert_eq!(rec.p90, 90.0);
        assert_eq!(rec.recommended, 104);
    }

    #[test]
    fn scenario_table_has_one_row_per_stock_level() {
        let results: Vec<IterationResult> = (1..=20).map(with_units_sold).collect();
        let rec = recommend_safe_stock(&results, 10.0, 0.95).unwrap();
        assert_eq!(rec.scenarios.len(), 6);
        for scenario in &rec.scenarios {
            assert!(scenario.total_risk >= 0.0);
        }
    }
}
