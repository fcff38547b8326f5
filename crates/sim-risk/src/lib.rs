//! Risk analysis and inventory optimization over a completed Monte Carlo
//! run: VaR/CVaR, inventory and profitability risk, and a safe-stock
//! percentile recommender.

pub mod inventory;
pub mod optimizer;
pub mod profitability;
pub mod var;

use serde::{Deserialize, Serialize};
use sim_core::IterationResult;

pub use inventory::{inventory_risk, InventoryRisk};
pub use optimizer::{recommend_safe_stock, SafeStockRecommendation, StockScenario};
pub use profitability::{profitability_risk, ProfitabilityRisk};
pub use var::{conditional_value_at_risk, value_at_risk};

/// The full risk/optimizer output attached to a Monte Carlo aggregate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskReport {
    pub inventory: InventoryRisk,
    pub profitability: ProfitabilityRisk,
    pub safe_stock: SafeStockRecommendation,
}

/// Run the full risk/optimizer pass over `results`. `None` when `results`
/// is empty — the caller should treat that the same way it treats an
/// aggregate built from zero iterations.
pub fn analyze(results: &[IterationResult], offer_cogs: f64, safe_stock_confidence: f64) -> Option<RiskReport> {
    Some(RiskReport {
        inventory: inventory_risk(results, offer_cogs)?,
        profitability: profitability_risk(results)?,
        safe_stock: recommend_safe_stock(results, offer_cogs, safe_stock_confidence)?,
    })
}

/// Plain-language mitigation suggestions derived from thresholds on the
/// computed risk report. Always returns at least one plan: a baseline
/// "within tolerance" note when nothing crosses a threshold.
pub fn contingency_plans(report: &RiskReport) -> Vec<String> {
    let mut plans = Vec::new();

    if report.inventory.prob_unsold_over_25pct > 0.1 {
        plans.push(format!(
            "{:.0}% of iterations leave more than 25% of stock unsold; stock toward the P75 scenario ({:.0} units) instead of the current plan.",
            report.inventory.prob_unsold_over_25pct * 100.0,
            report.safe_stock.p75,
        ));
    }
    if report.inventory.prob_net_profit_negative > 0.1 {
        plans.push(format!(
            "Net profit is negative in {:.0}% of iterations; renegotiate COGS or raise the base price before launch.",
            report.inventory.prob_net_profit_negative * 100.0,
        ));
    }
    if report.profitability.prob_roi_negative > 0.2 {
        plans.push(format!(
            "ROI is negative in {:.0}% of iterations; trim the marketing budget allocated to low-conversion weeks.",
            report.profitability.prob_roi_negative * 100.0,
        ));
    }
    if report.inventory.prob_margin_below_15 > 0.2 {
        plans.push(
            "Gross margin falls below 15% in a meaningful share of runs; revisit COGS or base price before committing capital.".to_string(),
        );
    }
    if report.profitability.prob_break_even_never > 0.3 {
        plans.push(format!(
            "{:.0}% of iterations never break even within the horizon; extend the horizon or cut the initial marketing spend.",
            report.profitability.prob_break_even_never * 100.0,
        ));
    }

    if plans.is_empty() {
        plans.push(format!(
            "Risk profile is within tolerance; stock at the recommended safe level of {} units.",
            report.safe_stock.recommended,
        ));
    }
    plans
}
