//! Shared domain types used across the workspace: the competitor/action
//! vocabulary, market state passed into agent decisions, product lifecycle
//! and seasonality value types, and the per-iteration/per-week result shapes.
//!
//! These live in `sim-core` (rather than `sim-econ` or `sim-ai`) because both
//! of those crates need them without depending on each other.

use serde::{Deserialize, Serialize};

use crate::belief::ExpertBelief;
use crate::distribution::Distribution;

/// A promotional offer a competitor may attach to its weekly action.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub kind: PromoKind,
    pub discount: f64,
    pub duration_weeks: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoKind {
    Discount,
    Bundle,
}

/// The weekly output of a competitor's `decide`, before constraint
/// enforcement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub price: f64,
    pub marketing_spend: f64,
    pub promotion: Option<Promotion>,
}

/// Enforced after every `decide` call. Defaults match the documented
/// fallback profile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompetitorConstraints {
    pub min_margin: f64,
    pub max_marketing_budget: f64,
    pub max_price_reduction: f64,
    pub risk_aversion: f64,
}

impl Default for CompetitorConstraints {
    fn default() -> Self {
        Self {
            min_margin: 0.10,
            max_marketing_budget: 500_000.0,
            max_price_reduction: 0.30,
            risk_aversion: 0.50,
        }
    }
}

/// Clamp a candidate action in place so it satisfies the invariant:
/// `price >= sampledCOGS * (1 + minMargin)`, `marketingSpend <=
/// maxMarketingBudget`, `promotion.discount <= maxPriceReduction`.
pub fn apply_constraints(action: &mut Action, sampled_cogs: f64, constraints: &CompetitorConstraints) {
    let price_floor = sampled_cogs * (1.0 + constraints.min_margin);
    if action.price < price_floor {
        action.price = price_floor;
    }
    if action.marketing_spend > constraints.max_marketing_budget {
        action.marketing_spend = constraints.max_marketing_budget;
    }
    if let Some(promo) = action.promotion.as_mut() {
        if promo.discount > constraints.max_price_reduction {
            promo.discount = constraints.max_price_reduction;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitorType {
    Rule,
    Ml,
    Rl,
}

/// `(id, name, type, aggressiveness, financialHealth, marketShare, beliefs,
/// constraints, cogsDist?, marketingBudgetDist?)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompetitorProfile {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CompetitorType,
    pub aggressiveness: f64,
    pub financial_health: f64,
    pub market_share: f64,
    #[serde(default)]
    pub beliefs: Vec<ExpertBelief>,
    #[serde(default)]
    pub constraints: CompetitorConstraints,
    #[serde(default)]
    pub cogs_dist: Option<Distribution>,
    #[serde(default)]
    pub marketing_budget_dist: Option<Distribution>,
}

/// The per-iteration realization of one competitor's uncertainty: its
/// belief outcomes in declaration order, plus an optional sampled COGS and
/// marketing budget draw.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CompetitorScenarioSample {
    pub beliefs: Vec<(bool, f64)>,
    pub sampled_cogs: Option<f64>,
    pub sampled_marketing_budget: Option<f64>,
}

/// The shared, mutable-across-the-week view every competitor `decide` call
/// and every customer evaluation reads from.
#[derive(Clone, Debug, Default)]
pub struct MarketState {
    pub week: u32,
    pub our_price: f64,
    pub our_cogs: f64,
    pub our_weekly_marketing: f64,
    pub our_market_share: f64,
    pub avg_conversion: f64,
    pub novelty_factor: f64,
    pub seasonal_multiplier: f64,
    pub competitor_attractiveness: f64,
    pub competitor_scenario: Option<CompetitorScenarioSample>,
}

/// Product lifecycle stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Launch,
    Growth,
    Maturity,
    Decline,
}

impl Stage {
    /// `(stage, novelty, duration fraction of horizon)` in traversal order.
    const TABLE: [(Stage, f64, f64); 4] = [
        (Stage::Launch, 1.30, 0.12),
        (Stage::Growth, 1.15, 0.27),
        (Stage::Maturity, 1.00, 0.38),
        (Stage::Decline, 0.70, 0.23),
    ];
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LifecycleInfo {
    pub stage: Stage,
    pub novelty_factor: f64,
    pub progress: f64,
}

/// `lifecycle(week, totalWeeks)`.
pub fn lifecycle(week: u32, total_weeks: u32) -> LifecycleInfo {
    let pct = if total_weeks == 0 { 0.0 } else { week as f64 / total_weeks as f64 };
    let mut cumulative = 0.0;
    for (i, (stage, novelty, frac)) in Stage::TABLE.iter().enumerate() {
        let next_cumulative = cumulative + frac;
        if pct < next_cumulative || i == Stage::TABLE.len() - 1 {
            let progress = if *frac > 0.0 {
                ((pct - cumulative) / frac).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let next_novelty = Stage::TABLE.get(i + 1).map(|(_, n, _)| *n).unwrap_or(*novelty);
            let interpolated = novelty + (next_novelty - novelty) * progress;
            return LifecycleInfo { stage: *stage, novelty_factor: interpolated, progress };
        }
        cumulative = next_cumulative;
    }
    unreachable!("stage table always covers [0, 1]")
}

/// Seasonality configuration: a 12-month multiplier table, named holiday
/// weeks (`week mod 52 -> boost`), and an amplitude knob.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeasonalityConfig {
    pub start_month: u8,
    pub use_holidays: bool,
    pub amplitude: f64,
    pub monthly_table: [f64; 12],
    pub holiday_weeks: Vec<(u32, f64)>,
}

impl Default for SeasonalityConfig {
    fn default() -> Self {
        Self {
            start_month: 0,
            use_holidays: true,
            amplitude: 1.0,
            monthly_table: [1.0, 0.95, 1.0, 1.0, 1.0, 1.05, 1.0, 0.95, 1.0, 1.05, 1.1, 1.35],
            holiday_weeks: vec![(47, 1.4), (51, 1.6)],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeasonalityInfo {
    pub multiplier: f64,
    pub month: u8,
    pub holiday: Option<f64>,
}

const WEEKS_PER_MONTH: f64 = 4.33;

/// `seasonality(week, opts)`.
pub fn seasonality(week: u32, opts: &SeasonalityConfig) -> SeasonalityInfo {
    let elapsed_weeks = opts.start_month as f64 * WEEKS_PER_MONTH + week as f64;
    let month_idx = ((elapsed_weeks / WEEKS_PER_MONTH).floor() as usize) % 12;
    let base = opts.monthly_table[month_idx];
    let mut multiplier = 1.0 + (base - 1.0) * opts.amplitude;

    let mut holiday_hit = None;
    if opts.use_holidays {
        let cycle_week = (elapsed_weeks.round() as u32) % 52;
        if let Some((_, boost)) = opts.holiday_weeks.iter().find(|(w, _)| *w == cycle_week) {
            multiplier *= 1.0 + (boost - 1.0) * opts.amplitude;
            holiday_hit = Some(*boost);
        }
    }

    SeasonalityInfo {
        multiplier: multiplier.max(0.5),
        month: month_idx as u8,
        holiday: holiday_hit,
    }
}

/// `RunConfig.offer`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OfferConfig {
    pub name: String,
    pub base_price: f64,
    pub cogs: f64,
    pub marketing_budget: f64,
    pub quality_index: f64,
    #[serde(default)]
    pub channels: Vec<String>,
    pub allow_repeat: bool,
    #[serde(default)]
    pub subscription_price: f64,
    #[serde(default)]
    pub subscription_cost: f64,
    #[serde(default)]
    pub launch_month: Option<u8>,
}

/// One week's recorded metrics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeeklyMetric {
    pub week: u32,
    pub units_sold: u64,
    pub cumulative_sold: u64,
    pub inventory: i64,
    pub revenue: f64,
    pub avg_conversion: f64,
    pub our_price: f64,
    pub competitor_prices: Vec<f64>,
    pub competitor_attractiveness: f64,
    pub effective_cogs: f64,
    pub subscribers: u64,
}

/// The full per-iteration result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IterationResult {
    pub total_units_sold: u64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub gross_profit: f64,
    pub net_profit: f64,
    pub roi: f64,
    pub margin_pct: f64,
    pub inventory_remaining: i64,
    pub inventory_value: f64,
    pub unsold_pct: f64,
    pub break_even_week: i32,
    pub total_marketing_spent: f64,
    pub total_subscribers: u64,
    pub subscription_revenue: f64,
    pub weekly_metrics: Vec<WeeklyMetric>,
}
