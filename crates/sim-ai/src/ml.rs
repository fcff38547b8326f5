//! Heuristic-ML competitor: a four-feature linear score with a simple
//! reward-sign weight nudge.

use sim_core::{Action, MarketState, PromoKind, Promotion, Prng};

use crate::agent::Decide;
use crate::config::MlConfig;

#[derive(Clone, Debug)]
pub struct MlCompetitor {
    pub weights: [f64; 4],
    pub current_price: f64,
    pub current_marketing: f64,
    base_marketing: f64,
    sales_history: Vec<f64>,
    profit_history: Vec<f64>,
    config: MlConfig,
}

impl MlCompetitor {
    pub fn new(starting_price: f64, base_marketing: f64, config: MlConfig) -> Self {
        Self {
            weights: config.starting_weights,
            current_price: starting_price,
            current_marketing: base_marketing,
            base_marketing,
            sales_history: Vec::new(),
            profit_history: Vec::new(),
            config,
        }
    }

    /// Fractional drop in own sales vs. the previous week, 0 if flat/rising
    /// or fewer than two observations exist yet.
    fn recent_share_loss(&self) -> f64 {
        if self.sales_history.len() < 2 {
            return 0.0;
        }
        let n = self.sales_history.len();
        let prev = self.sales_history[n - 2];
        let cur = self.sales_history[n - 1];
        ((prev - cur) / prev.max(1.0)).max(0.0)
    }
}

impl Decide for MlCompetitor {
    fn decide(&mut self, market: &MarketState, prng: &mut Prng) -> Action {
        let cfg = &self.config;
        let price_gap = (market.our_price - self.current_price) / self.current_price.max(1e-9);
        let market_share_loss = self.recent_share_loss();
        let margin = (self.current_price - market.our_cogs) / self.current_price.max(1e-9);
        let seasonality = market.seasonal_multiplier - 1.0;
        let features = [price_gap, market_share_loss, margin, seasonality];

        let score: f64 = self.weights.iter().zip(features.iter()).map(|(w, f)| w * f).sum();

        let mut price = self.current_price;
        let mut marketing = self.current_marketing.max(self.base_marketing);
        let mut promotion = None;

        if score < cfg.cut_score_threshold {
            let cut = cfg.max_price_cut.min(score.abs() * 0.2);
            price *= 1.0 - cut;
            marketing *= 1.0 + score.abs();
        }
        if score < cfg.bundle_score_threshold {
            promotion = Some(Promotion {
                kind: PromoKind::Bundle,
                discount: cfg.bundle_discount,
                duration_weeks: cfg.bundle_duration_weeks,
            });
        }
        if score > cfg.raise_score_threshold {
            price *= 1.0 + cfg.raise_price_pct;
        }

        // Unused in the linear policy today, kept for parity with the
        // rule-based/RL variants that consume a draw every decide call.
        let _ = prng.next_f64();

        self.current_price = price;
        self.current_marketing = marketing;
        Action { price, marketing_spend: marketing, promotion }
    }

    fn observe_outcome(&mut self, own_profit: f64, own_sales: f64) {
        self.profit_history.push(own_profit);
        self.sales_history.push(own_sales);
        if self.profit_history.len() >= 2 {
            let last_profit = *self.profit_history.last().unwrap();
            let sign = if last_profit >= 0.0 { 1.0 } else { -1.0 };
            for w in self.weights.iter_mut() {
                *w += self.config.learning_rate * sign;
            }
        }
    }
}
