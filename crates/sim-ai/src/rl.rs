//! Tabular-RL competitor: eight named macro-actions, epsilon-greedy over a
//! persistent Q-table, off-policy Q-learning updated from the previous
//! (state, action) pair.

use std::collections::HashMap;

use sim_core::{Action, MarketState, PromoKind, Promotion, Prng};

use crate::agent::Decide;
use crate::config::RlConfig;

/// One of eight macro-actions the RL competitor can select: a price
/// change fraction, a marketing spend multiplier, and an optional
/// promotional discount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MacroAction {
    pub name: &'static str,
    pub price_change: f64,
    pub marketing_mult: f64,
    pub promo_discount: Option<f64>,
}

pub const MACRO_ACTIONS: [MacroAction; 8] = [
    MacroAction { name: "hold", price_change: 0.0, marketing_mult: 1.0, promo_discount: None },
    MacroAction { name: "cut_small", price_change: -0.03, marketing_mult: 1.0, promo_discount: None },
    MacroAction { name: "cut_large", price_change: -0.10, marketing_mult: 1.0, promo_discount: None },
    MacroAction { name: "raise_small", price_change: 0.03, marketing_mult: 1.0, promo_discount: None },
    MacroAction { name: "boost_marketing", price_change: 0.0, marketing_mult: 1.5, promo_discount: None },
    MacroAction { name: "cut_and_boost", price_change: -0.05, marketing_mult: 1.3, promo_discount: None },
    MacroAction { name: "promo_light", price_change: 0.0, marketing_mult: 1.0, promo_discount: Some(0.10) },
    MacroAction { name: "promo_heavy", price_change: -0.02, marketing_mult: 1.1, promo_discount: Some(0.20) },
];

/// `state -> one Q-value per macro-action`. Owned by the caller across a
/// whole driver `run` so learning persists between iterations (see crate
/// docs) but never between separate `run` calls.
pub type QTable = HashMap<String, [f64; 8]>;

#[derive(Clone, Debug)]
pub struct RlCompetitor {
    pub aggressiveness: f64,
    pub current_price: f64,
    pub current_marketing: f64,
    base_marketing: f64,
    q_table: QTable,
    config: RlConfig,
    pending: Option<(String, usize)>,
}

impl RlCompetitor {
    pub fn new(aggressiveness: f64, starting_price: f64, base_marketing: f64, config: RlConfig) -> Self {
        Self {
            aggressiveness,
            current_price: starting_price,
            current_marketing: base_marketing,
            base_marketing,
            q_table: QTable::new(),
            config,
            pending: None,
        }
    }

    /// Construct from an existing table, so a driver can hand the same
    /// table back in across iterations within one `run`.
    pub fn with_table(aggressiveness: f64, starting_price: f64, base_marketing: f64, config: RlConfig, q_table: QTable) -> Self {
        Self { q_table, ..Self::new(aggressiveness, starting_price, base_marketing, config) }
    }

    pub fn take_table(self) -> QTable {
        self.q_table
    }

    fn discretize(&self, market: &MarketState) -> String {
        let price_ratio = if market.our_price > 0.0 { self.current_price / market.our_price } else { 1.0 };
        let price_bucket = ((price_ratio * 10.0).round() as i64).clamp(-100, 100);
        let sales_bucket = ((market.avg_conversion * 100.0).round() as i64).clamp(0, 100);
        let week_bucket = market.week / 4;
        format!("{price_bucket}|{sales_bucket}|{week_bucket}")
    }

    fn best_action(&self, state: &str) -> usize {
        let values = self.q_table.get(state).copied().unwrap_or([0.0; 8]);
        let mut best = 0usize;
        for i in 1..values.len() {
            if values[i] > values[best] {
                best = i;
            }
        }
        best
    }
}

impl Decide for RlCompetitor {
    fn decide(&mut self, market: &MarketState, prng: &mut Prng) -> Action {
        let state = self.discretize(market);

        let action_idx = if prng.next_f64() < self.config.epsilon {
            (prng.next_f64() * MACRO_ACTIONS.len() as f64) as usize % MACRO_ACTIONS.len()
        } else {
            self.best_action(&state)
        };
        self.pending = Some((state, action_idx));

        let action = MACRO_ACTIONS[action_idx];
        let price = (self.current_price * (1.0 + action.price_change)).max(0.0);
        let marketing = self.current_marketing.max(self.base_marketing) * action.marketing_mult;
        let promotion = action.promo_discount.map(|discount| Promotion { kind: PromoKind::Discount, discount, duration_weeks: 2 });

        self.current_price = price;
        self.current_marketing = marketing;
        Action { price, marketing_spend: marketing, promotion }
    }

    fn observe_outcome(&mut self, own_profit: f64, own_sales: f64) {
        let Some((state, action_idx)) = self.pending.take() else {
            return;
        };
        let reward = own_profit * 0.001 - own_sales * 0.0001 * self.aggressiveness;
        let next_best = self.q_table.get(&state).copied().unwrap_or([0.0; 8]).iter().cloned().fold(f64::MIN, f64::max);

        let entry = self.q_table.entry(state).or_insert([0.0; 8]);
        let q = entry[action_idx];
        entry[action_idx] = q + self.config.alpha * (reward + self.config.gamma * next_best - q);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiConfig;

    #[test]
    fn table_survives_into_a_freshly_constructed_competitor() {
        let cfg = AiConfig::default().rl;
        let mut competitor = RlCompetitor::new(0.5, 100.0, 5_000.0, cfg.clone());
        let market = MarketState { our_price: 100.0, week: 0, ..Default::default() };
        let mut prng = Prng::new(1);
        let _ = competitor.decide(&market, &mut prng);
        competitor.observe_outcome(500.0, 20.0);
        assert!(!competitor.q_table.is_empty());
        let table = competitor.take_table();
        let carried_over = RlCompetitor::with_table(0.5, 100.0, 5_000.0, cfg, table.clone());
        assert_eq!(carried_over.take_table(), table);
    }

    #[test]
    fn pending_transition_clears_without_double_update() {
        let cfg = AiConfig::default().rl;
        let mut competitor = RlCompetitor::new(0.5, 100.0, 5_000.0, cfg);
        competitor.observe_outcome(100.0, 10.0);
        assert!(competitor.q_table.is_empty());
    }
}
