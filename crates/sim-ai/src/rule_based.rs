//! Reactive rule-based competitor.

use sim_core::{Action, MarketState, PromoKind, Promotion, Prng};

use crate::agent::Decide;
use crate::config::RuleBasedConfig;

#[derive(Clone, Debug)]
pub struct RuleBasedCompetitor {
    pub aggressiveness: f64,
    pub current_price: f64,
    pub base_marketing: f64,
    config: RuleBasedConfig,
}

impl RuleBasedCompetitor {
    pub fn new(aggressiveness: f64, starting_price: f64, base_marketing: f64, config: RuleBasedConfig) -> Self {
        Self { aggressiveness, current_price: starting_price, base_marketing, config }
    }
}

impl Decide for RuleBasedCompetitor {
    fn decide(&mut self, market: &MarketState, prng: &mut Prng) -> Action {
        let cfg = &self.config;
        let mut price = self.current_price;

        if market.week >= cfg.reaction_delay && market.our_price <= self.current_price * (1.0 - cfg.undercut_threshold)
        {
            if self.aggressiveness > cfg.match_aggressiveness_hi {
                price = market.our_price * (1.0 - 0.02 * self.aggressiveness);
            } else if self.aggressiveness >= cfg.match_aggressiveness_lo {
                price = market.our_price;
            }
        }

        let mut marketing = self.base_marketing * (1.0 + self.aggressiveness * 0.5);

        let mut promotion = None;
        if market.avg_conversion > 0.02 && self.aggressiveness > 0.5 && prng.next_f64() < self.aggressiveness * 0.3 {
            let discount = cfg.promo_discount_lo + prng.next_f64() * (cfg.promo_discount_hi - cfg.promo_discount_lo);
            let span = (cfg.promo_duration_hi - cfg.promo_duration_lo) as f64;
            let duration_weeks = cfg.promo_duration_lo + (prng.next_f64() * span) as u32;
            promotion = Some(Promotion { kind: PromoKind::Discount, discount, duration_weeks });
        }

        if prng.next_f64() < 0.05 * self.aggressiveness {
            marketing *= 1.5;
        }

        self.current_price = price;
        Action { price, marketing_spend: marketing, promotion }
    }

    fn observe_outcome(&mut self, _own_profit: f64, _own_sales: f64) {
        // Reactive policy: no learning from past outcomes.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiConfig;
    use proptest::prelude::*;

    #[test]
    fn matches_our_price_at_moderate_aggressiveness() {
        let cfg = AiConfig::default().rule_based;
        let mut competitor = RuleBasedCompetitor::new(0.4, 100.0, 10_000.0, cfg);
        let market = MarketState { week: 5, our_price: 90.0, avg_conversion: 0.0, ..Default::default() };
        let mut prng = Prng::new(1);
        let action = competitor.decide(&market, &mut prng);
        assert!((action.price - 90.0).abs() < 1e-9);
    }

    #[test]
    fn undercuts_at_high_aggressiveness() {
        let cfg = AiConfig::default().rule_based;
        let mut competitor = RuleBasedCompetitor::new(0.8, 100.0, 10_000.0, cfg);
        let market = MarketState { week: 5, our_price: 90.0, avg_conversion: 0.0, ..Default::default() };
        let mut prng = Prng::new(1);
        let action = competitor.decide(&market, &mut prng);
        assert!(action.price < 90.0);
    }

    #[test]
    fn ignores_reaction_before_delay() {
        let cfg = AiConfig::default().rule_based;
        let mut competitor = RuleBasedCompetitor::new(0.8, 100.0, 10_000.0, cfg);
        let market = MarketState { week: 0, our_price: 50.0, avg_conversion: 0.0, ..Default::default() };
        let mut prng = Prng::new(1);
        let action = competitor.decide(&market, &mut prng);
        assert!((action.price - 100.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn decide_never_produces_a_negative_price_or_marketing_spend(
            aggressiveness in 0.0f64..1.0,
            starting_price in 1.0f64..1_000.0,
            base_marketing in 0.0f64..500_000.0,
            week in 0u32..104,
            our_price in 0.0f64..1_000.0,
            avg_conversion in 0.0f64..1.0,
            seed: u32,
        ) {
            let cfg = AiConfig::default().rule_based;
            let mut competitor = RuleBasedCompetitor::new(aggressiveness, starting_price, base_marketing, cfg);
            let market = MarketState { week, our_price, avg_conversion, ..Default::default() };
            let mut prng = Prng::new(seed);
            let action = competitor.decide(&market, &mut prng);
            prop_assert!(action.price >= 0.0);
            prop_assert!(action.marketing_spend >= 0.0);
        }
    }
}
