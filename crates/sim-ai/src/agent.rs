//! The shared competitor-agent capability and the enum unifying the three
//! policy implementations.

use sim_core::{Action, MarketState, Prng};

use crate::ml::MlCompetitor;
use crate::rl::RlCompetitor;
use crate::rule_based::RuleBasedCompetitor;

/// Behavior every competitor policy implements. `decide` is called once per
/// week, in fixed competitor order; `observe_outcome` is called afterward
/// with that competitor's own simulated sales/profit so ML and RL variants
/// can learn. Rule-based ignores it.
pub trait Decide {
    fn decide(&mut self, market: &MarketState, prng: &mut Prng) -> Action;
    fn observe_outcome(&mut self, own_profit: f64, own_sales: f64);
}

/// A competitor agent behind any of the three policies. Constructed once
/// per [`sim_core::CompetitorProfile`] at the start of a Monte Carlo
/// iteration; the RL variant's `QTable` is owned outside the iteration body
/// by the caller (see crate docs) so it can persist across iterations
/// within a single driver `run`.
pub enum CompetitorAgent {
    Rule(RuleBasedCompetitor),
    Ml(MlCompetitor),
    Rl(RlCompetitor),
}

impl Decide for CompetitorAgent {
    fn decide(&mut self, market: &MarketState, prng: &mut Prng) -> Action {
        match self {
            CompetitorAgent::Rule(c) => c.decide(market, prng),
            CompetitorAgent::Ml(c) => c.decide(market, prng),
            CompetitorAgent::Rl(c) => c.decide(market, prng),
        }
    }

    fn observe_outcome(&mut self, own_profit: f64, own_sales: f64) {
        match self {
            CompetitorAgent::Rule(c) => c.observe_outcome(own_profit, own_sales),
            CompetitorAgent::Ml(c) => c.observe_outcome(own_profit, own_sales),
            CompetitorAgent::Rl(c) => c.observe_outcome(own_profit, own_sales),
        }
    }
}
