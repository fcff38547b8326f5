//! Per-iteration construction of competitor agents from a sampled scenario.

use std::collections::HashMap;

use sim_ai::{AiConfig, CompetitorAgent, MlCompetitor, QTable, RlCompetitor, RuleBasedCompetitor};
use sim_core::{Action, CompetitorConstraints, CompetitorType, OfferConfig};
use sim_econ::{Ngc, SampledScenario};

/// One competitor's runtime state for a single iteration: its decision
/// policy plus the static/sampled fields the weekly loop needs to compute
/// attractiveness and enforce constraints.
pub struct CompetitorRuntime {
    pub id: String,
    pub agent: CompetitorAgent,
    pub constraints: CompetitorConstraints,
    pub market_share: f64,
    pub sampled_cogs: f64,
    /// This week's constrained action, set by the simulation loop after
    /// `decide`; read back when computing the RL/ML learning signal.
    pub last_action: Option<Action>,
}

/// Persistent Q-tables for RL competitors, keyed by competitor id. Owned by
/// the driver across a whole `run` call so learning survives resets
/// between iterations but not between separate `run` calls.
pub type RlTableStore = HashMap<String, QTable>;

/// Build one [`CompetitorRuntime`] per entry in `ngc.competitors`, in
/// insertion order, pulling each competitor's RL table (if any) out of
/// `rl_tables` and reinserting a default table on first use.
///
/// The starting price anchor for every competitor is `offer.base_price` —
/// `CompetitorProfile` carries no independent starting price, so
/// every competitor's reactive/ML/RL policy starts anchored to our own
/// launch price. Each competitor's base weekly marketing spend is its
/// sampled marketing budget divided by 13 (matching our own
/// `marketingBudget / 13` weekly cadence) when a `marketingBudgetDist` was
/// supplied, else a fifth of its `maxMarketingBudget` constraint.
pub fn build_competitor_agents(
    ngc: &Ngc,
    scenario: &SampledScenario,
    offer: &OfferConfig,
    ai_config: &AiConfig,
    rl_tables: &mut RlTableStore,
) -> Vec<CompetitorRuntime> {
    ngc.competitors.iter().map(|(id, profile)| {
        let sample = scenario.competitors.get(id);
        let sampled_cogs = sample.and_then(|s| s.sampled_cogs).unwrap_or(offer.cogs);
        let sampled_marketing_budget = sample.and_then(|s| s.sampled_marketing_budget);
        let base_marketing = sampled_marketing_budget.map(|budget| budget / 13.0).unwrap_or(profile.constraints.max_marketing_budget * 0.2);

        let agent = match profile.kind {
            CompetitorType::Rule => CompetitorAgent::Rule(RuleBasedCompetitor::new(
                profile.aggressiveness,
                offer.base_price,
                base_marketing,
                ai_config.rule_based.clone(),
            )),
            CompetitorType::Ml => CompetitorAgent::Ml(MlCompetitor::new(
                offer.base_price,
                base_marketing,
                ai_config.ml.clone(),
            )),
            CompetitorType::Rl => {
                let table = rl_tables.remove(id).unwrap_or_default();
                CompetitorAgent::Rl(RlCompetitor::with_table(
                    profile.aggressiveness,
                    offer.base_price,
                    base_marketing,
                    ai_config.rl,
                    table,
                ))
            }
        };

        CompetitorRuntime {
            id: id.clone(),
            agent,
            constraints: profile.constraints,
            market_share: profile.market_share,
            sampled_cogs,
            last_action: None,
        }
    }).collect()
}

/// Hand each RL competitor's table back to `rl_tables` so it survives into
/// the next iteration of the same `run` call.
pub fn store_rl_tables(runtimes: Vec<CompetitorRuntime>, rl_tables: &mut RlTableStore) {
    for runtime in runtimes {
        if let CompetitorAgent::Rl(rl) = runtime.agent {
            rl_tables.insert(runtime.id, rl.take_table());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use sim_core::{CompetitorProfile, Prng};

    fn offer() -> OfferConfig {
        OfferConfig {
            name: "widget".to_string(),
            base_price: 100.0,
            cogs: 30.0,
            marketing_budget: 50_000.0,
            quality_index: 0.6,
            channels: vec![],
            allow_repeat: false,
            subscription_price: 0.0,
            subscription_cost: 0.0,
            launch_month: None,
        }
    }

    fn ngc_with_one_rl_competitor() -> Ngc {
        let mut ngc = Ngc::new();
        let mut competitors = IndexMap::new();
        competitors.insert(
            "rival".to_string(),
            CompetitorProfile {
                id: "rival".to_string(),
                name: "Rival Co".to_string(),
                kind: CompetitorType::Rl,
                aggressiveness: 0.5,
                financial_health: 0.8,
                market_share: 0.2,
                beliefs: vec![],
                constraints: CompetitorConstraints::default(),
                cogs_dist: None,
                marketing_budget_dist: None,
            },
        );
        ngc.competitors = competitors;
        ngc
    }

    #[test]
    fn rl_table_round_trips_through_the_store() {
        let ngc = ngc_with_one_rl_competitor();
        let offer = offer();
        let ai_config = AiConfig::default();
        let mut rl_tables = RlTableStore::new();

        let mut prng = Prng::new(1);
        let scenario = ngc.sample_full_scenario(&mut prng);
        let runtimes = build_competitor_agents(&ngc, &scenario, &offer, &ai_config, &mut rl_tables);
        assert_eq!(runtimes.len(), 1);
        store_rl_tables(runtimes, &mut rl_tables);
        assert!(rl_tables.contains_key("rival"));
    }
}
