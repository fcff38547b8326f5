//! The named scenario container: known/uncertain parameter maps, competitor
//! profiles, and global risk-event beliefs, sampled in a fixed order so a
//! scenario is fully reproducible under a given seed.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sim_core::{
    CompetitorProfile, CompetitorScenarioSample, ExpertBelief, Prng,
};

/// A known/uncertain parameter block. `known` values are copied verbatim;
/// `uncertain` values are distributions, sampled in insertion order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParamBlock {
    #[serde(default)]
    pub known: BTreeMap<String, f64>,
    #[serde(default)]
    pub uncertain: IndexMap<String, sim_core::Distribution>,
}

impl ParamBlock {
    fn sample(&self, prng: &mut Prng) -> BTreeMap<String, f64> {
        let mut out = self.known.clone();
        for (key, dist) in &self.uncertain {
            out.insert(key.clone(), dist.sample(prng));
        }
        out
    }
}

/// The fully sampled realization of one competitor within a scenario.
pub type SampledCompetitor = CompetitorScenarioSample;

/// One fully-realized, deterministic scenario produced by
/// [`Ngc::sample_full_scenario`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SampledScenario {
    pub company: BTreeMap<String, f64>,
    pub macro_data: BTreeMap<String, f64>,
    pub supply: BTreeMap<String, f64>,
    pub competitors: IndexMap<String, SampledCompetitor>,
    pub risk_results: Vec<(bool, f64)>,
}

/// The scenario/uncertainty container.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ngc {
    pub company_data: ParamBlock,
    pub macro_data: ParamBlock,
    pub supply_chain: ParamBlock,
    pub competitors: IndexMap<String, CompetitorProfile>,
    pub risk_events: Vec<ExpertBelief>,
}

impl Ngc {
    pub fn new() -> Self {
        Self::default()
    }

    /// `add_risk_event(id, desc, p, distribution, category)`: constructs an
    /// `ExpertBelief` and appends it.
    pub fn add_risk_event(
        &mut self,
        id: impl Into<String>,
        description: impl Into<String>,
        probability: f64,
        distribution: sim_core::Distribution,
        category: impl Into<String>,
    ) {
        self.risk_events.push(ExpertBelief::new(id, description, probability, distribution, category));
    }

    /// Produce one fully-realized scenario. Sampling order is fixed:
    /// company known+uncertain, then macro, then supply, then each
    /// competitor (beliefs, then sampled COGS, then sampled marketing
    /// budget) in insertion order, then risk events in insertion order.
    /// This order is part of the seed-reproducibility contract — do not
    /// reorder it even for convenience.
    pub fn sample_full_scenario(&self, prng: &mut Prng) -> SampledScenario {
        let company = self.company_data.sample(prng);
        let macro_data = self.macro_data.sample(prng);
        let supply = self.supply_chain.sample(prng);

        let mut competitors = IndexMap::new();
        for (id, profile) in &self.competitors {
            let beliefs: Vec<(bool, f64)> = profile.beliefs.iter().map(|b| b.sample(prng)).collect();
            let sampled_cogs = profile.cogs_dist.as_ref().map(|d| d.sample(prng));
            let sampled_marketing_budget = profile.marketing_budget_dist.as_ref().map(|d| d.sample(prng));
            competitors.insert(
                id.clone(),
                CompetitorScenarioSample { beliefs, sampled_cogs, sampled_marketing_budget },
            );
        }

        let risk_results = self.risk_events.iter().map(|b| b.sample(prng)).collect();

        SampledScenario { company, macro_data, supply, competitors, risk_results }
    }
}
