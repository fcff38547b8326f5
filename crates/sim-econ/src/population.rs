//! Synthetic customer population: weighted segments, per-agent traits, a
//! small-world social graph, and the weekly purchase-evaluation formula.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sim_core::{MarketState, Prng};

/// An inclusive sampling range for one customer trait.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TraitRange {
    pub lo: f64,
    pub hi: f64,
}

impl TraitRange {
    fn sample(&self, prng: &mut Prng) -> f64 {
        self.lo + prng.next_f64() * (self.hi - self.lo)
    }
}

/// One customer segment: a population weight and a trait range for each of
/// the eight sampled traits.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub name: String,
    pub weight: f64,
    pub price_sensitivity: TraitRange,
    pub brand_loyalty: TraitRange,
    pub quality_preference: TraitRange,
    pub channel_preference: TraitRange,
    pub social_influence: TraitRange,
    pub innovation_adoption: TraitRange,
    pub budget: TraitRange,
    pub purchase_prob_base: TraitRange,
}

/// Five default segments used when `RunConfig.population.segments` is
/// omitted, spanning price-sensitive bargain hunters through early adopters.
pub fn default_segments() -> Vec<SegmentSpec> {
    vec![
        SegmentSpec {
            name: "price_sensitive".to_string(),
            weight: 0.30,
            price_sensitivity: TraitRange { lo: 0.6, hi: 1.0 },
            brand_loyalty: TraitRange { lo: 0.0, hi: 0.3 },
            quality_preference: TraitRange { lo: 0.2, hi: 0.5 },
            channel_preference: TraitRange { lo: 0.0, hi: 1.0 },
            social_influence: TraitRange { lo: 0.2, hi: 0.5 },
            innovation_adoption: TraitRange { lo: 0.1, hi: 0.4 },
            budget: TraitRange { lo: 50.0, hi: 200.0 },
            purchase_prob_base: TraitRange { lo: 0.05, hi: 0.15 },
        },
        SegmentSpec {
            name: "quality_focused".to_string(),
            weight: 0.20,
            price_sensitivity: TraitRange { lo: 0.1, hi: 0.4 },
            brand_loyalty: TraitRange { lo: 0.4, hi: 0.7 },
            quality_preference: TraitRange { lo: 0.7, hi: 1.0 },
            channel_preference: TraitRange { lo: 0.0, hi: 1.0 },
            social_influence: TraitRange { lo: 0.1, hi: 0.4 },
            innovation_adoption: TraitRange { lo: 0.2, hi: 0.5 },
            budget: TraitRange { lo: 150.0, hi: 500.0 },
            purchase_prob_base: TraitRange { lo: 0.08, hi: 0.20 },
        },
        SegmentSpec {
            name: "brand_loyal".to_string(),
            weight: 0.20,
            price_sensitivity: TraitRange { lo: 0.2, hi: 0.5 },
            brand_loyalty: TraitRange { lo: 0.7, hi: 1.0 },
            quality_preference: TraitRange { lo: 0.4, hi: 0.7 },
            channel_preference: TraitRange { lo: 0.0, hi: 1.0 },
            social_influence: TraitRange { lo: 0.3, hi: 0.6 },
            innovation_adoption: TraitRange { lo: 0.1, hi: 0.3 },
            budget: TraitRange { lo: 100.0, hi: 350.0 },
            purchase_prob_base: TraitRange { lo: 0.10, hi: 0.25 },
        },
        SegmentSpec {
            name: "early_adopter".to_string(),
            weight: 0.15,
            price_sensitivity: TraitRange { lo: 0.1, hi: 0.4 },
            brand_loyalty: TraitRange { lo: 0.1, hi: 0.4 },
            quality_preference: TraitRange { lo: 0.5, hi: 0.9 },
            channel_preference: TraitRange { lo: 0.0, hi: 1.0 },
            social_influence: TraitRange { lo: 0.5, hi: 0.9 },
            innovation_adoption: TraitRange { lo: 0.7, hi: 1.0 },
            budget: TraitRange { lo: 200.0, hi: 600.0 },
            purchase_prob_base: TraitRange { lo: 0.12, hi: 0.30 },
        },
        SegmentSpec {
            name: "mainstream".to_string(),
            weight: 0.15,
            price_sensitivity: TraitRange { lo: 0.3, hi: 0.6 },
            brand_loyalty: TraitRange { lo: 0.3, hi: 0.6 },
            quality_preference: TraitRange { lo: 0.3, hi: 0.6 },
            channel_preference: TraitRange { lo: 0.0, hi: 1.0 },
            social_influence: TraitRange { lo: 0.3, hi: 0.6 },
            innovation_adoption: TraitRange { lo: 0.3, hi: 0.6 },
            budget: TraitRange { lo: 100.0, hi: 300.0 },
            purchase_prob_base: TraitRange { lo: 0.07, hi: 0.18 },
        },
    ]
}

/// `RunConfig.population`: the requested population size and an optional
/// segment override.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub total_customers: u64,
    #[serde(default)]
    pub segments: Option<Vec<SegmentSpec>>,
}

/// A synthetic customer. `connected` holds stable indices into the
/// population's contiguous storage (never ids of a separate structure).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomerAgent {
    pub id: usize,
    pub segment: String,
    pub price_sensitivity: f64,
    pub brand_loyalty: f64,
    pub quality_preference: f64,
    pub channel_preference: f64,
    pub social_influence: f64,
    pub innovation_adoption: f64,
    pub budget: f64,
    pub purchase_prob_base: f64,
    pub connected: Vec<usize>,
    pub has_purchased: bool,
    pub awareness: f64,
    pub satisfaction: f64,
    pub subscribed: bool,
}

/// Generate `config.total_customers` agents from weighted segments (default
/// five if none supplied) and wire up a small-world social graph.
pub fn generate_population(config: &PopulationConfig, prng: &mut Prng) -> Vec<CustomerAgent> {
    let segments = config.segments.clone().unwrap_or_else(default_segments);
    let mut agents = Vec::with_capacity(config.total_customers as usize);

    for segment in &segments {
        let count = (config.total_customers as f64 * segment.weight).round() as usize;
        for _ in 0..count {
            agents.push(CustomerAgent {
                id: agents.len(),
                segment: segment.name.clone(),
                price_sensitivity: segment.price_sensitivity.sample(prng),
                brand_loyalty: segment.brand_loyalty.sample(prng),
                quality_preference: segment.quality_preference.sample(prng),
                channel_preference: segment.channel_preference.sample(prng),
                social_influence: segment.social_influence.sample(prng),
                innovation_adoption: segment.innovation_adoption.sample(prng),
                budget: segment.budget.sample(prng),
                purchase_prob_base: segment.purchase_prob_base.sample(prng),
                connected: Vec::new(),
                has_purchased: false,
                awareness: 0.0,
                satisfaction: 0.0,
                subscribed: false,
            });
        }
    }

    let neighbor_lists = build_social_graph(agents.len(), prng);
    for (agent, neighbors) in agents.iter_mut().zip(neighbor_lists) {
        agent.connected = neighbors;
    }
    agents
}

/// Watts–Strogatz-style small-world graph: a ring lattice with
/// `min(6, n/2)` neighbors per node, each edge rewired with probability 0.1
/// to a random target. Returns each node's deduplicated neighbor list,
/// self-loops excluded.
pub fn build_social_graph(n: usize, prng: &mut Prng) -> Vec<Vec<usize>> {
    if n < 2 {
        return vec![Vec::new(); n];
    }
    let avg_connections = 6.min(n / 2).max(1);
    let half = (avg_connections / 2).max(1);

    let mut edges: Vec<(usize, usize)> = Vec::with_capacity(n * half);
    for i in 0..n {
        for k in 1..=half {
            edges.push((i, (i + k) % n));
        }
    }

    for edge in edges.iter_mut() {
        if prng.next_f64() < 0.1 {
            let origin = edge.0;
            let mut candidate = (prng.next_f64() * n as f64) as usize % n;
            let mut attempts = 0;
            while candidate == origin && attempts < 10 {
                candidate = (prng.next_f64() * n as f64) as usize % n;
                attempts += 1;
            }
            edge.1 = candidate;
        }
    }

    let mut adjacency: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    for (a, b) in edges {
        if a != b {
            adjacency[a].insert(b);
            adjacency[b].insert(a);
        }
    }
    adjacency.into_iter().map(|set| set.into_iter().collect()).collect()
}

/// The outcome of one customer's weekly purchase evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PurchaseOutcome {
    pub will_buy: bool,
    pub prob: f64,
}

/// `evaluatePurchase`. `neighbors_bought` is the count of this
/// customer's connected neighbors who have already purchased this
/// iteration; `offer_quality_index`/`offer_is_new`/`offer_allow_repeat` come
/// from the active `OfferState`.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_purchase(
    customer: &mut CustomerAgent,
    neighbors_bought: usize,
    offer_price: f64,
    offer_quality_index: f64,
    offer_is_new: bool,
    offer_allow_repeat: bool,
    market: &MarketState,
    prng: &mut Prng,
) -> PurchaseOutcome {
    if customer.has_purchased && !offer_allow_repeat {
        return PurchaseOutcome { will_buy: false, prob: 0.0 };
    }

    let price_score = (1.0 - (offer_price / customer.budget) * customer.price_sensitivity * 2.0).max(0.0);
    let quality_score = offer_quality_index * customer.quality_preference;
    let novelty_bonus = if offer_is_new { customer.innovation_adoption * 0.3 } else { 0.0 };
    let social_score = if customer.connected.is_empty() {
        0.0
    } else {
        (neighbors_bought as f64 / customer.connected.len() as f64) * customer.social_influence
    };
    let marketing_effect = (market.our_weekly_marketing / 200_000.0).min(1.0) * 0.2;
    customer.awareness = (customer.awareness + marketing_effect + social_score * 0.1).min(1.0);
    let competitor_dampening = 1.0 - market.competitor_attractiveness * 0.5;

    let mut prob = customer.purchase_prob_base
        * (0.3 + 0.7 * price_score)
        * (0.5 + 0.5 * quality_score)
        * (1.0 + novelty_bonus)
        * (1.0 + social_score)
        * competitor_dampening
        * customer.awareness
        * market.novelty_factor
        * market.seasonal_multiplier;
    prob = prob.min(0.95);

    let u = prng.next_f64();
    let will_buy = u < prob;
    if will_buy {
        customer.has_purchased = true;
        let u2 = prng.next_f64();
        customer.satisfaction = 0.5 + 0.5 * u2;
    }
    PurchaseOutcome { will_buy, prob }
}
