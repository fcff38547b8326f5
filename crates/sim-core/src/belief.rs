//! Expert beliefs: a quantified judgment that a risk/event either triggers
//! (with a sampled magnitude) or doesn't.

use serde::{Deserialize, Serialize};

use crate::distribution::Distribution;
use crate::prng::Prng;

/// A category tag used for grouping beliefs in reporting; the value has no
/// effect on sampling.
pub type Category = String;

/// `(id, description, probability, distribution, category)`. Sampling draws
/// the trigger coin and the magnitude from the *same* PRNG stream, in that
/// order, so a belief always consumes exactly one draw when it doesn't
/// trigger and two when it does.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpertBelief {
    pub id: String,
    pub description: String,
    pub probability: f64,
    pub distribution: Distribution,
    pub category: Category,
}

impl ExpertBelief {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        probability: f64,
        distribution: Distribution,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            probability,
            distribution,
            category: category.into(),
        }
    }

    /// Draw `(triggered, value)`. `value` is `0.0` when the belief doesn't
    /// trigger — the distribution is not sampled in that case.
    pub fn sample(&self, prng: &mut Prng) -> (bool, f64) {
        let u = prng.next_f64();
        let triggered = u < self.probability;
        let value = if triggered { self.distribution.sample(prng) } else { 0.0 };
        (triggered, value)
    }
}
