//! Scenario sampling and population modeling: the NGC container
//! (known/uncertain parameters, competitor profiles, risk-event beliefs)
//! and the synthetic customer population with its small-world social graph
//! and weekly purchase-evaluation formula.

pub mod ngc;
pub mod population;

pub use ngc::{Ngc, ParamBlock, SampledCompetitor, SampledScenario};
pub use population::{
    build_social_graph, default_segments, evaluate_purchase, generate_population, CustomerAgent,
    PopulationConfig, PurchaseOutcome, SegmentSpec, TraitRange,
};
