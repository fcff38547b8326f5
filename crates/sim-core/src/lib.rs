//! Shared numeric substrate and domain model for the market simulation
//! workspace: the seeded PRNG, the six-family distribution library, expert
//! beliefs, percentile statistics, and the domain types (`Action`,
//! `CompetitorProfile`, `MarketState`, lifecycle/seasonality, weekly and
//! iteration results) that `sim-econ`, `sim-ai`, and `sim-runtime` all build
//! on without depending on each other.

pub mod belief;
pub mod distribution;
pub mod domain;
pub mod error;
pub mod prng;
pub mod stats;

pub use belief::{Category, ExpertBelief};
pub use distribution::{distribution_from_json, Distribution};
pub use domain::{
    apply_constraints, lifecycle, seasonality, Action, CompetitorConstraints, CompetitorProfile,
    CompetitorScenarioSample, CompetitorType, IterationResult, LifecycleInfo, MarketState,
    OfferConfig, PromoKind, Promotion, SeasonalityConfig, SeasonalityInfo, Stage, WeeklyMetric,
};
pub use error::DistributionError;
pub use prng::Prng;
pub use stats::{compute_stats, percentile, StatSummary};
