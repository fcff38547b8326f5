//! The per-iteration simulation loop and the Monte Carlo driver that wraps
//! it: N iterations with per-iteration substreams, cooperative
//! cancellation, progress reporting, and weekly-average aggregation.

pub mod competitors;
pub mod config;
pub mod driver;
pub mod error;
pub mod sanitize;
pub mod simulation;

pub use competitors::{build_competitor_agents, store_rl_tables, CompetitorRuntime, RlTableStore};
pub use config::RunConfig;
pub use driver::{Aggregate, CancelHandle, KpiDistributions, MonteCarloDriver, ProgressEvent, WeeklyAverage};
pub use error::RunError;
pub use sanitize::{sanitize, Warning};
pub use simulation::SimulationRun;
