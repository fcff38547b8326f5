//! `RunConfig`, the decoded external entry point to the driver.

use serde::{Deserialize, Serialize};
use sim_core::OfferConfig;
use sim_econ::{Ngc, PopulationConfig};

/// The full input to [`crate::driver::MonteCarloDriver::run`]. Decodes from
/// JSON or is constructed programmatically by a host.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    pub ngc: Ngc,
    pub offer: OfferConfig,
    pub population: PopulationConfig,
    pub initial_inventory: u64,
    pub iterations: u32,
    pub time_horizon_weeks: u32,
    pub seed: u32,
}
