//! Ingress sanitization limits. Soft violations are clamped and
//! reported; negative mandatory fields are hard errors.

use crate::config::RunConfig;
use crate::error::RunError;

pub const MAX_ITERATIONS: u32 = 10_000;
pub const MAX_CUSTOMERS: u64 = 50_000;
pub const MAX_TIME_HORIZON_WEEKS: u32 = 104;
pub const MAX_COMPETITORS: usize = 20;
pub const MIN_PRICE: f64 = 0.01;
pub const MAX_PRICE: f64 = 1_000_000.0;
pub const MIN_INVENTORY: u64 = 1;
pub const MAX_INVENTORY: u64 = 10_000_000;

/// A non-fatal ingress warning: a value was out of range and got clamped.
#[derive(Clone, Debug, PartialEq)]
pub struct Warning(pub String);

/// Clamp `config` to the sanitization limits, collecting a warning for each
/// clamp. Returns [`RunError::InvalidConfig`] for violations clamping can't
/// paper over: zero iterations, zero customers/weeks, or a negative
/// mandatory monetary field.
pub fn sanitize(mut config: RunConfig) -> Result<(RunConfig, Vec<Warning>), RunError> {
    let mut warnings = Vec::new();

    if config.iterations == 0 {
        return Err(RunError::InvalidConfig("iterations must be >= 1".to_string()));
    }
    if config.iterations > MAX_ITERATIONS {
        warnings.push(Warning(format!("iterations {} clamped to {MAX_ITERATIONS}", config.iterations)));
        config.iterations = MAX_ITERATIONS;
    }

    if config.population.total_customers == 0 {
        return Err(RunError::InvalidConfig("population.total_customers must be >= 1".to_string()));
    }
    if config.population.total_customers > MAX_CUSTOMERS {
        warnings.push(Warning(format!(
            "population.total_customers {} clamped to {MAX_CUSTOMERS}",
            config.population.total_customers
        )));
        config.population.total_customers = MAX_CUSTOMERS;
    }

    if config.time_horizon_weeks == 0 {
        return Err(RunError::InvalidConfig("timeHorizonWeeks must be >= 1".to_string()));
    }
    if config.time_horizon_weeks > MAX_TIME_HORIZON_WEEKS {
        warnings.push(Warning(format!(
            "timeHorizonWeeks {} clamped to {MAX_TIME_HORIZON_WEEKS}",
            config.time_horizon_weeks
        )));
        config.time_horizon_weeks = MAX_TIME_HORIZON_WEEKS;
    }

    if config.ngc.competitors.len() > MAX_COMPETITORS {
        warnings.push(Warning(format!(
            "competitors {} truncated to {MAX_COMPETITORS}",
            config.ngc.competitors.len()
        )));
        config.ngc.competitors = config.ngc.competitors.into_iter().take(MAX_COMPETITORS).collect();
    }

    if config.offer.base_price < 0.0 {
        return Err(RunError::InvalidConfig("offer.basePrice must be >= 0".to_string()));
    }
    if config.offer.cogs < 0.0 {
        return Err(RunError::InvalidConfig("offer.cogs must be >= 0".to_string()));
    }
    if config.offer.marketing_budget < 0.0 {
        return Err(RunError::InvalidConfig("offer.marketingBudget must be >= 0".to_string()));
    }
    let clamped_price = config.offer.base_price.clamp(MIN_PRICE, MAX_PRICE);
    if (clamped_price - config.offer.base_price).abs() > f64::EPSILON {
        warnings.push(Warning(format!("offer.basePrice {} clamped to {clamped_price}", config.offer.base_price)));
        config.offer.base_price = clamped_price;
    }

    if config.initial_inventory == 0 {
        return Err(RunError::InvalidConfig("initialInventory must be >= 1".to_string()));
    }
    let clamped_inventory = config.initial_inventory.clamp(MIN_INVENTORY, MAX_INVENTORY);
    if clamped_inventory != config.initial_inventory {
        warnings.push(Warning(format!(
            "initialInventory {} clamped to {clamped_inventory}",
            config.initial_inventory
        )));
        config.initial_inventory = clamped_inventory;
    }

    Ok((config, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::OfferConfig;
    use sim_econ::{Ngc, PopulationConfig};

    fn base_config() -> RunConfig {
        RunConfig {
            ngc: Ngc::new(),
            offer: OfferConfig {
                name: "widget".to_string(),
                base_price: 50.0,
                cogs: 10.0,
                marketing_budget: 10_000.0,
                quality_index: 0.5,
                channels: vec![],
                allow_repeat: false,
                subscription_price: 0.0,
                subscription_cost: 0.0,
                launch_month: None,
            },
            population: PopulationConfig { total_customers: 100, segments: None },
            initial_inventory: 1_000,
            iterations: 10,
            time_horizon_weeks: 12,
            seed: 1,
        }
    }

    #[test]
    fn zero_iterations_is_hard_error() {
        let mut config = base_config();
        config.iterations = 0;
        assert!(sanitize(config).is_err());
    }

    #[test]
    fn out_of_range_iterations_clamped_with_warning() {
        let mut config = base_config();
        config.iterations = 50_000;
        let (sanitized, warnings) = sanitize(config).unwrap();
        assert_eq!(sanitized.iterations, MAX_ITERATIONS);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn negative_base_price_is_rejected() {
        let mut config = base_config();
        config.offer.base_price = -5.0;
        assert!(sanitize(config).is_err());
    }

    #[test]
    fn valid_config_passes_through_without_warnings() {
        let config = base_config();
        let (_, warnings) = sanitize(config).unwrap();
        assert!(warnings.is_empty());
    }
}
