//! The Monte Carlo driver: N iterations with per-iteration substreams,
//! cooperative cancellation, weekly-average aggregation, and raw-result
//! retention.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sim_ai::AiConfig;
use sim_core::{compute_stats, IterationResult, Prng, SeasonalityConfig, StatSummary};
use sim_econ::generate_population;

use crate::competitors::{build_competitor_agents, store_rl_tables, RlTableStore};
use crate::config::RunConfig;
use crate::error::RunError;
use crate::sanitize::sanitize;
use crate::simulation::SimulationRun;

/// A `cancel` handle shared between the host and a running driver.
/// Checked only at iteration boundaries, never mid-week.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress notification emitted every 10th iteration and on the last.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressEvent {
    pub iteration: u32,
    pub total: u32,
    pub pct: f64,
}

/// Per-field arithmetic mean across completed iterations, for one week
/// index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAverage {
    pub week: u32,
    pub units_sold: f64,
    pub revenue: f64,
    pub inventory: f64,
    pub avg_conversion: f64,
    pub competitor_attractiveness: f64,
    pub subscribers: f64,
}

/// Empirical per-iteration arrays retained for histogram rendering.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct KpiDistributions {
    pub sales: Vec<f64>,
    pub revenue: Vec<f64>,
    pub gross_profit: Vec<f64>,
    pub net_profit: Vec<f64>,
    pub roi: Vec<f64>,
    pub margin: Vec<f64>,
    pub inventory_remaining: Vec<f64>,
    pub unsold_pct: Vec<f64>,
}

/// The driver's full output: per-KPI statistics, the weekly-average time
/// series, the empirical distributions, and the raw per-iteration results
/// (consumed by `sim-risk`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Aggregate {
    pub iterations: u32,
    pub sales: StatSummary,
    pub revenue: StatSummary,
    pub gross_profit: StatSummary,
    pub net_profit: StatSummary,
    pub roi: StatSummary,
    pub margin: StatSummary,
    pub inventory_remaining: StatSummary,
    pub inventory_value: StatSummary,
    pub unsold_pct: StatSummary,
    pub distributions: KpiDistributions,
    pub weekly_avg: Vec<WeeklyAverage>,
    pub raw_results: Vec<IterationResult>,
}

/// The Monte Carlo driver. Holds no state of its own — every `run`
/// call owns its master PRNG, its RL table store, and its results.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonteCarloDriver;

impl MonteCarloDriver {
    pub fn new() -> Self {
        Self
    }

    /// Run `config.iterations` Monte Carlo iterations, invoking
    /// `on_progress` every 10th iteration and on the last, and returning a
    /// partial [`Aggregate`] if `cancel` is observed at an iteration
    /// boundary. Fails fast with [`RunError::InvalidConfig`] before running
    /// any iteration if sanitization can't paper over a violation.
    pub fn run(
        &self,
        config: RunConfig,
        cancel: &CancelHandle,
        mut on_progress: impl FnMut(ProgressEvent),
    ) -> Result<Aggregate, RunError> {
        let (config, warnings) = sanitize(config)?;
        for warning in &warnings {
            tracing::warn!(message = %warning.0, "run config sanitized");
        }

        let ai_config = AiConfig::default();
        let seasonality_cfg = SeasonalityConfig {
            start_month: config.offer.launch_month.unwrap_or(0),
            ..SeasonalityConfig::default()
        };

        let mut master = Prng::new(config.seed);
        let mut rl_tables: RlTableStore = RlTableStore::new();
        let mut results: Vec<IterationResult> = Vec::with_capacity(config.iterations as usize);

        for i in 0..config.iterations {
            if cancel.is_cancelled() {
                tracing::info!(completed = i, total = config.iterations, "run cancelled at iteration boundary");
                break;
            }

            let iter_seed = master.next_seed();
            let mut iter_prng = Prng::new(iter_seed);

            let scenario = config.ngc.sample_full_scenario(&mut iter_prng);
            let mut population = generate_population(&config.population, &mut iter_prng);
            let mut competitors =
                build_competitor_agents(&config.ngc, &scenario, &config.offer, &ai_config, &mut rl_tables);

            let result = SimulationRun::execute(
                &config.offer,
                &mut population,
                &scenario,
                &mut competitors,
                &seasonality_cfg,
                config.time_horizon_weeks,
                config.initial_inventory,
                &mut iter_prng,
            );

            store_rl_tables(competitors, &mut rl_tables);
            results.push(result);

            let done = i + 1;
            if done % 10 == 0 || done == config.iterations {
                let pct = done as f64 / config.iterations as f64;
                tracing::debug!(iteration = done, total = config.iterations, pct, "monte carlo progress");
                on_progress(ProgressEvent { iteration: done, total: config.iterations, pct });
            }
        }

        Ok(aggregate(results, config.time_horizon_weeks))
    }
}

fn aggregate(results: Vec<IterationResult>, time_horizon_weeks: u32) -> Aggregate {
    let iterations = results.len() as u32;

    let sales: Vec<f64> = results.iter().map(|r| r.total_units_sold as f64).collect();
    let revenue: Vec<f64> = results.iter().map(|r| r.total_revenue).collect();
    let gross_profit: Vec<f64> = results.iter().map(|r| r.gross_profit).collect();
    let net_profit: Vec<f64> = results.iter().map(|r| r.net_profit).collect();
    let roi: Vec<f64> = results.iter().map(|r| r.roi).collect();
    let margin: Vec<f64> = results.iter().map(|r| r.margin_pct).collect();
    let inventory_remaining: Vec<f64> = results.iter().map(|r| r.inventory_remaining as f64).collect();
    let inventory_value: Vec<f64> = results.iter().map(|r| r.inventory_value).collect();
    let unsold_pct: Vec<f64> = results.iter().map(|r| r.unsold_pct).collect();

    let mut weekly_avg = Vec::with_capacity(time_horizon_weeks as usize);
    for week in 0..time_horizon_weeks as usize {
        let mut n = 0usize;
        let (mut units_sold, mut revenue_w, mut inventory, mut avg_conversion, mut attractiveness, mut subscribers) =
            (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        for r in &results {
            if let Some(m) = r.weekly_metrics.get(week) {
                n += 1;
                units_sold += m.units_sold as f64;
                revenue_w += m.revenue;
                inventory += m.inventory as f64;
                avg_conversion += m.avg_conversion;
                attractiveness += m.competitor_attractiveness;
                subscribers += m.subscribers as f64;
            }
        }
        let divisor = n.max(1) as f64;
        weekly_avg.push(WeeklyAverage {
            week: week as u32,
            units_sold: units_sold / divisor,
            revenue: revenue_w / divisor,
            inventory: inventory / divisor,
            avg_conversion: avg_conversion / divisor,
            competitor_attractiveness: attractiveness / divisor,
            subscribers: subscribers / divisor,
        });
    }

    Aggregate {
        iterations,
        sales: compute_stats(&sales),
        revenue: compute_stats(&revenue),
        gross_profit: compute_stats(&gross_profit),
        net_profit: compute_stats(&net_profit),
        roi: compute_stats(&roi),
        margin: compute_stats(&margin),
        inventory_remaining: compute_stats(&inventory_remaining),
        inventory_value: compute_stats(&inventory_value),
        unsold_pct: compute_stats(&unsold_pct),
        distributions: KpiDistributions {
            sales,
            revenue,
            gross_profit,
            net_profit,
            roi,
            margin,
            inventory_remaining,
            unsold_pct,
        },
        weekly_avg,
        raw_results: results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{CompetitorConstraints, CompetitorProfile, CompetitorType, Distribution, OfferConfig};
    use sim_econ::{Ngc, PopulationConfig};

    fn demo_config(seed: u32, iterations: u32) -> RunConfig {
        let mut ngc = Ngc::new();
        let mut competitors = indexmap::IndexMap::new();
        competitors.insert(
            "rival".to_string(),
            CompetitorProfile {
                id: "rival".to_string(),
                name: "Rival Co".to_string(),
                kind: CompetitorType::Rule,
                aggressiveness: 0.6,
                financial_health: 0.7,
                market_share: 0.25,
                beliefs: vec![sim_core::ExpertBelief::new(
                    "b1",
                    "competitor cost shock",
                    0.3,
                    Distribution::Normal { mu: 0.1, sigma: 0.05 },
                    "cost",
                )],
                constraints: CompetitorConstraints::default(),
                cogs_dist: None,
                marketing_budget_dist: None,
            },
        );
        ngc.competitors = competitors;
        ngc.add_risk_event(
            "risk1",
            "global supply shock",
            0.15,
            Distribution::Normal { mu: 0.2, sigma: 0.08 },
            "supply",
        );

        RunConfig {
            ngc,
            offer: OfferConfig {
                name: "widget".to_string(),
                base_price: 120.0,
                cogs: 40.0,
                marketing_budget: 150_000.0,
                quality_index: 0.7,
                channels: vec![],
                allow_repeat: false,
                subscription_price: 0.0,
                subscription_cost: 0.0,
                launch_month: None,
            },
            population: PopulationConfig { total_customers: 500, segments: None },
            initial_inventory: 5_000,
            iterations,
            time_horizon_weeks: 12,
            seed,
        }
    }

    #[test]
    fn same_seed_is_deterministic_to_four_decimals() {
        let driver = MonteCarloDriver::new();
        let a = driver.run(demo_config(123, 30), &CancelHandle::new(), |_| {}).unwrap();
        let b = driver.run(demo_config(123, 30), &CancelHandle::new(), |_| {}).unwrap();
        assert!((a.sales.mean - b.sales.mean).abs() < 1e-4);
        assert!((a.revenue.mean - b.revenue.mean).abs() < 1e-4);
        assert!((a.net_profit.mean - b.net_profit.mean).abs() < 1e-4);
    }

    #[test]
    fn end_to_end_scenario_shapes_are_consistent() {
        let driver = MonteCarloDriver::new();
        let aggregate = driver.run(demo_config(123, 30), &CancelHandle::new(), |_| {}).unwrap();
        assert_eq!(aggregate.iterations, 30);
        assert!(aggregate.sales.mean > 0.0);
        assert!(aggregate.revenue.mean > 0.0);
        assert_eq!(aggregate.weekly_avg.len(), 12);
    }

    #[test]
    fn zero_iterations_fails_before_running_anything() {
        let driver = MonteCarloDriver::new();
        let config = demo_config(1, 0);
        assert!(driver.run(config, &CancelHandle::new(), |_| {}).is_err());
    }

    #[test]
    fn cancellation_returns_partial_iterations() {
        let driver = MonteCarloDriver::new();
        let cancel = CancelHandle::new();
        let config = demo_config(1, 1000);
        let mut seen = 0;
        let aggregate = driver.run(config, &cancel, |_progress| {
            seen += 1;
            if seen == 1 {
                cancel.cancel();
            }
        }).unwrap();
        assert!(aggregate.iterations < 1000);
    }
}
