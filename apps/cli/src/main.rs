//! Headless CLI: decode a `RunConfig`, run the Monte Carlo driver, and print
//! the aggregate KPI summary plus the risk/optimizer report.

use anyhow::{Context, Result};
use sim_core::{
    CompetitorConstraints, CompetitorProfile, CompetitorType, Distribution, ExpertBelief, OfferConfig,
};
use sim_econ::{Ngc, PopulationConfig};
use sim_runtime::{CancelHandle, MonteCarloDriver, ProgressEvent, RunConfig};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// `--config <path.json>` to decode a [`RunConfig`] from disk; with no flag,
/// runs a baked-in demo scenario.
fn parse_args() -> Option<String> {
    let mut config_path: Option<String> = None;
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        if arg == "--config" {
            config_path = it.next();
        }
    }
    config_path
}

/// A demo scenario: one rule-based competitor carrying a single belief,
/// one global supply risk, 30 iterations over a 12-week horizon.
fn demo_config() -> RunConfig {
    let mut ngc = Ngc::new();

    let mut competitors = indexmap::IndexMap::new();
    competitors.insert(
        "rival".to_string(),
        CompetitorProfile {
            id: "rival".to_string(),
            name: "Equilibrium Rival".to_string(),
            kind: CompetitorType::Rule,
            aggressiveness: 0.6,
            financial_health: 0.7,
            market_share: 0.25,
            beliefs: vec![ExpertBelief::new(
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
        "supply_shock",
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
        iterations: 30,
        time_horizon_weeks: 12,
        seed: 123,
    }
}

fn load_config(path: &str) -> Result<RunConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading config file {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config file {path} as RunConfig JSON"))
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_max_level(Level::INFO).init();

    let config = match parse_args() {
        Some(path) => {
            info!(path = %path, "loading run config from file");
            load_config(&path)?
        }
        None => {
            info!("no --config given, running the baked-in demo scenario");
            demo_config()
        }
    };

    let offer_cogs = config.offer.cogs;
    let iterations = config.iterations;

    let driver = MonteCarloDriver::new();
    let cancel = CancelHandle::new();
    let aggregate = driver.run(config, &cancel, |p: ProgressEvent| {
        info!(iteration = p.iteration, total = p.total, pct = p.pct, "monte carlo progress");
    }).context("monte carlo run failed")?;

    println!(
        "Iterations: {} | sales: {:.1} (p5={:.1}, p95={:.1}) | revenue: ${:.2} | netProfit: ${:.2} (p5=${:.2}, p95=${:.2}) | roi: {:.1}%",
        aggregate.iterations,
        aggregate.sales.mean,
        aggregate.sales.p5,
        aggregate.sales.p95,
        aggregate.revenue.mean,
        aggregate.net_profit.mean,
        aggregate.net_profit.p5,
        aggregate.net_profit.p95,
        aggregate.roi.mean,
    );

    if aggregate.iterations < iterations {
        println!("Run was cancelled early: {}/{} iterations completed.", aggregate.iterations, iterations);
    }

    match sim_risk::analyze(&aggregate.raw_results, offer_cogs, 0.99) {
        Some(report) => {
            println!(
                "Inventory risk | VaR95: ${:.2} | CVaR95: ${:.2} | P(unsold>25%): {:.1}% | P(netProfit<0): {:.1}%",
                report.inventory.var95,
                report.inventory.cvar95,
                report.inventory.prob_unsold_over_25pct * 100.0,
                report.inventory.prob_net_profit_negative * 100.0,
            );
            println!(
                "Profitability risk | P(ROI<0): {:.1}% | P(never breaks even): {:.1}%",
                report.profitability.prob_roi_negative * 100.0,
                report.profitability.prob_break_even_never * 100.0,
            );
            println!(
                "Safe stock | recommended: {} units (p50={:.0}, p75={:.0}, p90={:.0}, p95={:.0}, p99={:.0})",
                report.safe_stock.recommended,
                report.safe_stock.p50,
                report.safe_stock.p75,
                report.safe_stock.p90,
                report.safe_stock.p95,
                report.safe_stock.p99,
            );
            println!("Contingency plans:");
            for plan in sim_risk::contingency_plans(&report) {
                println!("  - {plan}");
            }
        }
        None => {
            println!("No completed iterations; risk/optimizer skipped.");
        }
    }

    Ok(())
}
