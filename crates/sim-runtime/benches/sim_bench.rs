use criterion::{criterion_group, criterion_main, Criterion};
use sim_core::{CompetitorConstraints, CompetitorProfile, CompetitorType, Distribution, OfferConfig};
use sim_econ::{Ngc, PopulationConfig};
use sim_runtime::{CancelHandle, MonteCarloDriver, RunConfig};

fn demo_config(iterations: u32) -> RunConfig {
    let mut ngc = Ngc::new();
    let mut competitors = indexmap::IndexMap::new();
    competitors.insert(
        "rival".to_string(),
        CompetitorProfile {
            id: "rival".to_string(),
            name: "Rival Co".to_string(),
            kind: CompetitorType::Ml,
            aggressiveness: 0.5,
            financial_health: 0.7,
            market_share: 0.2,
            beliefs: vec![],
            constraints: CompetitorConstraints::default(),
            cogs_dist: None,
            marketing_budget_dist: None,
        },
    );
    ngc.competitors = competitors;
    ngc.add_risk_event("risk1", "demand shock", 0.1, Distribution::Normal { mu: 0.1, sigma: 0.05 }, "demand");

    RunConfig {
        ngc,
        offer: OfferConfig {
            name: "widget".to_string(),
            base_price: 100.0,
            cogs: 35.0,
            marketing_budget: 100_000.0,
            quality_index: 0.6,
            channels: vec![],
            allow_repeat: false,
            subscription_price: 0.0,
            subscription_cost: 0.0,
            launch_month: None,
        },
        population: PopulationConfig { total_customers: 1_000, segments: None },
        initial_inventory: 10_000,
        iterations,
        time_horizon_weeks: 26,
        seed: 42,
    }
}

fn bench_monte_carlo_run(c: &mut Criterion) {
    let driver = MonteCarloDriver::new();
    let config = demo_config(20);
    c.bench_function("monte carlo: 20 iterations x 26 weeks x 1000 customers", |b| {
        b.iter(|| driver.run(config.clone(), &CancelHandle::new(), |_| {}).unwrap())
    });
}

criterion_group!(benches, bench_monte_carlo_run);
criterion_main!(benches);
