//! One weekly time-stepped Monte Carlo iteration: lifecycle, seasonality,
//! competitor decisions, customer purchase evaluation, inventory and
//! break-even accounting.

use sim_core::{
    apply_constraints, lifecycle, seasonality, IterationResult, MarketState, OfferConfig, Prng,
    SeasonalityConfig, Stage, WeeklyMetric,
};
use sim_ai::Decide;
use sim_econ::{evaluate_purchase, CustomerAgent, SampledScenario};

use crate::competitors::CompetitorRuntime;

/// Stateless entry point for one Monte Carlo iteration's weekly loop. A
/// fresh population and fresh (or RL-table-carried) competitor agents are
/// supplied by the driver; this function owns nothing across iterations.
pub struct SimulationRun;

impl SimulationRun {
    /// Run `time_horizon_weeks` weeks over `population` against
    /// `competitors`, starting from `initial_inventory` units, and return
    /// the finalized [`IterationResult`].
    #[allow(clippy::too_many_arguments)]
    pub fn execute(
        offer: &OfferConfig,
        population: &mut [CustomerAgent],
        scenario: &SampledScenario,
        competitors: &mut [CompetitorRuntime],
        seasonality_cfg: &SeasonalityConfig,
        time_horizon_weeks: u32,
        initial_inventory: u64,
        prng: &mut Prng,
    ) -> IterationResult {
        let mut inventory: i64 = initial_inventory as i64;
        let mut cumulative_sold: u64 = 0;
        let mut total_revenue = 0.0;
        let mut total_cost = 0.0;
        let mut total_marketing_spent = 0.0;
        let mut total_subscribers: u64 = 0;
        let mut weekly_metrics = Vec::with_capacity(time_horizon_weeks as usize);
        let mut market = MarketState::default();
        let mut running_profit = 0.0;
        let mut break_even_week: i32 = -1;

        let weekly_marketing_spend = offer.marketing_budget / 13.0;
        let n_agents = population.len();

        for week in 0..time_horizon_weeks {
            let lifecycle_info = lifecycle(week, time_horizon_weeks);
            let offer_is_new = lifecycle_info.stage == Stage::Launch;
            let season = seasonality(week, seasonality_cfg);

            market.week = week;
            market.novelty_factor = lifecycle_info.novelty_factor;
            market.seasonal_multiplier = season.multiplier;
            market.our_price = offer.base_price;
            market.our_cogs = offer.cogs;
            market.our_weekly_marketing = weekly_marketing_spend;

            let mut attractiveness_sum = 0.0;
            let mut competitor_prices = Vec::with_capacity(competitors.len());
            for runtime in competitors.iter_mut() {
                market.competitor_scenario = scenario.competitors.get(&runtime.id).cloned();
                let mut action = runtime.agent.decide(&market, prng);
                apply_constraints(&mut action, runtime.sampled_cogs, &runtime.constraints);

                let price_term = ((market.our_price - action.price) / market.our_price.max(1e-9)).max(0.0) * 0.5;
                let marketing_term =
                    (action.marketing_spend / market.our_weekly_marketing.max(1e-9)).min(1.0) * 0.3;
                let promo_term = action.promotion.map(|p| p.discount * 0.5).unwrap_or(0.0);
                attractiveness_sum += (price_term + marketing_term + promo_term) * runtime.market_share;

                competitor_prices.push(action.price);
                runtime.last_action = Some(action);
            }
            market.competitor_attractiveness = attractiveness_sum.min(1.0);

            let cogs_multiplier =
                1.0 + scenario.risk_results.iter().filter(|(triggered, _)| *triggered).map(|(_, v)| v).sum::<f64>();
            let effective_cogs = offer.cogs * cogs_multiplier;

            let mut week_units_sold: u64 = 0;
            let mut week_revenue = 0.0;
            let mut week_conversions = 0.0;
            for i in 0..n_agents {
                if inventory <= 0 {
                    break;
                }
                let neighbors_bought =
                    population[i].connected.iter().filter(|&&j| population[j].has_purchased).count();
                let customer = &mut population[i];
                let outcome = evaluate_purchase(
                    customer,
                    neighbors_bought,
                    offer.base_price,
                    offer.quality_index,
                    offer_is_new,
                    offer.allow_repeat,
                    &market,
                    prng,
                );
                week_conversions += outcome.prob;
                if outcome.will_buy {
                    inventory -= 1;
                    week_units_sold += 1;
                    week_revenue += offer.base_price;
                    total_cost += effective_cogs;
                    if offer.subscription_price > 0.0 && prng.next_f64() < 0.6 {
                        total_subscribers += 1;
                        customer.subscribed = true;
                    }
                }
            }
            let avg_conversion = if n_agents > 0 { week_conversions / n_agents as f64 } else { 0.0 };
            market.avg_conversion = avg_conversion;

            total_revenue += week_revenue;
            total_marketing_spent += weekly_marketing_spend;
            cumulative_sold += week_units_sold;

            let week_profit = week_revenue - week_units_sold as f64 * effective_cogs - weekly_marketing_spend;
            running_profit += week_profit;
            if break_even_week < 0 && running_profit > 0.0 {
                break_even_week = week as i32;
            }

            for runtime in competitors.iter_mut() {
                let (their_price, their_marketing) = runtime.last_action.map(|a| (a.price, a.marketing_spend)).unwrap_or((offer.base_price, 0.0));
                let own_sales_estimate = runtime.market_share * n_agents as f64 * avg_conversion;
                let own_profit_estimate = own_sales_estimate * (their_price - runtime.sampled_cogs) - their_marketing;
                runtime.agent.observe_outcome(own_profit_estimate, week_units_sold as f64);
            }

            weekly_metrics.push(WeeklyMetric {
                week,
                units_sold: week_units_sold,
                cumulative_sold,
                inventory,
                revenue: week_revenue,
                avg_conversion,
                our_price: offer.base_price,
                competitor_prices,
                competitor_attractiveness: market.competitor_attractiveness,
                effective_cogs,
                subscribers: total_subscribers,
            });
        }

        let gross_profit = total_revenue - total_cost;
        let months = time_horizon_weeks as f64 / 4.33;
        let subscription_revenue = total_subscribers as f64 * offer.subscription_price * months;
        let subscription_cost_total = total_subscribers as f64 * offer.subscription_cost * months;
        let net_profit = gross_profit - total_marketing_spent + subscription_revenue - subscription_cost_total;
        let roi = if total_marketing_spent > 0.0 {
            (net_profit / (total_cost + total_marketing_spent)) * 100.0
        } else {
            0.0
        };
        let margin_pct = if total_revenue > 0.0 { (gross_profit / total_revenue) * 100.0 } else { 0.0 };
        let inventory_value = inventory as f64 * offer.cogs;
        let unsold_pct = if initial_inventory > 0 {
            inventory as f64 / initial_inventory as f64 * 100.0
        } else {
            0.0
        };

        IterationResult {
            total_units_sold: cumulative_sold,
            total_revenue,
            total_cost,
            gross_profit,
            net_profit,
            roi,
            margin_pct,
            inventory_remaining: inventory,
            inventory_value,
            unsold_pct,
            break_even_week,
            total_marketing_spent,
            total_subscribers,
            subscription_revenue,
            weekly_metrics,
        }
    }
}
