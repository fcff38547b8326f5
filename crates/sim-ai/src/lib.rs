//! Competitor agent policies for the market simulation: reactive
//! rule-based, heuristic-ML, and tabular-RL, behind a shared [`Decide`]
//! capability plus constraint enforcement.

pub mod agent;
pub mod config;
pub mod ml;
pub mod rl;
pub mod rule_based;

pub use agent::{CompetitorAgent, Decide};
pub use config::{AiConfig, MlConfig, RlConfig, RuleBasedConfig};
pub use ml::MlCompetitor;
pub use rl::{MacroAction, QTable, RlCompetitor, MACRO_ACTIONS};
pub use rule_based::RuleBasedCompetitor;

pub use sim_core::apply_constraints;
