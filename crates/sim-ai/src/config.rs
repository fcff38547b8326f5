//! Tunable policy parameters, baked in from a YAML asset at compile time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleBasedConfig {
    pub reaction_delay: u32,
    pub undercut_threshold: f64,
    pub match_aggressiveness_lo: f64,
    pub match_aggressiveness_hi: f64,
    pub promo_discount_lo: f64,
    pub promo_discount_hi: f64,
    pub promo_duration_lo: u32,
    pub promo_duration_hi: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlConfig {
    pub starting_weights: [f64; 4],
    pub cut_score_threshold: f64,
    pub bundle_score_threshold: f64,
    pub raise_score_threshold: f64,
    pub max_price_cut: f64,
    pub raise_price_pct: f64,
    pub bundle_discount: f64,
    pub bundle_duration_weeks: u32,
    pub learning_rate: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RlConfig {
    pub epsilon: f64,
    pub gamma: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub rule_based: RuleBasedConfig,
    pub ml: MlConfig,
    pub rl: RlConfig,
}

/// YAML baked in from the workspace's `assets/data` directory.
pub const AI_DEFAULTS_YAML: &str = include_str!("../../../assets/data/ai_defaults.yaml");

impl AiConfig {
    pub fn from_default_yaml() -> Result<AiConfig, serde_yaml::Error> {
        serde_yaml::from_str(AI_DEFAULTS_YAML)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_default_yaml().expect("baked-in ai_defaults.yaml must parse")
    }
}
