use serde::Deserialize;
use simulator::{
    DEFAULT_ALPHA, DEFAULT_FLIP_COUNT, DEFAULT_HEAD_PROBABILITY, DEFAULT_TRIAL_COUNT,
};
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_port: u16,
    pub metrics_port: u16,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    pub default_head_probability: f64,
    pub default_trial_count: u64,
    pub default_flip_count: u64,
    pub default_alpha: f64,
    pub max_trial_count: u64,
    pub max_flip_count: u64,
    /// Histogram bin count; `None` picks one from the number of trials
    pub histogram_bins: Option<usize>,
    /// Seed applied to runs that do not carry their own; `None` uses entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_head_probability: DEFAULT_HEAD_PROBABILITY,
            default_trial_count: DEFAULT_TRIAL_COUNT,
            default_flip_count: DEFAULT_FLIP_COUNT,
            default_alpha: DEFAULT_ALPHA,
            max_trial_count: 1_000_000,
            max_flip_count: 1_000_000,
            histogram_bins: None,
            seed: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_port: 3001,
            metrics_port: 9090,
            simulation: SimulationConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = SimulationConfig::default();

        Ok(Config {
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()?,
            metrics_port: env::var("METRICS_PORT")
                .unwrap_or_else(|_| "9090".to_string())
                .parse()?,
            simulation: SimulationConfig {
                default_head_probability: env::var("SIM_DEFAULT_HEAD_PROBABILITY")
                    .unwrap_or_else(|_| defaults.default_head_probability.to_string())
                    .parse()?,
                default_trial_count: env::var("SIM_DEFAULT_TRIAL_COUNT")
                    .unwrap_or_else(|_| defaults.default_trial_count.to_string())
                    .parse()?,
                default_flip_count: env::var("SIM_DEFAULT_FLIP_COUNT")
                    .unwrap_or_else(|_| defaults.default_flip_count.to_string())
                    .parse()?,
                default_alpha: env::var("SIM_DEFAULT_ALPHA")
                    .unwrap_or_else(|_| defaults.default_alpha.to_string())
                    .parse()?,
                max_trial_count: env::var("SIM_MAX_TRIAL_COUNT")
                    .unwrap_or_else(|_| defaults.max_trial_count.to_string())
                    .parse()?,
                max_flip_count: env::var("SIM_MAX_FLIP_COUNT")
                    .unwrap_or_else(|_| defaults.max_flip_count.to_string())
                    .parse()?,
                histogram_bins: env::var("SIM_HISTOGRAM_BINS")
                    .ok()
                    .map(|v| v.parse())
                    .transpose()?,
                seed: env::var("SIM_SEED").ok().map(|v| v.parse()).transpose()?,
            },
        })
    }
}
