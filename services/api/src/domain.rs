use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use simulator::{
    render, summarize, Histogram, SignificanceReport, SimulationError, SimulationParameters,
    TrialResult,
};
use uuid::Uuid;

use crate::config::SimulationConfig;
use crate::session::RunMetadata;

/// Body of a run request; missing fields fall back to configured defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSimulationRequest {
    pub head_probability: Option<f64>,
    pub trial_count: Option<u64>,
    pub flip_count: Option<u64>,
    pub alpha: Option<f64>,
    pub seed: Option<u64>,
    pub bins: Option<usize>,
}

impl RunSimulationRequest {
    /// Fill defaults, apply service limits and validate
    pub fn resolve(
        &self,
        config: &SimulationConfig,
    ) -> Result<SimulationParameters, SimulationError> {
        let trial_count = self.trial_count.unwrap_or(config.default_trial_count);
        let flip_count = self.flip_count.unwrap_or(config.default_flip_count);

        if trial_count > config.max_trial_count {
            return Err(SimulationError::invalid(
                "trial_count",
                format!(
                    "{} exceeds the limit of {}",
                    trial_count, config.max_trial_count
                ),
            ));
        }
        if flip_count > config.max_flip_count {
            return Err(SimulationError::invalid(
                "flip_count",
                format!("{} exceeds the limit of {}", flip_count, config.max_flip_count),
            ));
        }

        SimulationParameters::new(
            flip_count,
            trial_count,
            self.head_probability
                .unwrap_or(config.default_head_probability),
            self.alpha.unwrap_or(config.default_alpha),
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestQuery {
    pub bins: Option<usize>,
}

/// Everything needed to display one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationView {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub parameters: SimulationParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub report: SignificanceReport,
    pub histogram: Histogram,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub mean_label: String,
    pub summary: Vec<String>,
    pub proportions: TrialResult,
}

impl SimulationView {
    /// Derive the report, histogram and text from a stored run
    ///
    /// The report always uses the alpha and flip count of `params`, the
    /// parameters that produced `result`.
    pub fn build(
        metadata: &RunMetadata,
        params: &SimulationParameters,
        result: &TrialResult,
        bins: Option<usize>,
    ) -> Result<Self, SimulationError> {
        let report = summarize(result, params.flip_count(), params.alpha())?;
        let histogram = Histogram::density(result, bins.or(metadata.bins))?;

        Ok(Self {
            run_id: metadata.run_id,
            created_at: metadata.created_at,
            parameters: *params,
            seed: metadata.seed,
            title: render::plot_title(params.flip_count(), params.trial_count()),
            x_label: render::x_label().to_string(),
            y_label: render::y_label().to_string(),
            mean_label: render::mean_label(report.mean_proportion),
            summary: report.summary_lines(),
            report,
            histogram,
            proportions: result.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsResponse {
    pub head_probability: f64,
    pub trial_count: u64,
    pub flip_count: u64,
    pub alpha: f64,
    pub max_trial_count: u64,
    pub max_flip_count: u64,
}

impl From<&SimulationConfig> for DefaultsResponse {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            head_probability: config.default_head_probability,
            trial_count: config.default_trial_count,
            flip_count: config.default_flip_count,
            alpha: config.default_alpha,
            max_trial_count: config.max_trial_count,
            max_flip_count: config.max_flip_count,
        }
    }
}
