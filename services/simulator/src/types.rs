/// Type-safe wrappers for simulation inputs and outputs
///
/// Parameters are validated at construction time so a run can never start
/// with an out-of-range value; results and reports are plain data.
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SimulationError};

pub(crate) fn validate_flip_count(flip_count: u64) -> Result<()> {
    if flip_count == 0 {
        return Err(SimulationError::invalid("flip_count", "must be at least 1"));
    }
    Ok(())
}

pub(crate) fn validate_trial_count(trial_count: u64) -> Result<()> {
    if trial_count == 0 {
        return Err(SimulationError::invalid("trial_count", "must be at least 1"));
    }
    Ok(())
}

pub(crate) fn validate_head_probability(head_probability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&head_probability) {
        return Err(SimulationError::invalid(
            "head_probability",
            format!("{} is outside [0, 1]", head_probability),
        ));
    }
    Ok(())
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(SimulationError::invalid(
            "alpha",
            format!("{} is outside (0, 1)", alpha),
        ));
    }
    Ok(())
}

/// Parameters of one simulation run
///
/// Immutable once constructed. Together with a random source they fully
/// determine the distribution of the generated `TrialResult`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameters")]
pub struct SimulationParameters {
    flip_count: u64,
    trial_count: u64,
    head_probability: f64,
    alpha: f64,
}

impl SimulationParameters {
    /// Create validated parameters
    ///
    /// # Errors
    /// `InvalidParameter` if a count is zero, `head_probability` is outside
    /// `[0, 1]` or `alpha` is outside `(0, 1)`. NaN fails both range checks.
    pub fn new(flip_count: u64, trial_count: u64, head_probability: f64, alpha: f64) -> Result<Self> {
        validate_flip_count(flip_count)?;
        validate_trial_count(trial_count)?;
        validate_head_probability(head_probability)?;
        validate_alpha(alpha)?;

        Ok(Self {
            flip_count,
            trial_count,
            head_probability,
            alpha,
        })
    }

    pub fn flip_count(&self) -> u64 {
        self.flip_count
    }

    pub fn trial_count(&self) -> u64 {
        self.trial_count
    }

    pub fn head_probability(&self) -> f64 {
        self.head_probability
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Total number of simulated flips across all trials
    pub fn total_flips(&self) -> u64 {
        self.flip_count.saturating_mul(self.trial_count)
    }
}

#[derive(Deserialize)]
struct RawParameters {
    flip_count: u64,
    trial_count: u64,
    head_probability: f64,
    alpha: f64,
}

impl TryFrom<RawParameters> for SimulationParameters {
    type Error = SimulationError;

    fn try_from(raw: RawParameters) -> Result<Self> {
        Self::new(raw.flip_count, raw.trial_count, raw.head_probability, raw.alpha)
    }
}

/// Observed head proportions, one per trial, in generation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrialResult(Vec<f64>);

impl TrialResult {
    pub fn from_proportions(proportions: Vec<f64>) -> Self {
        Self(proportions)
    }

    pub fn proportions(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Arithmetic mean, `None` when there are no trials
    pub fn mean(&self) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.iter().sum::<f64>() / self.0.len() as f64)
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for TrialResult {
    fn from(proportions: Vec<f64>) -> Self {
        Self(proportions)
    }
}

/// Fair/unfair classification of the simulated coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Fair,
    Unfair,
}

impl Verdict {
    /// Unfair when the average p-value is strictly below alpha
    pub fn from_p_value(average_p_value: f64, alpha: f64) -> Self {
        if average_p_value < alpha {
            Verdict::Unfair
        } else {
            Verdict::Fair
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Fair => "fair",
            Verdict::Unfair => "unfair",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Statistics derived from one `TrialResult` and the alpha of its run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignificanceReport {
    pub mean_proportion: f64,
    pub average_p_value: f64,
    pub alpha: f64,
    pub verdict: Verdict,
}
