//! In-memory session state
//!
//! Holds the most recent run so it can be shown again without re-running.
//! Only an explicit run replaces it, and the parameters and result are
//! always replaced together.

use chrono::{DateTime, Utc};
use simulator::{SimulationParameters, TrialResult};
use uuid::Uuid;

/// Identity and presentation settings of a stored run
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetadata {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub seed: Option<u64>,
    pub bins: Option<usize>,
}

impl RunMetadata {
    pub fn new(seed: Option<u64>, bins: Option<usize>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            seed,
            bins,
        }
    }
}

/// Borrowed view of the stored run
#[derive(Debug, Clone, Copy)]
pub struct LatestRun<'a> {
    pub params: &'a SimulationParameters,
    pub result: &'a TrialResult,
    pub metadata: &'a RunMetadata,
}

#[derive(Debug, Default)]
pub struct SessionState {
    last_result: Option<TrialResult>,
    last_params: Option<SimulationParameters>,
    last_run: Option<RunMetadata>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored run
    pub fn record(
        &mut self,
        params: SimulationParameters,
        result: TrialResult,
        metadata: RunMetadata,
    ) {
        self.last_params = Some(params);
        self.last_result = Some(result);
        self.last_run = Some(metadata);
    }

    pub fn latest(&self) -> Option<LatestRun<'_>> {
        match (&self.last_params, &self.last_result, &self.last_run) {
            (Some(params), Some(result), Some(metadata)) => Some(LatestRun {
                params,
                result,
                metadata,
            }),
            _ => None,
        }
    }

    pub fn has_run(&self) -> bool {
        self.latest().is_some()
    }
}
