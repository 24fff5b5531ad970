pub mod binomial;
pub mod constants;
pub mod errors;
pub mod generator;
pub mod histogram;
pub mod kde;
pub mod render;
pub mod summarizer;
pub mod types;

pub use constants::*;
pub use errors::{ErrorCategory, ErrorCode, Result, ServiceError, SimulationError};
pub use generator::{generate, generate_for, rng_from_seed};
pub use histogram::{Histogram, HistogramBin};
pub use kde::{DensityCurve, DensityPoint};
pub use summarizer::{summarize, trial_p_values};
pub use types::*;
