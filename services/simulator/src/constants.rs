/// Shared constants for the coin-flip simulator
///
/// This module centralizes parameter defaults and numeric tolerances so the
/// core and the session service agree on them.

/// Default probability of heads for a new run
pub const DEFAULT_HEAD_PROBABILITY: f64 = 0.5;

/// Default number of trials per run
pub const DEFAULT_TRIAL_COUNT: u64 = 1_000;

/// Default number of flips per trial
pub const DEFAULT_FLIP_COUNT: u64 = 1_000;

/// Default significance level
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Success probability of the null hypothesis (a fair coin)
pub const FAIR_COIN_PROBABILITY: f64 = 0.5;

/// Relative tolerance used when comparing PMF values in the two-sided test
///
/// Outcomes whose probability is within this factor of the observed one
/// count as "at least as extreme". Without it, mirrored outcomes of a
/// symmetric null can drop out of the tail through rounding.
pub const P_VALUE_RELATIVE_TOLERANCE: f64 = 1e-7;

/// Tail summation stops once a term is this small relative to the running sum
pub const TAIL_SUM_EPSILON: f64 = 1e-17;

/// Upper bound on the number of histogram bins a caller may request
pub const MAX_HISTOGRAM_BINS: usize = 1_000;

/// Number of points the kernel density curve is evaluated at
pub const KDE_GRID_SIZE: usize = 200;
