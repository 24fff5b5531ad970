//! Exact two-sided binomial test
//!
//! The p-value of `k` successes is the total probability of every outcome
//! no more likely than `k` under `Binomial(n, p)` (the minimum-likelihood
//! convention). Probabilities come from `statrs` in log space so large `n`
//! neither overflows nor underflows the binomial coefficient.

use statrs::distribution::{Binomial, Discrete};

use crate::constants::{P_VALUE_RELATIVE_TOLERANCE, TAIL_SUM_EPSILON};
use crate::errors::{Result, SimulationError};

/// Exact binomial test against a fixed number of trials and null probability
///
/// Cheap to build; reuse one instance when testing many observed counts
/// against the same `(n, p)`.
#[derive(Debug, Clone)]
pub struct BinomialTest {
    trials: u64,
    distribution: Binomial,
    mode: u64,
}

impl BinomialTest {
    /// # Errors
    /// `InvalidParameter` if `trials == 0` or `probability` is not strictly
    /// inside `(0, 1)`.
    pub fn new(trials: u64, probability: f64) -> Result<Self> {
        if trials == 0 {
            return Err(SimulationError::invalid("flip_count", "must be at least 1"));
        }
        if !(probability > 0.0 && probability < 1.0) {
            return Err(SimulationError::invalid(
                "probability",
                format!("{} is outside (0, 1)", probability),
            ));
        }

        let distribution = Binomial::new(probability, trials)
            .map_err(|e| SimulationError::invalid("probability", e.to_string()))?;
        let mode = (((trials + 1) as f64) * probability).floor() as u64;

        Ok(Self {
            trials,
            distribution,
            mode: mode.min(trials),
        })
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// `ln P(X = k)`
    pub fn ln_pmf(&self, k: u64) -> f64 {
        self.distribution.ln_pmf(k)
    }

    /// Two-sided p-value for `successes` observed successes
    ///
    /// # Errors
    /// `InvalidParameter` if `successes` exceeds the number of trials.
    pub fn p_value(&self, successes: u64) -> Result<f64> {
        let n = self.trials;
        if successes > n {
            return Err(SimulationError::invalid(
                "successes",
                format!("{} exceeds {} trials", successes, n),
            ));
        }

        let threshold = self.ln_pmf(successes) + P_VALUE_RELATIVE_TOLERANCE.ln_1p();
        let qualifies = |i: u64| self.ln_pmf(i) <= threshold;

        // The PMF rises up to the mode and falls after it, so the outcomes at
        // least as extreme as `successes` form a prefix and a suffix.
        let lower = last_matching(0, self.mode, &qualifies);
        let upper = first_matching(self.mode, n, &qualifies);

        if let (Some(a), Some(b)) = (lower, upper) {
            if b <= a + 1 {
                return Ok(1.0);
            }
        }

        let mut total = 0.0;
        if let Some(a) = lower {
            total += self.sum_terms((0..=a).rev());
        }
        if let Some(b) = upper {
            total += self.sum_terms(b..=n);
        }

        Ok(total.min(1.0))
    }

    /// Sum PMF terms ordered from largest to smallest, stopping once they
    /// no longer change the total
    fn sum_terms(&self, outcomes: impl Iterator<Item = u64>) -> f64 {
        let mut sum = 0.0;
        for i in outcomes {
            let term = self.ln_pmf(i).exp();
            sum += term;
            if term <= sum * TAIL_SUM_EPSILON {
                break;
            }
        }
        sum
    }
}

/// Largest `i` in `[lo, hi]` with `pred(i)`, for a predicate true on a prefix
fn last_matching(lo: u64, hi: u64, pred: &impl Fn(u64) -> bool) -> Option<u64> {
    if !pred(lo) {
        return None;
    }
    let (mut lo, mut hi) = (lo, hi);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if pred(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Some(lo)
}

/// Smallest `i` in `[lo, hi]` with `pred(i)`, for a predicate true on a suffix
fn first_matching(lo: u64, hi: u64, pred: &impl Fn(u64) -> bool) -> Option<u64> {
    if !pred(hi) {
        return None;
    }
    let (mut lo, mut hi) = (lo, hi);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Some(lo)
}

/// Two-sided exact binomial p-value of `successes` out of `trials`
pub fn two_sided_p_value(successes: u64, trials: u64, probability: f64) -> Result<f64> {
    BinomialTest::new(trials, probability)?.p_value(successes)
}
