//! Significance summary of a set of trials
//!
//! Every trial is tested on its own against a fair coin and the resulting
//! p-values are averaged. The average is a summary statistic, not a
//! combined test such as Fisher's method.

use std::collections::HashMap;

use crate::binomial::BinomialTest;
use crate::constants::FAIR_COIN_PROBABILITY;
use crate::errors::{Result, SimulationError};
use crate::types::{validate_alpha, validate_flip_count, SignificanceReport, TrialResult, Verdict};

/// Recover the head count behind an observed proportion
///
/// Proportions are multiples of `1 / flip_count`, so rounding only removes
/// floating-point drift from the multiplication.
fn head_count(proportion: f64, flip_count: u64) -> Result<u64> {
    if !proportion.is_finite() {
        return Err(SimulationError::degenerate(format!(
            "trial proportion {} is not a finite number",
            proportion
        )));
    }
    if !(0.0..=1.0).contains(&proportion) {
        return Err(SimulationError::invalid(
            "results",
            format!("proportion {} is outside [0, 1]", proportion),
        ));
    }
    Ok((proportion * flip_count as f64).round() as u64)
}

/// Per-trial two-sided p-values against a fair coin, in trial order
///
/// P-values are computed once per distinct head count.
///
/// # Errors
/// `InvalidParameter` for `flip_count == 0` or a proportion outside `[0, 1]`,
/// `NumericalDegeneracy` for a non-finite proportion.
pub fn trial_p_values(results: &TrialResult, flip_count: u64) -> Result<Vec<f64>> {
    validate_flip_count(flip_count)?;
    let test = BinomialTest::new(flip_count, FAIR_COIN_PROBABILITY)?;

    let mut cache: HashMap<u64, f64> = HashMap::new();
    let mut p_values = Vec::with_capacity(results.len());

    for proportion in results.iter() {
        let heads = head_count(proportion, flip_count)?;
        let p_value = match cache.get(&heads) {
            Some(p_value) => *p_value,
            None => {
                let p_value = test.p_value(heads)?;
                cache.insert(heads, p_value);
                p_value
            }
        };
        p_values.push(p_value);
    }

    tracing::trace!(
        trial_count = results.len(),
        distinct_counts = cache.len(),
        "Computed per-trial p-values"
    );

    Ok(p_values)
}

/// Derive the significance report for one run
///
/// # Errors
/// `InvalidParameter` if `results` is empty, `flip_count` is zero, `alpha`
/// is outside `(0, 1)`, or a proportion is outside `[0, 1]`.
/// `NumericalDegeneracy` if a proportion is NaN or infinite.
pub fn summarize(results: &TrialResult, flip_count: u64, alpha: f64) -> Result<SignificanceReport> {
    if results.is_empty() {
        return Err(SimulationError::invalid("results", "at least one trial is required"));
    }
    validate_flip_count(flip_count)?;
    validate_alpha(alpha)?;

    let p_values = trial_p_values(results, flip_count)?;

    let mean_proportion = results
        .mean()
        .ok_or_else(|| SimulationError::invalid("results", "at least one trial is required"))?;
    let average_p_value = p_values.iter().sum::<f64>() / p_values.len() as f64;

    if !average_p_value.is_finite() {
        return Err(SimulationError::degenerate(format!(
            "average p-value {} is not finite",
            average_p_value
        )));
    }

    let verdict = Verdict::from_p_value(average_p_value, alpha);

    tracing::debug!(
        trial_count = results.len(),
        flip_count,
        mean_proportion,
        average_p_value,
        alpha,
        verdict = %verdict,
        "Summarized trials"
    );

    Ok(SignificanceReport {
        mean_proportion,
        average_p_value,
        alpha,
        verdict,
    })
}
