//! Trial generation
//!
//! Draws independent coin-flip experiments and reduces each to its observed
//! proportion of heads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution};

use crate::errors::{Result, SimulationError};
use crate::types::{
    validate_flip_count, validate_head_probability, validate_trial_count, SimulationParameters,
    TrialResult,
};

/// Build the random source for one run
///
/// A seed makes the run reproducible; without one the generator is seeded
/// from OS entropy and every run differs.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Simulate `trial_count` experiments of `flip_count` biased flips each
///
/// The head count of a trial is drawn in one step from
/// `Binomial(flip_count, head_probability)`, which has the same distribution
/// as summing `flip_count` Bernoulli draws. Each proportion is therefore an
/// exact multiple of `1 / flip_count`.
///
/// # Errors
/// `InvalidParameter` for a zero count or a probability outside `[0, 1]`.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    flip_count: u64,
    trial_count: u64,
    head_probability: f64,
) -> Result<TrialResult> {
    validate_flip_count(flip_count)?;
    validate_trial_count(trial_count)?;
    validate_head_probability(head_probability)?;

    let capacity = usize::try_from(trial_count)
        .map_err(|_| SimulationError::invalid("trial_count", "exceeds addressable memory"))?;

    let binomial = Binomial::new(flip_count, head_probability).map_err(|e| {
        SimulationError::degenerate(format!("binomial sampler rejected parameters: {}", e))
    })?;

    let flips = flip_count as f64;
    let mut proportions = Vec::with_capacity(capacity);
    for _ in 0..trial_count {
        let heads = binomial.sample(rng);
        proportions.push(heads as f64 / flips);
    }

    tracing::debug!(
        flip_count,
        trial_count,
        head_probability,
        "Generated trial proportions"
    );

    Ok(TrialResult::from_proportions(proportions))
}

/// Generate trials for validated parameters
pub fn generate_for<R: Rng + ?Sized>(
    rng: &mut R,
    params: &SimulationParameters,
) -> Result<TrialResult> {
    generate(
        rng,
        params.flip_count(),
        params.trial_count(),
        params.head_probability(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape_and_grid() {
        let mut rng = rng_from_seed(Some(7));
        let result = generate(&mut rng, 37, 500, 0.3).unwrap();
        assert_eq!(result.len(), 500);

        for p in result.iter() {
            assert!((0.0..=1.0).contains(&p));
            let scaled = p * 37.0;
            assert!(
                (scaled - scaled.round()).abs() < 1e-9,
                "{} is not a multiple of 1/37",
                p
            );
        }
    }

    #[test]
    fn test_generate_degenerate_probabilities() {
        let mut rng = rng_from_seed(Some(1));
        let tails = generate(&mut rng, 20, 50, 0.0).unwrap();
        assert!(tails.iter().all(|p| p == 0.0));

        let heads = generate(&mut rng, 20, 50, 1.0).unwrap();
        assert!(heads.iter().all(|p| p == 1.0));
    }

    #[test]
    fn test_generate_rejects_invalid_parameters() {
        let mut rng = rng_from_seed(Some(1));
        assert!(matches!(
            generate(&mut rng, 0, 10, 0.5),
            Err(SimulationError::InvalidParameter { name: "flip_count", .. })
        ));
        assert!(matches!(
            generate(&mut rng, 10, 0, 0.5),
            Err(SimulationError::InvalidParameter { name: "trial_count", .. })
        ));
        assert!(generate(&mut rng, 10, 10, 1.01).is_err());
        assert!(generate(&mut rng, 10, 10, f64::NAN).is_err());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = generate(&mut rng_from_seed(Some(42)), 100, 200, 0.5).unwrap();
        let b = generate(&mut rng_from_seed(Some(42)), 100, 200, 0.5).unwrap();
        let c = generate(&mut rng_from_seed(Some(43)), 100, 200, 0.5).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generate_for_uses_parameters() {
        let params = SimulationParameters::new(10, 25, 0.5, 0.05).unwrap();
        let result = generate_for(&mut rng_from_seed(Some(3)), &params).unwrap();
        assert_eq!(result.len(), 25);
    }
}
