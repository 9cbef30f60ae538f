//! Bootstrap resampling test for a difference in group means.
//!
//! Resamples are drawn with replacement from the pooled per-entry means, so
//! the test estimates how often a difference at least as large as the
//! observed one arises when group labels carry no information.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::two_group_means;
use crate::config::EvalConfig;
use crate::error::{EvalError, Result, StatsError};
use crate::model::Dataset;
use crate::stats::mean;

/// Outcome of [`bootstrap_significance_test`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapResult {
    pub observed_mean_difference: f64,
    pub empirical_p_value: f64,
    pub iterations: usize,
    pub significant: bool,
}

/// Run the bootstrap test with a generator seeded from `config.random_seed`.
///
/// The generator is created per call, so results do not depend on call order
/// or on other random number use in the process.
pub fn bootstrap_significance_test(
    dataset: &Dataset,
    config: &EvalConfig,
) -> Result<BootstrapResult> {
    let mut rng = StdRng::seed_from_u64(config.random_seed);
    bootstrap_with_rng(dataset, config, &mut rng)
}

/// Run the bootstrap test drawing from a caller-owned generator.
pub fn bootstrap_with_rng<R: Rng>(
    dataset: &Dataset,
    config: &EvalConfig,
    rng: &mut R,
) -> Result<BootstrapResult> {
    run(dataset, config, rng)
        .map_err(|e| EvalError::statistics("Bootstrap significance failed", e))
}

fn run<R: Rng>(
    dataset: &Dataset,
    config: &EvalConfig,
    rng: &mut R,
) -> std::result::Result<BootstrapResult, StatsError> {
    let groups = two_group_means(dataset, config, "Bootstrap")?;
    let iterations = config.bootstrap_iterations;
    if iterations == 0 {
        return Err(StatsError::InsufficientData {
            what: "Bootstrap",
            required: 1,
            actual: 0,
        });
    }

    let observed = mean(&groups.a)? - mean(&groups.b)?;

    let n_a = groups.a.len();
    let pooled: Vec<f64> = groups.a.iter().chain(groups.b.iter()).copied().collect();
    let mut resample = vec![0.0; pooled.len()];

    let mut extreme = 0usize;
    for _ in 0..iterations {
        for slot in resample.iter_mut() {
            *slot = pooled[rng.gen_range(0..pooled.len())];
        }
        let (head, tail) = resample.split_at(n_a);
        let diff = mean(head)? - mean(tail)?;
        if diff.abs() >= observed.abs() {
            extreme += 1;
        }
    }

    let empirical_p_value = extreme as f64 / iterations as f64;

    Ok(BootstrapResult {
        observed_mean_difference: observed,
        empirical_p_value,
        iterations,
        significant: empirical_p_value < config.significance_alpha,
    })
}
