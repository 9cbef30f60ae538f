//! Independent two-sample t-test and Cohen's d.
//!
//! The p-value uses the normal approximation to the t distribution. This is
//! accurate for moderate to large groups and is kept as-is so results stay
//! comparable across versions.

use serde::{Deserialize, Serialize};

use super::two_group_means;
use crate::config::EvalConfig;
use crate::error::{EvalError, Result, StatsError};
use crate::model::Dataset;
use crate::stats::{mean, two_tailed_normal_p, variance};

/// Outcome of [`independent_t_test`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    pub group_a: String,
    pub group_b: String,
    pub t_statistic: f64,
    pub p_value: f64,
    pub effect_size_cohen_d: f64,
    pub significant: bool,
}

/// Compare per-entry mean scores of the two groups in `dataset`.
///
/// Fails when the dataset does not contain exactly two groups, when a group
/// has fewer than two entries, or when both groups have zero variance.
pub fn independent_t_test(dataset: &Dataset, config: &EvalConfig) -> Result<TTestResult> {
    run(dataset, config).map_err(|e| EvalError::statistics("T-test computation failed", e))
}

fn run(dataset: &Dataset, config: &EvalConfig) -> std::result::Result<TTestResult, StatsError> {
    let groups = two_group_means(dataset, config, "T-test")?;

    let t_statistic = t_statistic(&groups.a, &groups.b)?;
    let p_value = two_tailed_normal_p(t_statistic);
    let effect_size_cohen_d = cohens_d(&groups.a, &groups.b)?;

    Ok(TTestResult {
        group_a: groups.label_a.to_string(),
        group_b: groups.label_b.to_string(),
        t_statistic,
        p_value,
        effect_size_cohen_d,
        significant: p_value < config.significance_alpha,
    })
}

/// Pooled variance, weighting each group's sample variance by `n - 1`.
fn pooled_variance(a: &[f64], b: &[f64]) -> std::result::Result<f64, StatsError> {
    let (n_a, n_b) = (a.len() as f64, b.len() as f64);
    let var_a = variance(a)?;
    let var_b = variance(b)?;
    Ok(((n_a - 1.0) * var_a + (n_b - 1.0) * var_b) / (n_a + n_b - 2.0))
}

fn t_statistic(a: &[f64], b: &[f64]) -> std::result::Result<f64, StatsError> {
    let pooled = pooled_variance(a, b)?;
    let standard_error = (pooled * (1.0 / a.len() as f64 + 1.0 / b.len() as f64)).sqrt();
    if standard_error == 0.0 {
        return Err(StatsError::ZeroStandardError);
    }
    Ok((mean(a)? - mean(b)?) / standard_error)
}

/// Standardized mean difference; 0.0 when the pooled standard deviation is zero.
pub fn cohens_d(a: &[f64], b: &[f64]) -> std::result::Result<f64, StatsError> {
    let pooled_sd = pooled_variance(a, b)?.sqrt();
    if pooled_sd == 0.0 {
        return Ok(0.0);
    }
    Ok((mean(a)? - mean(b)?) / pooled_sd)
}

/// Interprets Cohen's d value.
pub fn interpret_cohens_d(d: f64) -> &'static str {
    let d_abs = d.abs();
    if d_abs < 0.2 {
        "negligible"
    } else if d_abs < 0.5 {
        "small"
    } else if d_abs < 0.8 {
        "medium"
    } else {
        "large"
    }
}
