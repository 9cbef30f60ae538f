//! Benchmark comparison against a reference dataset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::dimension_means;
use crate::config::EvalConfig;
use crate::error::{EvalError, Result, StatsError};
use crate::model::Dataset;
use crate::stats::mean;

/// Result of comparing a dataset with a reference run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Current mean minus reference mean, per dimension.
    pub dimension_deltas: BTreeMap<String, f64>,
    pub overall_delta: f64,
    /// Dimensions with a positive delta, in configured order.
    pub improved_dimensions: Vec<String>,
    /// Dimensions with a negative delta, in configured order.
    pub declined_dimensions: Vec<String>,
}

/// Compare per-dimension means of `dataset` with `reference`.
///
/// Dimensions whose delta is exactly zero are in neither list.
pub fn benchmark_against_reference(
    dataset: &Dataset,
    reference: &Dataset,
    config: &EvalConfig,
) -> Result<BenchmarkResult> {
    run(dataset, reference, config)
        .map_err(|e| EvalError::statistics("Benchmark computation failed", e))
}

fn run(
    dataset: &Dataset,
    reference: &Dataset,
    config: &EvalConfig,
) -> std::result::Result<BenchmarkResult, StatsError> {
    let current_means = dimension_means(dataset, config)?;
    let reference_means = dimension_means(reference, config)?;

    let mut dimension_deltas = BTreeMap::new();
    let mut improved_dimensions = Vec::new();
    let mut declined_dimensions = Vec::new();

    for dim in &config.required_dimensions {
        let delta = current_means[dim] - reference_means[dim];
        if delta > 0.0 {
            improved_dimensions.push(dim.clone());
        } else if delta < 0.0 {
            declined_dimensions.push(dim.clone());
        }
        dimension_deltas.insert(dim.clone(), delta);
    }

    let current: Vec<f64> = current_means.values().copied().collect();
    let reference: Vec<f64> = reference_means.values().copied().collect();
    let overall_delta = mean(&current)? - mean(&reference)?;

    Ok(BenchmarkResult {
        dimension_deltas,
        overall_delta,
        improved_dimensions,
        declined_dimensions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::entry_with_scores;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_benchmark_partitions_dimensions() {
        let current = Dataset::new(vec![
            entry_with_scores(1, "A", &[2, 1, 1, 0, 2]),
            entry_with_scores(2, "B", &[2, 1, 1, 0, 2]),
        ]);
        let reference = Dataset::new(vec![
            entry_with_scores(1, "A", &[1, 2, 1, 0, 2]),
            entry_with_scores(2, "B", &[1, 2, 1, 1, 2]),
        ]);
        let result =
            benchmark_against_reference(&current, &reference, &EvalConfig::default()).unwrap();

        assert_eq!(result.improved_dimensions, vec!["instruction_adherence"]);
        assert_eq!(result.declined_dimensions, vec!["factual_accuracy", "safety"]);
        assert_eq!(result.dimension_deltas["instruction_adherence"], 1.0);
        assert_eq!(result.dimension_deltas["safety"], -0.5);
        assert_eq!(result.dimension_deltas["logical_coherence"], 0.0);
        // Current means sum 6.0, reference 6.5 over 5 dimensions.
        assert!((result.overall_delta - (-0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_benchmark_empty_reference_fails() {
        let current = Dataset::new(vec![entry_with_scores(1, "A", &[2, 1, 1, 0, 2])]);
        let err = benchmark_against_reference(&current, &Dataset::default(), &EvalConfig::default())
            .unwrap_err();
        assert!(matches!(err, EvalError::Statistics(_)));
        assert!(err.to_string().contains("Benchmark computation failed"));
    }
}
