//! KL-divergence drift detection against a baseline dataset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::EvalConfig;
use crate::error::{EvalError, Result, StatsError};
use crate::model::Dataset;

/// Outcome of [`detect_kl_drift`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftResult {
    /// D(current || baseline) per dimension.
    pub dimension_kl: BTreeMap<String, f64>,
    /// Mean of the per-dimension divergences.
    pub overall_kl: f64,
    pub drift_detected: bool,
}

/// Compare each dimension's score distribution with the baseline's.
pub fn detect_kl_drift(
    dataset: &Dataset,
    baseline: &Dataset,
    config: &EvalConfig,
) -> Result<DriftResult> {
    run(dataset, baseline, config).map_err(|e| EvalError::drift("KL drift detection failed", e))
}

fn run(
    dataset: &Dataset,
    baseline: &Dataset,
    config: &EvalConfig,
) -> std::result::Result<DriftResult, StatsError> {
    if config.required_dimensions.is_empty() {
        return Err(StatsError::NoDimensions);
    }

    let mut dimension_kl = BTreeMap::new();
    for dim in &config.required_dimensions {
        let current = score_distribution(dataset, dim, config)?;
        let reference = score_distribution(baseline, dim, config)?;
        dimension_kl.insert(dim.clone(), kl_divergence(&current, &reference));
    }

    let overall_kl = dimension_kl.values().sum::<f64>() / dimension_kl.len() as f64;

    Ok(DriftResult {
        dimension_kl,
        overall_kl,
        drift_detected: overall_kl > config.drift_threshold,
    })
}

/// Laplace-smoothed probability of each score in `[score_min, score_max]`.
///
/// Index `i` holds the probability of score `score_min + i`; every entry is
/// strictly positive.
pub fn score_distribution(
    dataset: &Dataset,
    dimension: &str,
    config: &EvalConfig,
) -> std::result::Result<Vec<f64>, StatsError> {
    let mut counts = vec![1u64; config.score_levels()];
    for entry in dataset {
        let score = entry.score(dimension)?;
        if score < config.score_min || score > config.score_max {
            return Err(StatsError::ScoreOutOfRange {
                dimension: dimension.to_string(),
                score,
                min: config.score_min,
                max: config.score_max,
            });
        }
        counts[(score - config.score_min) as usize] += 1;
    }
    let total: u64 = counts.iter().sum();
    Ok(counts.iter().map(|&c| c as f64 / total as f64).collect())
}

/// D(p || q) over a shared, strictly positive support.
pub fn kl_divergence(p: &[f64], q: &[f64]) -> f64 {
    p.iter().zip(q).map(|(&pi, &qi)| pi * (pi / qi).ln()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{entry_with_scores, uniform_entry};

    fn sample() -> Dataset {
        Dataset::new(vec![
            entry_with_scores(1, "A", &[2, 2, 1, 0, 2]),
            entry_with_scores(2, "A", &[1, 2, 2, 1, 2]),
            entry_with_scores(3, "B", &[0, 1, 2, 2, 1]),
            entry_with_scores(4, "B", &[2, 2, 2, 2, 2]),
        ])
    }

    #[test]
    fn test_identical_datasets_have_no_drift() {
        let ds = sample();
        let result = detect_kl_drift(&ds, &ds.clone(), &EvalConfig::default()).unwrap();
        assert!(result.overall_kl.abs() < 1e-12);
        assert!(!result.drift_detected);
        assert_eq!(result.dimension_kl.len(), 5);
    }

    #[test]
    fn test_shifted_distribution_drifts() {
        let current = Dataset::new((0..20).map(|i| uniform_entry(i, "A", 2)).collect());
        let baseline = Dataset::new((0..20).map(|i| uniform_entry(i, "A", 0)).collect());
        let result = detect_kl_drift(&current, &baseline, &EvalConfig::default()).unwrap();
        assert!(result.overall_kl > 1.0);
        assert!(result.drift_detected);
        for kl in result.dimension_kl.values() {
            assert!(kl.is_finite());
        }
    }

    #[test]
    fn test_score_distribution_is_smoothed() {
        let ds = Dataset::new(vec![uniform_entry(1, "A", 2), uniform_entry(2, "A", 2)]);
        let dist = score_distribution(&ds, "safety", &EvalConfig::default()).unwrap();
        // counts [1, 1, 3] / 5
        assert_eq!(dist, vec![0.2, 0.2, 0.6]);
    }

    #[test]
    fn test_out_of_range_score_fails() {
        let ds = Dataset::new(vec![uniform_entry(1, "A", 5)]);
        let err = detect_kl_drift(&ds, &ds.clone(), &EvalConfig::default()).unwrap_err();
        assert!(matches!(err, EvalError::Drift(_)));
        assert!(err.to_string().contains("outside [0, 2]"));
    }

    #[test]
    fn test_kl_divergence_zero_for_same_distribution() {
        let p = [0.2, 0.3, 0.5];
        assert_eq!(kl_divergence(&p, &p), 0.0);
    }
}
