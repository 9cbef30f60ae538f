//! Per-dimension summary statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::EvalConfig;
use crate::error::{EvalError, Result, StatsError};
use crate::model::Dataset;
use crate::stats::{as_f64, confidence_interval_margin, mean, standard_deviation};

/// Summary of one dimension's scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSummary {
    pub mean: f64,
    /// Sample standard deviation; 0.0 with fewer than two scores.
    pub std_dev: f64,
    /// 95% normal-approximation margin; 0.0 with fewer than two scores.
    pub ci_margin: f64,
    /// Share of entries scored `score_min`.
    pub failure_rate: f64,
    /// Share of entries scored `score_max`.
    pub perfect_rate: f64,
    /// Count per score value, every value in range present.
    pub distribution: BTreeMap<i64, usize>,
}

/// Summary of a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub entry_count: usize,
    pub groups: Vec<String>,
    pub dimensions: BTreeMap<String, DimensionSummary>,
    /// Mean of the dimension means.
    pub overall_score: f64,
}

/// Compute descriptive statistics for every configured dimension.
pub fn compute_statistics(dataset: &Dataset, config: &EvalConfig) -> Result<DatasetSummary> {
    run(dataset, config).map_err(|e| EvalError::statistics("Summary statistics failed", e))
}

fn run(dataset: &Dataset, config: &EvalConfig) -> std::result::Result<DatasetSummary, StatsError> {
    let mut dimensions = BTreeMap::new();
    let mut dimension_means = Vec::with_capacity(config.required_dimensions.len());

    for dim in &config.required_dimensions {
        let scores = dataset.dimension_scores(dim)?;
        let summary = summarize(&scores, config)?;
        dimension_means.push(summary.mean);
        dimensions.insert(dim.clone(), summary);
    }

    Ok(DatasetSummary {
        entry_count: dataset.len(),
        groups: dataset
            .partition_by_group()
            .iter()
            .map(|g| g.label.to_string())
            .collect(),
        dimensions,
        overall_score: mean(&dimension_means)?,
    })
}

fn summarize(
    scores: &[i64],
    config: &EvalConfig,
) -> std::result::Result<DimensionSummary, StatsError> {
    let values = as_f64(scores);
    let n = scores.len() as f64;
    let m = mean(&values)?;
    let (std_dev, ci_margin) = if values.len() > 1 {
        (
            standard_deviation(&values)?,
            confidence_interval_margin(&values, config.confidence_level)?,
        )
    } else {
        (0.0, 0.0)
    };

    let mut distribution: BTreeMap<i64, usize> =
        (config.score_min..=config.score_max).map(|s| (s, 0)).collect();
    for &s in scores {
        *distribution.entry(s).or_insert(0) += 1;
    }

    let count_of = |target: i64| scores.iter().filter(|&&s| s == target).count() as f64;

    Ok(DimensionSummary {
        mean: m,
        std_dev,
        ci_margin,
        failure_rate: count_of(config.score_min) / n,
        perfect_rate: count_of(config.score_max) / n,
        distribution,
    })
}
