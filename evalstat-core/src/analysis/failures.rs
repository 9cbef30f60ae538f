//! Failure analysis and failure-pattern taxonomy.
//!
//! A score of `score_min` counts as a failure. Besides per-dimension failure
//! rates, every entry's set of failed dimensions is recorded as a pattern so
//! that recurring combinations ("safety + tone_alignment") stand out.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::dimension_means;
use crate::config::EvalConfig;
use crate::error::{EvalError, Result, StatsError};
use crate::model::Dataset;

/// A combination of dimensions that failed together on one or more entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailurePattern {
    /// Failed dimensions, in configured order.
    pub dimensions: Vec<String>,
    pub count: usize,
    /// IDs of the entries showing this pattern, in dataset order.
    pub entry_ids: Vec<u64>,
}

impl FailurePattern {
    pub fn label(&self) -> String {
        self.dimensions.join(" + ")
    }
}

/// Outcome of [`analyze_failures`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureAnalysis {
    pub dimension_means: BTreeMap<String, f64>,
    /// Dimensions from weakest to strongest mean.
    pub ranked_dimensions: Vec<(String, f64)>,
    pub failure_rates: BTreeMap<String, f64>,
    /// Dimensions whose failure rate exceeds `failure_rate_flag`.
    pub flagged_dimensions: Vec<String>,
    /// Failure patterns, most frequent first.
    pub patterns: Vec<FailurePattern>,
    /// Entries with no failed dimension.
    pub clean_entries: usize,
}

impl FailureAnalysis {
    pub fn top_patterns(&self, n: usize) -> &[FailurePattern] {
        &self.patterns[..n.min(self.patterns.len())]
    }
}

/// Analyze dimension-level failure characteristics.
pub fn analyze_failures(dataset: &Dataset, config: &EvalConfig) -> Result<FailureAnalysis> {
    run(dataset, config).map_err(|e| EvalError::statistics("Failure analysis failed", e))
}

fn run(dataset: &Dataset, config: &EvalConfig) -> std::result::Result<FailureAnalysis, StatsError> {
    let dimension_means = dimension_means(dataset, config)?;

    let mut failure_rates = BTreeMap::new();
    let mut flagged_dimensions = Vec::new();
    for dim in &config.required_dimensions {
        let scores = dataset.dimension_scores(dim)?;
        let failures = scores.iter().filter(|&&s| s == config.score_min).count();
        let rate = failures as f64 / scores.len() as f64;
        if rate > config.failure_rate_flag {
            flagged_dimensions.push(dim.clone());
        }
        failure_rates.insert(dim.clone(), rate);
    }

    // Stable sort keeps configured order among equal means.
    let mut ranked_dimensions: Vec<(String, f64)> = config
        .required_dimensions
        .iter()
        .map(|d| (d.clone(), dimension_means[d]))
        .collect();
    ranked_dimensions.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut patterns: Vec<FailurePattern> = Vec::new();
    let mut clean_entries = 0;
    for entry in dataset {
        let mut failed = Vec::new();
        for dim in &config.required_dimensions {
            if entry.score(dim)? == config.score_min {
                failed.push(dim.clone());
            }
        }
        if failed.is_empty() {
            clean_entries += 1;
            continue;
        }
        match patterns.iter_mut().find(|p| p.dimensions == failed) {
            Some(pattern) => {
                pattern.count += 1;
                pattern.entry_ids.push(entry.id);
            }
            None => patterns.push(FailurePattern {
                dimensions: failed,
                count: 1,
                entry_ids: vec![entry.id],
            }),
        }
    }
    patterns.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label().cmp(&b.label())));

    Ok(FailureAnalysis {
        dimension_means,
        ranked_dimensions,
        failure_rates,
        flagged_dimensions,
        patterns,
        clean_entries,
    })
}
