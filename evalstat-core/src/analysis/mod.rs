//! Analyses over a validated dataset.
//!
//! Each public routine is stateless, takes the dataset and config by reference,
//! and either returns a complete result record or a single [`EvalError`].
//!
//! [`EvalError`]: crate::error::EvalError

pub mod agreement;
pub mod benchmark;
pub mod bootstrap;
pub mod breakdown;
pub mod dimensional;
pub mod drift;
pub mod failures;
pub mod significance;
pub mod summary;

pub use agreement::compute_cohens_kappa;
pub use benchmark::{BenchmarkResult, benchmark_against_reference};
pub use bootstrap::{BootstrapResult, bootstrap_significance_test};
pub use breakdown::{BreakdownKey, GroupPerformance, group_performance};
pub use dimensional::{DimensionalBreakdown, dimensional_breakdown};
pub use drift::{DriftResult, detect_kl_drift};
pub use failures::{FailureAnalysis, analyze_failures};
pub use significance::{TTestResult, independent_t_test};
pub use summary::{DatasetSummary, compute_statistics};

use std::collections::BTreeMap;

use crate::config::EvalConfig;
use crate::error::StatsError;
use crate::model::Dataset;

/// Per-entry mean scores of exactly two groups, labelled in first-appearance order.
pub(crate) struct TwoGroups<'a> {
    pub label_a: &'a str,
    pub label_b: &'a str,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

pub(crate) fn two_group_means<'a>(
    dataset: &'a Dataset,
    config: &EvalConfig,
    analysis: &'static str,
) -> Result<TwoGroups<'a>, StatsError> {
    let groups = dataset.partition_by_group();
    if groups.len() != 2 {
        return Err(StatsError::GroupCardinality {
            analysis,
            found: groups.len(),
        });
    }
    let means = |entries: &[&crate::model::Entry]| {
        entries
            .iter()
            .map(|e| e.mean_score(&config.required_dimensions))
            .collect::<Result<Vec<_>, _>>()
    };
    Ok(TwoGroups {
        label_a: groups[0].label,
        label_b: groups[1].label,
        a: means(&groups[0].entries)?,
        b: means(&groups[1].entries)?,
    })
}

/// Mean score of every configured dimension, keyed by dimension name.
pub(crate) fn dimension_means(
    dataset: &Dataset,
    config: &EvalConfig,
) -> Result<BTreeMap<String, f64>, StatsError> {
    let mut means = BTreeMap::new();
    for dim in &config.required_dimensions {
        let scores = crate::stats::as_f64(&dataset.dimension_scores(dim)?);
        means.insert(dim.clone(), crate::stats::mean(&scores)?);
    }
    Ok(means)
}
