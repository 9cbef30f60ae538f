//! End-to-end analysis pipeline.
//!
//! Runs the descriptive analyses unconditionally and the inferential ones on
//! request, collecting everything into one serializable [`AnalysisResults`].

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::analysis::{
    BenchmarkResult, BootstrapResult, BreakdownKey, DatasetSummary, DimensionalBreakdown,
    DriftResult, FailureAnalysis, GroupPerformance, TTestResult, analyze_failures,
    benchmark_against_reference, bootstrap_significance_test, compute_cohens_kappa,
    compute_statistics, detect_kl_drift, dimensional_breakdown, group_performance,
    independent_t_test,
};
use crate::config::EvalConfig;
use crate::error::Result;
use crate::model::Dataset;
use crate::report::render_report;

/// Which optional analyses to run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Cohen's kappa per dimension; requires rater-paired entries.
    pub agreement: bool,
    /// Independent t-test and bootstrap test between the two groups.
    pub significance: bool,
    /// Reference dataset to benchmark against.
    pub benchmark: Option<Dataset>,
    /// Baseline dataset for drift detection.
    pub drift: Option<Dataset>,
    pub breakdown: Option<BreakdownKey>,
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResults {
    pub summary: DatasetSummary,
    pub failures: FailureAnalysis,
    /// `None` when the dataset is too small for dispersion statistics.
    pub dimensional: Option<DimensionalBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agreement: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_test: Option<TTestResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<BootstrapResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drift: Option<DriftResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<GroupPerformance>,
    pub report: String,
}

/// Run the analyses selected by `options` over a validated dataset.
///
/// Any requested analysis that fails aborts the run with its error.
pub fn run_analysis(
    dataset: &Dataset,
    config: &EvalConfig,
    options: &AnalysisOptions,
) -> Result<AnalysisResults> {
    info!(entries = dataset.len(), "Running analysis pipeline");

    let summary = compute_statistics(dataset, config)?;
    let failures = analyze_failures(dataset, config)?;
    let dimensional = match dimensional_breakdown(dataset, config) {
        Ok(breakdown) => Some(breakdown),
        Err(e) => {
            warn!(error = %e, "Skipping dimensional breakdown");
            None
        }
    };
    let report = render_report(&summary, config);

    let agreement = if options.agreement {
        debug!("Computing inter-rater agreement");
        Some(compute_cohens_kappa(dataset, config)?)
    } else {
        None
    };

    let (t_test, bootstrap) = if options.significance {
        debug!(iterations = config.bootstrap_iterations, "Running significance tests");
        (
            Some(independent_t_test(dataset, config)?),
            Some(bootstrap_significance_test(dataset, config)?),
        )
    } else {
        (None, None)
    };

    let benchmark = options
        .benchmark
        .as_ref()
        .map(|reference| benchmark_against_reference(dataset, reference, config))
        .transpose()?;

    let drift = options
        .drift
        .as_ref()
        .map(|baseline| detect_kl_drift(dataset, baseline, config))
        .transpose()?;
    if let Some(result) = &drift {
        if result.drift_detected {
            warn!(overall_kl = result.overall_kl, "Score distribution drift detected");
        }
    }

    let breakdown = options
        .breakdown
        .map(|key| group_performance(dataset, config, key))
        .transpose()?;

    info!("Analysis pipeline complete");
    Ok(AnalysisResults {
        summary,
        failures,
        dimensional,
        agreement,
        t_test,
        bootstrap,
        benchmark,
        drift,
        breakdown,
        report,
    })
}
