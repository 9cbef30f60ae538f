//! Plain-text evaluation report.

use std::fmt::Write;

use crate::analysis::summary::{DatasetSummary, compute_statistics};
use crate::config::EvalConfig;
use crate::error::Result;
use crate::model::Dataset;

const RULE: &str = "==================================================";

/// Compute summary statistics and render them as a report.
pub fn generate_report(dataset: &Dataset, config: &EvalConfig) -> Result<String> {
    let summary = compute_statistics(dataset, config)?;
    Ok(render_report(&summary, config))
}

/// Render an already computed summary.
///
/// Dimensions appear in configured order; dimensions missing from the
/// summary are skipped.
pub fn render_report(summary: &DatasetSummary, config: &EvalConfig) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "LLM Evaluation Report");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Dataset size: {} entries", summary.entry_count);
    let _ = writeln!(out, "Groups: {}", summary.groups.join(", "));
    out.push('\n');

    for dim in &config.required_dimensions {
        let Some(stats) = summary.dimensions.get(dim) else {
            continue;
        };
        let _ = writeln!(out, "{dim}");
        let _ = writeln!(out, "  Mean:          {:.3}", stats.mean);
        let _ = writeln!(out, "  Std dev:       {:.3}", stats.std_dev);
        let _ = writeln!(out, "  CI margin:     +/- {:.3}", stats.ci_margin);
        let _ = writeln!(out, "  Failure rate:  {:.1}%", stats.failure_rate * 100.0);
        let _ = writeln!(out, "  Perfect rate:  {:.1}%", stats.perfect_rate * 100.0);
        let distribution: Vec<String> = stats
            .distribution
            .iter()
            .map(|(score, count)| format!("{score}: {count}"))
            .collect();
        let _ = writeln!(out, "  Distribution:  {}", distribution.join(", "));
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "Overall quality score: {:.2} / {}",
        summary.overall_score, config.score_max
    );
    out
}
