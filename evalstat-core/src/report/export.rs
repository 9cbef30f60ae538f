//! JSON and CSV export of analysis results.

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::analysis::summary::DatasetSummary;
use crate::config::EvalConfig;
use crate::error::{EvalError, Result};

const CSV_HEADER: &str = "dimension,mean,std_dev,ci_margin,failure_rate,perfect_rate";

/// Write `results` as pretty-printed JSON.
pub fn export_json<T: Serialize>(results: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(results).map_err(|e| EvalError::Export {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write_file(path, &json)?;
    info!(path = %path.display(), "Exported results as JSON");
    Ok(())
}

/// Write the per-dimension summary as CSV.
pub fn export_csv(summary: &DatasetSummary, config: &EvalConfig, path: &Path) -> Result<()> {
    write_file(path, &summary_to_csv(summary, config))?;
    info!(path = %path.display(), rows = summary.dimensions.len(), "Exported summary as CSV");
    Ok(())
}

/// Render the summary as CSV, one row per dimension in configured order.
///
/// Dimensions missing from the summary are skipped.
pub fn summary_to_csv(summary: &DatasetSummary, config: &EvalConfig) -> String {
    let mut output = String::new();
    output.push_str(CSV_HEADER);
    output.push('\n');

    for dimension in &config.required_dimensions {
        let Some(stats) = summary.dimensions.get(dimension) else {
            continue;
        };
        let fields = [
            escape_field(dimension),
            stats.mean.to_string(),
            stats.std_dev.to_string(),
            stats.ci_margin.to_string(),
            stats.failure_rate.to_string(),
            stats.perfect_rate.to_string(),
        ];
        output.push_str(&fields.join(","));
        output.push('\n');
    }

    output
}

/// Quote a field containing a comma, quote or newline.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| EvalError::Export {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    }
    std::fs::write(path, contents).map_err(|e| EvalError::Export {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
