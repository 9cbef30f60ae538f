//! Per-dimension dispersion diagnostics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::EvalConfig;
use crate::error::{EvalError, Result, StatsError};
use crate::model::Dataset;
use crate::stats::{as_f64, mean, variance};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionStatistics {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    /// `std_dev / mean`, or 0.0 when the mean is zero.
    pub coefficient_of_variation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionalBreakdown {
    pub dimension_statistics: BTreeMap<String, DimensionStatistics>,
    /// Dimensions whose coefficient of variation exceeds `high_variance_cv`.
    pub high_variance_dimensions: Vec<String>,
}

/// Mean, variance and coefficient of variation per dimension.
///
/// Needs at least two entries.
pub fn dimensional_breakdown(
    dataset: &Dataset,
    config: &EvalConfig,
) -> Result<DimensionalBreakdown> {
    run(dataset, config).map_err(|e| EvalError::statistics("Dimensional analysis failed", e))
}

fn run(
    dataset: &Dataset,
    config: &EvalConfig,
) -> std::result::Result<DimensionalBreakdown, StatsError> {
    let mut dimension_statistics = BTreeMap::new();
    let mut high_variance_dimensions = Vec::new();

    for dim in &config.required_dimensions {
        let values = as_f64(&dataset.dimension_scores(dim)?);
        let m = mean(&values)?;
        let var = variance(&values)?;
        let sd = var.sqrt();
        let cv = if m == 0.0 { 0.0 } else { sd / m };

        if cv > config.high_variance_cv {
            high_variance_dimensions.push(dim.clone());
        }
        dimension_statistics.insert(
            dim.clone(),
            DimensionStatistics {
                mean: m,
                variance: var,
                std_dev: sd,
                coefficient_of_variation: cv,
            },
        );
    }

    Ok(DimensionalBreakdown {
        dimension_statistics,
        high_variance_dimensions,
    })
}
