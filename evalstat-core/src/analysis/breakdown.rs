//! Per-group and per-model performance breakdown.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::EvalConfig;
use crate::error::{EvalError, Result, StatsError};
use crate::model::Dataset;
use crate::stats::{as_f64, mean};

/// Metadata field used to split the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakdownKey {
    #[default]
    Group,
    Model,
}

impl std::fmt::Display for BreakdownKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakdownKey::Group => write!(f, "group"),
            BreakdownKey::Model => write!(f, "model"),
        }
    }
}

impl std::str::FromStr for BreakdownKey {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "group" => Ok(BreakdownKey::Group),
            "model" => Ok(BreakdownKey::Model),
            other => Err(EvalError::config(format!(
                "unknown breakdown key '{other}' (expected 'group' or 'model')"
            ))),
        }
    }
}

/// Mean scores of one partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionPerformance {
    pub label: String,
    pub entry_count: usize,
    pub dimension_means: BTreeMap<String, f64>,
    pub overall_mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPerformance {
    pub key: BreakdownKey,
    /// Partitions in order of first appearance.
    pub partitions: Vec<PartitionPerformance>,
}

/// Per-dimension means for each value of `key`.
pub fn group_performance(
    dataset: &Dataset,
    config: &EvalConfig,
    key: BreakdownKey,
) -> Result<GroupPerformance> {
    run(dataset, config, key).map_err(|e| EvalError::statistics("Group breakdown failed", e))
}

fn run(
    dataset: &Dataset,
    config: &EvalConfig,
    key: BreakdownKey,
) -> std::result::Result<GroupPerformance, StatsError> {
    let groups = match key {
        BreakdownKey::Group => dataset.partition_by_group(),
        BreakdownKey::Model => dataset.partition_by_model(),
    };

    let mut partitions = Vec::with_capacity(groups.len());
    for group in groups {
        let mut dimension_means = BTreeMap::new();
        let mut means = Vec::with_capacity(config.required_dimensions.len());
        for dim in &config.required_dimensions {
            let scores = group
                .entries
                .iter()
                .map(|e| e.score(dim))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let m = mean(&as_f64(&scores))?;
            means.push(m);
            dimension_means.insert(dim.clone(), m);
        }
        partitions.push(PartitionPerformance {
            label: group.label.to_string(),
            entry_count: group.entries.len(),
            dimension_means,
            overall_mean: mean(&means)?,
        });
    }

    Ok(GroupPerformance { key, partitions })
}
