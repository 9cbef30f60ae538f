//! Dataset schema and integrity validation.
//!
//! Turns raw JSON into a [`Dataset`] the analyses can trust: every entry has
//! all configured dimensions with integer scores in range, well-formed
//! metadata, and the dataset has at least two groups of two entries each.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

use crate::config::EvalConfig;
use crate::error::{EvalError, Result};
use crate::model::{Dataset, Entry, Metadata};

const REQUIRED_FIELDS: [&str; 5] = ["id", "prompt", "response", "scores", "metadata"];
const METADATA_FIELDS: [&str; 3] = ["model", "timestamp", "group"];

/// Load a dataset from a JSON file and validate it.
pub fn load_and_validate_dataset(path: &Path, config: &EvalConfig) -> Result<Dataset> {
    if !path.exists() {
        return Err(EvalError::validation(format!(
            "Dataset file not found: {}",
            path.display()
        )));
    }
    debug!(path = %path.display(), "Loading dataset");

    let content = std::fs::read_to_string(path)?;
    let raw: Value = serde_json::from_str(&content)
        .map_err(|e| EvalError::validation(format!("Invalid JSON in {}: {e}", path.display())))?;

    let dataset = validate_value(&raw, config)?;
    info!(
        path = %path.display(),
        entries = dataset.len(),
        groups = dataset.partition_by_group().len(),
        "Dataset validated"
    );
    Ok(dataset)
}

/// Validate an already-parsed JSON document.
pub fn validate_value(raw: &Value, config: &EvalConfig) -> Result<Dataset> {
    let items = raw
        .as_array()
        .ok_or_else(|| EvalError::validation("Dataset must be a list of entries."))?;

    if items.len() < config.min_dataset_size {
        return Err(EvalError::validation(format!(
            "Dataset must contain at least {} entries, found {}.",
            config.min_dataset_size,
            items.len()
        )));
    }

    let mut entries = Vec::with_capacity(items.len());
    let mut seen: HashSet<(String, u64)> = HashSet::new();
    let mut group_counts: Vec<(String, usize)> = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let entry = validate_entry(item, config)
            .map_err(|e| EvalError::validation(format!("Entry {index}: {e}")))?;

        if !seen.insert((entry.metadata.group.clone(), entry.id)) {
            return Err(EvalError::validation(format!(
                "Duplicate ID detected: {} in group '{}'",
                entry.id, entry.metadata.group
            )));
        }

        match group_counts
            .iter_mut()
            .find(|(g, _)| *g == entry.metadata.group)
        {
            Some((_, count)) => *count += 1,
            None => group_counts.push((entry.metadata.group.clone(), 1)),
        }

        entries.push(entry);
    }

    validate_group_integrity(&group_counts)?;

    Ok(Dataset::new(entries))
}

fn validate_entry(item: &Value, config: &EvalConfig) -> std::result::Result<Entry, String> {
    let obj = item.as_object().ok_or("entry must be an object")?;

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|f| !obj.contains_key(*f))
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing required fields: {}", missing.join(", ")));
    }

    let id = obj["id"]
        .as_u64()
        .ok_or("'id' must be a non-negative integer")?;
    let prompt = string_field(obj, "prompt")?;
    let response = string_field(obj, "response")?;
    let scores = validate_scores(&obj["scores"], config)?;
    let metadata = validate_metadata(&obj["metadata"])?;

    Ok(Entry {
        id,
        prompt,
        response,
        scores,
        metadata,
    })
}

fn string_field(obj: &Map<String, Value>, field: &str) -> std::result::Result<String, String> {
    obj[field]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("'{field}' must be a string"))
}

fn validate_scores(
    scores: &Value,
    config: &EvalConfig,
) -> std::result::Result<BTreeMap<String, i64>, String> {
    let scores = scores.as_object().ok_or("Scores must be a dictionary.")?;

    let required: HashSet<&str> = config.required_dimensions.iter().map(String::as_str).collect();
    let provided: HashSet<&str> = scores.keys().map(String::as_str).collect();
    if required != provided {
        let mut missing: Vec<&str> = required.difference(&provided).copied().collect();
        let mut unexpected: Vec<&str> = provided.difference(&required).copied().collect();
        missing.sort_unstable();
        unexpected.sort_unstable();
        return Err(format!(
            "Score dimensions mismatch. Missing: [{}], unexpected: [{}]",
            missing.join(", "),
            unexpected.join(", ")
        ));
    }

    let mut validated = BTreeMap::new();
    for (dimension, value) in scores {
        let score = value
            .as_i64()
            .ok_or_else(|| format!("Score for '{dimension}' must be integer."))?;
        if score < config.score_min || score > config.score_max {
            return Err(format!(
                "Score for '{dimension}' must be between {} and {}.",
                config.score_min, config.score_max
            ));
        }
        validated.insert(dimension.clone(), score);
    }
    Ok(validated)
}

fn validate_metadata(metadata: &Value) -> std::result::Result<Metadata, String> {
    let obj = metadata.as_object().ok_or("Metadata must be an object.")?;

    let missing: Vec<&str> = METADATA_FIELDS
        .iter()
        .copied()
        .filter(|f| !obj.contains_key(*f))
        .collect();
    if !missing.is_empty() {
        return Err(format!(
            "Metadata missing required fields: {}",
            missing.join(", ")
        ));
    }

    let model = string_field(obj, "model")?;
    let timestamp = string_field(obj, "timestamp")?;
    let group = string_field(obj, "group")?;

    if !is_iso8601(&timestamp) {
        return Err(format!("Invalid ISO 8601 timestamp: {timestamp}"));
    }
    if group.trim().is_empty() {
        return Err("Metadata 'group' must be non-empty.".to_string());
    }

    Ok(Metadata {
        model,
        timestamp,
        group,
    })
}

/// Accepts RFC 3339 (`Z` or offset), naive date-times, and plain dates.
pub fn is_iso8601(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// At least two groups, each with at least two entries.
fn validate_group_integrity(group_counts: &[(String, usize)]) -> Result<()> {
    if group_counts.len() < 2 {
        return Err(EvalError::validation(
            "At least two groups are required for statistical comparison.",
        ));
    }
    for (group, count) in group_counts {
        if *count < 2 {
            return Err(EvalError::validation(format!(
                "Group '{group}' must contain at least 2 entries."
            )));
        }
    }
    Ok(())
}
