//! Evaluation entries and datasets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::StatsError;

/// Grouping and provenance metadata attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Identifier of the model that produced the response.
    pub model: String,
    /// ISO-8601 timestamp, kept as validated text.
    pub timestamp: String,
    /// Group label (rater, model variant, ...).
    pub group: String,
}

/// One scored prompt/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    pub prompt: String,
    pub response: String,
    pub scores: BTreeMap<String, i64>,
    pub metadata: Metadata,
}

impl Entry {
    /// Score for `dimension`, or a `MissingDimension` error.
    pub fn score(&self, dimension: &str) -> Result<i64, StatsError> {
        self.scores
            .get(dimension)
            .copied()
            .ok_or_else(|| StatsError::MissingDimension {
                id: self.id,
                dimension: dimension.to_string(),
            })
    }

    /// Mean of this entry's scores over `dimensions`.
    pub fn mean_score(&self, dimensions: &[String]) -> Result<f64, StatsError> {
        let values = dimensions
            .iter()
            .map(|d| self.score(d).map(|s| s as f64))
            .collect::<Result<Vec<_>, _>>()?;
        crate::stats::mean(&values)
    }
}

/// One group's entries, in dataset order.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub label: &'a str,
    pub entries: Vec<&'a Entry>,
}

/// An ordered sequence of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    entries: Vec<Entry>,
}

impl Dataset {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Partition entries by `metadata.group`, ordered by first appearance.
    pub fn partition_by_group(&self) -> Vec<Group<'_>> {
        self.partition_by(|e| e.metadata.group.as_str())
    }

    /// Partition entries by `metadata.model`, ordered by first appearance.
    pub fn partition_by_model(&self) -> Vec<Group<'_>> {
        self.partition_by(|e| e.metadata.model.as_str())
    }

    fn partition_by<'a>(&'a self, key: impl Fn(&'a Entry) -> &'a str) -> Vec<Group<'a>> {
        let mut groups: Vec<Group<'a>> = Vec::new();
        for entry in &self.entries {
            let label = key(entry);
            match groups.iter_mut().find(|g| g.label == label) {
                Some(group) => group.entries.push(entry),
                None => groups.push(Group {
                    label,
                    entries: vec![entry],
                }),
            }
        }
        groups
    }

    /// All scores for one dimension, in dataset order.
    pub fn dimension_scores(&self, dimension: &str) -> Result<Vec<i64>, StatsError> {
        self.entries.iter().map(|e| e.score(dimension)).collect()
    }
}

impl From<Vec<Entry>> for Dataset {
    fn from(entries: Vec<Entry>) -> Self {
        Self::new(entries)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::config::DEFAULT_DIMENSIONS;

    /// Entry scoring every default dimension with `score`.
    pub fn uniform_entry(id: u64, group: &str, score: i64) -> Entry {
        entry_with_scores(id, group, &[score; 5])
    }

    /// Entry with one score per default dimension, in order.
    pub fn entry_with_scores(id: u64, group: &str, scores: &[i64; 5]) -> Entry {
        Entry {
            id,
            prompt: "P".into(),
            response: "R".into(),
            scores: DEFAULT_DIMENSIONS
                .iter()
                .zip(scores.iter())
                .map(|(d, s)| (d.to_string(), *s))
                .collect(),
            metadata: Metadata {
                model: "gpt-4".into(),
                timestamp: "2026-02-24T10:15:30Z".into(),
                group: group.into(),
            },
        }
    }
}
