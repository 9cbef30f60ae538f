//! Inter-rater agreement metrics.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::EvalConfig;
use crate::error::{EvalError, Result, StatsError};
use crate::model::{Dataset, Entry};

/// Compute Cohen's Kappa per dimension for a two-rater dataset.
///
/// The dataset must hold exactly two groups; the first group label in dataset
/// order is rater A. Every entry ID must appear exactly twice, once per rater.
pub fn compute_cohens_kappa(
    dataset: &Dataset,
    config: &EvalConfig,
) -> Result<BTreeMap<String, f64>> {
    run(dataset, config)
        .map_err(|e| EvalError::statistics("Cohen's Kappa computation failed", e))
}

fn run(
    dataset: &Dataset,
    config: &EvalConfig,
) -> std::result::Result<BTreeMap<String, f64>, StatsError> {
    let groups = dataset.partition_by_group();
    if groups.len() != 2 {
        return Err(StatsError::GroupCardinality {
            analysis: "Cohen's Kappa",
            found: groups.len(),
        });
    }
    let pairs = pair_by_rater(dataset, &groups[0].entries, &groups[1].entries)?;

    let mut results = BTreeMap::new();
    for dimension in &config.required_dimensions {
        let mut rater_a = Vec::with_capacity(pairs.len());
        let mut rater_b = Vec::with_capacity(pairs.len());
        for (a, b) in &pairs {
            rater_a.push(a.score(dimension)?);
            rater_b.push(b.score(dimension)?);
        }
        results.insert(dimension.clone(), cohens_kappa(&rater_a, &rater_b)?);
    }
    Ok(results)
}

/// Match rater A's entries to rater B's by ID, in order of first appearance.
fn pair_by_rater<'a>(
    dataset: &'a Dataset,
    rater_a: &[&'a Entry],
    rater_b: &[&'a Entry],
) -> std::result::Result<Vec<(&'a Entry, &'a Entry)>, StatsError> {
    let mut ids: Vec<(u64, usize)> = Vec::new();
    for entry in dataset {
        match ids.iter_mut().find(|(id, _)| *id == entry.id) {
            Some((_, count)) => *count += 1,
            None => ids.push((entry.id, 1)),
        }
    }

    ids.into_iter()
        .map(|(id, found)| {
            if found != 2 {
                return Err(StatsError::Pairing { id, found });
            }
            let a = rater_a.iter().find(|e| e.id == id);
            let b = rater_b.iter().find(|e| e.id == id);
            match (a, b) {
                (Some(a), Some(b)) => Ok((*a, *b)),
                _ => Err(StatsError::RaterMismatch { id }),
            }
        })
        .collect()
}

/// Calculate Cohen's Kappa for two annotators.
///
/// Returns 1.0 when expected agreement is 1 (both raters used a single,
/// identical category), where the formula is undefined.
pub fn cohens_kappa(
    annotations_a: &[i64],
    annotations_b: &[i64],
) -> std::result::Result<f64, StatsError> {
    if annotations_a.len() != annotations_b.len() {
        return Err(StatsError::LengthMismatch {
            left: annotations_a.len(),
            right: annotations_b.len(),
        });
    }
    if annotations_a.is_empty() {
        return Err(StatsError::EmptyInput { what: "Cohen's Kappa" });
    }
    let n = annotations_a.len() as f64;
    let agree = annotations_a
        .iter()
        .zip(annotations_b.iter())
        .filter(|(a, b)| a == b)
        .count() as f64;
    let po = agree / n;

    // Expected agreement
    let categories: BTreeSet<_> = annotations_a.iter().chain(annotations_b.iter()).collect();
    let mut pe = 0.0;
    for &cat in &categories {
        let count_a = annotations_a.iter().filter(|&a| a == cat).count() as f64;
        let count_b = annotations_b.iter().filter(|&b| b == cat).count() as f64;
        pe += (count_a / n) * (count_b / n);
    }

    if (1.0 - pe).abs() < f64::EPSILON {
        return Ok(1.0);
    }
    Ok((po - pe) / (1.0 - pe))
}

/// Interpret a Kappa score.
pub fn interpret_kappa(kappa: f64) -> &'static str {
    if kappa < 0.0 {
        "Poor"
    } else if kappa < 0.20 {
        "Slight"
    } else if kappa < 0.40 {
        "Fair"
    } else if kappa < 0.60 {
        "Moderate"
    } else if kappa < 0.80 {
        "Substantial"
    } else {
        "Almost Perfect"
    }
}
