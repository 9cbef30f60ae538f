//! Property-based tests for the statistical routines using proptest.

use proptest::prelude::*;
use std::collections::BTreeMap;

use evalstat_core::analysis::agreement::cohens_kappa;
use evalstat_core::analysis::drift::kl_divergence;
use evalstat_core::analysis::{
    benchmark_against_reference, bootstrap_significance_test, compute_cohens_kappa,
    detect_kl_drift, independent_t_test,
};
use evalstat_core::config::DEFAULT_DIMENSIONS;
use evalstat_core::stats::{mean, normal_cdf, variance};
use evalstat_core::{Dataset, Entry, EvalConfig, Metadata};

fn entry(id: u64, group: &str, scores: &[i64]) -> Entry {
    Entry {
        id,
        prompt: "P".into(),
        response: "R".into(),
        scores: DEFAULT_DIMENSIONS
            .iter()
            .zip(scores)
            .map(|(d, s)| (d.to_string(), *s))
            .collect::<BTreeMap<_, _>>(),
        metadata: Metadata {
            model: "gpt-4".into(),
            timestamp: "2026-02-24T10:15:30Z".into(),
            group: group.into(),
        },
    }
}

fn dataset_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<Vec<i64>>> {
    prop::collection::vec(prop::collection::vec(0i64..=2, 5), min..max)
}

fn build(rows: &[Vec<i64>], groups: &[&str]) -> Dataset {
    Dataset::new(
        rows.iter()
            .enumerate()
            .map(|(i, s)| entry(i as u64, groups[i % groups.len()], s))
            .collect(),
    )
}

// --- Descriptive statistics ---

proptest! {
    #[test]
    fn mean_is_sum_over_count(values in prop::collection::vec(-1000.0f64..1000.0, 1..50)) {
        let expected = values.iter().sum::<f64>() / values.len() as f64;
        prop_assert!((mean(&values).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn variance_is_non_negative(values in prop::collection::vec(-1000.0f64..1000.0, 2..50)) {
        prop_assert!(variance(&values).unwrap() >= 0.0);
    }

    #[test]
    fn normal_cdf_is_monotone(a in -6.0f64..6.0, b in -6.0f64..6.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(normal_cdf(lo) <= normal_cdf(hi) + 1e-12);
    }
}

// --- Drift ---

proptest! {
    #[test]
    fn kl_is_non_negative_and_finite(
        current in dataset_strategy(1, 20),
        baseline in dataset_strategy(1, 20),
    ) {
        let config = EvalConfig::default();
        let result = detect_kl_drift(
            &build(&current, &["A"]),
            &build(&baseline, &["A"]),
            &config,
        ).unwrap();
        prop_assert!(result.overall_kl.is_finite());
        prop_assert!(result.overall_kl >= -1e-12);
        for kl in result.dimension_kl.values() {
            prop_assert!(kl.is_finite());
            prop_assert!(*kl >= -1e-12);
        }
        prop_assert_eq!(result.drift_detected, result.overall_kl > config.drift_threshold);
    }

    #[test]
    fn kl_of_identical_distributions_is_zero(weights in prop::collection::vec(1u32..100, 3)) {
        let total: u32 = weights.iter().sum();
        let p: Vec<f64> = weights.iter().map(|&w| w as f64 / total as f64).collect();
        prop_assert!(kl_divergence(&p, &p).abs() < 1e-12);
    }
}

// --- Benchmark ---

proptest! {
    #[test]
    fn benchmark_lists_are_disjoint(
        current in dataset_strategy(1, 15),
        reference in dataset_strategy(1, 15),
    ) {
        let result = benchmark_against_reference(
            &build(&current, &["A"]),
            &build(&reference, &["A"]),
            &EvalConfig::default(),
        ).unwrap();
        for dim in &result.improved_dimensions {
            prop_assert!(!result.declined_dimensions.contains(dim));
            prop_assert!(result.dimension_deltas[dim] > 0.0);
        }
        for dim in &result.declined_dimensions {
            prop_assert!(result.dimension_deltas[dim] < 0.0);
        }
        let zero = result.dimension_deltas.values().filter(|d| **d == 0.0).count();
        prop_assert_eq!(
            result.improved_dimensions.len() + result.declined_dimensions.len() + zero,
            DEFAULT_DIMENSIONS.len()
        );
    }
}

// --- Agreement ---

proptest! {
    #[test]
    fn kappa_of_identical_raters_is_one(ratings in prop::collection::vec(0i64..=2, 1..30)) {
        prop_assert!((cohens_kappa(&ratings, &ratings).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn kappa_is_at_most_one(
        pairs in prop::collection::vec((0i64..=2, 0i64..=2), 1..30),
    ) {
        let (a, b): (Vec<i64>, Vec<i64>) = pairs.into_iter().unzip();
        let kappa = cohens_kappa(&a, &b).unwrap();
        prop_assert!(kappa <= 1.0 + 1e-9);
    }

    #[test]
    fn kappa_independent_of_row_order(
        ratings in prop::collection::vec(
            (prop::collection::vec(0i64..=2, 5), prop::collection::vec(0i64..=2, 5), any::<bool>()),
            2..12,
        ),
    ) {
        let build_rows = |honor_swaps: bool| {
            let mut entries = Vec::new();
            for (i, (a, b, swap)) in ratings.iter().enumerate() {
                let first = entry(i as u64, "rater_a", a);
                let second = entry(i as u64, "rater_b", b);
                // Row 0 stays in order so rater_a remains the first group.
                if honor_swaps && *swap && i > 0 {
                    entries.extend([second, first]);
                } else {
                    entries.extend([first, second]);
                }
            }
            Dataset::new(entries)
        };
        let config = EvalConfig::default();
        let ordered = compute_cohens_kappa(&build_rows(false), &config).unwrap();
        let shuffled = compute_cohens_kappa(&build_rows(true), &config).unwrap();
        prop_assert_eq!(ordered, shuffled);
    }

    #[test]
    fn kappa_rejects_other_group_counts(rows in dataset_strategy(4, 10)) {
        let ds = build(&rows, &["A", "B", "C"]);
        prop_assert!(compute_cohens_kappa(&ds, &EvalConfig::default()).is_err());
    }
}

// --- Two-group tests ---

proptest! {
    #[test]
    fn two_group_tests_reject_other_group_counts(
        rows in dataset_strategy(6, 12),
        groups in prop::sample::select(vec![1usize, 3]),
    ) {
        let labels = ["A", "B", "C"];
        let ds = build(&rows, &labels[..groups]);
        let config = EvalConfig { bootstrap_iterations: 10, ..Default::default() };
        prop_assert!(independent_t_test(&ds, &config).is_err());
        prop_assert!(bootstrap_significance_test(&ds, &config).is_err());
    }

    #[test]
    fn bootstrap_p_value_in_unit_interval(rows in dataset_strategy(4, 12)) {
        let ds = build(&rows, &["A", "B"]);
        let config = EvalConfig { bootstrap_iterations: 50, ..Default::default() };
        let result = bootstrap_significance_test(&ds, &config).unwrap();
        prop_assert!((0.0..=1.0).contains(&result.empirical_p_value));
        prop_assert_eq!(result.iterations, 50);
    }
}
