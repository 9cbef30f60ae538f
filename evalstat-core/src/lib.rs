//! # evalstat-core: statistical analysis of rubric-scored LLM evaluations
//!
//! Datasets are lists of responses scored per dimension on a small integer
//! scale (0..=2 by default) and tagged with a group and model. This crate
//! validates such datasets and runs the analyses on them:
//!
//! 1. **Descriptive** - summary statistics, failure taxonomy, dimensional
//!    dispersion, per-group/per-model breakdown
//! 2. **Inferential** - independent t-test with Cohen's d, bootstrap test
//! 3. **Comparative** - inter-rater agreement (Cohen's kappa), benchmark
//!    deltas, KL-divergence drift

// Foundation
pub mod config;
pub mod error;
pub mod model;
pub mod stats;

// Input
pub mod validation;

// Analyses
pub mod analysis;

// Output
pub mod pipeline;
pub mod report;

// Re-exports
pub use config::{EvalConfig, load_config};
pub use error::{EvalError, Result, StatsError};
pub use model::{Dataset, Entry, Metadata};
pub use pipeline::{AnalysisOptions, AnalysisResults, run_analysis};
pub use validation::{load_and_validate_dataset, validate_value};
