//! Error types for evalstat.
//!
//! Uses `thiserror` for public API error types. Analysis routines surface a
//! single error kind each; the primitive-level causes live in [`StatsError`]
//! and are folded into [`EvalError`] at the routine boundary.

use std::path::PathBuf;

/// Top-level error type for the evalstat core library.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Dataset validation failed: {0}")]
    Validation(String),

    #[error("Statistical computation failed: {0}")]
    Statistics(String),

    #[error("Drift detection failed: {0}")]
    Drift(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to export results to {path}: {message}")]
    Export { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EvalError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap a primitive failure as the statistics error of one routine.
    ///
    /// `context` names the routine, e.g. `"T-test computation failed"`.
    pub fn statistics(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::Statistics(format!("{context}: {cause}"))
    }

    pub fn drift(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::Drift(format!("{context}: {cause}"))
    }
}

/// Failures raised by the statistical primitives and analysis internals.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    #[error("Cannot compute {what} of empty input.")]
    EmptyInput { what: &'static str },

    #[error("{what} requires at least {required} values, got {actual}.")]
    InsufficientData {
        what: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Unsupported confidence level {level}; only 0.95 is supported.")]
    UnsupportedConfidence { level: f64 },

    #[error("{analysis} requires exactly two groups, found {found}.")]
    GroupCardinality { analysis: &'static str, found: usize },

    #[error("ID {id} must have exactly 2 ratings, found {found}.")]
    Pairing { id: u64, found: usize },

    #[error("ID {id} must be rated once by each of the two raters.")]
    RaterMismatch { id: u64 },

    #[error("Rater score lengths mismatch: {left} vs {right}.")]
    LengthMismatch { left: usize, right: usize },

    #[error("Standard error is zero; cannot compute t-statistic.")]
    ZeroStandardError,

    #[error("Entry {id} has no score for dimension '{dimension}'.")]
    MissingDimension { id: u64, dimension: String },

    #[error("Score {score} for dimension '{dimension}' is outside [{min}, {max}].")]
    ScoreOutOfRange {
        dimension: String,
        score: i64,
        min: i64,
        max: i64,
    },

    #[error("No dimensions configured.")]
    NoDimensions,
}

/// A type alias for results using the top-level `EvalError`.
pub type Result<T> = std::result::Result<T, EvalError>;
