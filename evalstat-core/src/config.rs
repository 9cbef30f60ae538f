//! Configuration system for evalstat.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> CLI args.
//! Configuration is loaded from `~/.config/evalstat/config.toml` and/or `.evalstat/config.toml`
//! in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{EvalError, Result};

/// Dimensions scored by the default rubric.
pub const DEFAULT_DIMENSIONS: [&str; 5] = [
    "instruction_adherence",
    "factual_accuracy",
    "logical_coherence",
    "safety",
    "tone_alignment",
];

/// Immutable parameter set shared by every analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Dimension names every entry must score, in reporting order.
    pub required_dimensions: Vec<String>,
    /// Lowest valid score (also the "failure" score).
    pub score_min: i64,
    /// Highest valid score (also the "perfect" score).
    pub score_max: i64,
    /// Confidence level for interval margins.
    pub confidence_level: f64,
    /// Mean KL divergence above which drift is reported.
    pub drift_threshold: f64,
    /// Significance level for the t-test and bootstrap test.
    pub significance_alpha: f64,
    /// Number of bootstrap resamples.
    pub bootstrap_iterations: usize,
    /// Seed for the bootstrap random generator.
    pub random_seed: u64,
    /// Minimum number of entries a dataset must contain.
    pub min_dataset_size: usize,
    /// Failure rate above which a dimension is flagged.
    pub failure_rate_flag: f64,
    /// Coefficient of variation above which a dimension is high-variance.
    pub high_variance_cv: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            required_dimensions: DEFAULT_DIMENSIONS.iter().map(|d| d.to_string()).collect(),
            score_min: 0,
            score_max: 2,
            confidence_level: 0.95,
            drift_threshold: 0.1,
            significance_alpha: 0.05,
            bootstrap_iterations: 1000,
            random_seed: 42,
            min_dataset_size: 4,
            failure_rate_flag: 0.5,
            high_variance_cv: 0.5,
        }
    }
}

impl EvalConfig {
    /// Check internal consistency of the parameters.
    pub fn validate(&self) -> Result<()> {
        if self.required_dimensions.is_empty() {
            return Err(EvalError::config("at least one dimension is required"));
        }
        let mut seen = HashSet::new();
        for dim in &self.required_dimensions {
            if dim.trim().is_empty() {
                return Err(EvalError::config("dimension names must be non-empty"));
            }
            if !seen.insert(dim.as_str()) {
                return Err(EvalError::config(format!("duplicate dimension '{dim}'")));
            }
        }
        if self.score_min >= self.score_max {
            return Err(EvalError::config(format!(
                "score_min ({}) must be less than score_max ({})",
                self.score_min, self.score_max
            )));
        }
        if !(self.significance_alpha > 0.0 && self.significance_alpha < 1.0) {
            return Err(EvalError::config(format!(
                "significance_alpha must be in (0, 1), got {}",
                self.significance_alpha
            )));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(EvalError::config(format!(
                "confidence_level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }
        // Interval margins only know the 95% z-value.
        crate::stats::confidence_interval_margin(&[0.0, 0.0], self.confidence_level)
            .map_err(|e| EvalError::config(e.to_string()))?;
        if self.bootstrap_iterations == 0 {
            return Err(EvalError::config("bootstrap_iterations must be positive"));
        }
        if self.drift_threshold < 0.0 || self.drift_threshold.is_nan() {
            return Err(EvalError::config("drift_threshold must be non-negative"));
        }
        if self.min_dataset_size == 0 {
            return Err(EvalError::config("min_dataset_size must be positive"));
        }
        Ok(())
    }

    /// Number of distinct score values in `[score_min, score_max]`.
    pub fn score_levels(&self) -> usize {
        (self.score_max - self.score_min + 1).max(0) as usize
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `EVALSTAT_`)
/// 3. Workspace-local config (`.evalstat/config.toml`)
/// 4. User config (`~/.config/evalstat/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&EvalConfig>,
) -> std::result::Result<EvalConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(EvalConfig::default()));

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // EVALSTAT_SCORE_MAX, EVALSTAT_RANDOM_SEED, ...
    figment = figment.merge(Env::prefixed("EVALSTAT_"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Path of the user-level config file, if a home directory can be resolved.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    directories::ProjectDirs::from("dev", "evalstat", "evalstat")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path of the workspace-level config file.
pub fn workspace_config_path(workspace: &Path) -> std::path::PathBuf {
    workspace.join(".evalstat").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EvalConfig::default();
        assert_eq!(config.required_dimensions.len(), 5);
        assert_eq!(config.required_dimensions[0], "instruction_adherence");
        assert_eq!(config.score_min, 0);
        assert_eq!(config.score_max, 2);
        assert_eq!(config.bootstrap_iterations, 1000);
        assert_eq!(config.random_seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_score_levels() {
        let config = EvalConfig::default();
        assert_eq!(config.score_levels(), 3);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = EvalConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: EvalConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EvalConfig = toml::from_str("score_max = 4\nrandom_seed = 7\n").unwrap();
        assert_eq!(config.score_max, 4);
        assert_eq!(config.random_seed, 7);
        assert_eq!(config.score_min, 0);
        assert_eq!(config.significance_alpha, 0.05);
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let config = EvalConfig {
            score_min: 3,
            score_max: 1,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("score_min"));
    }

    #[test]
    fn test_validate_rejects_duplicate_dimension() {
        let config = EvalConfig {
            required_dimensions: vec!["safety".into(), "safety".into()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_alpha_and_iterations() {
        let config = EvalConfig {
            significance_alpha: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EvalConfig {
            bootstrap_iterations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unsupported_confidence() {
        let config = EvalConfig {
            confidence_level: 0.99,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("only 0.95 is supported"));
    }

    #[test]
    fn test_load_config_workspace_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".evalstat");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "bootstrap_iterations = 250\ndrift_threshold = 0.25\n",
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.bootstrap_iterations, 250);
        assert_eq!(config.drift_threshold, 0.25);
    }

    #[test]
    fn test_load_config_overrides_win() {
        let overrides = EvalConfig {
            random_seed: 99,
            ..Default::default()
        };
        let config = load_config(None, Some(&overrides)).unwrap();
        assert_eq!(config.random_seed, 99);
    }
}
