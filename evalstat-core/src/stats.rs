//! Statistical primitives shared by every analysis.
//!
//! All functions are pure and fail with a [`StatsError`] instead of returning
//! NaN for inputs they cannot handle.

use crate::error::StatsError;

/// z-value for a two-sided 95% normal interval.
pub const Z_95: f64 = 1.96;

/// Arithmetic mean of a non-empty slice.
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput { what: "mean" });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (denominator `n - 1`).
pub fn variance(values: &[f64]) -> Result<f64, StatsError> {
    if values.len() < 2 {
        return Err(StatsError::InsufficientData {
            what: "Variance",
            required: 2,
            actual: values.len(),
        });
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Ok(ss / (values.len() - 1) as f64)
}

/// Sample standard deviation.
pub fn standard_deviation(values: &[f64]) -> Result<f64, StatsError> {
    variance(values).map(f64::sqrt)
}

/// Margin of error `z * sd / sqrt(n)` under the normal approximation.
///
/// Only the 95% level is supported.
pub fn confidence_interval_margin(
    values: &[f64],
    confidence_level: f64,
) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput {
            what: "confidence interval",
        });
    }
    if (confidence_level - 0.95).abs() > 1e-9 {
        return Err(StatsError::UnsupportedConfidence {
            level: confidence_level,
        });
    }
    let sd = standard_deviation(values)?;
    Ok(Z_95 * sd / (values.len() as f64).sqrt())
}

/// Convert integer scores into the `f64` form the primitives take.
pub fn as_f64(scores: &[i64]) -> Vec<f64> {
    scores.iter().map(|&s| s as f64).collect()
}

/// Standard normal CDF.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Two-tailed p-value of a statistic under the standard normal.
pub fn two_tailed_normal_p(statistic: f64) -> f64 {
    let z = statistic.abs();
    let one_tail = 0.5 * (1.0 - erf(z / std::f64::consts::SQRT_2));
    2.0 * one_tail
}

/// Error function (Abramowitz and Stegun 7.1.26, |error| < 1.5e-7).
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    sign * y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
        assert_eq!(mean(&[7.0]).unwrap(), 7.0);
    }

    #[test]
    fn test_mean_empty_fails() {
        assert_eq!(
            mean(&[]).unwrap_err(),
            StatsError::EmptyInput { what: "mean" }
        );
    }

    #[test]
    fn test_variance_sample_denominator() {
        // Deviations from 5: -3, -1, -1, -1, 0, 0, 2, 4 -> SS = 32
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((variance(&values).unwrap() - 32.0 / 7.0).abs() < 1e-12);
        assert!((standard_deviation(&values).unwrap() - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_variance_single_value_fails() {
        let err = variance(&[3.0]).unwrap_err();
        assert!(matches!(
            err,
            StatsError::InsufficientData {
                required: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_confidence_interval_margin() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let sd = standard_deviation(&values).unwrap();
        let margin = confidence_interval_margin(&values, 0.95).unwrap();
        assert!((margin - 1.96 * sd / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_interval_rejects_other_levels() {
        assert!(matches!(
            confidence_interval_margin(&[1.0, 2.0], 0.99),
            Err(StatsError::UnsupportedConfidence { .. })
        ));
        assert!(matches!(
            confidence_interval_margin(&[], 0.95),
            Err(StatsError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_normal_cdf() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-6);
        assert!((normal_cdf(1.96) - 0.975).abs() < 1e-3);
        assert!((normal_cdf(-1.96) - 0.025).abs() < 1e-3);
    }

    #[test]
    fn test_two_tailed_normal_p() {
        assert!((two_tailed_normal_p(0.0) - 1.0).abs() < 1e-6);
        assert!((two_tailed_normal_p(1.96) - 0.05).abs() < 1e-3);
        assert_eq!(two_tailed_normal_p(2.5), two_tailed_normal_p(-2.5));
    }

    #[test]
    fn test_erf_symmetry() {
        assert!((erf(0.5) + erf(-0.5)).abs() < 1e-12);
        assert!((erf(3.0) - 1.0).abs() < 1e-4);
    }
}
