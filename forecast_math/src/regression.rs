//! Regression accuracy metrics for point forecasts
//!
//! Every function takes the observed values first and the predicted values
//! second, and requires both slices to be non-empty and of equal length.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Residual sums below this are treated as zero
const EPSILON: f64 = 1e-10;

/// Mean squared error
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_inputs(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    Ok(mean_squared_error(actual, predicted)?.sqrt())
}

/// Mean absolute error
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_inputs(actual, predicted)?;

    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();

    Ok(sum / actual.len() as f64)
}

/// Coefficient of determination.
///
/// 1.0 is a perfect fit, 0.0 matches predicting the mean, and negative values
/// are worse than the mean. When the observations have no variance the score is
/// 1.0 for an exact fit and 0.0 otherwise, so the result is always finite.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_inputs(actual, predicted)?;

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_total: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_residual: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if ss_total < EPSILON {
        return Ok(if ss_residual < EPSILON { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_residual / ss_total)
}

/// The four regression metrics, always computed together
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Coefficient of determination
    pub r2: f64,
}

impl RegressionMetrics {
    /// Compute all four metrics for the same inputs
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Result<Self> {
        let mse = mean_squared_error(actual, predicted)?;

        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            mae: mean_absolute_error(actual, predicted)?,
            r2: r_squared(actual, predicted)?,
        })
    }
}

fn check_inputs(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() {
        return Err(MathError::InsufficientData(
            "At least one observation is required".to_string(),
        ));
    }

    if actual.len() != predicted.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual length ({}) doesn't match predicted length ({})",
            actual.len(),
            predicted.len()
        )));
    }

    if let Some(value) = actual.iter().chain(predicted).find(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(format!(
            "Non-finite value in inputs: {}",
            value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_values() {
        let actual = [10.0, 20.0, 30.0, 40.0, 50.0];
        let predicted = [12.0, 18.0, 33.0, 37.0, 52.0];

        assert_relative_eq!(mean_absolute_error(&actual, &predicted).unwrap(), 2.4);
        assert_relative_eq!(mean_squared_error(&actual, &predicted).unwrap(), 6.0);
        assert_relative_eq!(
            root_mean_squared_error(&actual, &predicted).unwrap(),
            6.0_f64.sqrt()
        );
        // ss_total = 1000, ss_residual = 30
        assert_relative_eq!(r_squared(&actual, &predicted).unwrap(), 0.97, epsilon = 1e-12);
    }

    #[test]
    fn test_r_squared_constant_actuals() {
        let actual = [5.0, 5.0, 5.0];
        assert_eq!(r_squared(&actual, &[5.0, 5.0, 5.0]).unwrap(), 1.0);
        assert_eq!(r_squared(&actual, &[4.0, 6.0, 5.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_r_squared_negative_for_poor_fit() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [3.0, 2.0, 1.0];
        assert!(r_squared(&actual, &predicted).unwrap() < 0.0);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(matches!(
            mean_squared_error(&[], &[]),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            mean_absolute_error(&[1.0, 2.0], &[1.0]),
            Err(MathError::InvalidInput(_))
        ));
        assert!(matches!(
            r_squared(&[1.0, f64::NAN], &[1.0, 2.0]),
            Err(MathError::InvalidInput(_))
        ));
    }
}
