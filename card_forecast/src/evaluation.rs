//! Back-test evaluation of forecasts against known observations

use crate::error::{PipelineError, Result};
use crate::generator::ForecastResult;
use forecast_math::RegressionMetrics;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Accuracy of a forecast over its comparison window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsReport {
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Number of compared periods
    pub window: usize,
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forecast Accuracy ({} periods):", self.window)?;
        writeln!(f, "  MSE:   {:.4}", self.mse)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  R²:    {:.4}", self.r2)?;
        Ok(())
    }
}

/// Score a forecast against the trailing actual observations.
///
/// The last `forecast.len()` entries of `actuals` are compared position by
/// position with the forecast values; dates are not consulted.
pub fn evaluate(forecast: &ForecastResult, actuals: &[f64]) -> Result<MetricsReport> {
    evaluate_values(&forecast.values(), actuals)
}

/// Score raw forecast values against the trailing actual observations
pub fn evaluate_values(forecast: &[f64], actuals: &[f64]) -> Result<MetricsReport> {
    let horizon = forecast.len();
    if horizon == 0 {
        return Err(PipelineError::EvaluationFailure(
            "forecast is empty, nothing to compare".to_string(),
        ));
    }

    if actuals.len() < horizon {
        return Err(PipelineError::EvaluationFailure(format!(
            "need {} actual observations, only {} available",
            horizon,
            actuals.len()
        )));
    }

    let window = &actuals[actuals.len() - horizon..];
    let metrics = RegressionMetrics::compute(window, forecast)?;

    info!(
        window = horizon,
        mse = metrics.mse,
        mae = metrics.mae,
        r2 = metrics.r2,
        "Evaluated forecast"
    );

    Ok(MetricsReport {
        mse: metrics.mse,
        rmse: metrics.rmse,
        mae: metrics.mae,
        r2: metrics.r2,
        window: horizon,
    })
}
