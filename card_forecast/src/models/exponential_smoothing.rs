//! Exponential smoothing model states

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// Fitted simple exponential smoothing state.
///
/// The forecast is flat at the final smoothed level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExponentialSmoothing {
    /// Smoothed level at the end of the training window
    pub level: f64,
}

impl ExponentialSmoothing {
    /// Create a new exponential smoothing state
    pub fn new(level: f64) -> Result<Self> {
        let model = Self { level };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.level.is_finite() {
            return Err(PipelineError::PredictionFailure(
                "Level must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Forecast `horizon` future values
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        vec![self.level; horizon]
    }
}

/// Fitted Holt linear trend state, optionally damped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoltLinear {
    /// Smoothed level
    pub level: f64,
    /// Smoothed trend per period
    pub trend: f64,
    /// Damping factor in (0, 1]; `None` means undamped
    #[serde(default)]
    pub damping: Option<f64>,
}

impl HoltLinear {
    /// Create a new Holt state
    pub fn new(level: f64, trend: f64, damping: Option<f64>) -> Result<Self> {
        let model = Self {
            level,
            trend,
            damping,
        };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.level.is_finite() || !self.trend.is_finite() {
            return Err(PipelineError::PredictionFailure(
                "Level and trend must be finite".to_string(),
            ));
        }

        if let Some(phi) = self.damping {
            if phi <= 0.0 || phi > 1.0 {
                return Err(PipelineError::PredictionFailure(
                    "Damping must be between 0 (exclusive) and 1".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Forecast `horizon` future values
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let phi = self.damping.unwrap_or(1.0);
        let mut values = Vec::with_capacity(horizon);
        let mut cumulative = 0.0;
        let mut factor = 1.0;

        for _ in 0..horizon {
            factor *= phi;
            cumulative += factor;
            values.push(self.level + cumulative * self.trend);
        }

        values
    }
}
