//! Linear trend model state

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// Fitted straight line `intercept + slope * x`.
///
/// `origin` is the `x` of the last training observation; forecast period `k`
/// is evaluated at `origin + k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub intercept: f64,
    pub slope: f64,
    #[serde(default)]
    pub origin: i64,
}

impl LinearTrend {
    /// Create a new linear trend state
    pub fn new(intercept: f64, slope: f64, origin: i64) -> Result<Self> {
        let model = Self {
            intercept,
            slope,
            origin,
        };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.intercept.is_finite() || !self.slope.is_finite() {
            return Err(PipelineError::PredictionFailure(
                "Intercept and slope must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Positions of the forecast periods on the fitted axis
    pub fn positions(&self, horizon: usize) -> Result<Vec<i64>> {
        (1..=horizon)
            .map(|k| {
                i64::try_from(k)
                    .ok()
                    .and_then(|k| self.origin.checked_add(k))
                    .ok_or_else(|| {
                        PipelineError::PredictionFailure(format!(
                            "period {} past origin {} is out of range",
                            k, self.origin
                        ))
                    })
            })
            .collect()
    }

    /// Forecast `horizon` future values
    pub fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        Ok(self
            .positions(horizon)?
            .into_iter()
            .map(|x| self.intercept + self.slope * x as f64)
            .collect())
    }
}
