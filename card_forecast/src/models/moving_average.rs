//! Window-based model states

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// Moving average state holding the final training window.
///
/// Every forecast period equals the window mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverage {
    /// Most recent observations, oldest first
    pub window: Vec<f64>,
}

impl MovingAverage {
    /// Create a new moving average state
    pub fn new(window: Vec<f64>) -> Result<Self> {
        let model = Self { window };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_window(&self.window, "Moving average window")
    }

    /// Forecast `horizon` future values
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let mean = self.window.iter().sum::<f64>() / self.window.len() as f64;
        vec![mean; horizon]
    }
}

/// Seasonal naive state holding the final seasonal cycle.
///
/// Period `k` of the forecast repeats `season[k % season.len()]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalNaive {
    /// Last full cycle of observations, oldest first
    pub season: Vec<f64>,
}

impl SeasonalNaive {
    /// Create a new seasonal naive state
    pub fn new(season: Vec<f64>) -> Result<Self> {
        let model = Self { season };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_window(&self.season, "Seasonal cycle")
    }

    /// Forecast `horizon` future values
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        self.season.iter().copied().cycle().take(horizon).collect()
    }
}

fn check_window(values: &[f64], what: &str) -> Result<()> {
    if values.is_empty() {
        return Err(PipelineError::PredictionFailure(format!(
            "{} must not be empty",
            what
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(PipelineError::PredictionFailure(format!(
            "{} contains non-finite values",
            what
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average_forecast() {
        let model = MovingAverage::new(vec![100.0, 102.0, 104.0]).unwrap();
        assert_eq!(model.forecast(2), vec![102.0, 102.0]);
        assert!(MovingAverage::new(vec![]).is_err());
    }

    #[test]
    fn test_seasonal_naive_cycles() {
        let model = SeasonalNaive::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(model.forecast(5), vec![1.0, 2.0, 3.0, 1.0, 2.0]);
        assert!(SeasonalNaive::new(vec![1.0, f64::INFINITY]).is_err());
    }
}
