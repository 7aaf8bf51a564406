//! # Forecast Math
//!
//! Numeric routines shared by the forecasting crates. The [`regression`]
//! module scores point forecasts against observed values.

use thiserror::Error;

pub mod regression;

pub use regression::{
    mean_absolute_error, mean_squared_error, r_squared, root_mean_squared_error,
    RegressionMetrics,
};

/// Errors that can occur in metric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for forecast math operations
pub type Result<T> = std::result::Result<T, MathError>;
