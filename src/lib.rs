//! # Card Forecast Workspace
//!
//! Umbrella crate for the credit card forecast serving workspace.
//!
//! - [`card_forecast`]: entity registry, model and data loading, forecasting,
//!   evaluation and merging
//! - [`forecast_math`]: regression error metrics
//! - [`forecast_app`]: terminal rendering and the `card-forecast` binary
//!
//! ## Example
//!
//! ```
//! use card_forecast_workspace::card_forecast::PipelineConfig;
//!
//! let config = PipelineConfig::default();
//! let names: Vec<&str> = config.entities.iter().map(|e| e.name.as_str()).collect();
//! assert_eq!(names, vec!["Todo", "Diners Club", "Produbanco"]);
//! ```

pub use card_forecast;
pub use forecast_app;
pub use forecast_math;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deployment_is_valid() {
        let config = card_forecast::PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert!(card_forecast::ForecastService::from_config(config).is_ok());
    }
}
