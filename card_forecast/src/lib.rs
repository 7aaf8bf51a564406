//! # Card Forecast
//!
//! Serves pre-trained monthly forecasting models for a fixed set of credit
//! card issuers, reports back-test accuracy, and prepares history plus
//! forecast for display.
//!
//! ## Pipeline
//!
//! - [`registry`]: closed set of entities, each mapped to a model and a data file
//! - [`models`]: loads fitted model states and asks them for point forecasts
//! - [`data`]: reads the historical series from CSV
//! - [`generator`]: forecasts and re-dates the values as consecutive months
//! - [`evaluation`]: MSE, RMSE, MAE and R² against the trailing observations
//! - [`merge`]: one chronologically ordered table for the renderer
//! - [`pipeline`]: runs the stages for one request and records each outcome
//!
//! ## Quick Start
//!
//! ```no_run
//! use card_forecast::{ForecastService, PipelineConfig, PipelineRequest};
//!
//! let config = PipelineConfig::from_json_file("card_forecast.json")?;
//! let service = ForecastService::from_config(config)?;
//!
//! let selection = service.select("Diners Club")?;
//! let result = service.run(&PipelineRequest::new(selection, 6));
//!
//! for error in result.errors() {
//!     eprintln!("{}", error.user_message());
//! }
//! if let Some(display) = result.display.value() {
//!     println!("{} rows ready for display", display.len());
//! }
//! # Ok::<(), card_forecast::PipelineError>(())
//! ```

pub mod calendar;
pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod generator;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod registry;

// Re-export commonly used types
pub use crate::calendar::IndexFrequency;
pub use crate::config::{EntityEntry, EvaluationMode, HorizonBounds, PipelineConfig};
pub use crate::data::{CsvDataSource, DataSource, TimeSeries};
pub use crate::error::{PipelineError, Result, Stage};
pub use crate::evaluation::{evaluate, MetricsReport};
pub use crate::generator::{ForecastGenerator, ForecastResult};
pub use crate::merge::{merge, DisplayRow, DisplaySeries};
pub use crate::models::{
    FileModelRepository, ForecastingModel, ModelArtifact, ModelFile, ModelRepository,
    RawPrediction,
};
pub use crate::pipeline::{
    run_pipeline, ForecastService, PipelineRequest, PipelineResult, PipelineState, StageOutcome,
};
pub use crate::registry::{EntityRefs, EntityRegistry, EntitySelection};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
