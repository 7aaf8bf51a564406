//! Pipeline configuration
//!
//! One [`PipelineConfig`] describes a deployment: the static entity table, the
//! calendar convention used for forecast dates, whether back-test metrics are
//! computed, and the horizon bounds offered to the user.

use crate::calendar::IndexFrequency;
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One row of the static entity table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityEntry {
    /// Name shown in the entity selector
    pub name: String,
    /// Model repository reference
    pub model: String,
    /// Historical data reference
    pub data: String,
}

impl EntityEntry {
    pub fn new(name: &str, model: &str, data: &str) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            data: data.to_string(),
        }
    }
}

/// Whether forecasts are scored against held-out actuals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Pure future extrapolation, no metrics
    #[default]
    Disabled,
    /// Score the forecast against the trailing historical observations
    Backtest,
}

impl EvaluationMode {
    pub fn is_enabled(self) -> bool {
        matches!(self, EvaluationMode::Backtest)
    }
}

/// Bounds and default for the forecast horizon selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonBounds {
    #[serde(default = "default_horizon_min")]
    pub min: usize,
    #[serde(default = "default_horizon_max")]
    pub max: usize,
    #[serde(default = "default_horizon_default")]
    pub default: usize,
}

impl Default for HorizonBounds {
    fn default() -> Self {
        Self {
            min: default_horizon_min(),
            max: default_horizon_max(),
            default: default_horizon_default(),
        }
    }
}

impl HorizonBounds {
    /// Check that a requested horizon lies within the bounds
    pub fn check(&self, horizon: usize) -> Result<usize> {
        if horizon < self.min || horizon > self.max {
            return Err(PipelineError::PredictionFailure(format!(
                "horizon {} outside supported range {}..={}",
                horizon, self.min, self.max
            )));
        }
        Ok(horizon)
    }
}

/// Complete configuration of one forecast deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub entities: Vec<EntityEntry>,

    #[serde(default)]
    pub index_freq: IndexFrequency,

    #[serde(default)]
    pub evaluation: EvaluationMode,

    #[serde(default)]
    pub horizon: HorizonBounds,

    #[serde(default = "default_date_column")]
    pub date_column: String,

    #[serde(default = "default_prediction_label")]
    pub prediction_label: String,

    #[serde(default = "default_artifact_root")]
    pub artifact_root: PathBuf,

    /// Opaque link to an externally authored dashboard
    #[serde(default)]
    pub dashboard_url: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let entities = ["Todo", "Diners Club", "Produbanco"]
            .iter()
            .map(|name| {
                EntityEntry::new(
                    name,
                    &format!("datos_deploy/modelTesis_{}", name),
                    &format!("datos_deploy/Datos_{}.csv", name),
                )
            })
            .collect();

        Self {
            entities,
            index_freq: IndexFrequency::default(),
            evaluation: EvaluationMode::default(),
            horizon: HorizonBounds::default(),
            date_column: default_date_column(),
            prediction_label: default_prediction_label(),
            artifact_root: default_artifact_root(),
            dashboard_url: None,
        }
    }
}

impl PipelineConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot serve
    pub fn validate(&self) -> Result<()> {
        if self.entities.is_empty() {
            return Err(PipelineError::Config(
                "entity table must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.entities {
            if !seen.insert(entry.name.as_str()) {
                return Err(PipelineError::Config(format!(
                    "duplicate entity name: {}",
                    entry.name
                )));
            }
        }

        let HorizonBounds { min, max, default } = self.horizon;
        if min == 0 || min > max || default < min || default > max {
            return Err(PipelineError::Config(format!(
                "invalid horizon bounds: min={}, max={}, default={}",
                min, max, default
            )));
        }

        if self.date_column.trim().is_empty() {
            return Err(PipelineError::Config(
                "date column name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Resolve a model or data reference against an artifact root.
///
/// Absolute references are used as they are.
pub fn resolve_reference(root: &Path, reference: &str) -> PathBuf {
    let path = Path::new(reference);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn default_horizon_min() -> usize {
    1
}
fn default_horizon_max() -> usize {
    24
}
fn default_horizon_default() -> usize {
    3
}
fn default_date_column() -> String {
    "Fecha".to_string()
}
fn default_prediction_label() -> String {
    "Predicción".to_string()
}
fn default_artifact_root() -> PathBuf {
    PathBuf::from(".")
}
