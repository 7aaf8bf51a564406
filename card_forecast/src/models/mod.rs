//! Pre-trained forecasting models and the repository that loads them
//!
//! Models arrive fully fitted; this crate only deserializes their state and
//! asks them for point forecasts.

use crate::config::resolve_reference;
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub mod exponential_smoothing;
pub mod linear_trend;
pub mod moving_average;

pub use exponential_smoothing::{ExponentialSmoothing, HoltLinear};
pub use linear_trend::LinearTrend;
pub use moving_average::{MovingAverage, SeasonalNaive};

/// One predicted point, indexed the way the model counts periods
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    /// Model-internal period index
    pub index: i64,
    /// Predicted value
    pub value: f64,
}

/// A loaded model ready to predict
pub trait ForecastingModel: Debug {
    /// Name of the model
    fn name(&self) -> &str;

    /// Predict exactly `horizon` future points
    fn predict(&self, horizon: usize) -> Result<Vec<RawPrediction>>;
}

/// Resolves model references into loaded models
pub trait ModelRepository {
    /// Load the model behind `reference`
    fn load_model(&self, reference: &str) -> Result<Box<dyn ForecastingModel>>;
}

/// Serialized state of a fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    SimpleExpSmoothing(ExponentialSmoothing),
    HoltLinear(HoltLinear),
    MovingAverage(MovingAverage),
    SeasonalNaive(SeasonalNaive),
    LinearTrend(LinearTrend),
}

impl ModelArtifact {
    /// Check the stored parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::SimpleExpSmoothing(m) => m.validate(),
            ModelArtifact::HoltLinear(m) => m.validate(),
            ModelArtifact::MovingAverage(m) => m.validate(),
            ModelArtifact::SeasonalNaive(m) => m.validate(),
            ModelArtifact::LinearTrend(m) => m.validate(),
        }
    }

    /// Point forecasts for the next `horizon` periods
    pub fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        match self {
            ModelArtifact::SimpleExpSmoothing(m) => Ok(m.forecast(horizon)),
            ModelArtifact::HoltLinear(m) => Ok(m.forecast(horizon)),
            ModelArtifact::MovingAverage(m) => Ok(m.forecast(horizon)),
            ModelArtifact::SeasonalNaive(m) => Ok(m.forecast(horizon)),
            ModelArtifact::LinearTrend(m) => m.forecast(horizon),
        }
    }

    /// Short description of the model family
    pub fn family(&self) -> &'static str {
        match self {
            ModelArtifact::SimpleExpSmoothing(_) => "simple exponential smoothing",
            ModelArtifact::HoltLinear(_) => "holt linear trend",
            ModelArtifact::MovingAverage(_) => "moving average",
            ModelArtifact::SeasonalNaive(_) => "seasonal naive",
            ModelArtifact::LinearTrend(_) => "linear trend",
        }
    }
}

/// On-disk model file: a display name plus the fitted state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub name: String,
    pub model: ModelArtifact,
}

impl ModelFile {
    pub fn new(name: &str, model: ModelArtifact) -> Self {
        Self {
            name: name.to_string(),
            model,
        }
    }

    /// Write the model file as pretty-printed JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|e| {
            PipelineError::model_not_found(&path.display().to_string(), e)
        })?;
        fs::write(path, text)
            .map_err(|e| PipelineError::model_not_found(&path.display().to_string(), e))
    }

    /// Read and validate a model file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reference = path.display().to_string();
        let text =
            fs::read_to_string(path).map_err(|e| PipelineError::model_not_found(&reference, e))?;
        let file: Self = serde_json::from_str(&text)
            .map_err(|e| PipelineError::model_not_found(&reference, e))?;
        file.model
            .validate()
            .map_err(|e| PipelineError::model_not_found(&reference, e))?;
        Ok(file)
    }
}

/// A model file turned into a [`ForecastingModel`]
#[derive(Debug, Clone)]
pub struct LoadedModel {
    name: String,
    artifact: ModelArtifact,
}

impl LoadedModel {
    pub fn new(name: &str, artifact: ModelArtifact) -> Self {
        Self {
            name: name.to_string(),
            artifact,
        }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }
}

impl From<ModelFile> for LoadedModel {
    fn from(file: ModelFile) -> Self {
        Self {
            name: file.name,
            artifact: file.model,
        }
    }
}

impl ForecastingModel for LoadedModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, horizon: usize) -> Result<Vec<RawPrediction>> {
        let values = self.artifact.forecast(horizon)?;
        let indices: Vec<i64> = match &self.artifact {
            ModelArtifact::LinearTrend(m) => m.positions(horizon)?,
            _ => (1..=horizon as i64).collect(),
        };

        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(PipelineError::PredictionFailure(format!(
                "{} produced a non-finite value: {}",
                self.name, bad
            )));
        }

        Ok(indices
            .into_iter()
            .zip(values)
            .map(|(index, value)| RawPrediction { index, value })
            .collect())
    }
}

/// Loads JSON model files from a directory
#[derive(Debug, Clone)]
pub struct FileModelRepository {
    root: PathBuf,
}

impl FileModelRepository {
    /// Create a repository resolving relative references against `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the model file behind `reference`.
    ///
    /// References without an extension get `.json` appended.
    pub fn artifact_path(&self, reference: &str) -> PathBuf {
        let mut path = resolve_reference(&self.root, reference);

        if path.extension().is_none() {
            let mut file_name = path.file_name().unwrap_or_default().to_os_string();
            file_name.push(".json");
            path.set_file_name(file_name);
        }

        path
    }
}

impl ModelRepository for FileModelRepository {
    fn load_model(&self, reference: &str) -> Result<Box<dyn ForecastingModel>> {
        let path = self.artifact_path(reference);
        info!(reference, path = %path.display(), "Loading model");

        let file = ModelFile::load_json(&path).map_err(|e| match e {
            PipelineError::ModelNotFound { reason, .. } => {
                PipelineError::model_not_found(reference, reason)
            }
            other => other,
        })?;

        debug!(name = %file.name, family = file.model.family(), "Model loaded");
        Ok(Box::new(LoadedModel::from(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_json_shape() {
        let file = ModelFile::new(
            "modelTesis_Todo",
            ModelArtifact::HoltLinear(HoltLinear::new(10.0, 1.0, None).unwrap()),
        );
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["model"]["kind"], "holt_linear");
        assert_eq!(json["model"]["level"], 10.0);
    }

    #[test]
    fn test_linear_trend_keeps_its_own_index() {
        let model = LoadedModel::new(
            "trend",
            ModelArtifact::LinearTrend(LinearTrend::new(0.0, 1.0, 40).unwrap()),
        );
        let predictions = model.predict(2).unwrap();
        assert_eq!(predictions[0], RawPrediction { index: 41, value: 41.0 });
        assert_eq!(predictions[1].index, 42);
    }

    #[test]
    fn test_predict_returns_horizon_points() {
        let model = LoadedModel::new(
            "ses",
            ModelArtifact::SimpleExpSmoothing(ExponentialSmoothing::new(5.0).unwrap()),
        );
        let predictions = model.predict(4).unwrap();
        assert_eq!(predictions.len(), 4);
        assert_eq!(predictions[3].index, 4);
    }

    #[test]
    fn test_overflowing_values_fail() {
        let model = LoadedModel::new(
            "huge",
            ModelArtifact::HoltLinear(HoltLinear::new(f64::MAX, f64::MAX, None).unwrap()),
        );
        assert!(matches!(
            model.predict(3),
            Err(PipelineError::PredictionFailure(_))
        ));
    }

    #[test]
    fn test_artifact_path_appends_extension() {
        let repo = FileModelRepository::new("/srv/models");
        assert_eq!(
            repo.artifact_path("datos_deploy/modelTesis_Diners Club"),
            PathBuf::from("/srv/models/datos_deploy/modelTesis_Diners Club.json")
        );
        assert_eq!(
            repo.artifact_path("custom/model.json"),
            PathBuf::from("/srv/models/custom/model.json")
        );
    }
}
