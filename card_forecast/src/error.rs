//! Error types for the card_forecast crate

use forecast_math::MathError;
use std::fmt;
use thiserror::Error;

/// Pipeline stage that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Entity selection and configuration
    Selection,
    /// Model artifact loading
    ModelLoading,
    /// Historical data loading
    DataLoading,
    /// Forecast generation and index reconstruction
    Generation,
    /// Back-test evaluation
    Evaluation,
    /// Historical/forecast concatenation
    Merge,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Selection => "selection",
            Stage::ModelLoading => "model loading",
            Stage::DataLoading => "data loading",
            Stage::Generation => "generation",
            Stage::Evaluation => "evaluation",
            Stage::Merge => "merge",
        };
        f.write_str(name)
    }
}

/// Errors produced by the forecast serving pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Model artifact is absent, unreadable or undecodable
    #[error("Model not found: {reference} ({reason})")]
    ModelNotFound { reference: String, reason: String },

    /// Historical data file is absent or malformed
    #[error("Data not found: {reference} ({reason})")]
    DataNotFound { reference: String, reason: String },

    /// Error during model inference or index generation
    #[error("Prediction failure: {0}")]
    PredictionFailure(String),

    /// Insufficient overlap or mismatched lengths during evaluation
    #[error("Evaluation failure: {0}")]
    EvaluationFailure(String),

    /// Historical and forecast timestamps overlap or are out of order
    #[error("Merge inconsistency: {0}")]
    MergeInconsistency(String),

    /// Entity name outside the configured closed set
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Stage that produced this error
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::ModelNotFound { .. } => Stage::ModelLoading,
            PipelineError::DataNotFound { .. } => Stage::DataLoading,
            PipelineError::PredictionFailure(_) => Stage::Generation,
            PipelineError::EvaluationFailure(_) => Stage::Evaluation,
            PipelineError::MergeInconsistency(_) => Stage::Merge,
            PipelineError::UnknownEntity(_) | PipelineError::Config(_) => Stage::Selection,
        }
    }

    /// Message shown to the end user
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::ModelNotFound { .. } => {
                "Modelo no encontrado. Verifique la ruta y vuelva a intentarlo.".to_string()
            }
            PipelineError::DataNotFound { .. } => {
                "Datos no encontrados. Verifique la ruta y vuelva a intentarlo.".to_string()
            }
            PipelineError::PredictionFailure(msg) => {
                format!("Ha ocurrido un error durante la predicción: {}", msg)
            }
            PipelineError::EvaluationFailure(msg) => {
                format!("No se pudieron calcular las métricas: {}", msg)
            }
            PipelineError::MergeInconsistency(msg) => {
                format!("Las fechas históricas y predichas se superponen: {}", msg)
            }
            PipelineError::UnknownEntity(name) => {
                format!("Entidad financiera desconocida: {}", name)
            }
            PipelineError::Config(msg) => format!("Configuración inválida: {}", msg),
        }
    }

    pub(crate) fn model_not_found(reference: &str, reason: impl ToString) -> Self {
        PipelineError::ModelNotFound {
            reference: reference.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn data_not_found(reference: &str, reason: impl ToString) -> Self {
        PipelineError::DataNotFound {
            reference: reference.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<MathError> for PipelineError {
    fn from(err: MathError) -> Self {
        PipelineError::EvaluationFailure(err.to_string())
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, PipelineError>;
