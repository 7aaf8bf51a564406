//! Forecast serving pipeline
//!
//! One call to [`run_pipeline`] serves one user request: resolve the entity,
//! load its model and history, forecast, optionally back-test, and merge the
//! result for display. Each stage records its own outcome so that a failure
//! stops only the stages that depend on it.

use crate::config::{EvaluationMode, PipelineConfig};
use crate::data::{CsvDataSource, DataSource, TimeSeries};
use crate::error::{PipelineError, Result, Stage};
use crate::evaluation::{evaluate, MetricsReport};
use crate::generator::{ForecastGenerator, ForecastResult};
use crate::merge::{merge, DisplaySeries};
use crate::models::{FileModelRepository, ForecastingModel, ModelRepository};
use crate::registry::{EntityRefs, EntityRegistry, EntitySelection};
use tracing::{info, warn};

/// Outcome of a single pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Completed(T),
    Failed(PipelineError),
    /// Not run, either disabled or blocked by an earlier failure
    Skipped,
}

impl<T> StageOutcome<T> {
    fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => StageOutcome::Completed(value),
            Err(err) => StageOutcome::Failed(err),
        }
    }

    /// The stage's value, if it completed
    pub fn value(&self) -> Option<&T> {
        match self {
            StageOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    /// The stage's error, if it failed
    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            StageOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, StageOutcome::Completed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StageOutcome::Skipped)
    }
}

/// Progress of one prediction request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    LoadingModel,
    LoadingData,
    Generating,
    Evaluating,
    Merged,
    Rendered,
    Failed(Stage),
}

/// What the user asked for
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub selection: EntitySelection,
    pub horizon: usize,
    /// Overrides the configured evaluation mode when set
    pub evaluation: Option<EvaluationMode>,
}

impl PipelineRequest {
    pub fn new(selection: EntitySelection, horizon: usize) -> Self {
        Self {
            selection,
            horizon,
            evaluation: None,
        }
    }

    pub fn with_evaluation(mut self, mode: EvaluationMode) -> Self {
        self.evaluation = Some(mode);
        self
    }
}

/// Everything one request produced, stage by stage
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub entity: String,
    pub horizon: usize,
    /// Model and data references of the selected entity
    pub selection: StageOutcome<EntityRefs>,
    /// Name of the loaded model
    pub model: StageOutcome<String>,
    pub historical: StageOutcome<TimeSeries>,
    pub forecast: StageOutcome<ForecastResult>,
    pub metrics: StageOutcome<MetricsReport>,
    pub display: StageOutcome<DisplaySeries>,
    states: Vec<PipelineState>,
}

impl PipelineResult {
    fn new(entity: &str, horizon: usize) -> Self {
        Self {
            entity: entity.to_string(),
            horizon,
            selection: StageOutcome::Skipped,
            model: StageOutcome::Skipped,
            historical: StageOutcome::Skipped,
            forecast: StageOutcome::Skipped,
            metrics: StageOutcome::Skipped,
            display: StageOutcome::Skipped,
            states: vec![PipelineState::Idle],
        }
    }

    fn enter(&mut self, state: PipelineState) {
        self.states.push(state);
    }

    /// Final state: the first failing stage, or the last stage reached
    pub fn final_state(&self) -> PipelineState {
        self.errors()
            .first()
            .map(|err| PipelineState::Failed(err.stage()))
            .unwrap_or_else(|| {
                self.states
                    .last()
                    .copied()
                    .unwrap_or(PipelineState::Idle)
            })
    }

    /// States entered, in order
    pub fn states(&self) -> &[PipelineState] {
        &self.states
    }

    /// Errors from every failed stage, in pipeline order
    pub fn errors(&self) -> Vec<&PipelineError> {
        [
            self.selection.error(),
            self.model.error(),
            self.historical.error(),
            self.forecast.error(),
            self.metrics.error(),
            self.display.error(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Whether every stage that ran completed
    pub fn is_success(&self) -> bool {
        self.errors().is_empty()
    }

    /// Record that the display series reached the rendering surface
    pub fn mark_rendered(&mut self) {
        if self.final_state() == PipelineState::Merged {
            self.enter(PipelineState::Rendered);
        }
    }
}

/// Run one prediction request end to end.
///
/// Never panics on stage failures; inspect the returned [`PipelineResult`].
pub fn run_pipeline(
    config: &PipelineConfig,
    registry: &EntityRegistry,
    models: &dyn ModelRepository,
    data: &dyn DataSource,
    request: &PipelineRequest,
) -> PipelineResult {
    let mut result = PipelineResult::new(request.selection.name(), request.horizon);
    info!(
        entity = %request.selection,
        horizon = request.horizon,
        "Starting forecast pipeline"
    );

    result.selection = StageOutcome::from_result(registry.resolve(&request.selection));
    let refs = match result.selection.value().cloned() {
        Some(refs) => refs,
        None => {
            if let Some(err) = result.selection.error() {
                warn!(error = %err, "Entity resolution failed");
            }
            return result;
        }
    };

    // Model and data load independently of each other
    result.enter(PipelineState::LoadingModel);
    let model: Option<Box<dyn ForecastingModel>> = match models.load_model(&refs.model) {
        Ok(model) => {
            result.model = StageOutcome::Completed(model.name().to_string());
            Some(model)
        }
        Err(err) => {
            warn!(reference = %refs.model, error = %err, "Model loading failed");
            result.model = StageOutcome::Failed(err);
            None
        }
    };

    result.enter(PipelineState::LoadingData);
    result.historical = StageOutcome::from_result(data.load_series(&refs.data));
    if let Some(err) = result.historical.error() {
        warn!(reference = %refs.data, error = %err, "Historical data loading failed");
    }

    let history = result.historical.value().cloned();
    let (model, history) = match (model, history) {
        (Some(model), Some(history)) => (model, history),
        _ => return result,
    };

    result.enter(PipelineState::Generating);
    let generator = ForecastGenerator::new(config.index_freq, &config.prediction_label);
    let forecast = config
        .horizon
        .check(request.horizon)
        .and_then(|horizon| generator.generate(model.as_ref(), &history, horizon));
    result.forecast = StageOutcome::from_result(forecast);

    let forecast = match result.forecast.value().cloned() {
        Some(forecast) => forecast,
        None => {
            if let Some(err) = result.forecast.error() {
                warn!(error = %err, "Forecast generation failed");
            }
            return result;
        }
    };

    let mode = request.evaluation.unwrap_or(config.evaluation);
    if mode.is_enabled() {
        result.enter(PipelineState::Evaluating);
        result.metrics = StageOutcome::from_result(evaluate(&forecast, &history.primary_values()));
        if let Some(err) = result.metrics.error() {
            warn!(error = %err, "Evaluation failed");
        }
    }

    result.display = StageOutcome::from_result(merge(&history, &forecast));
    if result.display.is_completed() {
        result.enter(PipelineState::Merged);
    }

    info!(state = ?result.final_state(), "Forecast pipeline finished");
    result
}

/// A configured deployment: registry plus file-backed model and data stores
#[derive(Debug, Clone)]
pub struct ForecastService {
    config: PipelineConfig,
    registry: EntityRegistry,
    models: FileModelRepository,
    data: CsvDataSource,
}

impl ForecastService {
    /// Build a service from a validated configuration
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let registry = EntityRegistry::new(config.entities.clone())?;
        let models = FileModelRepository::new(&config.artifact_root);
        let data = CsvDataSource::new(&config.artifact_root, &config.date_column);

        Ok(Self {
            config,
            registry,
            models,
            data,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Select an entity by name from the closed set
    pub fn select(&self, name: &str) -> Result<EntitySelection> {
        self.registry.select(name)
    }

    /// Serve one request, reloading model and data from disk
    pub fn run(&self, request: &PipelineRequest) -> PipelineResult {
        run_pipeline(
            &self.config,
            &self.registry,
            &self.models,
            &self.data,
            request,
        )
    }
}
