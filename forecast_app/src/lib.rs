//! # Forecast App
//!
//! Terminal front end for [`card_forecast`]. It plays the part of the page:
//! it collects the entity and horizon, triggers the pipeline, and shows every
//! stage's output or error on a [`Renderer`].
//!
//! ## Example
//!
//! ```
//! use forecast_app::{Renderer, TextRenderer};
//!
//! let mut renderer = TextRenderer::new(Vec::new());
//! renderer.render_notice("Modelo cargado: modelTesis_Todo").unwrap();
//! assert_eq!(
//!     String::from_utf8(renderer.into_inner()).unwrap(),
//!     "Modelo cargado: modelTesis_Todo\n"
//! );
//! ```

use card_forecast::{PipelineResult, StageOutcome};
use tracing::debug;

pub mod render;

pub use render::{RenderError, Renderer, TextRenderer};

/// Show a pipeline result in page order.
///
/// Failed stages are shown as error messages and the remaining stages are
/// still presented. When the merged series is shown the result moves to the
/// rendered state.
pub fn present<R: Renderer>(result: &mut PipelineResult, renderer: &mut R) -> render::Result<()> {
    if let StageOutcome::Failed(err) = &result.selection {
        renderer.render_error(&err.user_message())?;
    }

    match &result.model {
        StageOutcome::Completed(name) => {
            renderer.render_notice(&format!("Modelo cargado: {}", name))?
        }
        StageOutcome::Failed(err) => renderer.render_error(&err.user_message())?,
        StageOutcome::Skipped => {}
    }

    match &result.historical {
        StageOutcome::Completed(series) => renderer.render_series(
            &format!("Valores reales de la entidad: {}", result.entity),
            series,
        )?,
        StageOutcome::Failed(err) => renderer.render_error(&err.user_message())?,
        StageOutcome::Skipped => {}
    }

    match &result.forecast {
        StageOutcome::Completed(forecast) => {
            renderer.render_forecast("Valores Predichos", forecast)?
        }
        StageOutcome::Failed(err) => renderer.render_error(&err.user_message())?,
        StageOutcome::Skipped => {}
    }

    match &result.metrics {
        StageOutcome::Completed(metrics) => renderer.render_metrics(metrics)?,
        StageOutcome::Failed(err) => renderer.render_error(&err.user_message())?,
        StageOutcome::Skipped => {}
    }

    let rendered = match &result.display {
        StageOutcome::Completed(display) => {
            renderer.render_display("Predicciones y Datos de Entrenamiento", display)?;
            true
        }
        StageOutcome::Failed(err) => {
            renderer.render_error(&err.user_message())?;
            false
        }
        StageOutcome::Skipped => false,
    };

    if rendered {
        result.mark_rendered();
    }
    debug!(state = ?result.final_state(), "Presented pipeline result");

    Ok(())
}
