//! Forecast generation with calendar index reconstruction
//!
//! Models count periods however they like. The generator keeps only their
//! values and dates them as consecutive months right after the last
//! historical observation.

use crate::calendar::{month_range, IndexFrequency};
use crate::data::TimeSeries;
use crate::error::{PipelineError, Result};
use crate::models::ForecastingModel;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

/// Dated point forecasts under a presentation label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    label: String,
    model_name: String,
    points: Vec<(NaiveDate, f64)>,
}

impl ForecastResult {
    /// Create a forecast result, checking that dates strictly increase
    pub fn new(label: &str, model_name: &str, points: Vec<(NaiveDate, f64)>) -> Result<Self> {
        if points.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(PipelineError::PredictionFailure(
                "forecast dates must be strictly increasing".to_string(),
            ));
        }

        Ok(Self {
            label: label.to_string(),
            model_name: model_name.to_string(),
            points,
        })
    }

    /// Column label used for presentation
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name of the model that produced the values
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// `(date, value)` pairs in order
    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    /// Forecast dates in order
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|(d, _)| *d).collect()
    }

    /// Forecast values in order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    /// Number of forecast periods
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Produces dated forecasts from loaded models
#[derive(Debug, Clone)]
pub struct ForecastGenerator {
    frequency: IndexFrequency,
    label: String,
}

impl ForecastGenerator {
    pub fn new(frequency: IndexFrequency, label: &str) -> Self {
        Self {
            frequency,
            label: label.to_string(),
        }
    }

    /// Forecast `horizon` periods past the end of `history`
    pub fn generate(
        &self,
        model: &dyn ForecastingModel,
        history: &TimeSeries,
        horizon: usize,
    ) -> Result<ForecastResult> {
        let anchor = history.last_date().ok_or_else(|| {
            PipelineError::PredictionFailure(
                "historical series is empty, no anchor date for the forecast".to_string(),
            )
        })?;

        self.generate_from_anchor(model, anchor, horizon)
    }

    /// Forecast `horizon` periods past `anchor`, the last known date
    pub fn generate_from_anchor(
        &self,
        model: &dyn ForecastingModel,
        anchor: NaiveDate,
        horizon: usize,
    ) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(PipelineError::PredictionFailure(
                "horizon must be positive".to_string(),
            ));
        }

        info!(model = model.name(), %anchor, horizon, "Generating forecast");

        let raw = model.predict(horizon).map_err(|e| match e {
            PipelineError::PredictionFailure(_) => e,
            other => PipelineError::PredictionFailure(other.to_string()),
        })?;

        if raw.len() != horizon {
            return Err(PipelineError::PredictionFailure(format!(
                "model {} returned {} points for a horizon of {}",
                model.name(),
                raw.len(),
                horizon
            )));
        }

        let start = anchor.checked_add_days(Days::new(1)).ok_or_else(|| {
            PipelineError::PredictionFailure(format!("no date follows {}", anchor))
        })?;
        let dates = month_range(start, horizon, self.frequency)?;

        debug!(
            first = %dates[0],
            last = %dates[dates.len() - 1],
            "Rebuilt forecast index"
        );

        let points = dates
            .into_iter()
            .zip(raw.into_iter().map(|p| p.value))
            .collect();

        ForecastResult::new(&self.label, model.name(), points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawPrediction;

    #[derive(Debug)]
    struct CountingModel {
        len_offset: isize,
    }

    impl ForecastingModel for CountingModel {
        fn name(&self) -> &str {
            "counting"
        }

        fn predict(&self, horizon: usize) -> Result<Vec<RawPrediction>> {
            let n = (horizon as isize + self.len_offset).max(0) as usize;
            // Epoch-style index that must be ignored
            Ok((0..n)
                .map(|i| RawPrediction {
                    index: 1_700_000_000 + i as i64,
                    value: i as f64,
                })
                .collect())
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dates_follow_anchor() {
        let generator = ForecastGenerator::new(IndexFrequency::MonthStart, "Predicción");
        let model = CountingModel { len_offset: 0 };
        let result = generator
            .generate_from_anchor(&model, ymd(2023, 12, 1), 3)
            .unwrap();

        assert_eq!(
            result.dates(),
            vec![ymd(2024, 1, 1), ymd(2024, 2, 1), ymd(2024, 3, 1)]
        );
        assert_eq!(result.values(), vec![0.0, 1.0, 2.0]);
        assert_eq!(result.label(), "Predicción");
    }

    #[test]
    fn test_month_end_mode() {
        let generator = ForecastGenerator::new(IndexFrequency::MonthEnd, "y");
        let model = CountingModel { len_offset: 0 };
        let result = generator
            .generate_from_anchor(&model, ymd(2023, 11, 30), 2)
            .unwrap();
        assert_eq!(result.dates(), vec![ymd(2023, 12, 31), ymd(2024, 1, 31)]);
    }

    #[test]
    fn test_wrong_point_count_fails() {
        let generator = ForecastGenerator::new(IndexFrequency::MonthStart, "y");
        let model = CountingModel { len_offset: -1 };
        assert!(matches!(
            generator.generate_from_anchor(&model, ymd(2023, 12, 1), 3),
            Err(PipelineError::PredictionFailure(_))
        ));
    }

    #[test]
    fn test_empty_history_fails_fast() {
        let generator = ForecastGenerator::new(IndexFrequency::MonthStart, "y");
        let history = TimeSeries::univariate("y", vec![]).unwrap();
        let err = generator
            .generate(&CountingModel { len_offset: 0 }, &history, 3)
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let generator = ForecastGenerator::new(IndexFrequency::MonthStart, "y");
        assert!(generator
            .generate_from_anchor(&CountingModel { len_offset: 0 }, ymd(2023, 1, 1), 0)
            .is_err());
    }
}
