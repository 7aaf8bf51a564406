//! Presentation merge of historical and forecast series

use crate::data::TimeSeries;
use crate::error::{PipelineError, Result};
use crate::generator::ForecastResult;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

/// One dated row of the display table; `None` marks a column without a value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// Historical columns followed by the forecast column, in date order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySeries {
    columns: Vec<String>,
    rows: Vec<DisplayRow>,
}

impl DisplaySeries {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Values of one column, `None` where the column has no entry
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }
}

/// Concatenate history and forecast along the time axis.
///
/// The forecast must start strictly after the last historical date; any
/// overlap points at a broken anchor upstream and is reported as
/// [`PipelineError::MergeInconsistency`].
pub fn merge(historical: &TimeSeries, forecast: &ForecastResult) -> Result<DisplaySeries> {
    if let (Some(last), Some((first, _))) = (historical.last_date(), forecast.points().first()) {
        if *first <= last {
            warn!(
                last_historical = %last,
                first_forecast = %first,
                "Forecast overlaps historical data"
            );
            return Err(PipelineError::MergeInconsistency(format!(
                "forecast starts at {} but history ends at {}",
                first, last
            )));
        }
    }

    let mut columns: Vec<String> = historical.columns().to_vec();
    let forecast_column = forecast_column_name(&columns, forecast);
    columns.push(forecast_column);

    let width = columns.len();
    let mut rows = Vec::with_capacity(historical.len() + forecast.len());

    for (date, values) in historical.dates().iter().zip(historical.rows()) {
        let mut row: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
        row.push(None);
        rows.push(DisplayRow {
            date: *date,
            values: row,
        });
    }

    for (date, value) in forecast.points() {
        let mut row = vec![None; width - 1];
        row.push(Some(*value));
        rows.push(DisplayRow {
            date: *date,
            values: row,
        });
    }

    if let Some(pair) = rows.windows(2).find(|w| w[1].date <= w[0].date) {
        warn!(date = %pair[1].date, "Display series is not strictly increasing");
        return Err(PipelineError::MergeInconsistency(format!(
            "duplicate or out-of-order date {}",
            pair[1].date
        )));
    }

    Ok(DisplaySeries { columns, rows })
}

/// Forecast label, made unique against the history columns
fn forecast_column_name(columns: &[String], forecast: &ForecastResult) -> String {
    let taken = |name: &str| columns.iter().any(|c| c == name);

    let label = forecast.label().to_string();
    if !taken(&label) {
        return label;
    }

    let qualified = format!("{} ({})", forecast.label(), forecast.model_name());
    let mut candidate = qualified.clone();
    let mut n = 2;
    while taken(&candidate) {
        candidate = format!("{} {}", qualified, n);
        n += 1;
    }
    candidate
}
