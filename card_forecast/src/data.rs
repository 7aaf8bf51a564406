//! Historical time series handling

use crate::config::resolve_reference;
use crate::error::{PipelineError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Date formats accepted in the designated date column
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A chronologically ordered table of numeric observations.
///
/// Dates are unique and strictly increasing; every row carries one value per
/// column.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    columns: Vec<String>,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<f64>>,
}

impl TimeSeries {
    /// Create a series from named columns and `(date, row)` points
    pub fn new(columns: Vec<String>, points: Vec<(NaiveDate, Vec<f64>)>) -> Result<Self> {
        if columns.is_empty() {
            return Err(invalid("series needs at least one value column"));
        }

        let mut dates = Vec::with_capacity(points.len());
        let mut rows = Vec::with_capacity(points.len());

        for (date, row) in points {
            if row.len() != columns.len() {
                return Err(invalid(format!(
                    "row for {} has {} values, expected {}",
                    date,
                    row.len(),
                    columns.len()
                )));
            }
            if let Some(prev) = dates.last() {
                if date <= *prev {
                    return Err(invalid(format!(
                        "dates must be strictly increasing: {} follows {}",
                        date, prev
                    )));
                }
            }
            dates.push(date);
            rows.push(row);
        }

        Ok(Self {
            columns,
            dates,
            rows,
        })
    }

    /// Create a single-column series
    pub fn univariate(column: &str, points: Vec<(NaiveDate, f64)>) -> Result<Self> {
        Self::new(
            vec![column.to_string()],
            points.into_iter().map(|(d, v)| (d, vec![v])).collect(),
        )
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the series has no observations
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Value column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Observation dates in order
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Rows of values, aligned with [`TimeSeries::dates`]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Values of one column
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Values of the first column, the forecast target
    pub fn primary_values(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row[0]).collect()
    }

    /// Last observed date, the forecast anchor
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Source of historical series, addressed by reference
pub trait DataSource {
    /// Load the series behind `reference`
    fn load_series(&self, reference: &str) -> Result<TimeSeries>;
}

/// Reads historical series from CSV files on disk
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    root: PathBuf,
    date_column: String,
}

impl CsvDataSource {
    /// Create a source resolving relative references against `root`
    pub fn new<P: AsRef<Path>>(root: P, date_column: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            date_column: date_column.to_string(),
        }
    }

    /// Load a series from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, date_column: &str) -> Result<TimeSeries> {
        let path = path.as_ref();
        let reference = path.display().to_string();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| PipelineError::data_not_found(&reference, e))?;

        let headers = reader
            .headers()
            .map_err(|e| PipelineError::data_not_found(&reference, e))?
            .clone();

        let date_idx = headers
            .iter()
            .position(|h| h == date_column)
            .ok_or_else(|| {
                PipelineError::data_not_found(
                    &reference,
                    format!("no '{}' column in header", date_column),
                )
            })?;

        let columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(_, h)| h.to_string())
            .collect();

        let mut points = Vec::new();
        for (line, record) in reader.records().enumerate() {
            // Header is row 1
            let row_number = line + 2;
            let record = record.map_err(|e| PipelineError::data_not_found(&reference, e))?;

            let date = record
                .get(date_idx)
                .and_then(parse_date)
                .ok_or_else(|| {
                    PipelineError::data_not_found(
                        &reference,
                        format!("row {}: unparseable date", row_number),
                    )
                })?;

            let mut values = Vec::with_capacity(columns.len());
            for (i, field) in record.iter().enumerate() {
                if i == date_idx {
                    continue;
                }
                let value = field.parse::<f64>().map_err(|_| {
                    PipelineError::data_not_found(
                        &reference,
                        format!("row {}: '{}' is not numeric", row_number, field),
                    )
                })?;
                values.push(value);
            }
            points.push((date, values));
        }

        if points.windows(2).any(|w| w[1].0 < w[0].0) {
            warn!(path = %reference, "Rows are not in date order, sorting by date");
            points.sort_by_key(|(date, _)| *date);
        }

        let series = TimeSeries::new(columns, points).map_err(|e| match e {
            PipelineError::DataNotFound { reason, .. } => {
                PipelineError::data_not_found(&reference, reason)
            }
            other => other,
        })?;

        debug!(path = %reference, rows = series.len(), "Parsed historical series");
        Ok(series)
    }
}

impl DataSource for CsvDataSource {
    fn load_series(&self, reference: &str) -> Result<TimeSeries> {
        let path = resolve_reference(&self.root, reference);

        info!(reference, path = %path.display(), "Loading historical data");
        Self::from_csv(&path, &self.date_column).map_err(|e| match e {
            PipelineError::DataNotFound { reason, .. } => {
                PipelineError::data_not_found(reference, reason)
            }
            other => other,
        })
    }
}

/// Parse a date cell, accepting date-only and date-time layouts
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn invalid(reason: impl ToString) -> PipelineError {
    PipelineError::data_not_found("<in-memory>", reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2023-12-01"), Some(ymd(2023, 12, 1)));
        assert_eq!(parse_date("01/12/2023"), Some(ymd(2023, 12, 1)));
        assert_eq!(parse_date("2023-12-01 00:00:00"), Some(ymd(2023, 12, 1)));
        assert_eq!(parse_date("December"), None);
    }

    #[test]
    fn test_rejects_unordered_dates() {
        let result = TimeSeries::univariate(
            "y",
            vec![(ymd(2023, 2, 1), 1.0), (ymd(2023, 1, 1), 2.0)],
        );
        assert!(result.is_err());

        let result = TimeSeries::univariate(
            "y",
            vec![(ymd(2023, 1, 1), 1.0), (ymd(2023, 1, 1), 2.0)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_accessors() {
        let series = TimeSeries::new(
            vec!["a".into(), "b".into()],
            vec![
                (ymd(2023, 1, 1), vec![1.0, 10.0]),
                (ymd(2023, 2, 1), vec![2.0, 20.0]),
                (ymd(2023, 3, 1), vec![3.0, 30.0]),
            ],
        )
        .unwrap();

        assert_eq!(series.primary_values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.column("b"), Some(vec![10.0, 20.0, 30.0]));
        assert_eq!(series.column("c"), None);
        assert_eq!(series.last_date(), Some(ymd(2023, 3, 1)));
    }
}
