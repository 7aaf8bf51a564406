//! Rendering surfaces for pipeline output

use card_forecast::{DisplaySeries, ForecastResult, MetricsReport, TimeSeries};
use std::io::{self, Write};
use thiserror::Error;

/// Errors raised while writing to a rendering surface
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// A surface that can show series, tables, metrics and messages
pub trait Renderer {
    /// Show the historical observations
    fn render_series(&mut self, title: &str, series: &TimeSeries) -> Result<()>;

    /// Show the predicted values on their own
    fn render_forecast(&mut self, title: &str, forecast: &ForecastResult) -> Result<()>;

    /// Show history and forecast together
    fn render_display(&mut self, title: &str, display: &DisplaySeries) -> Result<()>;

    fn render_metrics(&mut self, metrics: &MetricsReport) -> Result<()>;

    /// Show a user-facing error
    fn render_error(&mut self, message: &str) -> Result<()>;

    /// Show an informational line
    fn render_notice(&mut self, message: &str) -> Result<()>;
}

/// Decimals printed for values
const PRECISION: usize = 2;

/// Plain-text tables for terminals and logs
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&mut self, title: &str) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", title)?;
        writeln!(self.out, "{}", "=".repeat(title.chars().count()))?;
        Ok(())
    }

    fn table<I>(&mut self, columns: &[String], rows: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, Vec<Option<f64>>)>,
    {
        let cells: Vec<(String, Vec<String>)> = rows
            .into_iter()
            .map(|(date, values)| {
                let values = values
                    .into_iter()
                    .map(|v| match v {
                        Some(v) => format!("{:.*}", PRECISION, v),
                        None => String::new(),
                    })
                    .collect();
                (date, values)
            })
            .collect();

        let date_width = cells
            .iter()
            .map(|(d, _)| d.len())
            .max()
            .unwrap_or(0)
            .max("Fecha".len());

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|(_, v)| v[i].chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(name.chars().count())
            })
            .collect();

        write!(self.out, "{:<width$}", "Fecha", width = date_width)?;
        for (name, width) in columns.iter().zip(&widths) {
            write!(self.out, "  {:>width$}", name, width = width)?;
        }
        writeln!(self.out)?;

        for (date, values) in &cells {
            write!(self.out, "{:<width$}", date, width = date_width)?;
            for (value, width) in values.iter().zip(&widths) {
                write!(self.out, "  {:>width$}", value, width = width)?;
            }
            writeln!(self.out)?;
        }

        Ok(())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render_series(&mut self, title: &str, series: &TimeSeries) -> Result<()> {
        self.heading(title)?;
        let rows = series
            .dates()
            .iter()
            .zip(series.rows())
            .map(|(date, row)| (date.to_string(), row.iter().copied().map(Some).collect()));
        self.table(series.columns(), rows)
    }

    fn render_forecast(&mut self, title: &str, forecast: &ForecastResult) -> Result<()> {
        self.heading(title)?;
        let rows = forecast
            .points()
            .iter()
            .map(|(date, value)| (date.to_string(), vec![Some(*value)]));
        self.table(&[forecast.label().to_string()], rows)
    }

    fn render_display(&mut self, title: &str, display: &DisplaySeries) -> Result<()> {
        self.heading(title)?;
        let rows = display
            .rows()
            .iter()
            .map(|row| (row.date.to_string(), row.values.clone()));
        self.table(display.columns(), rows)
    }

    fn render_metrics(&mut self, metrics: &MetricsReport) -> Result<()> {
        writeln!(self.out)?;
        write!(self.out, "{}", metrics)?;
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "ERROR: {}", message)?;
        Ok(())
    }

    fn render_notice(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", message)?;
        Ok(())
    }
}
