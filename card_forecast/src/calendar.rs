//! Monthly calendar index generation

use crate::error::{PipelineError, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where in the month synthesized forecast dates fall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexFrequency {
    /// First calendar day of each month
    #[default]
    MonthStart,
    /// Last calendar day of each month
    MonthEnd,
}

impl fmt::Display for IndexFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexFrequency::MonthStart => f.write_str("month_start"),
            IndexFrequency::MonthEnd => f.write_str("month_end"),
        }
    }
}

/// Generate `periods` consecutive month boundaries.
///
/// The first date is the first boundary on or after `start`, so a month-start
/// range starting on the 2nd of a month begins on the 1st of the next month.
pub fn month_range(
    start: NaiveDate,
    periods: usize,
    frequency: IndexFrequency,
) -> Result<Vec<NaiveDate>> {
    let first = first_boundary(start, frequency)?;

    (0..periods)
        .map(|offset| {
            let months = u32::try_from(offset).map_err(|_| out_of_range(start))?;
            let month_start = first_of_month(first)
                .checked_add_months(Months::new(months))
                .ok_or_else(|| out_of_range(start))?;
            match frequency {
                IndexFrequency::MonthStart => Ok(month_start),
                IndexFrequency::MonthEnd => last_of_month(month_start),
            }
        })
        .collect()
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`
pub fn last_of_month(date: NaiveDate) -> Result<NaiveDate> {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

fn first_boundary(start: NaiveDate, frequency: IndexFrequency) -> Result<NaiveDate> {
    match frequency {
        IndexFrequency::MonthStart if start.day() == 1 => Ok(start),
        IndexFrequency::MonthStart => first_of_month(start)
            .checked_add_months(Months::new(1))
            .ok_or_else(|| out_of_range(start)),
        IndexFrequency::MonthEnd => last_of_month(start),
    }
}

fn out_of_range(date: NaiveDate) -> PipelineError {
    PipelineError::PredictionFailure(format!("date range starting at {} is out of range", date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_start_rolls_to_next_month() {
        let dates = month_range(ymd(2023, 12, 2), 3, IndexFrequency::MonthStart).unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 2, 1), ymd(2024, 3, 1)]);
    }

    #[test]
    fn test_month_start_on_boundary_is_kept() {
        let dates = month_range(ymd(2024, 1, 1), 2, IndexFrequency::MonthStart).unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 2, 1)]);
    }

    #[test]
    fn test_month_end_handles_leap_february() {
        let dates = month_range(ymd(2024, 1, 1), 3, IndexFrequency::MonthEnd).unwrap();
        assert_eq!(dates, vec![ymd(2024, 1, 31), ymd(2024, 2, 29), ymd(2024, 3, 31)]);
    }

    #[test]
    fn test_zero_periods() {
        assert!(month_range(ymd(2024, 1, 1), 0, IndexFrequency::MonthEnd)
            .unwrap()
            .is_empty());
    }
}
