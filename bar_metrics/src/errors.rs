use chrono::NaiveDate;
use thiserror::Error;

/// Errors produced by the metric calculations.
///
/// None of these are fatal; a caller receiving [`MetricsError::EmptySeries`]
/// should show "no data available" and carry on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// No bars were supplied.
    #[error("bar series is empty")]
    EmptySeries,

    /// A numeric input was NaN, infinite, or negative where that is not allowed.
    #[error("invalid input for {field}: {value}")]
    InvalidInput { field: &'static str, value: f64 },

    /// Bars are not strictly increasing by date.
    #[error("bars are not strictly increasing by date at {date}")]
    UnorderedBars { date: NaiveDate },
}

/// Rejects NaN, infinities and negative values. Prices and volumes are never
/// below zero.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64, MetricsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MetricsError::InvalidInput { field, value })
    }
}
