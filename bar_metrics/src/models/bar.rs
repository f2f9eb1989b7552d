//! Canonical in-memory representation of a daily-or-coarser bar (OHLCV).
//!
//! Every provider converts its vendor rows into this struct before any
//! metric is computed, so the calculations never see vendor-specific shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::MetricsError;

/// A single OHLCV sample for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date of the bar (exchange-local calendar date).
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the bar interval.
    pub volume: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Checks that `bars` are strictly increasing by date.
///
/// Returns [`MetricsError::UnorderedBars`] with the first date that is not
/// after its predecessor (this also catches duplicated dates).
pub fn ensure_strictly_increasing(bars: &[Bar]) -> Result<(), MetricsError> {
    match bars.windows(2).find(|w| w[1].date <= w[0].date) {
        Some(w) => Err(MetricsError::UnorderedBars { date: w[1].date }),
        None => Ok(()),
    }
}

/// Sorts raw rows by date and keeps the last row seen for a duplicated date.
///
/// Vendors occasionally repeat the current session as an extra row; the later
/// row is the fresher one.
pub fn normalize_bars(mut bars: Vec<Bar>) -> Vec<Bar> {
    // stable sort keeps arrival order within a date
    bars.sort_by_key(|b| b.date);

    let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => out.push(bar),
        }
    }
    out
}
