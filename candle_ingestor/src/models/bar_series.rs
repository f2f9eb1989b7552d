//! A collection of bars for a specific symbol and timeframe.

use bar_metrics::{Bar, MetricsError, ensure_strictly_increasing};
use serde::{Deserialize, Serialize};

use crate::models::timeframe::TimeFrame;

/// Represents a complete set of time-series data for a single symbol.
///
/// This struct groups a vector of [`Bar`]s with their corresponding symbol
/// and [`TimeFrame`], making the data set self-describing. The bars are
/// strictly increasing by date; [`BarSeries::new`] is the only way to build
/// one from outside the crate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    symbol: String,
    timeframe: TimeFrame,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Builds a series, rejecting bars that are not strictly increasing by date.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: TimeFrame,
        bars: Vec<Bar>,
    ) -> Result<Self, MetricsError> {
        ensure_strictly_increasing(&bars)?;
        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        })
    }

    /// The symbol this data represents (e.g., "RELIANCE").
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The time interval for each bar in the series.
    pub fn timeframe(&self) -> TimeFrame {
        self.timeframe
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Mirror used to re-validate on deserialisation.
#[derive(Deserialize)]
struct RawBarSeries {
    symbol: String,
    timeframe: TimeFrame,
    bars: Vec<Bar>,
}

impl<'de> Deserialize<'de> for BarSeries {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawBarSeries::deserialize(deserializer)?;
        BarSeries::new(raw.symbol, raw.timeframe, raw.bars).map_err(serde::de::Error::custom)
    }
}
