use bar_metrics::{Bar, normalize_bars};
use chrono::DateTime;
use serde::Deserialize;

use crate::providers::{ApiSnafu, ProviderError};

#[derive(Deserialize, Debug)]
pub struct YahooResponse {
    pub chart: YahooChart,
}

#[derive(Deserialize, Debug)]
pub struct YahooChart {
    #[serde(default)]
    pub result: Option<Vec<YahooResult>>,
    #[serde(default)]
    pub error: Option<YahooError>,
}

#[derive(Deserialize, Debug)]
pub struct YahooError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub struct YahooResult {
    pub meta: YahooMeta,
    /// Absent when the range holds no sessions.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: YahooIndicators,
}

#[derive(Deserialize, Debug)]
pub struct YahooMeta {
    pub symbol: String,
    /// Seconds east of UTC for the exchange; bars are dated in exchange time.
    #[serde(default, rename = "gmtoffset")]
    pub gmt_offset: i64,
}

#[derive(Deserialize, Debug)]
pub struct YahooIndicators {
    #[serde(default)]
    pub quote: Vec<YahooQuote>,
}

/// Column-oriented prices; `null` entries mark sessions without trades.
#[derive(Deserialize, Debug, Default)]
pub struct YahooQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

impl YahooError {
    pub fn message(&self) -> String {
        if self.description.is_empty() {
            self.code.clone()
        } else {
            format!("{}: {}", self.code, self.description)
        }
    }
}

impl YahooResponse {
    /// Extracts the first result's rows as bars, dated in exchange-local time.
    ///
    /// Rows missing any price are dropped; a missing volume counts as zero.
    pub fn into_bars(self) -> Result<Vec<Bar>, ProviderError> {
        if let Some(error) = self.chart.error {
            return ApiSnafu {
                message: error.message(),
            }
            .fail();
        }

        let Some(result) = self.chart.result.and_then(|r| r.into_iter().next()) else {
            return ApiSnafu {
                message: "chart response carried no result",
            }
            .fail();
        };

        let offset = result.meta.gmt_offset;
        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
        let column = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

        let bars = result
            .timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
                Some(Bar::new(
                    date,
                    column(&quote.open, i)?,
                    column(&quote.high, i)?,
                    column(&quote.low, i)?,
                    column(&quote.close, i)?,
                    column(&quote.volume, i).unwrap_or(0.0),
                ))
            })
            .collect();

        Ok(normalize_bars(bars))
    }
}
