use bar_metrics::{Bar, normalize_bars};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::providers::{ApiSnafu, ProviderError};

/// `[timestamp, open, high, low, close, volume, open_interest]`
#[derive(Deserialize, Debug)]
pub struct UpstoxCandle(
    pub DateTime<FixedOffset>,
    pub f64,
    pub f64,
    pub f64,
    pub f64,
    pub f64,
    pub f64,
);

#[derive(Deserialize, Debug, Default)]
pub struct UpstoxCandleData {
    #[serde(default)]
    pub candles: Vec<UpstoxCandle>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpstoxErrorItem {
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct UpstoxResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<UpstoxCandleData>,
    #[serde(default)]
    pub errors: Vec<UpstoxErrorItem>,
}

impl UpstoxResponse {
    pub fn error_message(&self) -> Option<String> {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{} {}", e.error_code, e.message).trim().to_string())
            .collect();
        (!messages.is_empty()).then(|| messages.join("; "))
    }

    /// Converts the newest-first candles into date-ordered bars.
    pub fn into_bars(self) -> Result<Vec<Bar>, ProviderError> {
        if self.status != "success" {
            return ApiSnafu {
                message: self
                    .error_message()
                    .unwrap_or_else(|| format!("status {}", self.status)),
            }
            .fail();
        }

        let bars = self
            .data
            .unwrap_or_default()
            .candles
            .into_iter()
            .map(|UpstoxCandle(ts, open, high, low, close, volume, _oi)| {
                Bar::new(ts.date_naive(), open, high, low, close, volume)
            })
            .collect();

        Ok(normalize_bars(bars))
    }
}
