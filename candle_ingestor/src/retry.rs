//! Retry with exponential backoff, plus a partial-success batch fetch on top.

use std::time::Duration;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use snafu::IntoError;

use crate::{
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{DataProvider, DataUnavailableSnafu, ProviderError},
};

/// How often and how patiently a transient failure is retried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero behaves like one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            ..Self::default()
        }
    }

    /// Delay after the `failed`-th failed attempt (1-based): base, base×m, base×m², …
    ///
    /// Saturates at [`Duration::MAX`]. A negative or non-finite multiplier
    /// does not grow the delay at all.
    pub fn delay_for(&self, failed: u32) -> Duration {
        if self.base_delay.is_zero() || !self.multiplier.is_finite() || self.multiplier < 0.0 {
            return self.base_delay;
        }
        let exponent = failed.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Fetches bars, retrying transient failures according to `policy`.
///
/// Non-transient errors are returned as they are, without another attempt. Once
/// every attempt failed transiently the last error is wrapped in
/// [`ProviderError::DataUnavailable`].
pub async fn fetch_with_retry<P>(
    provider: &P,
    params: &BarsRequestParams,
    policy: &RetryPolicy,
) -> Result<BarSeries, ProviderError>
where
    P: DataProvider + ?Sized,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        let error = match provider.fetch_bars(params).await {
            Ok(series) => return Ok(series),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) => e,
        };

        if attempt >= max_attempts {
            return Err(DataUnavailableSnafu { attempts: attempt }.into_error(error));
        }

        let delay = policy.delay_for(attempt);
        warn!(
            "Fetching {} failed (attempt {attempt}/{max_attempts}), retrying in {delay:?}: {error}",
            params.symbol
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

/// Fetches every symbol with the same period, interval and exchange.
///
/// Symbols are fetched one after another and keep their input order; a failed
/// symbol does not stop the batch. Repeated symbols are fetched once.
pub async fn fetch_many<P, S>(
    provider: &P,
    symbols: &[S],
    template: &BarsRequestParams,
    policy: &RetryPolicy,
) -> IndexMap<String, Result<BarSeries, ProviderError>>
where
    P: DataProvider + ?Sized,
    S: AsRef<str>,
{
    let mut results = IndexMap::with_capacity(symbols.len());

    for symbol in symbols {
        let symbol = symbol.as_ref().trim();
        if symbol.is_empty() || results.contains_key(symbol) {
            continue;
        }

        let params = template.for_symbol(symbol);
        let result = fetch_with_retry(provider, &params, policy).await;
        debug!("batch fetch {symbol}: ok={}", result.is_ok());
        results.insert(symbol.to_string(), result);
    }

    results
}
