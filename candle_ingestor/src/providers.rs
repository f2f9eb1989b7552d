//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, which serves as a unified interface
//! for fetching daily-or-coarser bar data from any market data vendor (Yahoo Finance,
//! Upstox).
//!
//! Each concrete provider implementation handles vendor-specific API logic: symbol to
//! ticker mapping, authentication, interval validation and response decoding. Retry,
//! caching and batching live outside the providers, in [`crate::retry`] and
//! [`crate::cache`], and work with any implementation.
//!
//! The trait is designed for async usage and supports dynamic dispatch (`dyn DataProvider`)
//! for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use candle_ingestor::models::{
//!     bar_series::BarSeries,
//!     request_params::BarsRequestParams,
//! };
//! use candle_ingestor::providers::{DataProvider, MetricsSnafu, ProviderError};
//! use snafu::ResultExt;
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_bars(
//!         &self,
//!         params: &BarsRequestParams,
//!     ) -> Result<BarSeries, ProviderError> {
//!         BarSeries::new(params.symbol.clone(), params.timeframe, vec![]).context(MetricsSnafu)
//!     }
//! }
//! ```

pub mod upstox_rest;
pub mod yahoo_rest;

use std::{num::NonZeroU32, sync::Arc};

use async_trait::async_trait;
use bar_metrics::MetricsError;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use log::debug;
use reqwest::{Response, StatusCode};
use shared_utils::env::MissingEnvVarError;
use snafu::{Backtrace, ResultExt, Snafu};

use crate::{
    config::{IngestorConfig, ProviderKind},
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{upstox_rest::UpstoxProvider, yahoo_rest::YahooProvider},
};

/// Trait for fetching bar data from a market data provider.
///
/// Implement this trait for each concrete data vendor.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches the bars for one symbol.
    ///
    /// # Arguments
    ///
    /// * `params` - The symbol, exchange, period and timeframe to request.
    ///
    /// # Returns
    ///
    /// * `Ok(BarSeries)` - The bars, strictly increasing by date. May be empty when the
    ///   vendor has nothing for the window.
    /// * `Err(ProviderError)` - If the request fails.
    async fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError>;
}

#[async_trait]
impl<T: DataProvider + ?Sized> DataProvider for Box<T> {
    async fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
        (**self).fetch_bars(params).await
    }
}

#[async_trait]
impl<T: DataProvider + ?Sized> DataProvider for Arc<T> {
    async fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
        (**self).fetch_bars(params).await
    }
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// missed environment variable.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider answered with a status worth retrying (429, 5xx).
    #[snafu(display("Transient API failure ({status}): {message}"))]
    Transient {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The provider's API returned a specific error message (e.g., unknown symbol).
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// The response body did not have the expected shape.
    #[snafu(display("Failed to decode provider response: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// The decoded bars violate the series invariants.
    #[snafu(display("Provider returned an invalid bar series: {source}"))]
    Metrics {
        source: MetricsError,
        backtrace: Backtrace,
    },

    /// Every retry attempt failed with a transient error.
    #[snafu(display("Data unavailable after {attempts} attempt(s): {source}"))]
    DataUnavailable {
        attempts: u32,
        #[snafu(source(from(ProviderError, Box::new)))]
        source: Box<ProviderError>,
    },
}

impl ProviderError {
    /// Whether another attempt might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Reqwest { source, .. } => source.is_timeout() || source.is_connect(),
            Self::Transient { .. } => true,
            _ => false,
        }
    }
}

/// Rate limiter shared by all requests of one provider instance.
pub type SharedLimiter = Arc<DefaultDirectRateLimiter>;

pub fn rate_limiter(requests_per_second: NonZeroU32) -> SharedLimiter {
    Arc::new(RateLimiter::direct(Quota::per_second(requests_per_second)))
}

/// Reads the body of a successful response, or classifies the failure.
///
/// `describe` extracts a vendor error message from a failure body when it has one.
pub(crate) async fn read_body(
    response: Response,
    describe: impl FnOnce(&str) -> Option<String>,
) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response.text().await.context(ReqwestSnafu)?;
    debug!("provider responded {status} ({} bytes)", body.len());

    if status.is_success() {
        return Ok(body);
    }

    let message = describe(&body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            "Unknown API error".to_string()
        } else {
            body.chars().take(200).collect()
        }
    });

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        TransientSnafu {
            status: status.as_u16(),
            message,
        }
        .fail()
    } else {
        ApiSnafu { message }.fail()
    }
}

/// Builds the provider selected in the configuration.
///
/// This decides AT RUNTIME which provider to give back, hence the
/// `Box<dyn DataProvider>`.
pub fn build_provider(config: &IngestorConfig) -> Result<Box<dyn DataProvider>, ProviderInitError> {
    let limiter = rate_limiter(config.requests_per_second);
    let provider: Box<dyn DataProvider> = match config.provider {
        ProviderKind::Yahoo => Box::new(YahooProvider::new(
            &config.yahoo,
            config.request_timeout(),
            limiter,
        )?),
        ProviderKind::Upstox => Box::new(UpstoxProvider::from_env(
            &config.upstox,
            config.request_timeout(),
            limiter,
        )?),
    };
    Ok(provider)
}
