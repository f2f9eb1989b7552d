use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use snafu::ResultExt;

use crate::{
    config::YahooConfig,
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{
        ClientBuildSnafu, DataProvider, DecodeSnafu, MetricsSnafu, ProviderError,
        ProviderInitError, ReqwestSnafu, SharedLimiter, read_body,
        yahoo_rest::{
            params::{construct_params, ticker},
            response::YahooResponse,
        },
    },
};

const USER_AGENT: &str = concat!("candle-dash/", env!("CARGO_PKG_VERSION"));

/// Yahoo Finance chart API. Needs no credentials.
pub struct YahooProvider {
    client: Client,
    base_url: String,
    limiter: SharedLimiter,
}

impl YahooProvider {
    pub fn new(
        config: &YahooConfig,
        timeout: Duration,
        limiter: SharedLimiter,
    ) -> Result<Self, ProviderInitError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limiter,
        })
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, ticker)
    }
}

#[async_trait]
impl DataProvider for YahooProvider {
    async fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
        // Validate the timeframe before proceeding.
        let query = construct_params(params)?;
        let ticker = ticker(params);

        self.limiter.until_ready().await;
        debug!("GET yahoo chart {ticker} {query:?}");

        let response = self
            .client
            .get(self.chart_url(&ticker))
            .query(&query)
            .send()
            .await
            .context(ReqwestSnafu)?;

        let body = read_body(response, |body| {
            serde_json::from_str::<YahooResponse>(body)
                .ok()
                .and_then(|r| r.chart.error)
                .map(|e| e.message())
        })
        .await?;

        let bars = serde_json::from_str::<YahooResponse>(&body)
            .context(DecodeSnafu)?
            .into_bars()?;

        BarSeries::new(params.symbol.clone(), params.timeframe, bars).context(MetricsSnafu)
    }
}
