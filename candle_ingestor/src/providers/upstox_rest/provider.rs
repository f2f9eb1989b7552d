use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use log::debug;
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;

use crate::{
    config::UpstoxConfig,
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{
        ClientBuildSnafu, DataProvider, DecodeSnafu, InvalidApiKeySnafu, MetricsSnafu,
        MissingEnvVarSnafu, ProviderError, ProviderInitError, ReqwestSnafu, SharedLimiter,
        read_body,
        upstox_rest::{params::candle_path, response::UpstoxResponse},
    },
};

/// Environment variable holding the Upstox OAuth access token.
pub const ACCESS_TOKEN_VAR: &str = "UPSTOX_ACCESS_TOKEN";

pub struct UpstoxProvider {
    client: Client,
    base_url: String,
    limiter: SharedLimiter,
    _access_token: SecretString,
}

impl UpstoxProvider {
    /// Creates a new Upstox provider.
    ///
    /// Reads the access token from the `UPSTOX_ACCESS_TOKEN` environment variable.
    pub fn from_env(
        config: &UpstoxConfig,
        timeout: Duration,
        limiter: SharedLimiter,
    ) -> Result<Self, ProviderInitError> {
        let token = get_env_var(ACCESS_TOKEN_VAR).context(MissingEnvVarSnafu)?;
        Self::with_token(config, SecretString::new(token.into()), timeout, limiter)
    }

    pub fn with_token(
        config: &UpstoxConfig,
        access_token: SecretString,
        timeout: Duration,
        limiter: SharedLimiter,
    ) -> Result<Self, ProviderInitError> {
        let mut auth = header::HeaderValue::from_str(&format!(
            "Bearer {}",
            access_token.expose_secret()
        ))
        .context(InvalidApiKeySnafu)?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limiter,
            _access_token: access_token,
        })
    }
}

#[async_trait]
impl DataProvider for UpstoxProvider {
    async fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
        let path = candle_path(params, Local::now().date_naive())?;

        self.limiter.until_ready().await;
        debug!("GET upstox {path}");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .context(ReqwestSnafu)?;

        let body = read_body(response, |body| {
            serde_json::from_str::<UpstoxResponse>(body)
                .ok()
                .and_then(|r| r.error_message())
        })
        .await?;

        let bars = serde_json::from_str::<UpstoxResponse>(&body)
            .context(DecodeSnafu)?
            .into_bars()?;

        BarSeries::new(params.symbol.clone(), params.timeframe, bars).context(MetricsSnafu)
    }
}

#[cfg(test)]
mod tests {
    use nonzero_ext::nonzero;
    use serial_test::serial;

    use super::*;
    use crate::providers::rate_limiter;

    #[test]
    #[serial]
    fn missing_token_is_reported() {
        // SAFETY: serialised with every other env-touching test
        unsafe { std::env::remove_var(ACCESS_TOKEN_VAR) };

        let result = UpstoxProvider::from_env(
            &UpstoxConfig::default(),
            Duration::from_secs(5),
            rate_limiter(nonzero!(1u32)),
        );

        assert!(matches!(result, Err(ProviderInitError::MissingEnvVar { .. })));
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let result = UpstoxProvider::with_token(
            &UpstoxConfig::default(),
            SecretString::from("abc\ndef".to_string()),
            Duration::from_secs(5),
            rate_limiter(nonzero!(1u32)),
        );

        assert!(matches!(result, Err(ProviderInitError::InvalidApiKey { .. })));
    }
}
