//! Time-bounded response cache in front of any [`DataProvider`].
//!
//! Entries are keyed by the full [`BarsRequestParams`] (symbol, exchange,
//! period and interval) and expire `ttl` after they were fetched. Only
//! successful fetches are stored, so a failure is retried on the next call.
//!
//! The lock is never held across an `.await`; two concurrent misses for the
//! same key both reach the inner provider and the later one wins.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use log::{debug, info};

use crate::{
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{DataProvider, ProviderError},
};

/// Default lifetime of a cached response.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

type Entries = HashMap<BarsRequestParams, (Instant, BarSeries)>;

pub struct CachedProvider<P> {
    inner: P,
    ttl: Duration,
    entries: Mutex<Entries>,
}

impl<P: DataProvider> CachedProvider<P> {
    /// A zero `ttl` disables caching.
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of stored entries, expired ones included until they are evicted.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    // A panic while holding the lock leaves the map in a usable state.
    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, params: &BarsRequestParams) -> Option<BarSeries> {
        let mut entries = self.entries();
        let now = Instant::now();
        entries.retain(|_, (stored, _)| now.duration_since(*stored) < self.ttl);
        entries.get(params).map(|(_, series)| series.clone())
    }
}

#[async_trait]
impl<P: DataProvider> DataProvider for CachedProvider<P> {
    async fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
        if self.ttl.is_zero() {
            return self.inner.fetch_bars(params).await;
        }

        if let Some(series) = self.lookup(params) {
            info!(
                "Cache hit for {} ({} {})",
                params.symbol, params.period, params.timeframe
            );
            return Ok(series);
        }

        let series = self.inner.fetch_bars(params).await?;
        debug!("Caching {} bars for {}", series.bars().len(), params.symbol);
        self.entries()
            .insert(params.clone(), (Instant::now(), series.clone()));
        Ok(series)
    }
}
