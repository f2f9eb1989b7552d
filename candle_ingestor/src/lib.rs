//! Fetch side of the candle dashboard: providers, retry, caching and the
//! chart-view payload built on top of [`bar_metrics`].

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod models;
pub mod providers;
pub mod retry;
pub mod view;
