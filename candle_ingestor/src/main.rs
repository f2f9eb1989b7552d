use std::time::Duration;

use anyhow::{Context, bail};
use bar_metrics::compute_pivot_points;
use candle_ingestor::{
    cache::CachedProvider,
    cli::{
        commands::{Cli, Commands},
        params::{load_view_state, parse_symbols, resolve_config_path, save_view_state},
    },
    config::IngestorConfig,
    models::{exchange::Exchange, request_params::BarsRequestParams},
    providers::{DataProvider, build_provider},
    retry::{fetch_many, fetch_with_retry},
    view::{ChartPage, ChartView, NO_DATA_NOTICE, SymbolOutcome, ViewState},
};
use chrono::{Local, NaiveDate};
use clap::Parser;
use log::{debug, info};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env loaded: {e}");
    }

    let cli = Cli::parse();

    let config_path = resolve_config_path(cli.config);
    let mut config = IngestorConfig::load(config_path.as_deref())?;
    if let Some(provider) = cli.provider {
        config.provider = provider;
    }
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Quote {
            symbol,
            period,
            interval,
            exchange,
            summary,
        } => {
            let state = ViewState {
                period,
                interval,
                ..ViewState::default()
            };
            let provider = connect(&config)?;
            let params = state.request(&symbol, exchange.unwrap_or(config.exchange));
            let series = fetch_with_retry(&provider, &params, &config.retry.policy())
                .await
                .with_context(|| format!("failed to fetch {symbol}"))?;

            let view = ChartView::render(&series, today);
            if summary {
                match (&view.metrics, &view.notice) {
                    (Some(metrics), _) => println!("{}: {}", view.symbol, metrics.summary()),
                    (None, notice) => {
                        println!("{}: {}", view.symbol, notice.as_deref().unwrap_or_default())
                    }
                }
            } else {
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
        }

        Commands::Batch {
            symbols,
            period,
            interval,
            exchange,
            max_retries,
            base_delay_ms,
        } => {
            let symbols = parse_symbols(&symbols);
            if symbols.is_empty() {
                bail!("no symbols given");
            }

            let mut policy = config.retry.policy();
            if let Some(max_attempts) = max_retries {
                policy.max_attempts = max_attempts;
            }
            if let Some(ms) = base_delay_ms {
                policy.base_delay = Duration::from_millis(ms);
            }

            let template = BarsRequestParams::new("")
                .with_exchange(exchange.unwrap_or(config.exchange))
                .with_period(period)
                .with_timeframe(interval);
            let provider = connect(&config)?;
            let results = fetch_many(&provider, &symbols, &template, &policy).await;

            let mut success_count = 0;
            let mut empty_count = 0;
            let mut error_count = 0;
            for (symbol, result) in results {
                match SymbolOutcome::evaluate(result, today) {
                    SymbolOutcome::Metrics(metrics) => {
                        println!("{}", json!({ "symbol": symbol, "metrics": metrics }));
                        success_count += 1;
                    }
                    SymbolOutcome::NoData => {
                        eprintln!("{symbol}: {NO_DATA_NOTICE}");
                        empty_count += 1;
                    }
                    SymbolOutcome::Failed(e) => {
                        eprintln!("ERROR: {symbol} - {e}");
                        error_count += 1;
                    }
                }
            }

            // Summary goes to stderr so stdout stays machine readable
            eprintln!(
                "SUMMARY: {success_count} succeeded, {error_count} failed, {empty_count} empty"
            );
        }

        Commands::View {
            symbols,
            page_size,
            state: state_path,
            nav,
            exchange,
        } => {
            let symbols = parse_symbols(&symbols);
            if symbols.is_empty() {
                bail!("no symbols given");
            }

            let mut state = match state_path.as_deref() {
                Some(path) => load_view_state(path)?,
                None => ViewState::default(),
            };
            if let Some(size) = page_size {
                state = state.with_page_size(size);
            }
            let state = match nav {
                Some(nav) => state.apply(nav, symbols.len()),
                None => state.clamped(symbols.len()),
            };

            let provider = connect(&config)?;
            let exchange = exchange.unwrap_or(config.exchange);
            let page = render_page(&provider, &config, state, &symbols, exchange, today).await;
            info!("{}", page.page_label());

            if let Some(path) = state_path.as_deref() {
                save_view_state(path, &page.state)?;
            }
            println!("{}", serde_json::to_string_pretty(&page)?);
        }

        Commands::Pivots { high, low, close } => {
            let levels = compute_pivot_points(high, low, close)?;
            println!("{}", serde_json::to_string_pretty(&levels)?);
        }
    }

    Ok(())
}

/// Builds the configured provider behind the response cache.
fn connect(config: &IngestorConfig) -> anyhow::Result<CachedProvider<Box<dyn DataProvider>>> {
    info!("Using {} provider", config.provider);
    let provider = build_provider(config)
        .with_context(|| format!("failed to set up the {} provider", config.provider))?;
    Ok(CachedProvider::new(provider, config.cache_ttl()))
}

/// Fetches and renders every symbol on the current page. A symbol that fails
/// to fetch gets a notice in place of its chart.
async fn render_page(
    provider: &impl DataProvider,
    config: &IngestorConfig,
    state: ViewState,
    symbols: &[String],
    exchange: Exchange,
    today: NaiveDate,
) -> ChartPage {
    let template = state.request("", exchange);
    let results = fetch_many(
        provider,
        state.current_symbols(symbols),
        &template,
        &config.retry.policy(),
    )
    .await;

    let charts = results
        .into_iter()
        .map(|(symbol, result)| match result {
            Ok(series) => ChartView::render(&series, today),
            Err(e) => ChartView::unavailable(symbol, e),
        })
        .collect();
    ChartPage::new(state, symbols.len(), charts)
}
