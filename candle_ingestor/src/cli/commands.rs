use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    config::ProviderKind,
    models::{exchange::Exchange, period::Period, timeframe::TimeFrame},
    view::Navigation,
};

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the config file (candle_dash.toml). Falls back to $CANDLE_DASH_CONFIG.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data provider: yahoo or upstox. Overrides the config file.
    #[arg(long, global = true)]
    pub provider: Option<ProviderKind>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one symbol and print its chart view
    Quote {
        /// Exchange symbol (e.g. "RELIANCE"), or an ISIN for upstox
        #[arg(long)]
        symbol: String,

        /// Look-back period: 6M, 1Y, 5Y or Max
        #[arg(long, default_value = "1Y")]
        period: Period,

        /// Interval: D (day), W (week), M (month)
        #[arg(long, default_value = "D")]
        interval: TimeFrame,

        /// Listing exchange: nse or bse. Defaults to the config file's.
        #[arg(long)]
        exchange: Option<Exchange>,

        /// Print a one-line summary instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Fetch several symbols and print one metrics line per symbol
    Batch {
        /// Comma-separated list of symbols (e.g. "TCS,INFY")
        #[arg(long)]
        symbols: String,

        #[arg(long, default_value = "1Y")]
        period: Period,

        #[arg(long, default_value = "D")]
        interval: TimeFrame,

        #[arg(long)]
        exchange: Option<Exchange>,

        /// Maximum number of attempts per symbol. Defaults to the config file's.
        #[arg(long)]
        max_retries: Option<u32>,

        /// Delay before the first retry. Defaults to the config file's.
        #[arg(long)]
        base_delay_ms: Option<u64>,
    },

    /// Page through symbols, one or more charts per page
    View {
        /// Comma-separated list of symbols
        #[arg(long)]
        symbols: String,

        /// Charts per page (10 for the grid layout). Stored with the view state.
        #[arg(long)]
        page_size: Option<usize>,

        /// JSON file holding the view state between invocations
        #[arg(long)]
        state: Option<PathBuf>,

        /// next, prev, reset, period=<6M|1Y|5Y|Max> or interval=<D|W|M>
        #[arg(long)]
        nav: Option<Navigation>,

        #[arg(long)]
        exchange: Option<Exchange>,
    },

    /// Compute pivot levels from a high, low and close
    Pivots {
        #[arg(long)]
        high: f64,

        #[arg(long)]
        low: f64,

        #[arg(long)]
        close: f64,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn quote_defaults() {
        let cli = Cli::try_parse_from(["candle-dash", "quote", "--symbol", "TCS"]).unwrap();
        assert!(cli.config.is_none());
        let Commands::Quote {
            symbol,
            period,
            interval,
            exchange,
            summary,
        } = cli.command
        else {
            panic!("expected quote");
        };
        assert_eq!(symbol, "TCS");
        assert_eq!(period, Period::OneYear);
        assert_eq!(interval, TimeFrame::day());
        assert!(exchange.is_none());
        assert!(!summary);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "candle-dash",
            "view",
            "--symbols",
            "TCS,INFY",
            "--nav",
            "period=5Y",
            "--provider",
            "upstox",
        ])
        .unwrap();

        assert_eq!(cli.provider, Some(ProviderKind::Upstox));
        let Commands::View { nav, page_size, .. } = cli.command else {
            panic!("expected view");
        };
        assert_eq!(nav, Some(Navigation::SelectPeriod(Period::FiveYears)));
        assert_eq!(page_size, None);
    }

    #[test]
    fn negative_pivot_flags_are_not_numbers() {
        // a leading minus reads as an unknown flag unless written as --high=-10
        let result = Cli::try_parse_from([
            "candle-dash",
            "pivots",
            "--high",
            "-10",
            "--low",
            "1",
            "--close",
            "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn bad_interval_is_rejected() {
        let result = Cli::try_parse_from([
            "candle-dash",
            "quote",
            "--symbol",
            "TCS",
            "--interval",
            "5m",
        ]);
        assert!(result.is_err());
    }
}
