//! Chart-view payload: the explicit navigation state and what one page shows.
//!
//! A page shows `page_size` symbols, one chart each. The [`ViewState`] is owned
//! by the caller, passed into every render and handed back with the result;
//! nothing here keeps state between renders.

use std::{fmt::Display, str::FromStr};

use bar_metrics::{Bar, DerivedMetrics, MetricsError, compute_metrics};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{
    bar_series::BarSeries,
    exchange::Exchange,
    period::Period,
    request_params::BarsRequestParams,
    timeframe::{SelectorParseError, TimeFrame},
};

/// Notice shown instead of a chart when the window holds no bars.
pub const NO_DATA_NOTICE: &str = "no data available";

/// Page size of the grid layout.
pub const CHARTS_PER_PAGE: usize = 10;

/// Page (1-based), symbols per page, period selector and interval selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub page: usize,
    /// Zero behaves like one.
    pub page_size: usize,
    pub period: Period,
    pub interval: TimeFrame,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 1,
            period: Period::OneYear,
            interval: TimeFrame::day(),
        }
    }
}

/// A user action on the dashboard controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Previous,
    SelectPeriod(Period),
    SelectInterval(TimeFrame),
    Reset,
}

impl FromStr for Navigation {
    type Err = SelectorParseError;

    /// Accepts `next`, `prev`/`previous`, `reset`, `period=<code>` and
    /// `interval=<code>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((key, value)) = s.split_once('=') {
            return match key.trim().to_lowercase().as_str() {
                "period" => Ok(Self::SelectPeriod(value.parse()?)),
                "interval" => Ok(Self::SelectInterval(value.parse()?)),
                other => Err(SelectorParseError::InvalidInput {
                    message: format!("Unknown navigation target: {other}"),
                }),
            };
        }

        match s.to_lowercase().as_str() {
            "next" => Ok(Self::Next),
            "prev" | "previous" => Ok(Self::Previous),
            "reset" => Ok(Self::Reset),
            other => Err(SelectorParseError::InvalidInput {
                message: format!("Unknown navigation: {other}"),
            }),
        }
    }
}

impl ViewState {
    /// Changes the page size, keeping the first symbol of the current page in view.
    pub fn with_page_size(self, page_size: usize) -> Self {
        let first = self.page.saturating_sub(1).saturating_mul(self.page_size());
        let page_size = page_size.max(1);
        Self {
            page: first / page_size + 1,
            page_size,
            ..self
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Pages needed for `symbol_count` symbols; never less than one.
    pub fn total_pages(&self, symbol_count: usize) -> usize {
        symbol_count.div_ceil(self.page_size()).max(1)
    }

    /// Applies `nav` and clamps the page to the pages `symbol_count` symbols fill.
    ///
    /// Selecting a period or an interval keeps the page. Reset keeps the page size.
    pub fn apply(self, nav: Navigation, symbol_count: usize) -> Self {
        let next = match nav {
            Navigation::Next => Self {
                page: self.page.saturating_add(1),
                ..self
            },
            Navigation::Previous => Self {
                page: self.page.saturating_sub(1),
                ..self
            },
            Navigation::SelectPeriod(period) => Self { period, ..self },
            Navigation::SelectInterval(interval) => Self { interval, ..self },
            Navigation::Reset => Self {
                page_size: self.page_size,
                ..Self::default()
            },
        };
        next.clamped(symbol_count)
    }

    pub fn clamped(self, symbol_count: usize) -> Self {
        Self {
            page: self.page.clamp(1, self.total_pages(symbol_count)),
            ..self
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, symbol_count: usize) -> bool {
        self.page < self.total_pages(symbol_count)
    }

    /// Symbols shown on the current page; empty past the last page.
    pub fn current_symbols<'a, S>(&self, symbols: &'a [S]) -> &'a [S] {
        let size = self.page_size();
        let start = self.page.saturating_sub(1).saturating_mul(size);
        if start >= symbols.len() {
            return &[];
        }
        &symbols[start..start.saturating_add(size).min(symbols.len())]
    }

    /// Fetch request for the current selectors.
    pub fn request(&self, symbol: impl Into<String>, exchange: Exchange) -> BarsRequestParams {
        BarsRequestParams::new(symbol)
            .with_exchange(exchange)
            .with_period(self.period)
            .with_timeframe(self.interval)
    }
}

/// One candle as the charting widget takes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    /// `YYYY-MM-DD`
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl From<&Bar> for ChartRow {
    fn from(bar: &Bar) -> Self {
        Self {
            time: bar.date.format("%Y-%m-%d").to_string(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

/// One symbol's chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartView {
    pub symbol: String,
    pub rows: Vec<ChartRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<DerivedMetrics>,
    /// Set when there is nothing to chart, e.g. [`NO_DATA_NOTICE`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ChartView {
    /// An empty series yields no rows, no metrics and [`NO_DATA_NOTICE`].
    pub fn render(series: &BarSeries, as_of: NaiveDate) -> Self {
        let rows = series.bars().iter().map(ChartRow::from).collect();

        let (metrics, notice) = match compute_metrics(series.bars(), as_of) {
            Ok(metrics) => (Some(metrics), None),
            Err(MetricsError::EmptySeries) => (None, Some(NO_DATA_NOTICE.to_string())),
            Err(e) => {
                debug!("metrics unavailable for {}: {e}", series.symbol());
                (None, Some(e.to_string()))
            }
        };

        Self {
            symbol: series.symbol().to_string(),
            rows,
            metrics,
            notice,
        }
    }

    /// Chart shown when the fetch itself failed.
    pub fn unavailable(symbol: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            symbol: symbol.into(),
            rows: Vec::new(),
            metrics: None,
            notice: Some(reason.to_string()),
        }
    }
}

/// Everything the presentation layer needs for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPage {
    pub state: ViewState,
    pub total_pages: usize,
    pub total_symbols: usize,
    pub charts: Vec<ChartView>,
}

impl ChartPage {
    /// `symbol_count` is the length of the whole list, not just this page.
    pub fn new(state: ViewState, symbol_count: usize, charts: Vec<ChartView>) -> Self {
        let state = state.clamped(symbol_count);
        Self {
            total_pages: state.total_pages(symbol_count),
            total_symbols: symbol_count,
            state,
            charts,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.state.has_previous()
    }

    pub fn has_next(&self) -> bool {
        self.state.has_next(self.total_symbols)
    }

    /// Page indicator, e.g. `3 / 50`.
    pub fn page_indicator(&self) -> String {
        format!("{} / {}", self.state.page, self.total_pages)
    }

    /// Grid header, e.g. `Page 2 of 3 | Total Stocks: 25`.
    pub fn page_label(&self) -> String {
        format!(
            "Page {} of {} | Total Stocks: {}",
            self.state.page, self.total_pages, self.total_symbols
        )
    }
}

/// What a batch run reports for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    Metrics(DerivedMetrics),
    /// The fetch worked but the window held no bars.
    NoData,
    Failed(String),
}

impl SymbolOutcome {
    pub fn evaluate<E: Display>(fetched: Result<BarSeries, E>, as_of: NaiveDate) -> Self {
        let series = match fetched {
            Ok(series) => series,
            Err(e) => return Self::Failed(e.to_string()),
        };
        match compute_metrics(series.bars(), as_of) {
            Ok(metrics) => Self::Metrics(metrics),
            Err(MetricsError::EmptySeries) => Self::NoData,
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}
