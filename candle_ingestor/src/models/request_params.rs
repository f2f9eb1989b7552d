use serde::{Deserialize, Serialize};

use crate::models::{exchange::Exchange, period::Period, timeframe::TimeFrame};

/// Universal parameters for requesting bar data from any provider.
///
/// The tuple (symbol, exchange, period, timeframe) also keys the response
/// cache, so two requests that compare equal are interchangeable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// Plain exchange symbol (`RELIANCE`) or, for Upstox, an ISIN. Providers
    /// map it to their own ticker format.
    pub symbol: String,

    /// Listing venue used for the ticker mapping.
    #[serde(default)]
    pub exchange: Exchange,

    /// Look-back window ending today.
    #[serde(default)]
    pub period: Period,

    /// The interval of each bar. **Validation of allowed values is performed
    /// by each data provider**, according to its own API rules.
    #[serde(default)]
    pub timeframe: TimeFrame,
}

impl BarsRequestParams {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: Exchange::default(),
            period: Period::default(),
            timeframe: TimeFrame::default(),
        }
    }

    pub fn with_exchange(mut self, exchange: Exchange) -> Self {
        self.exchange = exchange;
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    pub fn with_timeframe(mut self, timeframe: TimeFrame) -> Self {
        self.timeframe = timeframe;
        self
    }

    /// Same request for another symbol.
    pub fn for_symbol(&self, symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..self.clone()
        }
    }
}
