use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::timeframe::SelectorParseError;

/// Listing venue of a symbol. Providers map a plain symbol to their own
/// ticker or instrument key with it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    #[default]
    Nse,
    Bse,
}

impl Exchange {
    /// Ticker suffix used by Yahoo Finance (`RELIANCE.NS`).
    pub fn yahoo_suffix(self) -> &'static str {
        match self {
            Self::Nse => ".NS",
            Self::Bse => ".BO",
        }
    }

    /// Equity segment prefix of an Upstox instrument key (`NSE_EQ|<isin>`).
    pub fn upstox_segment(self) -> &'static str {
        match self {
            Self::Nse => "NSE_EQ",
            Self::Bse => "BSE_EQ",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nse => f.write_str("nse"),
            Self::Bse => f.write_str("bse"),
        }
    }
}

impl FromStr for Exchange {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nse" | "ns" => Ok(Self::Nse),
            "bse" | "bo" => Ok(Self::Bse),
            other => Err(SelectorParseError::InvalidInput {
                message: format!("Invalid exchange: {other}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_codes() {
        assert_eq!("NSE".parse::<Exchange>().unwrap(), Exchange::Nse);
        assert_eq!(" bo ".parse::<Exchange>().unwrap(), Exchange::Bse);

        let SelectorParseError::InvalidInput { message } = "nyse".parse::<Exchange>().unwrap_err();
        assert_eq!(message, "Invalid exchange: nyse");
    }
}
