use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A selector code (interval, period, exchange or navigation) that does not parse.
#[derive(Debug, Error)]
pub enum SelectorParseError {
    #[error("Invalid input: {}", message)]
    InvalidInput { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFrameUnit {
    Day,
    Week,
    Month,
}

/// Bar interval as amount × unit.
///
/// The universal representation is deliberately loose; each provider checks
/// which combinations its API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeFrame {
    pub amount: u32,
    pub unit: TimeFrameUnit,
}

impl TimeFrame {
    pub fn new(amount: u32, unit: TimeFrameUnit) -> Self {
        Self { amount, unit }
    }

    pub fn day() -> Self {
        Self::new(1, TimeFrameUnit::Day)
    }

    pub fn week() -> Self {
        Self::new(1, TimeFrameUnit::Week)
    }

    pub fn month() -> Self {
        Self::new(1, TimeFrameUnit::Month)
    }

    /// Selector code shown on the interval buttons: `D`, `W`, `M` (or e.g. `3M`).
    pub fn code(&self) -> String {
        let unit = match self.unit {
            TimeFrameUnit::Day => "D",
            TimeFrameUnit::Week => "W",
            TimeFrameUnit::Month => "M",
        };
        if self.amount == 1 {
            unit.to_string()
        } else {
            format!("{}{}", self.amount, unit)
        }
    }
}

impl Default for TimeFrame {
    fn default() -> Self {
        Self::day()
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

/// Parses selector codes (`D`, `W`, `M`, `3M`) and long forms (`1d`, `1wk`, `1mo`, `week`).
impl FromStr for TimeFrame {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);

        let amount = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|e| SelectorParseError::InvalidInput {
                message: format!("bad interval amount '{digits}': {e}"),
            })?
        };
        if amount == 0 {
            return Err(SelectorParseError::InvalidInput {
                message: format!("interval amount must be positive: '{s}'"),
            });
        }

        // "M" is month; lowercase "m" is rejected rather than guessed
        let unit = match unit {
            "M" => TimeFrameUnit::Month,
            _ => match unit.to_lowercase().as_str() {
                "d" | "day" => TimeFrameUnit::Day,
                "w" | "wk" | "week" => TimeFrameUnit::Week,
                "mo" | "month" => TimeFrameUnit::Month,
                _ => {
                    return Err(SelectorParseError::InvalidInput {
                        message: format!("Invalid timeframe unit: {unit}"),
                    });
                }
            },
        };

        Ok(Self::new(amount, unit))
    }
}
