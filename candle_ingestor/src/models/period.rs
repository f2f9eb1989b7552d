use std::{fmt, str::FromStr};

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::timeframe::SelectorParseError;

/// Look-back window offered by the period selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "6M")]
    SixMonths,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "Max")]
    Max,
}

/// First date requested for [`Period::Max`] by providers that need explicit bounds.
pub fn max_period_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

impl Period {
    pub const ALL: [Period; 4] = [Self::SixMonths, Self::OneYear, Self::FiveYears, Self::Max];

    pub fn code(self) -> &'static str {
        match self {
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::FiveYears => "5Y",
            Self::Max => "Max",
        }
    }

    /// First date of the window ending at `end`.
    pub fn start_from(self, end: NaiveDate) -> NaiveDate {
        let months = match self {
            Self::SixMonths => 6,
            Self::OneYear => 12,
            Self::FiveYears => 60,
            Self::Max => return max_period_start(),
        };
        end.checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Period {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "6m" | "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "5y" => Ok(Self::FiveYears),
            "max" => Ok(Self::Max),
            other => Err(SelectorParseError::InvalidInput {
                message: format!("Invalid period: {other}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_parse_back() {
        for period in Period::ALL {
            assert_eq!(period.code().parse::<Period>().unwrap(), period);
        }
        assert_eq!("6mo".parse::<Period>().unwrap(), Period::SixMonths);
        assert!("2y".parse::<Period>().is_err());
    }

    #[test]
    fn window_starts() {
        let end = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
        assert_eq!(
            Period::SixMonths.start_from(end),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            Period::FiveYears.start_from(end),
            NaiveDate::from_ymd_opt(2019, 8, 31).unwrap()
        );
        assert_eq!(Period::Max.start_from(end), max_period_start());
    }

    #[test]
    fn serde_uses_selector_codes() {
        assert_eq!(serde_json::to_string(&Period::FiveYears).unwrap(), "\"5Y\"");
        let parsed: Period = serde_json::from_str("\"Max\"").unwrap();
        assert_eq!(parsed, Period::Max);
    }
}
