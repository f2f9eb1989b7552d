use crate::{
    models::{
        period::Period,
        request_params::BarsRequestParams,
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Maps a timeframe onto a Yahoo chart `interval` value.
///
/// Yahoo accepts `1d`, `5d`, `1wk`, `1mo` and `3mo` at daily-or-coarser granularity.
pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<&'static str, ProviderError> {
    match (timeframe.unit, timeframe.amount) {
        (TimeFrameUnit::Day, 1) => Ok("1d"),
        (TimeFrameUnit::Day, 5) => Ok("5d"),
        (TimeFrameUnit::Week, 1) => Ok("1wk"),
        (TimeFrameUnit::Month, 1) => Ok("1mo"),
        (TimeFrameUnit::Month, 3) => Ok("3mo"),
        (unit, amount) => ValidationSnafu {
            message: format!("Yahoo does not support an interval of {amount} x {unit:?}"),
        }
        .fail(),
    }
}

/// Yahoo chart `range` value for a period.
pub fn range(period: Period) -> &'static str {
    match period {
        Period::SixMonths => "6mo",
        Period::OneYear => "1y",
        Period::FiveYears => "5y",
        Period::Max => "max",
    }
}

/// Exchange ticker, e.g. `RELIANCE` on NSE becomes `RELIANCE.NS`.
///
/// A symbol that already carries a suffix (`^NSEI`, `TCS.BO`) is passed through.
pub fn ticker(params: &BarsRequestParams) -> String {
    let symbol = params.symbol.trim().to_uppercase();
    if symbol.contains('.') || symbol.starts_with('^') {
        symbol
    } else {
        format!("{symbol}{}", params.exchange.yahoo_suffix())
    }
}

pub fn construct_params(
    params: &BarsRequestParams,
) -> Result<Vec<(String, String)>, ProviderError> {
    let interval = validate_timeframe(&params.timeframe)?;
    Ok(vec![
        ("range".to_string(), range(params.period).to_string()),
        ("interval".to_string(), interval.to_string()),
        ("includePrePost".to_string(), "false".to_string()),
        ("events".to_string(), "div,splits".to_string()),
    ])
}
