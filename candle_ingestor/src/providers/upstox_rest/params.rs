use chrono::NaiveDate;

use crate::{
    models::{
        request_params::BarsRequestParams,
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Maps a timeframe onto the Upstox v2 historical-candle interval.
///
/// The v2 endpoint only knows single-unit `day`, `week` and `month` candles
/// at this granularity.
pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<&'static str, ProviderError> {
    match (timeframe.unit, timeframe.amount) {
        (TimeFrameUnit::Day, 1) => Ok("day"),
        (TimeFrameUnit::Week, 1) => Ok("week"),
        (TimeFrameUnit::Month, 1) => Ok("month"),
        (unit, amount) => ValidationSnafu {
            message: format!("Upstox only supports single-unit intervals, got {amount} x {unit:?}"),
        }
        .fail(),
    }
}

/// Instrument key, e.g. `NSE_EQ|INE002A01018`.
///
/// The symbol is expected to be an ISIN; a symbol that already is a full
/// instrument key (contains `|`) is passed through.
pub fn instrument_key(params: &BarsRequestParams) -> String {
    let symbol = params.symbol.trim();
    if symbol.contains('|') {
        symbol.to_string()
    } else {
        format!("{}|{}", params.exchange.upstox_segment(), symbol.to_uppercase())
    }
}

/// Path of the historical-candle request, dates inclusive, newest first.
pub fn candle_path(params: &BarsRequestParams, to: NaiveDate) -> Result<String, ProviderError> {
    let interval = validate_timeframe(&params.timeframe)?;
    let from = params.period.start_from(to);
    let key = instrument_key(params).replace('|', "%7C");

    Ok(format!(
        "/v2/historical-candle/{key}/{interval}/{}/{}",
        to.format("%Y-%m-%d"),
        from.format("%Y-%m-%d")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{exchange::Exchange, period::Period};

    #[test]
    fn instrument_keys() {
        let params = BarsRequestParams::new("ine002a01018");
        assert_eq!(instrument_key(&params), "NSE_EQ|INE002A01018");

        let bse = BarsRequestParams::new("INE467B01029").with_exchange(Exchange::Bse);
        assert_eq!(instrument_key(&bse), "BSE_EQ|INE467B01029");

        let raw = BarsRequestParams::new("NSE_INDEX|Nifty 50");
        assert_eq!(instrument_key(&raw), "NSE_INDEX|Nifty 50");
    }

    #[test]
    fn path_carries_dates_newest_first() {
        let params = BarsRequestParams::new("INE002A01018")
            .with_period(Period::SixMonths)
            .with_timeframe(TimeFrame::week());
        let to = NaiveDate::from_ymd_opt(2024, 9, 15).unwrap();

        assert_eq!(
            candle_path(&params, to).unwrap(),
            "/v2/historical-candle/NSE_EQ%7CINE002A01018/week/2024-09-15/2024-03-15"
        );
    }

    #[test]
    fn multi_unit_intervals_are_rejected() {
        let params = BarsRequestParams::new("INE002A01018")
            .with_timeframe(TimeFrame::new(3, TimeFrameUnit::Month));
        assert!(validate_timeframe(&params.timeframe).is_err());
    }
}
