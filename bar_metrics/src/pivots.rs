//! Classic floor pivot points derived from the prior calendar month.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{MetricsError, ensure_non_negative},
    models::bar::Bar,
};

/// Pivot, resistance and support levels, each rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotLevels {
    pub p: f64,
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
}

/// High, low and close of one reference month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceWindow {
    pub year: i32,
    pub month: u32,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Monthly pivots together with the month they were derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPivots {
    pub reference: ReferenceWindow,
    pub levels: PivotLevels,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes floor pivot levels from a reference period's high, low and close.
///
/// # Errors
///
/// [`MetricsError::InvalidInput`] if any input is NaN, infinite or negative.
pub fn compute_pivot_points(high: f64, low: f64, close: f64) -> Result<PivotLevels, MetricsError> {
    let high = ensure_non_negative("high", high)?;
    let low = ensure_non_negative("low", low)?;
    let close = ensure_non_negative("close", close)?;

    let p = (high + low + close) / 3.0;
    let range = high - low;

    Ok(PivotLevels {
        p: round2(p),
        r1: round2(2.0 * p - low),
        r2: round2(p + range),
        r3: round2(high + 2.0 * (p - low)),
        s1: round2(2.0 * p - high),
        s2: round2(p - range),
        s3: round2(low - 2.0 * (high - p)),
    })
}

/// Year and month of the calendar month before the one containing `as_of`.
fn previous_month(as_of: NaiveDate) -> (i32, u32) {
    match as_of.month() {
        1 => (as_of.year() - 1, 12),
        m => (as_of.year(), m - 1),
    }
}

/// Reduces the bars of the month preceding `as_of` to (max high, min low, last close).
///
/// Returns `None` when the series has no bars in that month, which callers
/// report as "pivot points unavailable".
pub fn previous_month_window(bars: &[Bar], as_of: NaiveDate) -> Option<ReferenceWindow> {
    let (year, month) = previous_month(as_of);

    let mut in_month = bars
        .iter()
        .filter(|b| b.date.year() == year && b.date.month() == month);

    let first = in_month.next()?;
    let window = in_month.fold(
        ReferenceWindow {
            year,
            month,
            high: first.high,
            low: first.low,
            close: first.close,
        },
        |mut acc, bar| {
            acc.high = acc.high.max(bar.high);
            acc.low = acc.low.min(bar.low);
            acc.close = bar.close;
            acc
        },
    );

    Some(window)
}

/// Pivot levels from the calendar month preceding `as_of`.
///
/// `Ok(None)` means the series has no bars in that month.
pub fn monthly_pivot_points(
    bars: &[Bar],
    as_of: NaiveDate,
) -> Result<Option<MonthlyPivots>, MetricsError> {
    let Some(reference) = previous_month_window(bars, as_of) else {
        return Ok(None);
    };

    let levels = compute_pivot_points(reference.high, reference.low, reference.close)?;
    Ok(Some(MonthlyPivots { reference, levels }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn pivots_for_symmetric_range() {
        let levels = compute_pivot_points(110.0, 90.0, 100.0).unwrap();

        assert_eq!(levels.p, 100.0);
        assert_eq!(levels.r1, 110.0);
        assert_eq!(levels.s1, 90.0);
        assert_eq!(levels.r2, 120.0);
        assert_eq!(levels.s2, 80.0);
        assert_eq!(levels.r3, 130.0);
        assert_eq!(levels.s3, 70.0);
    }

    #[test]
    fn pivots_are_rounded_to_cents() {
        let levels = compute_pivot_points(101.0, 99.0, 100.5).unwrap();
        // (101 + 99 + 100.5) / 3 = 100.1666..
        assert_eq!(levels.p, 100.17);
        assert_eq!(levels.r1, 101.33);
        assert_eq!(levels.s1, 99.33);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        assert!(matches!(
            compute_pivot_points(f64::NAN, 1.0, 1.0),
            Err(MetricsError::InvalidInput { field: "high", .. })
        ));
        assert!(matches!(
            compute_pivot_points(1.0, 1.0, f64::INFINITY),
            Err(MetricsError::InvalidInput { field: "close", .. })
        ));
    }

    #[test]
    fn negative_prices_are_rejected() {
        assert_eq!(
            compute_pivot_points(-10.0, -20.0, -15.0),
            Err(MetricsError::InvalidInput {
                field: "high",
                value: -10.0
            })
        );
        assert!(matches!(
            compute_pivot_points(10.0, -0.5, 5.0),
            Err(MetricsError::InvalidInput { field: "low", .. })
        ));
        // zero is a price, not an error
        assert!(compute_pivot_points(0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn window_uses_previous_calendar_month_only() {
        let bars = vec![
            Bar::new(date(2024, 4, 30), 0.0, 500.0, 1.0, 50.0, 0.0),
            Bar::new(date(2024, 5, 2), 10.0, 12.0, 9.0, 11.0, 0.0),
            Bar::new(date(2024, 5, 15), 11.0, 15.0, 8.0, 14.0, 0.0),
            Bar::new(date(2024, 5, 31), 14.0, 14.5, 13.0, 13.5, 0.0),
            Bar::new(date(2024, 6, 3), 13.5, 99.0, 0.5, 20.0, 0.0),
        ];

        let window = previous_month_window(&bars, date(2024, 6, 10)).unwrap();

        assert_eq!((window.year, window.month), (2024, 5));
        assert_eq!(window.high, 15.0);
        assert_eq!(window.low, 8.0);
        assert_eq!(window.close, 13.5);
    }

    #[test]
    fn january_looks_back_to_december() {
        let bars = vec![Bar::new(date(2023, 12, 29), 1.0, 3.0, 1.0, 2.0, 0.0)];

        let window = previous_month_window(&bars, date(2024, 1, 5)).unwrap();

        assert_eq!((window.year, window.month), (2023, 12));
    }

    #[test]
    fn empty_window_means_unavailable() {
        let bars = vec![Bar::new(date(2024, 3, 1), 1.0, 1.0, 1.0, 1.0, 0.0)];

        assert!(previous_month_window(&bars, date(2024, 6, 1)).is_none());
        assert_eq!(monthly_pivot_points(&bars, date(2024, 6, 1)), Ok(None));
        assert_eq!(monthly_pivot_points(&[], date(2024, 6, 1)), Ok(None));
    }
}
