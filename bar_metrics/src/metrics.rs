//! Assembly of the full [`DerivedMetrics`] record handed to the chart layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    change::{ChangeStatus, compute_change},
    display::{ChangeDirection, format_change, format_price},
    errors::MetricsError,
    models::bar::Bar,
    pivots::{MonthlyPivots, monthly_pivot_points},
    volume::format_volume,
};

/// Everything the price header and pivot overlay need for one series.
///
/// Plain data: recomputed on every fetch, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub current_price: f64,
    pub previous_close: f64,
    pub percent_change: f64,
    pub change_status: ChangeStatus,
    pub latest_volume: f64,
    pub latest_volume_display: String,
    /// `None` when the series has no bars in the month before `as_of`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivots: Option<MonthlyPivots>,
}

impl DerivedMetrics {
    pub fn direction(&self) -> ChangeDirection {
        ChangeDirection::of(self.percent_change)
    }

    /// One-line header, e.g. `1,234.50 ▲ +1.23% | Vol: 2.3M`.
    pub fn summary(&self) -> String {
        format!(
            "{} {} {} | Vol: {}",
            format_price(self.current_price),
            self.direction().arrow(),
            format_change(self.percent_change),
            self.latest_volume_display
        )
    }
}

/// Computes [`DerivedMetrics`] for `bars`, with pivots from the month before `as_of`.
///
/// # Errors
///
/// - [`MetricsError::EmptySeries`] when `bars` is empty.
/// - [`MetricsError::InvalidInput`] when the latest volume is negative or not
///   finite, or the reference month carries non-finite prices.
pub fn compute_metrics(bars: &[Bar], as_of: NaiveDate) -> Result<DerivedMetrics, MetricsError> {
    let change = compute_change(bars)?;

    // compute_change already rejected the empty case
    let latest_volume = bars.last().map_or(0.0, |b| b.volume);
    let latest_volume_display = format_volume(latest_volume)?;

    Ok(DerivedMetrics {
        current_price: change.current_price,
        previous_close: change.previous_close,
        percent_change: change.percent_change,
        change_status: change.status,
        latest_volume,
        latest_volume_display,
        pivots: monthly_pivot_points(bars, as_of)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Bar> {
        vec![
            Bar::new(date(2024, 5, 30), 95.0, 110.0, 90.0, 98.0, 900_000.0),
            Bar::new(date(2024, 5, 31), 98.0, 104.0, 96.0, 100.0, 1_100_000.0),
            Bar::new(date(2024, 6, 3), 100.0, 111.0, 99.0, 110.0, 2_300_000.0),
        ]
    }

    #[test]
    fn metrics_for_sample_series() {
        let metrics = compute_metrics(&sample(), date(2024, 6, 4)).unwrap();

        assert_eq!(metrics.current_price, 110.0);
        assert_eq!(metrics.previous_close, 100.0);
        assert!((metrics.percent_change - 10.0).abs() < 1e-9);
        assert_eq!(metrics.change_status, ChangeStatus::Computed);
        assert_eq!(metrics.latest_volume, 2_300_000.0);
        assert_eq!(metrics.latest_volume_display, "2.3M");

        let pivots = metrics.pivots.expect("May bars present");
        assert_eq!((pivots.reference.year, pivots.reference.month), (2024, 5));
        assert_eq!(pivots.levels.p, 100.0);
        assert_eq!(pivots.levels.r2, 120.0);
    }

    #[test]
    fn pivots_absent_without_reference_month() {
        let metrics = compute_metrics(&sample(), date(2024, 9, 1)).unwrap();
        assert!(metrics.pivots.is_none());

        let json = serde_json::to_value(&metrics).unwrap();
        assert!(json.get("pivots").is_none());
        assert_eq!(json["change_status"], "computed");
    }

    #[test]
    fn empty_series_propagates() {
        assert_eq!(
            compute_metrics(&[], date(2024, 6, 1)),
            Err(MetricsError::EmptySeries)
        );
    }

    #[test]
    fn summary_line() {
        let metrics = compute_metrics(&sample(), date(2024, 6, 4)).unwrap();
        assert_eq!(metrics.summary(), "110.00 ▲ +10.00% | Vol: 2.3M");
    }
}
