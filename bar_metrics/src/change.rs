//! Latest price versus previous close.

use serde::{Deserialize, Serialize};

use crate::{errors::MetricsError, models::bar::Bar};

/// How [`PriceChange::percent_change`] was obtained.
///
/// A zero percent change is ambiguous on its own; this tells a real flat
/// session apart from the two fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    /// Computed from the last two closes.
    Computed,
    /// Only one bar was available; the change is reported as 0.
    SingleBar,
    /// The previous close was exactly zero; the change is reported as 0.
    ZeroPreviousClose,
}

/// Result of [`compute_change`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub current_price: f64,
    pub previous_close: f64,
    pub percent_change: f64,
    pub status: ChangeStatus,
}

/// Computes the change of the last close against the one before it.
///
/// # Errors
///
/// [`MetricsError::EmptySeries`] when `bars` is empty.
pub fn compute_change(bars: &[Bar]) -> Result<PriceChange, MetricsError> {
    match bars {
        [] => Err(MetricsError::EmptySeries),
        [only] => Ok(PriceChange {
            current_price: only.close,
            previous_close: only.close,
            percent_change: 0.0,
            status: ChangeStatus::SingleBar,
        }),
        [.., previous, last] => {
            let (percent_change, status) = if previous.close == 0.0 {
                (0.0, ChangeStatus::ZeroPreviousClose)
            } else {
                (
                    (last.close - previous.close) / previous.close * 100.0,
                    ChangeStatus::Computed,
                )
            };

            Ok(PriceChange {
                current_price: last.close,
                previous_close: previous.close,
                percent_change,
                status,
            })
        }
    }
}
