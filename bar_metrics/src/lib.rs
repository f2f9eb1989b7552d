//! Derived metrics over OHLCV bar sequences.
//!
//! Everything in this crate is pure: the same bars (and the same `as_of`
//! date for pivot selection) always produce the same output. Fetching the
//! bars is left to the caller.

pub mod change;
pub mod display;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod pivots;
pub mod volume;

pub use change::{ChangeStatus, PriceChange, compute_change};
pub use display::{ChangeDirection, format_change, format_price};
pub use errors::MetricsError;
pub use metrics::{DerivedMetrics, compute_metrics};
pub use models::bar::{Bar, ensure_strictly_increasing, normalize_bars};
pub use pivots::{
    MonthlyPivots, PivotLevels, ReferenceWindow, compute_pivot_points, monthly_pivot_points,
    previous_month_window,
};
pub use volume::format_volume;
