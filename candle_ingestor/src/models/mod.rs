pub mod bar_series;
pub mod exchange;
pub mod period;
pub mod request_params;
pub mod timeframe;
