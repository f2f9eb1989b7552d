use crate::errors::{MetricsError, ensure_non_negative};

const SCALES: [(f64, &str); 3] = [(1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Formats a volume with a K/M/B suffix and one decimal, e.g. `1.5K`, `2.3M`.
///
/// Values below 1,000 are printed as a plain rounded integer. A value that
/// rounds up to `1000.0` at one scale is promoted to the next one, so
/// `999_990` prints as `1.0M` rather than `1000.0K`.
///
/// # Errors
///
/// [`MetricsError::InvalidInput`] for negative, NaN or infinite input.
pub fn format_volume(volume: f64) -> Result<String, MetricsError> {
    let volume = ensure_non_negative("volume", volume)?;

    let idx = match SCALES.iter().position(|&(divisor, _)| volume >= divisor) {
        Some(idx) => idx,
        None if volume.round() < 1e3 => return Ok(format!("{}", volume.round() as u64)),
        // 999.5 ..< 1000 rounds into the K scale
        None => SCALES.len() - 1,
    };

    let (divisor, suffix) = SCALES[idx];
    let scaled = round1(volume / divisor);
    if scaled >= 1000.0 && idx > 0 {
        let (divisor, suffix) = SCALES[idx - 1];
        return Ok(format!("{:.1}{suffix}", round1(volume / divisor)));
    }

    Ok(format!("{scaled:.1}{suffix}"))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_below_one_thousand() {
        assert_eq!(format_volume(0.0).unwrap(), "0");
        assert_eq!(format_volume(999.0).unwrap(), "999");
        assert_eq!(format_volume(12.4).unwrap(), "12");
    }

    #[test]
    fn thousands() {
        assert_eq!(format_volume(1_000.0).unwrap(), "1.0K");
        assert_eq!(format_volume(1_500.0).unwrap(), "1.5K");
        assert_eq!(format_volume(45_678.0).unwrap(), "45.7K");
    }

    #[test]
    fn millions_and_billions() {
        assert_eq!(format_volume(2_300_000.0).unwrap(), "2.3M");
        assert_eq!(format_volume(7_250_000_000.0).unwrap(), "7.3B");
        assert_eq!(format_volume(1_000_000_000_000.0).unwrap(), "1000.0B");
    }

    #[test]
    fn rounding_overflow_promotes_scale() {
        assert_eq!(format_volume(999_990.0).unwrap(), "1.0M");
        assert_eq!(format_volume(999.7).unwrap(), "1.0K");
    }

    #[test]
    fn invalid_volumes() {
        assert!(format_volume(-1.0).is_err());
        assert!(format_volume(f64::NAN).is_err());
        assert!(format_volume(f64::INFINITY).is_err());
    }
}
