//! Text helpers for the price header shown above a chart.

use serde::{Deserialize, Serialize};

/// Direction marker for a percent change. Zero counts as up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    Up,
    Down,
}

impl ChangeDirection {
    pub fn of(percent_change: f64) -> Self {
        if percent_change >= 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Self::Up => '▲',
            Self::Down => '▼',
        }
    }
}

/// Two decimals with comma thousands separators: `1234.5` -> `1,234.50`.
pub fn format_price(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if price < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Signed percent with two decimals: `+1.23%`, `-0.50%`.
pub fn format_change(percent_change: f64) -> String {
    match ChangeDirection::of(percent_change) {
        ChangeDirection::Up => format!("+{percent_change:.2}%"),
        ChangeDirection::Down => format!("{percent_change:.2}%"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_are_grouped() {
        assert_eq!(format_price(0.0), "0.00");
        assert_eq!(format_price(999.999), "1,000.00");
        assert_eq!(format_price(1234.5), "1,234.50");
        assert_eq!(format_price(1_234_567.891), "1,234,567.89");
        assert_eq!(format_price(-2500.0), "-2,500.00");
    }

    #[test]
    fn changes_carry_a_sign() {
        assert_eq!(format_change(1.234), "+1.23%");
        assert_eq!(format_change(0.0), "+0.00%");
        assert_eq!(format_change(-0.5), "-0.50%");
    }

    #[test]
    fn direction_treats_zero_as_up() {
        assert_eq!(ChangeDirection::of(0.0), ChangeDirection::Up);
        assert_eq!(ChangeDirection::of(-0.01).arrow(), '▼');
    }
}
