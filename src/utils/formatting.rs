//! Formatting utilities used for CLI and export outputs.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// 2.5 → "02h 30m" (long) or "02:30" (short).
pub fn hours2readable(hours: Decimal, short: bool) -> String {
    let mins = (hours * Decimal::from(60)).round().to_i64().unwrap_or(0);
    let sign = if mins < 0 { "-" } else { "" };
    let abs_m = mins.abs();

    if short {
        format!("{}{:02}:{:02}", sign, abs_m / 60, abs_m % 60)
    } else {
        format!("{}{:02}h {:02}m", sign, abs_m / 60, abs_m % 60)
    }
}

pub fn opt_or_dash<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "--".to_string())
}

pub fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn hours_render_as_hh_mm() {
        assert_eq!(hours2readable(dec!(2.5), false), "02h 30m");
        assert_eq!(hours2readable(dec!(0.33), true), "00:20");
    }
}
