//! Decimal helpers for hours and monetary amounts.

use crate::errors::{AppError, AppResult};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Round half away from zero to 2 decimals (hours and amounts).
pub fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// duration × rate, rounded; overflow is a validation error.
pub fn price(hours: Decimal, rate: Decimal) -> AppResult<Decimal> {
    hours
        .checked_mul(rate)
        .map(round2)
        .ok_or_else(|| AppError::Validation(format!("{hours}h at {rate} overflows the amount range")))
}

/// `total += amount` without panicking on overflow.
pub fn accumulate(total: &mut Decimal, amount: Decimal) -> AppResult<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| AppError::Validation("total overflows the amount range".into()))?;
    Ok(())
}

pub fn parse_decimal(s: &str) -> AppResult<Decimal> {
    Decimal::from_str(s.trim()).map_err(|_| AppError::InvalidAmount(s.to_string()))
}

pub fn parse_optional_decimal(input: Option<&String>) -> AppResult<Option<Decimal>> {
    input.map(|s| parse_decimal(s)).transpose()
}

/// Normalize a currency code ("usd " → "USD").
pub fn normalize_currency(code: &str) -> AppResult<String> {
    let c = code.trim().to_uppercase();
    if c.len() != 3 || !c.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(AppError::Validation(format!("invalid currency code '{code}'")));
    }
    Ok(c)
}

pub fn format_amount(currency: &str, amount: Decimal) -> String {
    format!("{:.2} {}", amount, currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round2(dec!(0.125)), dec!(0.13));
        assert_eq!(round2(dec!(2.5)), dec!(2.50));
    }

    #[test]
    fn currency_codes_are_normalized() {
        assert_eq!(normalize_currency(" eur").unwrap(), "EUR");
        assert!(normalize_currency("EURO").is_err());
    }

    #[test]
    fn overflowing_arithmetic_is_an_error() {
        assert_eq!(price(dec!(2.5), dec!(40)).unwrap(), dec!(100));
        assert!(matches!(price(Decimal::MAX, dec!(2)), Err(AppError::Validation(_))));

        let mut total = Decimal::MAX;
        assert!(accumulate(&mut total, dec!(1)).is_err());
        assert_eq!(total, Decimal::MAX);
    }

    #[test]
    fn amounts_print_with_two_decimals() {
        assert_eq!(format_amount("USD", dec!(100)), "100.00 USD");
    }
}
