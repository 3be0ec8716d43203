//! Prices
//!
//! The storefront sells in whole Colombian pesos. Catalog rows keep their
//! prices as display text (`"5.000 COP"`, `"$5000"`), so this module owns the
//! conversion between that text and [`Price`] values, and back again for
//! display.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// A monetary amount in an ISO currency.
pub type Price = Money<'static, Currency>;

/// Errors that can occur while parsing a price from catalog text.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// The text contained no amount.
    #[error("price is empty")]
    Empty,

    /// The amount was negative.
    #[error("price cannot be negative: {0}")]
    Negative(String),

    /// The text was not a recognisable amount.
    #[error("invalid price format: {0}")]
    InvalidFormat(String),

    /// The amount does not fit in minor units.
    #[error("price out of range: {0}")]
    OutOfRange(String),
}

/// The currency every catalog price is expressed in.
pub fn store_currency() -> &'static Currency {
    iso::COP
}

/// Build a price from whole pesos.
pub fn pesos(amount: i64) -> Price {
    Money::from_minor(
        amount.saturating_mul(minor_per_major(store_currency())),
        store_currency(),
    )
}

/// Number of minor units in one major unit of `currency`.
pub(crate) fn minor_per_major(currency: &Currency) -> i64 {
    10_i64.pow(currency.exponent)
}

/// Parse a catalog price such as `"5.000 COP"`, `"$5000"` or `"5000"`.
///
/// Dots group thousands (`es-CO`); a comma introduces the fractional part.
///
/// # Errors
///
/// - [`PriceError::Empty`]: nothing but whitespace, symbol or currency code.
/// - [`PriceError::Negative`]: a leading minus sign.
/// - [`PriceError::InvalidFormat`]: stray characters or badly grouped digits.
/// - [`PriceError::OutOfRange`]: the amount overflows minor units.
pub fn parse_price(text: &str) -> Result<Price, PriceError> {
    let currency = store_currency();

    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_suffix(currency.iso_alpha_code)
        .unwrap_or(trimmed)
        .trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();

    if trimmed.is_empty() {
        return Err(PriceError::Empty);
    }

    if trimmed.starts_with('-') {
        return Err(PriceError::Negative(text.to_string()));
    }

    let (whole, fraction) = match trimmed.split_once(',') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (trimmed, None),
    };

    let digits = ungroup(whole).ok_or_else(|| PriceError::InvalidFormat(text.to_string()))?;

    let normalised = match fraction {
        Some(fraction) if !fraction.is_empty() && fraction.chars().all(|c| c.is_ascii_digit()) => {
            format!("{digits}.{fraction}")
        }
        Some(_) => return Err(PriceError::InvalidFormat(text.to_string())),
        None => digits,
    };

    let amount = normalised
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidFormat(text.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::from(minor_per_major(currency)))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| PriceError::OutOfRange(text.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Strip `es-CO` thousands separators, checking that every group after the
/// first has exactly three digits.
fn ungroup(whole: &str) -> Option<String> {
    let mut groups = whole.split('.');
    let first = groups.next()?;

    if first.is_empty() || !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut digits = first.to_string();

    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        digits.push_str(group);
    }

    Some(digits)
}

/// Format a price the way the storefront displays amounts, e.g. `$5.000`.
pub fn format_amount(price: &Price) -> String {
    let per_major = minor_per_major(price.currency());
    let minor = price.to_minor_units();

    let sign = if minor < 0 { "-" } else { "" };
    let minor = minor.unsigned_abs();
    let per_major = per_major.unsigned_abs();

    let whole = group_thousands(minor / per_major);
    let fraction = minor % per_major;

    if fraction == 0 {
        format!("{sign}${whole}")
    } else {
        let width = price.currency().exponent as usize;
        format!("{sign}${whole},{fraction:0width$}")
    }
}

/// Format a price with its currency code, e.g. `$5.000 COP`.
pub fn format_price(price: &Price) -> String {
    format!(
        "{} {}",
        format_amount(price),
        price.currency().iso_alpha_code
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }

        grouped.push(digit);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn pesos_uses_store_currency() {
        let price = pesos(5_000);

        assert_eq!(price.currency(), iso::COP);
        assert_eq!(price.to_minor_units(), 5_000 * minor_per_major(iso::COP));
    }

    #[test]
    fn parses_plain_digits() -> TestResult {
        assert_eq!(parse_price("5000")?, pesos(5_000));

        Ok(())
    }

    #[test]
    fn parses_grouped_amount_with_symbol_and_code() -> TestResult {
        assert_eq!(parse_price("$5.000 COP")?, pesos(5_000));
        assert_eq!(parse_price("  1.250.000COP ")?, pesos(1_250_000));

        Ok(())
    }

    #[test]
    fn parses_fractional_pesos() -> TestResult {
        let price = parse_price("2.500,5")?;

        assert_eq!(
            price.to_minor_units(),
            2_500 * minor_per_major(iso::COP) + minor_per_major(iso::COP) / 2
        );

        Ok(())
    }

    #[test]
    fn rejects_empty_text() {
        assert_eq!(parse_price("   "), Err(PriceError::Empty));
        assert_eq!(parse_price("$ COP"), Err(PriceError::Empty));
    }

    #[test]
    fn rejects_negative_amounts() {
        assert_eq!(
            parse_price("-300"),
            Err(PriceError::Negative("-300".to_string()))
        );
    }

    #[test]
    fn rejects_badly_grouped_digits() {
        assert!(matches!(
            parse_price("5.00"),
            Err(PriceError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_price("cinco mil"),
            Err(PriceError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_price("5,"),
            Err(PriceError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_overflowing_amounts() {
        assert!(matches!(
            parse_price("99999999999999999999"),
            Err(PriceError::OutOfRange(_))
        ));
    }

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(format_price(&pesos(1_234_567)), "$1.234.567 COP");
        assert_eq!(format_amount(&pesos(999)), "$999");
        assert_eq!(format_amount(&pesos(0)), "$0");
    }

    #[test]
    fn formats_fractions_and_negatives() -> TestResult {
        assert_eq!(format_amount(&parse_price("10,5")?), "$10,50");
        assert_eq!(format_amount(&pesos(-2_000)), "-$2.000");

        Ok(())
    }
}
