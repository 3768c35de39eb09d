//! Prices
//!
//! Money amounts in fixtures and config files are written as `"AMOUNT CODE"`, e.g. `"2.99 GBP"`,
//! and handled internally as integer minor units.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Findable, Money, iso::Currency};
use thiserror::Error;

/// Price Parsing Errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// Not of the form `"AMOUNT CODE"`
    #[error("invalid price format: {0:?}")]
    InvalidFormat(String),

    /// Amount is not a decimal number
    #[error("invalid price amount: {0:?}")]
    InvalidAmount(String),

    /// Unknown ISO currency code
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Amount has more decimal places than the currency allows
    #[error("{amount} has more precision than {currency} minor units")]
    TooPrecise {
        /// The amount as written
        amount: String,

        /// ISO currency code
        currency: &'static str,
    },

    /// Prices, minimums and fees can't be negative
    #[error("negative amount: {0:?}")]
    Negative(String),

    /// Amount doesn't fit in `i64` minor units
    #[error("amount out of range: {0:?}")]
    OutOfRange(String),
}

/// Parse a price string like `"2.99 GBP"` into minor units and its currency.
///
/// # Errors
///
/// Returns a [`PriceError`] if the string is malformed, names an unknown currency, is negative,
/// or cannot be expressed exactly in whole minor units.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), PriceError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceError::InvalidFormat(s.to_string()));
    };

    let currency = Currency::find(code).ok_or_else(|| PriceError::UnknownCurrency(code.to_string()))?;

    let amount: Decimal = amount
        .parse()
        .map_err(|_err| PriceError::InvalidAmount(s.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PriceError::Negative(s.to_string()));
    }

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .map(Decimal::from)
        .ok_or_else(|| PriceError::OutOfRange(s.to_string()))?;

    let minor = amount
        .checked_mul(scale)
        .ok_or_else(|| PriceError::OutOfRange(s.to_string()))?;

    if !minor.fract().is_zero() {
        return Err(PriceError::TooPrecise {
            amount: amount.to_string(),
            currency: currency.iso_alpha_code,
        });
    }

    let minor_units = minor
        .to_i64()
        .ok_or_else(|| PriceError::OutOfRange(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Format an amount in minor units for display, e.g. `£2.99`.
pub fn format_minor(minor_units: i64, currency: &'static Currency) -> String {
    Money::from_minor(minor_units, currency).to_string()
}
