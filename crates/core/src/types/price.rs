//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive as JSON numbers (`179.9`) and are persisted the same
//! way, so [`Price`] serializes as a float while doing all arithmetic in
//! [`Decimal`].

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A unit price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display (e.g., "$1,234.50").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = format!("{:.2}", self.0.abs().round_dp(2));
        let (whole, cents) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        let sign = if self.0.is_sign_negative() && !self.0.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}${grouped}.{cents}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_string()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_serializes_as_number() {
        let price: Price = "179.9".parse().unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "179.9");
    }

    #[test]
    fn test_price_deserializes_from_number() {
        let price: Price = serde_json::from_str("139.9").unwrap();
        assert_eq!(price, "139.90".parse().unwrap());
    }

    #[test]
    fn test_price_times() {
        let price = Price::from_cents(1999);
        assert_eq!(price.times(3), Price::from_cents(5997));
        assert_eq!(price.times(0), Price::ZERO);
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(1999).display(), "$19.99");
        assert_eq!(Price::from_cents(123_450).display(), "$1,234.50");
        assert_eq!(Price::from_cents(100_000_000).display(), "$1,000,000.00");
        assert_eq!(Price::ZERO.display(), "$0.00");
    }

    #[test]
    fn test_price_parse_errors() {
        assert!(matches!("abc".parse::<Price>(), Err(PriceError::Invalid(_))));
        assert_eq!("-1".parse::<Price>(), Err(PriceError::Negative));
    }

    #[test]
    fn test_price_sum() {
        let total: Price = [Price::from_cents(150), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(400));
    }
}
