//! Money type for representing currency amounts
//!
//! Amounts are exact decimals. Normalized monthly figures divide by
//! arbitrary recurrence parameters, so whole cents are not enough; a
//! `Decimal` keeps the partner split exact until display time.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Largest absolute amount accepted from user input
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0); // 1_000_000_000_000

/// A currency amount in whole currency units with an exact fractional part
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create from an exact decimal
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create from cents
    ///
    /// # Examples
    /// ```
    /// use fairshare::models::Money;
    /// assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create from whole currency units
    pub fn from_whole(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// A zero amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The underlying decimal
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Multiply then divide, degrading to zero instead of overflowing or
    /// dividing by zero.
    pub fn scale(&self, numerator: Decimal, denominator: Decimal) -> Self {
        self.0
            .checked_mul(numerator)
            .and_then(|v| v.checked_div(denominator))
            .map(Self)
            .unwrap_or_default()
    }

    /// Round to whole currency units (half away from zero)
    ///
    /// This is the only rounding the crate applies, and only for display.
    pub fn rounded(&self) -> i64 {
        self.0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(0)
    }

    /// Format as whole units with a currency symbol, e.g. `$144`
    pub fn format_whole(&self, symbol: &str) -> String {
        let whole = self.rounded();
        if whole < 0 {
            format!("-{}{}", symbol, -whole)
        } else {
            format!("{}{}", symbol, whole)
        }
    }

    /// Format with two decimals and a currency symbol, e.g. `$10.50`
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let two = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if two.is_sign_negative() && !two.is_zero() {
            format!("-{}{:.2}", symbol, two.abs())
        } else {
            format!("{}{:.2}", symbol, two.abs())
        }
    }

    /// Plain edit text: the exact amount without symbol or trailing zeros
    pub fn edit_text(&self) -> String {
        self.0.normalize().to_string()
    }

    /// Parse a money amount from user input
    ///
    /// Accepts `10.50`, `-10.50`, `$10.50`, `1,200`, ` 7 `.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped.trim_start()),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let cleaned: String = rest.chars().filter(|c| *c != ',' && *c != '_').collect();

        if cleaned.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let value = Decimal::from_str(&cleaned)
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        if value.abs() > MAX_AMOUNT {
            return Err(MoneyParseError::OutOfRange(s.to_string()));
        }

        Ok(Self(if negative { -value } else { value }))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_amount_constant() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000i64));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-$10.50");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap(), Money::from_cents(1050));
        assert_eq!(Money::parse("$10.50").unwrap(), Money::from_cents(1050));
        assert_eq!(Money::parse("-10.5").unwrap(), Money::from_cents(-1050));
        assert_eq!(Money::parse("1,200").unwrap(), Money::from_whole(1200));
        assert_eq!(Money::parse(" 7 ").unwrap(), Money::from_whole(7));
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(matches!(
            Money::parse("2000000000000"),
            Err(MoneyParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(Money::parse("144.5").unwrap().rounded(), 145);
        assert_eq!(Money::parse("144.49").unwrap().rounded(), 144);
        assert_eq!(Money::parse("-2.5").unwrap().rounded(), -3);
        assert_eq!(Money::parse("433").unwrap().format_whole("$"), "$433");
        assert_eq!(Money::parse("-12.7").unwrap().format_whole("$"), "-$13");
    }

    #[test]
    fn test_scale_degrades_to_zero() {
        let m = Money::from_whole(100);
        assert_eq!(m.scale(Decimal::ONE, Decimal::ZERO), Money::zero());
        assert_eq!(m.scale(Decimal::from(3), Decimal::from(4)), Money::from_whole(75));
    }

    #[test]
    fn test_edit_text_trims_trailing_zeros() {
        assert_eq!(Money::from_cents(1050).edit_text(), "10.5");
        assert_eq!(Money::from_whole(0).edit_text(), "0");
    }

    #[test]
    fn test_sum() {
        let total: Money = vec![Money::from_cents(100), Money::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(350));
    }

    #[test]
    fn test_serialization_round_trip() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
