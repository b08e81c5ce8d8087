//! Money type with exact decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` and keeps every value at the
//! fixed 2-digit scale used by account balances and transfer amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary amount at a fixed 2-digit scale.
///
/// Arithmetic is exact: `add` and `subtract` never lose precision, and
/// `subtract` is allowed to produce a negative result at this layer -
/// the account entity enforces the non-negative balance invariant before
/// calling it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

/// Number of fractional digits every `Money` value carries.
pub const MONEY_SCALE: u32 = 2;

impl Money {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a monetary amount from a decimal, rescaled to 2 digits.
    ///
    /// Values that already fit the scale are preserved exactly; extra
    /// fractional digits are rounded with banker's rounding, matching how
    /// the store persists `NUMERIC(19, 2)` columns.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        let mut amount = amount;
        amount.rescale(MONEY_SCALE);
        Self(amount)
    }

    /// Creates a monetary amount from minor units (cents).
    #[must_use]
    pub fn from_minor_units(cents: i64) -> Self {
        Self(Decimal::new(cents, MONEY_SCALE))
    }

    /// Returns the inner decimal value.
    #[must_use]
    pub const fn into_inner(self) -> Decimal {
        self.0
    }

    /// Returns the exact sum of `self` and `other`.
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }

    /// Returns the exact difference `self - other`.
    ///
    /// May be negative; callers enforce their own floor.
    #[must_use]
    pub fn subtract(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_new_rescales() {
        let money = Money::new(dec!(100));
        assert_eq!(money.into_inner(), dec!(100.00));
        assert_eq!(money.to_string(), "100.00");
    }

    #[test]
    fn test_money_from_minor_units() {
        assert_eq!(Money::from_minor_units(12345), Money::new(dec!(123.45)));
        assert_eq!(Money::from_minor_units(0), Money::ZERO);
    }

    #[test]
    fn test_money_add_exact() {
        let a = Money::new(dec!(0.10));
        let b = Money::new(dec!(0.20));
        assert_eq!(a.add(b), Money::new(dec!(0.30)));
    }

    #[test]
    fn test_money_subtract_may_go_negative() {
        let a = Money::new(dec!(1.00));
        let b = Money::new(dec!(2.50));
        let diff = a.subtract(b);
        assert!(diff.is_negative());
        assert_eq!(diff, Money::new(dec!(-1.50)));
    }

    #[test]
    fn test_money_ordering() {
        let small = Money::new(dec!(9.99));
        let big = Money::new(dec!(10.00));
        assert!(small < big);
        assert!(big >= small);
        assert_eq!(big, Money::new(dec!(10)));
    }

    #[test]
    fn test_money_sign_predicates() {
        assert!(Money::new(dec!(0.01)).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::ZERO.is_negative());
        assert!(Money::new(dec!(-0.01)).is_negative());
        assert!(Money::ZERO.is_zero());
    }

    #[test]
    fn test_money_display_two_digits() {
        assert_eq!(Money::new(dec!(1000)).to_string(), "1000.00");
        assert_eq!(Money::new(dec!(0.5)).to_string(), "0.50");
    }
}
