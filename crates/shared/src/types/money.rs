//! Monetary amounts in integer minor currency units.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `i64` counts of the smallest currency unit (e.g., cents),
//! which is exact and overflow-checked at every arithmetic step.

use serde::{Deserialize, Serialize};

/// A monetary amount in minor currency units (e.g., cents).
///
/// The ledger is single-currency; which currency the units denominate is a
/// deployment concern, not a per-row attribute.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(pub i64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw minor-unit value.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition; `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction; `None` on overflow.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked negation; `None` on overflow (`i64::MIN`).
    #[must_use]
    pub const fn checked_neg(self) -> Option<Self> {
        match self.0.checked_neg() {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Saturating addition, pinned at the `i64` range ends.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Amount {
    fn from(minor: i64) -> Self {
        Self(minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_zero() {
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::ZERO.is_negative());
        assert!(!Amount::ZERO.is_positive());
    }

    #[test]
    fn test_amount_signs() {
        assert!(Amount::from_minor(100).is_positive());
        assert!(Amount::from_minor(-100).is_negative());
        assert!(!Amount::from_minor(-100).is_positive());
    }

    #[test]
    fn test_amount_arithmetic() {
        let a = Amount::from_minor(150);
        let b = Amount::from_minor(50);
        assert_eq!(a + b, Amount::from_minor(200));
        assert_eq!(a - b, Amount::from_minor(100));
        assert_eq!(-a, Amount::from_minor(-150));
    }

    #[test]
    fn test_amount_checked_overflow() {
        let max = Amount::from_minor(i64::MAX);
        assert!(max.checked_add(Amount::from_minor(1)).is_none());
        assert_eq!(
            max.saturating_add(Amount::from_minor(1)),
            Amount::from_minor(i64::MAX)
        );
        assert!(Amount::from_minor(i64::MIN).checked_neg().is_none());
    }

    #[test]
    fn test_amount_sum() {
        let total: Amount = [10, 20, 30].into_iter().map(Amount::from_minor).sum();
        assert_eq!(total, Amount::from_minor(60));
    }

    #[test]
    fn test_amount_serde_transparent() {
        let json = serde_json::to_string(&Amount::from_minor(12345)).unwrap();
        assert_eq!(json, "12345");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Amount::from_minor(12345));
    }
}
