//! Fixed-point money in integer minor units.
//!
//! The legacy system passed amounts around interchangeably as text and
//! floating-point numbers. Here every amount is an `i64` count of minor units
//! (cents), parsed and validated once at the boundary, so repeated additions
//! never drift.

use core::ops::{Add, AddAssign, Sub};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// An amount of money in minor units (cents).
///
/// Arithmetic is saturating: ledger sums stay well inside `i64` range for any
/// realistic institution, and saturation beats a silent wrap.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Whole currency units, e.g. `Money::from_major(100)` == 100.00.
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Money) -> Money {
        Money(self.0.max(other.0))
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtraction floored at zero; the shape every "remaining balance" takes.
    pub fn sub_clamped(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// Parse a decimal amount string at the boundary, e.g. `"118"`, `"118.5"`,
    /// `"118.50"`.
    ///
    /// Rejects negative, empty and non-numeric input with a specific
    /// validation reason. At most two fraction digits are accepted.
    pub fn parse(input: &str) -> DomainResult<Money> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("amount must not be empty"));
        }
        if trimmed.starts_with('-') {
            return Err(DomainError::validation("amount must not be negative"));
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "amount is not numeric: {trimmed:?}"
            )));
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "amount has invalid fraction digits: {trimmed:?}"
            )));
        }

        let major: i64 = whole
            .parse()
            .map_err(|_| DomainError::validation(format!("amount out of range: {trimmed:?}")))?;
        let mut cents: i64 = fraction.parse().unwrap_or(0);
        if fraction.len() == 1 {
            cents *= 10;
        }
        major
            .checked_mul(100)
            .and_then(|m| m.checked_add(cents))
            .map(Money)
            .ok_or_else(|| DomainError::validation(format!("amount out of range: {trimmed:?}")))
    }
}

impl ValueObject for Money {}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = self.saturating_add(rhs);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(Money::parse("118").unwrap(), Money::from_minor(11800));
        assert_eq!(Money::parse("118.5").unwrap(), Money::from_minor(11850));
        assert_eq!(Money::parse("118.50").unwrap(), Money::from_minor(11850));
        assert_eq!(Money::parse("0.07").unwrap(), Money::from_minor(7));
    }

    #[test]
    fn rejects_negative_amounts() {
        let err = Money::parse("-5").unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("negative")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        for bad in ["", "  ", "abc", "1,50", "1.234", "1.2x"] {
            assert!(Money::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn sub_clamped_floors_at_zero() {
        let fee = Money::from_major(100);
        let settled = Money::from_major(250);
        assert_eq!(fee.sub_clamped(settled), Money::ZERO);
        assert_eq!(settled.sub_clamped(fee), Money::from_major(150));
    }

    #[test]
    fn displays_as_decimal() {
        assert_eq!(Money::from_minor(11800).to_string(), "118.00");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-150).to_string(), "-1.50");
    }
}
