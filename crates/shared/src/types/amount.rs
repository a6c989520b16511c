//! Fixed-point monetary amount.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` values held at two decimal places (minor units),
//! so sums of debits and credits compare exactly.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places every amount is held at.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Largest storable magnitude, `99999999999999999.99` (a `NUMERIC(19, 2)` column).
const MAX_VALUE: Decimal =
    Decimal::from_parts(0x89E7_FFFF, 0x8AC7_2304, 0, false, MINOR_UNIT_SCALE);

/// A monetary amount with exactly two decimal places.
///
/// Construction rounds with Banker's Rounding, so `0.1 + 0.2 == 0.3` holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest amount a voucher line may carry.
    pub const MAX: Self = Self(MAX_VALUE);

    /// Creates an amount, rounding to minor units.
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(MINOR_UNIT_SCALE);
        Self(rounded)
    }

    /// Creates an amount from an integer count of minor units (e.g. paise).
    #[must_use]
    pub fn from_minor(minor_units: i64) -> Self {
        Self(Decimal::new(minor_units, MINOR_UNIT_SCALE))
    }

    /// Parses form input, coercing anything non-numeric to zero.
    ///
    /// Sign is preserved; callers decide whether negatives are acceptable.
    #[must_use]
    pub fn parse_lenient(input: &str) -> Self {
        Decimal::from_str(input.trim()).map_or(Self::ZERO, Self::new)
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns true if the amount is strictly below zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns true if the magnitude does not exceed [`Amount::MAX`].
    #[must_use]
    pub fn is_within_limit(self) -> bool {
        self.0.abs() <= MAX_VALUE
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(Decimal::from_str(s.trim())?))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Arithmetic saturates at the decimal range; validation reports anything past `Amount::MAX`.
impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
