use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

//--------------------------------------       Cents       -----------------------------------------------------------
/// A product price, stored as an integer number of cents.
///
/// Prices in the marketplace are always non-negative. The signed representation exists so that arithmetic on
/// aggregates (refund-style adjustments, totals) stays closed under subtraction; use [`Cents::is_negative`] at
/// validation boundaries.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Cents(i64);

op!(binary Cents, Add, add);
op!(binary Cents, Sub, sub);
op!(inplace Cents, SubAssign, sub_assign);
op!(unary Cents, Neg, neg);

impl Mul<i64> for Cents {
    type Output = Self;

    /// Saturates at the `i64` cent bounds rather than wrapping.
    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value().saturating_mul(rhs))
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in cents: {0}")]
pub struct CentsConversionError(String);

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Cents {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Cents {}

impl FromStr for Cents {
    type Err = CentsConversionError;

    /// Parses a decimal price string ("15", "9.99") into cents. At most two fractional digits are accepted, and
    /// negative prices are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if frac.len() > 2 || (!frac.is_empty() && !frac.bytes().all(|b| b.is_ascii_digit())) {
            return Err(CentsConversionError(s.to_string()));
        }
        let whole = whole.parse::<i64>().map_err(|_| CentsConversionError(s.to_string()))?;
        if whole < 0 || s.starts_with('-') {
            return Err(CentsConversionError(format!("{s} is negative")));
        }
        let mut frac_cents = if frac.is_empty() { 0 } else { frac.parse::<i64>().unwrap_or(0) };
        if frac.len() == 1 {
            frac_cents *= 10;
        }
        // The price field comes straight off the wire, so an overflow is an input error, not a panic.
        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .map(Self)
            .ok_or_else(|| CentsConversionError(format!("{s} is out of range")))
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dollars = self.0 / 100;
        let cents = (self.0 % 100).abs();
        write!(f, "${dollars}.{cents:02}")
    }
}

impl Cents {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}
