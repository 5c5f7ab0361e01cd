//! # Percentage Value Object
//!
//! A percentage in the closed range `[0, 100]`, stored as the percent value
//! itself (`2` means two percent).

use crate::domain::value_objects::arithmetic::{
    ArithmeticError, ArithmeticResult, CheckedArithmetic,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A percentage between 0 and 100 inclusive.
///
/// # Examples
///
/// ```
/// use mineshare_ledger::domain::value_objects::percentage::Percentage;
/// use rust_decimal::Decimal;
///
/// let two = Percentage::new(Decimal::new(2, 0)).unwrap();
/// assert_eq!(two.of(Decimal::new(600_000, 0)).unwrap(), Decimal::new(12_000, 0));
/// assert!(Percentage::new(Decimal::new(101, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percentage(Decimal);

impl Percentage {
    /// Creates a percentage.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if `value` is outside `[0, 100]`.
    pub fn new(value: Decimal) -> ArithmeticResult<Self> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(ArithmeticError::InvalidValue(
                "percentage must be between 0 and 100",
            ));
        }
        Ok(Self(value))
    }

    /// Zero percent.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the percent value.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }

    /// Applies the percentage to `amount` without rounding.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn of(&self, amount: Decimal) -> ArithmeticResult<Decimal> {
        amount.safe_mul(self.0)?.safe_div(Decimal::ONE_HUNDRED)
    }
}

impl TryFrom<Decimal> for Percentage {
    type Error = ArithmeticError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for Decimal {
    fn from(value: Percentage) -> Self {
        value.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
