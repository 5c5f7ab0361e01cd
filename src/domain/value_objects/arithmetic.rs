//! # Checked Arithmetic
//!
//! Overflow-safe operations for share counts (`u64`) and amounts
//! (`Decimal`), and the two rounding modes the ledger uses.
//!
//! Allocation shares are rounded down so the buyback remainder absorbs the
//! cents; transfer fees are rounded half-up.
//!
//! ```
//! use mineshare_ledger::domain::value_objects::arithmetic::CheckedArithmetic;
//! use rust_decimal::Decimal;
//!
//! let balance = Decimal::new(50_000, 0);
//! assert_eq!(balance.safe_sub(Decimal::new(13_000, 0)), Ok(Decimal::new(37_000, 0)));
//! assert!(30u64.safe_sub(31).is_err());
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decimal places kept on monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Failure of a checked operation or of a value constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Result above the representable range.
    #[error("arithmetic overflow")]
    Overflow,

    /// Result below zero for an unsigned count, or below the decimal range.
    #[error("arithmetic underflow")]
    Underflow,

    /// Divisor was zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Constructor input out of range.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

/// Result of a checked operation.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// How to bring an amount back to [`MONEY_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Toward zero.
    Down,
    /// Nearest, ties away from zero.
    HalfUp,
}

/// Rounds `amount` to [`MONEY_SCALE`] places.
///
/// ```
/// use mineshare_ledger::domain::value_objects::arithmetic::{round_money, Rounding};
/// use rust_decimal::Decimal;
///
/// let third = Decimal::new(33_335, 3); // 33.335
/// assert_eq!(round_money(third, Rounding::Down), Decimal::new(3333, 2));
/// assert_eq!(round_money(third, Rounding::HalfUp), Decimal::new(3334, 2));
/// ```
#[inline]
#[must_use]
pub fn round_money(amount: Decimal, rounding: Rounding) -> Decimal {
    let strategy = match rounding {
        Rounding::Down => RoundingStrategy::ToZero,
        Rounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
    };
    amount.round_dp_with_strategy(MONEY_SCALE, strategy)
}

/// Arithmetic that reports failure instead of panicking or wrapping.
///
/// Every method returns `ArithmeticError::Overflow`, `Underflow` or
/// `DivisionByZero` when the plain operator would misbehave.
pub trait CheckedArithmetic: Sized {
    /// `self + rhs`.
    ///
    /// # Errors
    ///
    /// `Overflow`.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// `self - rhs`.
    ///
    /// # Errors
    ///
    /// `Underflow`.
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// `self * rhs`.
    ///
    /// # Errors
    ///
    /// `Overflow`.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// `self / rhs`.
    ///
    /// # Errors
    ///
    /// `DivisionByZero`, or `Overflow` for a decimal quotient out of range.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

macro_rules! checked_ops {
    () => {
        #[inline]
        fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
            self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
        }

        #[inline]
        fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
            self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
        }

        #[inline]
        fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
            self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
        }
    };
}

impl CheckedArithmetic for Decimal {
    checked_ops!();

    #[inline]
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}

impl CheckedArithmetic for u64 {
    checked_ops!();

    #[inline]
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_div(rhs).ok_or(ArithmeticError::DivisionByZero)
    }
}
