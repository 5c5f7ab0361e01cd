//! # Money Value Objects
//!
//! Non-negative monetary amounts and ISO-style currency codes.
//!
//! Amounts are `Decimal` throughout; a [`Money`] can never be negative, so a
//! debit that would overdraw a balance surfaces as an
//! [`ArithmeticError::Underflow`] instead of a negative ledger row.
//!
//! # Examples
//!
//! ```
//! use mineshare_ledger::domain::value_objects::money::{Currency, Money};
//! use rust_decimal::Decimal;
//!
//! let ugx = Currency::new("ugx").unwrap();
//! assert_eq!(ugx.as_str(), "UGX");
//!
//! let price = Money::new(Decimal::new(20_000, 0)).unwrap();
//! let notional = price.times(30).unwrap();
//! assert_eq!(notional.get(), Decimal::new(600_000, 0));
//! ```

use crate::domain::value_objects::arithmetic::{
    ArithmeticError, ArithmeticResult, CheckedArithmetic,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A three-letter currency code, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Creates a currency code.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` unless the code is exactly three
    /// ASCII letters.
    pub fn new(code: &str) -> ArithmeticResult<Self> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ArithmeticError::InvalidValue(
                "currency code must be three letters",
            ));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Currency {
    type Error = ArithmeticError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A non-negative monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Creates an amount.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if `amount` is negative.
    pub fn new(amount: Decimal) -> ArithmeticResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ArithmeticError::InvalidValue("amount must not be negative"));
        }
        Ok(Self(amount))
    }

    /// Zero amount.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the decimal value.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive.
    #[inline]
    #[must_use]
    pub fn is_positive(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_positive()
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.0.safe_add(rhs.0).map(Self)
    }

    /// Subtracts `rhs`, refusing to go below zero.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if `rhs` exceeds `self`.
    pub fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.0 > self.0 {
            return Err(ArithmeticError::Underflow);
        }
        self.0.safe_sub(rhs.0).map(Self)
    }

    /// Multiplies a unit amount by a whole quantity.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn times(self, quantity: u64) -> ArithmeticResult<Self> {
        self.0.safe_mul(Decimal::from(quantity)).map(Self)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = ArithmeticError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
