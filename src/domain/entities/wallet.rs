//! # Wallet Entity
//!
//! A user's cash balance in one currency. Transfer fees are charged here and
//! buyback proceeds are paid in here.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Currency, Money, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user's currency wallet.
///
/// # Invariants
///
/// - `balance` is never negative; [`Wallet::withdraw`] refuses to overdraw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    user_id: UserId,
    currency: Currency,
    balance: Money,
    updated_at: Timestamp,
}

impl Wallet {
    /// Creates an empty wallet.
    #[must_use]
    pub fn new(user_id: UserId, currency: Currency) -> Self {
        Self {
            user_id,
            currency,
            balance: Money::zero(),
            updated_at: Timestamp::now(),
        }
    }

    /// Creates a wallet with an opening balance.
    #[must_use]
    pub fn with_balance(user_id: UserId, currency: Currency, balance: Money) -> Self {
        Self {
            balance,
            ..Self::new(user_id, currency)
        }
    }

    /// Returns the owner.
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the currency.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Returns the balance.
    #[inline]
    #[must_use]
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Returns when the balance last changed.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns true if the balance covers `amount`.
    #[inline]
    #[must_use]
    pub fn can_cover(&self, amount: Money) -> bool {
        self.balance >= amount
    }

    /// Adds funds.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn deposit(&mut self, amount: Money) -> DomainResult<()> {
        self.balance = self.balance.safe_add(amount)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Removes funds.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsufficientBalance` if the balance is too low.
    pub fn withdraw(&mut self, amount: Money) -> DomainResult<()> {
        if !self.can_cover(amount) {
            return Err(DomainError::InsufficientBalance {
                available: self.balance.get(),
                required: amount.get(),
            });
        }
        self.balance = self.balance.safe_sub(amount)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wallet({}, {} {})", self.user_id, self.balance, self.currency)
    }
}
