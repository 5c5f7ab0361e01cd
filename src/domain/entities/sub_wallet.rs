//! # Sub-Wallet Entity
//!
//! Internal ledger buckets (admin fund, project funding, share buyback) fed
//! by the fund allocation workflow and drained by disbursements.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Currency, Money, SubWalletType, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An internal fund bucket in one currency.
///
/// # Invariants
///
/// - `balance` is never negative; [`SubWallet::debit`] refuses to overdraw
///
/// # Examples
///
/// ```
/// use mineshare_ledger::domain::entities::sub_wallet::SubWallet;
/// use mineshare_ledger::domain::value_objects::{Currency, Money, SubWalletType};
/// use rust_decimal::Decimal;
///
/// let mut buyback = SubWallet::new(SubWalletType::ShareBuyback, Currency::new("UGX").unwrap());
/// buyback.credit(Money::new(Decimal::new(1_000, 0)).unwrap()).unwrap();
/// assert!(buyback.debit(Money::new(Decimal::new(1_001, 0)).unwrap()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubWallet {
    wallet_type: SubWalletType,
    currency: Currency,
    balance: Money,
    updated_at: Timestamp,
}

impl SubWallet {
    /// Creates an empty sub-wallet.
    #[must_use]
    pub fn new(wallet_type: SubWalletType, currency: Currency) -> Self {
        Self {
            wallet_type,
            currency,
            balance: Money::zero(),
            updated_at: Timestamp::now(),
        }
    }

    /// Returns the bucket type.
    #[inline]
    #[must_use]
    pub fn wallet_type(&self) -> SubWalletType {
        self.wallet_type
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

    /// Adds an allocation share.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn credit(&mut self, amount: Money) -> DomainResult<()> {
        self.balance = self.balance.safe_add(amount)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Disburses funds.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsufficientBalance` if the balance is too low.
    pub fn debit(&mut self, amount: Money) -> DomainResult<()> {
        if amount > self.balance {
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

impl fmt::Display for SubWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SubWallet({}, {} {})",
            self.wallet_type, self.balance, self.currency
        )
    }
}
