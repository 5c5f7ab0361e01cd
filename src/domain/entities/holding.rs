//! # Holding Entity
//!
//! A lot of shares owned by one user, bought at one price.
//!
//! A user can own several lots of the same share class. Locked lots (for
//! example shares still in a vesting or dispute hold) count toward the
//! user's total but never toward the transferable or sellable total.
//!
//! # Examples
//!
//! ```
//! use mineshare_ledger::domain::entities::holding::Holding;
//! use mineshare_ledger::domain::value_objects::{Money, ShareId, UserId};
//! use rust_decimal::Decimal;
//!
//! let mut lot = Holding::new(
//!     UserId::new_v4(),
//!     ShareId::new_v4(),
//!     100,
//!     Money::new(Decimal::new(20_000, 0)).unwrap(),
//! ).unwrap();
//!
//! lot.debit(30).unwrap();
//! assert_eq!(lot.quantity(), 70);
//! assert!(lot.debit(71).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::CheckedArithmetic;
use crate::domain::value_objects::{HoldingId, Money, ShareId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user's lot of shares.
///
/// # Invariants
///
/// - `quantity` never goes below zero (it is unsigned and debits are checked)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    id: HoldingId,
    owner_id: UserId,
    share_id: ShareId,
    quantity: u64,
    purchase_price: Money,
    locked: bool,
    acquired_at: Timestamp,
}

impl Holding {
    /// Creates an unlocked lot acquired now.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if `quantity` is zero.
    pub fn new(
        owner_id: UserId,
        share_id: ShareId,
        quantity: u64,
        purchase_price: Money,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity(
                "holding quantity must be positive".to_string(),
            ));
        }
        Ok(Self {
            id: HoldingId::new_v4(),
            owner_id,
            share_id,
            quantity,
            purchase_price,
            locked: false,
            acquired_at: Timestamp::now(),
        })
    }

    /// Reconstructs a lot from storage without validation.
    #[must_use]
    pub fn from_parts(
        id: HoldingId,
        owner_id: UserId,
        share_id: ShareId,
        quantity: u64,
        purchase_price: Money,
        locked: bool,
        acquired_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner_id,
            share_id,
            quantity,
            purchase_price,
            locked,
            acquired_at,
        }
    }

    /// Returns the lot id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> HoldingId {
        self.id
    }

    /// Returns the owner.
    #[inline]
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the share class.
    #[inline]
    #[must_use]
    pub fn share_id(&self) -> ShareId {
        self.share_id
    }

    /// Returns the number of shares in the lot.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Returns the unit purchase price.
    #[inline]
    #[must_use]
    pub fn purchase_price(&self) -> Money {
        self.purchase_price
    }

    /// Returns true if the lot is locked.
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns when the lot was acquired.
    #[inline]
    #[must_use]
    pub fn acquired_at(&self) -> Timestamp {
        self.acquired_at
    }

    /// Shares in this lot that may be transferred or sold.
    #[inline]
    #[must_use]
    pub fn available(&self) -> u64 {
        if self.locked { 0 } else { self.quantity }
    }

    /// Locks the lot.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Unlocks the lot.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Removes `quantity` shares from the lot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsufficientHoldings` if the lot is locked or
    /// holds fewer shares.
    pub fn debit(&mut self, quantity: u64) -> DomainResult<()> {
        let available = self.available();
        if quantity > available {
            return Err(DomainError::InsufficientHoldings {
                available,
                requested: quantity,
            });
        }
        self.quantity = self.quantity.safe_sub(quantity)?;
        Ok(())
    }

    /// Adds `quantity` shares to the lot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn credit(&mut self, quantity: u64) -> DomainResult<()> {
        self.quantity = self.quantity.safe_add(quantity)?;
        Ok(())
    }
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Holding({}, owner={}, share={}, qty={}{})",
            self.id,
            self.owner_id,
            self.share_id,
            self.quantity,
            if self.locked { ", locked" } else { "" }
        )
    }
}
