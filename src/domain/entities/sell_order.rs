//! # Sell Order Aggregate
//!
//! A user's request to sell shares back to the platform, waiting in a FIFO
//! queue.
//!
//! # State Machine
//!
//! ```text
//! Pending ──fill──→ Processing ──fill──→ Completed
//!    ├──fill (all)──────────────────────→ Completed
//!    └──cancel──→ Cancelled
//! ```
//!
//! The quantity can be changed only while `Pending`, and only downwards, so
//! `remaining_quantity <= quantity` holds at all times and
//! `remaining_quantity` never grows.
//!
//! # Examples
//!
//! ```
//! use mineshare_ledger::domain::entities::sell_order::SellOrder;
//! use mineshare_ledger::domain::value_objects::{SellOrderStatus, ShareId, UserId};
//!
//! let mut order = SellOrder::new(UserId::new_v4(), ShareId::new_v4(), 50, 1).unwrap();
//! order.modify_quantity(40).unwrap();
//! order.fill(15).unwrap();
//! assert_eq!(order.status(), SellOrderStatus::Processing);
//! assert_eq!(order.remaining_quantity(), 25);
//! assert!(order.cancel().is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::CheckedArithmetic;
use crate::domain::value_objects::{SellOrderId, SellOrderStatus, ShareId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sell order in the buyback queue.
///
/// # Invariants
///
/// - `0 <= remaining_quantity <= quantity`
/// - `remaining_quantity` is monotonically non-increasing
/// - `fifo_position` is fixed at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellOrder {
    id: SellOrderId,
    user_id: UserId,
    share_id: ShareId,
    quantity: u64,
    remaining_quantity: u64,
    fifo_position: u64,
    status: SellOrderStatus,
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl SellOrder {
    /// Creates a pending order at the given queue position.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if `quantity` is zero.
    pub fn new(
        user_id: UserId,
        share_id: ShareId,
        quantity: u64,
        fifo_position: u64,
    ) -> DomainResult<Self> {
        Self::validate_quantity(quantity)?;
        let now = Timestamp::now();
        Ok(Self {
            id: SellOrderId::new_v4(),
            user_id,
            share_id,
            quantity,
            remaining_quantity: quantity,
            fifo_position,
            status: SellOrderStatus::Pending,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstructs an order from storage without validation.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: SellOrderId,
        user_id: UserId,
        share_id: ShareId,
        quantity: u64,
        remaining_quantity: u64,
        fifo_position: u64,
        status: SellOrderStatus,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            share_id,
            quantity,
            remaining_quantity,
            fifo_position,
            status,
            version,
            created_at,
            updated_at,
        }
    }

    fn validate_quantity(quantity: u64) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity(
                "sell quantity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn transition_to(&mut self, target: SellOrderStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::invalid_transition(
                "sell order",
                self.status,
                target,
            ));
        }
        self.status = target;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
    }

    // ========== Accessors ==========

    /// Returns the order id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SellOrderId {
        self.id
    }

    /// Returns the seller.
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the share class.
    #[inline]
    #[must_use]
    pub fn share_id(&self) -> ShareId {
        self.share_id
    }

    /// Returns the ordered quantity.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Returns the quantity still to be filled.
    #[inline]
    #[must_use]
    pub fn remaining_quantity(&self) -> u64 {
        self.remaining_quantity
    }

    /// Returns the quantity already filled.
    #[inline]
    #[must_use]
    pub fn filled_quantity(&self) -> u64 {
        self.quantity.saturating_sub(self.remaining_quantity)
    }

    /// Returns the queue position.
    #[inline]
    #[must_use]
    pub fn fifo_position(&self) -> u64 {
        self.fifo_position
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> SellOrderStatus {
        self.status
    }

    /// Returns the version, bumped on every change.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the order was submitted.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the order last changed.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns true while the order occupies a queue slot.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    // ========== Operations ==========

    /// Withdraws a pending order from the queue.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless pending.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.transition_to(SellOrderStatus::Cancelled)
    }

    /// Reduces the quantity of a pending order. The queue position is kept.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless pending,
    /// `DomainError::InvalidQuantity` for zero and
    /// `DomainError::QuantityIncrease` if `new_quantity` exceeds the current
    /// quantity.
    pub fn modify_quantity(&mut self, new_quantity: u64) -> DomainResult<()> {
        if self.status != SellOrderStatus::Pending {
            return Err(DomainError::invalid_transition(
                "sell order",
                self.status,
                "modified",
            ));
        }
        Self::validate_quantity(new_quantity)?;
        if new_quantity > self.quantity {
            return Err(DomainError::QuantityIncrease {
                current: self.quantity,
                requested: new_quantity,
            });
        }
        self.quantity = new_quantity;
        self.remaining_quantity = new_quantity;
        self.touch();
        Ok(())
    }

    /// Records a fill of `quantity` shares.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if `quantity` is zero or exceeds
    /// the remaining quantity, and `DomainError::InvalidStateTransition` if the
    /// order is closed.
    pub fn fill(&mut self, quantity: u64) -> DomainResult<()> {
        Self::validate_quantity(quantity)?;
        if quantity > self.remaining_quantity {
            return Err(DomainError::InvalidQuantity(format!(
                "fill of {quantity} exceeds remaining {}",
                self.remaining_quantity
            )));
        }
        let remaining = self.remaining_quantity.safe_sub(quantity)?;
        let target = if remaining == 0 {
            SellOrderStatus::Completed
        } else {
            SellOrderStatus::Processing
        };
        self.transition_to(target)?;
        self.remaining_quantity = remaining;
        Ok(())
    }
}

impl fmt::Display for SellOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SellOrder(#{} {}, {}/{} of {}, {})",
            self.fifo_position,
            self.id,
            self.remaining_quantity,
            self.quantity,
            self.share_id,
            self.status
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order(qty: u64) -> SellOrder {
        SellOrder::new(UserId::new_v4(), ShareId::new_v4(), qty, 7).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn starts_pending_with_full_remaining() {
            let o = order(50);
            assert_eq!(o.status(), SellOrderStatus::Pending);
            assert_eq!(o.remaining_quantity(), 50);
            assert_eq!(o.fifo_position(), 7);
            assert_eq!(o.filled_quantity(), 0);
        }

        #[test]
        fn zero_quantity_rejected() {
            assert!(SellOrder::new(UserId::new_v4(), ShareId::new_v4(), 0, 1).is_err());
        }
    }

    mod modify {
        use super::*;

        #[test]
        fn reduce_keeps_position() {
            let mut o = order(50);
            o.modify_quantity(20).unwrap();
            assert_eq!(o.quantity(), 20);
            assert_eq!(o.remaining_quantity(), 20);
            assert_eq!(o.fifo_position(), 7);
            assert_eq!(o.version(), 2);
        }

        #[test]
        fn increase_rejected() {
            let mut o = order(50);
            assert_eq!(
                o.modify_quantity(51).unwrap_err(),
                DomainError::QuantityIncrease {
                    current: 50,
                    requested: 51
                }
            );
        }

        #[test]
        fn not_allowed_after_fill() {
            let mut o = order(50);
            o.fill(1).unwrap();
            assert!(matches!(
                o.modify_quantity(10),
                Err(DomainError::InvalidStateTransition { .. })
            ));
        }
    }

    mod fill {
        use super::*;

        #[test]
        fn partial_then_complete() {
            let mut o = order(10);
            o.fill(4).unwrap();
            assert_eq!(o.status(), SellOrderStatus::Processing);
            o.fill(3).unwrap();
            assert_eq!(o.status(), SellOrderStatus::Processing);
            o.fill(3).unwrap();
            assert_eq!(o.status(), SellOrderStatus::Completed);
            assert_eq!(o.remaining_quantity(), 0);
            assert_eq!(o.filled_quantity(), 10);
        }

        #[test]
        fn overfill_rejected() {
            let mut o = order(10);
            assert!(o.fill(11).is_err());
            assert_eq!(o.remaining_quantity(), 10);
        }

        #[test]
        fn cancelled_cannot_fill() {
            let mut o = order(10);
            o.cancel().unwrap();
            assert!(o.fill(1).is_err());
            assert_eq!(o.status(), SellOrderStatus::Cancelled);
        }
    }
}
