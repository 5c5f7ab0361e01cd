//! # Transfer Request Aggregate
//!
//! A sender's request to move shares to another user, together with the fee
//! charged for it.
//!
//! # State Machine
//!
//! ```text
//! Pending → Completed
//!    └────→ Failed
//! ```
//!
//! A request whose processing call errored stays `Pending`; nothing retries
//! or rolls it back automatically.
//!
//! # Examples
//!
//! ```
//! use mineshare_ledger::domain::entities::transfer_request::TransferRequest;
//! use mineshare_ledger::domain::value_objects::{
//!     Currency, Money, ShareId, TransferStatus, UserId,
//! };
//! use rust_decimal::Decimal;
//!
//! let mut request = TransferRequest::new(
//!     UserId::new_v4(),
//!     UserId::new_v4(),
//!     ShareId::new_v4(),
//!     30,
//!     Money::new(Decimal::new(13_000, 0)).unwrap(),
//!     Currency::new("UGX").unwrap(),
//! ).unwrap();
//!
//! assert_eq!(request.status(), TransferStatus::Pending);
//! request.mark_completed().unwrap();
//! assert!(request.mark_failed("late").is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    Currency, Money, ShareId, Timestamp, TransferId, TransferStatus, UserId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A share transfer request.
///
/// # Invariants
///
/// - `quantity > 0`
/// - `sender_id != recipient_id`
/// - status only moves `Pending → Completed | Failed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    id: TransferId,
    sender_id: UserId,
    recipient_id: UserId,
    share_id: ShareId,
    quantity: u64,
    fee: Money,
    fee_currency: Currency,
    status: TransferStatus,
    failure_reason: Option<String>,
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl TransferRequest {
    /// Creates a pending transfer request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if `quantity` is zero and
    /// `DomainError::SelfTransfer` if sender and recipient coincide.
    pub fn new(
        sender_id: UserId,
        recipient_id: UserId,
        share_id: ShareId,
        quantity: u64,
        fee: Money,
        fee_currency: Currency,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity(
                "transfer quantity must be positive".to_string(),
            ));
        }
        if sender_id == recipient_id {
            return Err(DomainError::SelfTransfer);
        }
        let now = Timestamp::now();
        Ok(Self {
            id: TransferId::new_v4(),
            sender_id,
            recipient_id,
            share_id,
            quantity,
            fee,
            fee_currency,
            status: TransferStatus::Pending,
            failure_reason: None,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    fn transition_to(&mut self, target: TransferStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::invalid_transition(
                "transfer",
                self.status,
                target,
            ));
        }
        self.status = target;
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
        Ok(())
    }

    // ========== Accessors ==========

    /// Returns the request id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TransferId {
        self.id
    }

    /// Returns the sender.
    #[inline]
    #[must_use]
    pub fn sender_id(&self) -> UserId {
        self.sender_id
    }

    /// Returns the recipient.
    #[inline]
    #[must_use]
    pub fn recipient_id(&self) -> UserId {
        self.recipient_id
    }

    /// Returns the share class.
    #[inline]
    #[must_use]
    pub fn share_id(&self) -> ShareId {
        self.share_id
    }

    /// Returns the number of shares to move.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Returns the fee charged to the sender.
    #[inline]
    #[must_use]
    pub fn fee(&self) -> Money {
        self.fee
    }

    /// Returns the currency the fee is charged in.
    #[inline]
    #[must_use]
    pub fn fee_currency(&self) -> &Currency {
        &self.fee_currency
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> TransferStatus {
        self.status
    }

    /// Returns why processing rejected the transfer, if it did.
    #[inline]
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Returns the version, bumped on every status change.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the request was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the request was last updated.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ========== State Transitions ==========

    /// Marks the transfer as booked.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless pending.
    pub fn mark_completed(&mut self) -> DomainResult<()> {
        self.transition_to(TransferStatus::Completed)
    }

    /// Marks the transfer as rejected by processing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless pending.
    pub fn mark_failed(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        self.transition_to(TransferStatus::Failed)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }
}

impl fmt::Display for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transfer({}, {} -> {}, {} x {}, fee {} {}, {})",
            self.id,
            self.sender_id,
            self.recipient_id,
            self.quantity,
            self.share_id,
            self.fee,
            self.fee_currency,
            self.status
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn request() -> TransferRequest {
        TransferRequest::new(
            UserId::new_v4(),
            UserId::new_v4(),
            ShareId::new_v4(),
            10,
            Money::new(Decimal::new(1_000, 0)).unwrap(),
            Currency::new("UGX").unwrap(),
        )
        .unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn starts_pending_at_version_one() {
            let r = request();
            assert_eq!(r.status(), TransferStatus::Pending);
            assert_eq!(r.version(), 1);
            assert!(r.failure_reason().is_none());
        }

        #[test]
        fn zero_quantity_rejected() {
            let result = TransferRequest::new(
                UserId::new_v4(),
                UserId::new_v4(),
                ShareId::new_v4(),
                0,
                Money::zero(),
                Currency::new("UGX").unwrap(),
            );
            assert!(matches!(result, Err(DomainError::InvalidQuantity(_))));
        }

        #[test]
        fn self_transfer_rejected() {
            let user = UserId::new_v4();
            let result = TransferRequest::new(
                user,
                user,
                ShareId::new_v4(),
                1,
                Money::zero(),
                Currency::new("UGX").unwrap(),
            );
            assert_eq!(result.unwrap_err(), DomainError::SelfTransfer);
        }
    }

    mod transitions {
        use super::*;

        #[test]
        fn complete_bumps_version() {
            let mut r = request();
            r.mark_completed().unwrap();
            assert_eq!(r.status(), TransferStatus::Completed);
            assert_eq!(r.version(), 2);
        }

        #[test]
        fn failed_keeps_reason() {
            let mut r = request();
            r.mark_failed("recipient account frozen").unwrap();
            assert_eq!(r.status(), TransferStatus::Failed);
            assert_eq!(r.failure_reason(), Some("recipient account frozen"));
        }

        #[test]
        fn terminal_is_final() {
            let mut r = request();
            r.mark_failed("x").unwrap();
            assert!(matches!(
                r.mark_completed(),
                Err(DomainError::InvalidStateTransition { .. })
            ));
            assert_eq!(r.failure_reason(), Some("x"));
        }
    }

    #[test]
    fn serde_roundtrip_preserves_status() {
        let mut r = request();
        r.mark_completed().unwrap();
        let json = serde_json::to_string(&r).unwrap();
        let back: TransferRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
