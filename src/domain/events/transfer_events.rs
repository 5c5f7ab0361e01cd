//! # Transfer Events
//!
//! Domain events for the share transfer lifecycle.
//!
//! # Event Flow
//!
//! ```text
//! TransferRequested -> TransferCompleted
//!                   -> TransferFailed
//! ```
//!
//! A request whose processor could not be reached emits only
//! `TransferRequested` and stays pending until an administrator resolves it.

use crate::domain::events::domain_event::{
    DomainEvent, EventMetadata, EventType, impl_domain_event,
};
use crate::domain::value_objects::{
    Currency, EventId, Money, ShareId, Timestamp, TransferId, UserId,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event emitted when a transfer request is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequested {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The request.
    pub transfer_id: TransferId,
    /// Sending user.
    pub sender_id: UserId,
    /// Receiving user.
    pub recipient_id: UserId,
    /// Share class being moved.
    pub share_id: ShareId,
    /// Number of shares.
    pub quantity: u64,
    /// Fee charged to the sender.
    pub fee: Money,
    /// Currency of the fee.
    pub fee_currency: Currency,
}

impl TransferRequested {
    /// Creates a new TransferRequested event.
    #[must_use]
    pub fn new(
        transfer_id: TransferId,
        sender_id: UserId,
        recipient_id: UserId,
        share_id: ShareId,
        quantity: u64,
        fee: Money,
        fee_currency: Currency,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(transfer_id),
            transfer_id,
            sender_id,
            recipient_id,
            share_id,
            quantity,
            fee,
            fee_currency,
        }
    }
}

impl_domain_event!(TransferRequested, EventType::Transfer, "TransferRequested");

/// Event emitted when the processor applied a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCompleted {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The request.
    pub transfer_id: TransferId,
}

impl TransferCompleted {
    /// Creates a new TransferCompleted event.
    #[must_use]
    pub fn new(transfer_id: TransferId) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(transfer_id),
            transfer_id,
        }
    }
}

impl_domain_event!(TransferCompleted, EventType::Transfer, "TransferCompleted");

/// Event emitted when the processor rejected a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFailed {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The request.
    pub transfer_id: TransferId,
    /// Reason reported by the processor.
    pub reason: String,
}

impl TransferFailed {
    /// Creates a new TransferFailed event.
    #[must_use]
    pub fn new(transfer_id: TransferId, reason: impl Into<String>) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(transfer_id),
            transfer_id,
            reason: reason.into(),
        }
    }
}

impl_domain_event!(TransferFailed, EventType::Transfer, "TransferFailed");

/// Any transfer lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferEvent {
    /// Request persisted.
    Requested(TransferRequested),
    /// Request applied.
    Completed(TransferCompleted),
    /// Request rejected.
    Failed(TransferFailed),
}

impl DomainEvent for TransferEvent {
    fn event_id(&self) -> EventId {
        match self {
            Self::Requested(e) => e.event_id(),
            Self::Completed(e) => e.event_id(),
            Self::Failed(e) => e.event_id(),
        }
    }

    fn aggregate_id(&self) -> Option<Uuid> {
        match self {
            Self::Requested(e) => e.aggregate_id(),
            Self::Completed(e) => e.aggregate_id(),
            Self::Failed(e) => e.aggregate_id(),
        }
    }

    fn timestamp(&self) -> Timestamp {
        match self {
            Self::Requested(e) => e.timestamp(),
            Self::Completed(e) => e.timestamp(),
            Self::Failed(e) => e.timestamp(),
        }
    }

    fn event_type(&self) -> EventType {
        EventType::Transfer
    }

    fn event_name(&self) -> &'static str {
        match self {
            Self::Requested(e) => e.event_name(),
            Self::Completed(e) => e.event_name(),
            Self::Failed(e) => e.event_name(),
        }
    }
}
