//! # Sell Order Events
//!
//! Domain events for the FIFO sell queue.
//!
//! # Event Flow
//!
//! ```text
//! SellOrderPlaced -> SellOrderModified* -> SellOrderFilled* (until remaining = 0)
//!                 -> SellOrderCancelled
//! ```

use crate::domain::events::domain_event::{
    DomainEvent, EventMetadata, EventType, impl_domain_event,
};
use crate::domain::value_objects::{
    Currency, EventId, Money, SellOrderId, ShareId, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event emitted when an order joins the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellOrderPlaced {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The order.
    pub order_id: SellOrderId,
    /// Seller.
    pub user_id: UserId,
    /// Share class offered.
    pub share_id: ShareId,
    /// Quantity offered.
    pub quantity: u64,
    /// Queue position.
    pub fifo_position: u64,
}

impl SellOrderPlaced {
    /// Creates a new SellOrderPlaced event.
    #[must_use]
    pub fn new(
        order_id: SellOrderId,
        user_id: UserId,
        share_id: ShareId,
        quantity: u64,
        fifo_position: u64,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(order_id),
            order_id,
            user_id,
            share_id,
            quantity,
            fifo_position,
        }
    }
}

impl_domain_event!(SellOrderPlaced, EventType::SellOrder, "SellOrderPlaced");

/// Event emitted when a pending order's quantity is reduced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellOrderModified {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The order.
    pub order_id: SellOrderId,
    /// Quantity before the change.
    pub previous_quantity: u64,
    /// Quantity after the change.
    pub new_quantity: u64,
}

impl SellOrderModified {
    /// Creates a new SellOrderModified event.
    #[must_use]
    pub fn new(order_id: SellOrderId, previous_quantity: u64, new_quantity: u64) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(order_id),
            order_id,
            previous_quantity,
            new_quantity,
        }
    }
}

impl_domain_event!(SellOrderModified, EventType::SellOrder, "SellOrderModified");

/// Event emitted when an order leaves the queue unfilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellOrderCancelled {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The order.
    pub order_id: SellOrderId,
    /// User who cancelled it.
    pub user_id: UserId,
}

impl SellOrderCancelled {
    /// Creates a new SellOrderCancelled event.
    #[must_use]
    pub fn new(order_id: SellOrderId, user_id: UserId) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(order_id),
            order_id,
            user_id,
        }
    }
}

impl_domain_event!(SellOrderCancelled, EventType::SellOrder, "SellOrderCancelled");

/// Event emitted when buyback funds fill part or all of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellOrderFilled {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The order.
    pub order_id: SellOrderId,
    /// Seller credited with the proceeds.
    pub user_id: UserId,
    /// Shares bought back in this fill.
    pub quantity: u64,
    /// Shares still waiting after this fill.
    pub remaining_quantity: u64,
    /// Amount paid to the seller.
    pub proceeds: Money,
    /// Currency of the proceeds.
    pub currency: Currency,
}

impl SellOrderFilled {
    /// Creates a new SellOrderFilled event.
    #[must_use]
    pub fn new(
        order_id: SellOrderId,
        user_id: UserId,
        quantity: u64,
        remaining_quantity: u64,
        proceeds: Money,
        currency: Currency,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(order_id),
            order_id,
            user_id,
            quantity,
            remaining_quantity,
            proceeds,
            currency,
        }
    }
}

impl_domain_event!(SellOrderFilled, EventType::SellOrder, "SellOrderFilled");

/// Any sell queue event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SellOrderEvent {
    /// Order placed.
    Placed(SellOrderPlaced),
    /// Quantity reduced.
    Modified(SellOrderModified),
    /// Order cancelled.
    Cancelled(SellOrderCancelled),
    /// Order (partially) filled.
    Filled(SellOrderFilled),
}

impl DomainEvent for SellOrderEvent {
    fn event_id(&self) -> EventId {
        match self {
            Self::Placed(e) => e.event_id(),
            Self::Modified(e) => e.event_id(),
            Self::Cancelled(e) => e.event_id(),
            Self::Filled(e) => e.event_id(),
        }
    }

    fn aggregate_id(&self) -> Option<Uuid> {
        match self {
            Self::Placed(e) => e.aggregate_id(),
            Self::Modified(e) => e.aggregate_id(),
            Self::Cancelled(e) => e.aggregate_id(),
            Self::Filled(e) => e.aggregate_id(),
        }
    }

    fn timestamp(&self) -> Timestamp {
        match self {
            Self::Placed(e) => e.timestamp(),
            Self::Modified(e) => e.timestamp(),
            Self::Cancelled(e) => e.timestamp(),
            Self::Filled(e) => e.timestamp(),
        }
    }

    fn event_type(&self) -> EventType {
        EventType::SellOrder
    }

    fn event_name(&self) -> &'static str {
        match self {
            Self::Placed(e) => e.event_name(),
            Self::Modified(e) => e.event_name(),
            Self::Cancelled(e) => e.event_name(),
            Self::Filled(e) => e.event_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placed_event_metadata() {
        let order_id = SellOrderId::new_v4();
        let event = SellOrderPlaced::new(order_id, UserId::new_v4(), ShareId::new_v4(), 10, 3);
        assert_eq!(event.aggregate_id(), Some(order_id.get()));
        assert_eq!(event.event_type(), EventType::SellOrder);
        assert_eq!(event.event_name(), "SellOrderPlaced");
    }

    #[test]
    fn wrapper_keeps_inner_event_id() {
        let inner = SellOrderModified::new(SellOrderId::new_v4(), 10, 4);
        let id = inner.event_id();
        let event = SellOrderEvent::Modified(inner);
        assert_eq!(event.event_id(), id);
        assert_eq!(event.event_name(), "SellOrderModified");
    }
}
