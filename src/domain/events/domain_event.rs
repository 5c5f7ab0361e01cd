//! # Domain Event Trait
//!
//! Base trait and shared metadata for ledger events.
//!
//! Every workflow step that changes a ledger row records an event, which
//! gives administrators an audit trail for the manual corrections the
//! workflows leave to them (for example a transfer stuck in `pending`).

use crate::domain::value_objects::{EventId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Category of a domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Share transfer lifecycle.
    Transfer,
    /// Sell queue lifecycle.
    SellOrder,
    /// Fund allocation and allocation rules.
    Allocation,
    /// Back-office changes to profiles, shares, lots and wallets.
    Account,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer => write!(f, "TRANSFER"),
            Self::SellOrder => write!(f, "SELL_ORDER"),
            Self::Allocation => write!(f, "ALLOCATION"),
            Self::Account => write!(f, "ACCOUNT"),
        }
    }
}

/// Trait for all domain events.
pub trait DomainEvent: Send + Sync + fmt::Debug {
    /// Returns the unique identifier for this event.
    fn event_id(&self) -> EventId;

    /// Returns the id of the aggregate this event relates to, if any.
    fn aggregate_id(&self) -> Option<Uuid>;

    /// Returns when this event occurred.
    fn timestamp(&self) -> Timestamp;

    /// Returns the type/category of this event.
    fn event_type(&self) -> EventType;

    /// Returns the human-readable name of this event.
    fn event_name(&self) -> &'static str;
}

/// Common metadata embedded in every concrete event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique identifier for this event.
    pub event_id: EventId,
    /// The aggregate this event relates to.
    pub aggregate_id: Option<Uuid>,
    /// When this event occurred.
    pub timestamp: Timestamp,
}

impl EventMetadata {
    /// Creates new metadata with a generated event id.
    #[must_use]
    pub fn new(aggregate_id: Option<Uuid>) -> Self {
        Self {
            event_id: EventId::new_v4(),
            aggregate_id,
            timestamp: Timestamp::now(),
        }
    }

    /// Creates metadata for a specific aggregate.
    #[must_use]
    pub fn for_aggregate(aggregate_id: impl Into<Uuid>) -> Self {
        Self::new(Some(aggregate_id.into()))
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Implements [`DomainEvent`] for a struct with a `metadata` field.
macro_rules! impl_domain_event {
    ($ty:ty, $event_type:expr, $name:literal) => {
        impl $crate::domain::events::domain_event::DomainEvent for $ty {
            fn event_id(&self) -> $crate::domain::value_objects::EventId {
                self.metadata.event_id
            }

            fn aggregate_id(&self) -> Option<::uuid::Uuid> {
                self.metadata.aggregate_id
            }

            fn timestamp(&self) -> $crate::domain::value_objects::Timestamp {
                self.metadata.timestamp
            }

            fn event_type(&self) -> $crate::domain::events::domain_event::EventType {
                $event_type
            }

            fn event_name(&self) -> &'static str {
                $name
            }
        }
    };
}

pub(crate) use impl_domain_event;
