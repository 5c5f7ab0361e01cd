//! # Event Store
//!
//! Append-only storage for domain events.
//!
//! Events are stored as JSON payloads with their metadata broken out into
//! columns, so the audit trail of one aggregate (a transfer, a sell order,
//! an allocation rule) can be read back in sequence order.

use crate::domain::events::domain_event::{DomainEvent, EventType};
use crate::domain::value_objects::{EventId, Timestamp};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Error type for event store operations.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// Backend query failed.
    #[error("Event store query error: {0}")]
    Query(String),

    /// Event payload could not be encoded.
    #[error("Event serialization error: {0}")]
    Serialization(String),

    /// Stored row could not be decoded.
    #[error("Event deserialization error: {0}")]
    Deserialization(String),

    /// Another writer already used this sequence number.
    #[error("Sequence conflict for aggregate {aggregate_id}: sequence {sequence} already exists")]
    SequenceConflict {
        /// Aggregate the event belongs to.
        aggregate_id: Uuid,
        /// Conflicting sequence number.
        sequence: u64,
    },
}

impl EventStoreError {
    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates a deserialization error.
    #[must_use]
    pub fn deserialization(msg: impl Into<String>) -> Self {
        Self::Deserialization(msg.into())
    }
}

/// Result type for event store operations.
pub type EventStoreResult<T> = Result<T, EventStoreError>;

/// An event as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Event id.
    pub event_id: EventId,
    /// Aggregate the event belongs to.
    pub aggregate_id: Option<Uuid>,
    /// Event category.
    pub event_type: EventType,
    /// Concrete event name.
    pub event_name: String,
    /// When the event occurred.
    pub timestamp: Timestamp,
    /// Full event as JSON.
    pub payload: serde_json::Value,
    /// Position within the aggregate's stream, starting at 1.
    pub sequence: u64,
}

impl StoredEvent {
    /// Builds a stored event from a domain event.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Serialization` if the event cannot be
    /// encoded as JSON.
    pub fn from_event<E>(event: &E, sequence: u64) -> EventStoreResult<Self>
    where
        E: DomainEvent + Serialize,
    {
        let payload = serde_json::to_value(event)
            .map_err(|e| EventStoreError::serialization(e.to_string()))?;
        Ok(Self {
            event_id: event.event_id(),
            aggregate_id: event.aggregate_id(),
            event_type: event.event_type(),
            event_name: event.event_name().to_string(),
            timestamp: event.timestamp(),
            payload,
            sequence,
        })
    }
}

/// Port for the event store.
#[async_trait]
pub trait EventStore: Send + Sync + fmt::Debug {
    /// Appends an event.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::SequenceConflict` if the aggregate already
    /// has an event with the same sequence.
    async fn append(&self, event: StoredEvent) -> EventStoreResult<()>;

    /// Returns the events of one aggregate in sequence order.
    async fn get_events(&self, aggregate_id: &Uuid) -> EventStoreResult<Vec<StoredEvent>>;

    /// Returns events newer than `since`, oldest first.
    async fn get_events_since(&self, since: Timestamp) -> EventStoreResult<Vec<StoredEvent>>;

    /// Returns every event of one category, oldest first.
    async fn get_events_by_type(&self, event_type: EventType)
    -> EventStoreResult<Vec<StoredEvent>>;

    /// Counts all events.
    async fn count(&self) -> EventStoreResult<u64>;

    /// Returns the next sequence number for an aggregate.
    async fn next_sequence(&self, aggregate_id: &Uuid) -> EventStoreResult<u64>;
}

/// Serializes `event` and appends it at the aggregate's next sequence.
///
/// # Errors
///
/// Propagates serialization and backend errors.
pub async fn record<E>(store: &dyn EventStore, event: &E) -> EventStoreResult<()>
where
    E: DomainEvent + Serialize,
{
    let sequence = match event.aggregate_id() {
        Some(id) => store.next_sequence(&id).await?,
        None => 1,
    };
    store.append(StoredEvent::from_event(event, sequence)?).await
}

/// Records `event` for a ledger change that is already saved.
///
/// A failure is logged at `error` and not returned: the saved state is the
/// source of truth and the caller still gets the outcome of its change.
/// Returns whether the event was stored.
pub async fn record_committed<E>(store: &dyn EventStore, event: &E) -> bool
where
    E: DomainEvent + Serialize,
{
    match record(store, event).await {
        Ok(()) => true,
        Err(e) => {
            error!(
                event = event.event_name(),
                aggregate_id = ?event.aggregate_id(),
                error = %e,
                "event not recorded for committed change"
            );
            false
        }
    }
}
