//! # In-Memory Event Store

use crate::domain::events::domain_event::EventType;
use crate::domain::value_objects::Timestamp;
use crate::infrastructure::persistence::event_store::{
    EventStore, EventStoreError, EventStoreResult, StoredEvent,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory implementation of [`EventStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<Vec<StoredEvent>>>,
}

impl InMemoryEventStore {
    /// Creates a new empty in-memory event store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored event name in append order.
    pub async fn event_names(&self) -> Vec<String> {
        let events = self.events.read().await;
        events.iter().map(|e| e.event_name.clone()).collect()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(&self, event: StoredEvent) -> EventStoreResult<()> {
        let mut events = self.events.write().await;
        if let Some(aggregate_id) = event.aggregate_id
            && events
                .iter()
                .any(|e| e.aggregate_id == Some(aggregate_id) && e.sequence == event.sequence)
        {
            return Err(EventStoreError::SequenceConflict {
                aggregate_id,
                sequence: event.sequence,
            });
        }
        events.push(event);
        Ok(())
    }

    async fn get_events(&self, aggregate_id: &Uuid) -> EventStoreResult<Vec<StoredEvent>> {
        let events = self.events.read().await;
        let mut matching: Vec<StoredEvent> = events
            .iter()
            .filter(|e| e.aggregate_id.as_ref() == Some(aggregate_id))
            .cloned()
            .collect();
        matching.sort_by_key(|e| e.sequence);
        Ok(matching)
    }

    async fn get_events_since(&self, since: Timestamp) -> EventStoreResult<Vec<StoredEvent>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|e| e.timestamp.is_after(&since))
            .cloned()
            .collect())
    }

    async fn get_events_by_type(
        &self,
        event_type: EventType,
    ) -> EventStoreResult<Vec<StoredEvent>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect())
    }

    async fn count(&self) -> EventStoreResult<u64> {
        let events = self.events.read().await;
        Ok(events.len() as u64)
    }

    async fn next_sequence(&self, aggregate_id: &Uuid) -> EventStoreResult<u64> {
        let events = self.events.read().await;
        let max = events
            .iter()
            .filter(|e| e.aggregate_id.as_ref() == Some(aggregate_id))
            .map(|e| e.sequence)
            .max()
            .unwrap_or(0);
        Ok(max.saturating_add(1))
    }
}
