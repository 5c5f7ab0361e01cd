//! # PostgreSQL Event Store
//!
//! The durable event log, one row per recorded event in `ledger_events`.
//! The table is created by `migrations/`, applied with
//! [`PostgresEventStore::migrate`].

use crate::domain::events::domain_event::EventType;
use crate::domain::value_objects::{EventId, Timestamp};
use crate::infrastructure::persistence::event_store::{
    EventStore, EventStoreError, EventStoreResult, StoredEvent,
};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

const UNIQUE_VIOLATION: &str = "23505";

/// Event log backed by the `ledger_events` table.
///
/// Rows are only ever inserted. A second event with the same aggregate and
/// sequence is refused by the unique index.
///
/// ```ignore
/// use mineshare_ledger::infrastructure::persistence::postgres::PostgresEventStore;
///
/// let store = PostgresEventStore::connect_lazy("postgres://localhost/mineshare", 5)?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool lazily; no connection is opened until first use.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Query` if the URL is invalid.
    pub fn connect_lazy(url: &str, max_connections: u32) -> EventStoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(url)
            .map_err(|e| EventStoreError::query(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled migrations, creating `ledger_events` if needed.
    ///
    /// # Errors
    ///
    /// Returns `EventStoreError::Query` if the database is unreachable or a
    /// migration fails.
    pub async fn migrate(&self) -> EventStoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| EventStoreError::query(format!("migration failed: {e}")))
    }

    /// The underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn append(&self, event: StoredEvent) -> EventStoreResult<()> {
        let sequence = i64::try_from(event.sequence)
            .map_err(|e| EventStoreError::serialization(e.to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO ledger_events (
                event_id, aggregate_id, event_type, event_name,
                occurred_at, payload, sequence
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.event_id.get())
        .bind(event.aggregate_id)
        .bind(event.event_type.to_string())
        .bind(&event.event_name)
        .bind(event.timestamp.timestamp_millis())
        .bind(&event.payload)
        .bind(sequence)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(EventStoreError::SequenceConflict {
                    aggregate_id: event.aggregate_id.unwrap_or_default(),
                    sequence: event.sequence,
                })
            }
            Err(e) => Err(EventStoreError::query(e.to_string())),
        }
    }

    async fn get_events(&self, aggregate_id: &Uuid) -> EventStoreResult<Vec<StoredEvent>> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"
            SELECT event_id, aggregate_id, event_type, event_name,
                   occurred_at, payload, sequence
            FROM ledger_events
            WHERE aggregate_id = $1
            ORDER BY sequence ASC
            "#,
        )
        .bind(aggregate_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EventStoreError::query(e.to_string()))?;

        rows.into_iter().map(EventRow::try_into_stored_event).collect()
    }

    async fn get_events_since(&self, since: Timestamp) -> EventStoreResult<Vec<StoredEvent>> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"
            SELECT event_id, aggregate_id, event_type, event_name,
                   occurred_at, payload, sequence
            FROM ledger_events
            WHERE occurred_at > $1
            ORDER BY occurred_at ASC, sequence ASC
            "#,
        )
        .bind(since.timestamp_millis())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EventStoreError::query(e.to_string()))?;

        rows.into_iter().map(EventRow::try_into_stored_event).collect()
    }

    async fn get_events_by_type(
        &self,
        event_type: EventType,
    ) -> EventStoreResult<Vec<StoredEvent>> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"
            SELECT event_id, aggregate_id, event_type, event_name,
                   occurred_at, payload, sequence
            FROM ledger_events
            WHERE event_type = $1
            ORDER BY occurred_at ASC, sequence ASC
            "#,
        )
        .bind(event_type.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EventStoreError::query(e.to_string()))?;

        rows.into_iter().map(EventRow::try_into_stored_event).collect()
    }

    async fn count(&self) -> EventStoreResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ledger_events")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| EventStoreError::query(e.to_string()))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn next_sequence(&self, aggregate_id: &Uuid) -> EventStoreResult<u64> {
        let (max_seq,): (Option<i64>,) =
            sqlx::query_as("SELECT MAX(sequence) FROM ledger_events WHERE aggregate_id = $1")
                .bind(aggregate_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| EventStoreError::query(e.to_string()))?;

        let next = max_seq.unwrap_or(0).saturating_add(1);
        Ok(u64::try_from(next).unwrap_or(1))
    }
}

/// One `ledger_events` row.
#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    event_id: Uuid,
    aggregate_id: Option<Uuid>,
    event_type: String,
    event_name: String,
    occurred_at: i64,
    payload: serde_json::Value,
    sequence: i64,
}

impl EventRow {
    fn try_into_stored_event(self) -> EventStoreResult<StoredEvent> {
        let event_type: EventType = serde_json::from_value(serde_json::Value::String(
            self.event_type,
        ))
        .map_err(|e| EventStoreError::deserialization(e.to_string()))?;

        let timestamp = Timestamp::from_millis(self.occurred_at)
            .ok_or_else(|| EventStoreError::deserialization("invalid timestamp"))?;

        let sequence = u64::try_from(self.sequence)
            .map_err(|e| EventStoreError::deserialization(e.to_string()))?;

        Ok(StoredEvent {
            event_id: EventId::new(self.event_id),
            aggregate_id: self.aggregate_id,
            event_type,
            event_name: self.event_name,
            timestamp,
            payload: self.payload,
            sequence,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(event_type: &str, occurred_at: i64, sequence: i64) -> EventRow {
        EventRow {
            event_id: Uuid::new_v4(),
            aggregate_id: Some(Uuid::new_v4()),
            event_type: event_type.to_string(),
            event_name: "SellOrderPlaced".to_string(),
            occurred_at,
            payload: serde_json::json!({}),
            sequence,
        }
    }

    #[test]
    fn row_decodes() {
        let stored = row("SELL_ORDER", 1_700_000_000_000, 2)
            .try_into_stored_event()
            .unwrap();
        assert_eq!(stored.event_type, EventType::SellOrder);
        assert_eq!(stored.sequence, 2);
    }

    #[test]
    fn unknown_event_type_rejected() {
        let err = row("DIVIDEND", 0, 1).try_into_stored_event().unwrap_err();
        assert!(matches!(err, EventStoreError::Deserialization(_)));
    }

    #[test]
    fn negative_sequence_rejected() {
        assert!(row("TRANSFER", 0, -1).try_into_stored_event().is_err());
    }

    #[tokio::test]
    async fn lazy_pool_does_not_connect() {
        let store = PostgresEventStore::connect_lazy("postgres://localhost/mineshare", 2).unwrap();
        assert!(store.pool().size() <= 2);
    }
}
