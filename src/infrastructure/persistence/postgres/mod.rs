//! # PostgreSQL Persistence
//!
//! sqlx-backed implementations of the persistence ports.

pub mod event_store;

pub use event_store::PostgresEventStore;
