//! # Persistence Layer
//!
//! Repository ports, their in-memory implementations and the event store.
//!
//! ## Repository Traits (Ports)
//!
//! - [`ProfileRepository`], [`ShareRepository`], [`HoldingRepository`],
//!   [`WalletRepository`]: ledger reference data and balances
//! - [`TransferRepository`], [`SellOrderRepository`]: workflow aggregates
//! - [`SubWalletRepository`], [`AllocationRuleRepository`]: fund allocation
//!
//! ## Implementations
//!
//! - `in_memory`: In-memory implementations of every port
//! - `postgres`: PostgreSQL event store

pub mod event_store;
pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use event_store::{
    EventStore, EventStoreError, EventStoreResult, StoredEvent, record, record_committed,
};
pub use traits::{
    AllocationRuleRepository, HoldingRepository, ProfileRepository, RepositoryError,
    RepositoryResult, SellOrderRepository, ShareRepository, SubWalletRepository,
    TransferRepository, WalletRepository,
};
