//! # Ledger
//!
//! The set of repositories the workflows operate on, plus the write lock
//! that serializes ledger mutations.
//!
//! Every operation that moves shares or money (applying a transfer,
//! placing a sell order, disbursing buybacks, allocating funds) takes the
//! write lock for its whole read-check-write cycle, so two of them can
//! never both pass a balance check against the same funds.

use crate::infrastructure::persistence::in_memory::{
    InMemoryAllocationRuleRepository, InMemoryEventStore, InMemoryHoldingRepository,
    InMemoryProfileRepository, InMemorySellOrderRepository, InMemoryShareRepository,
    InMemorySubWalletRepository, InMemoryTransferRepository, InMemoryWalletRepository,
};
use crate::infrastructure::persistence::{
    AllocationRuleRepository, EventStore, HoldingRepository, ProfileRepository,
    SellOrderRepository, ShareRepository, SubWalletRepository, TransferRepository,
    WalletRepository,
};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Repositories and event store shared by the application services.
#[derive(Debug, Clone)]
pub struct Ledger {
    /// User profiles.
    pub profiles: Arc<dyn ProfileRepository>,
    /// Share classes.
    pub shares: Arc<dyn ShareRepository>,
    /// Holding lots.
    pub holdings: Arc<dyn HoldingRepository>,
    /// User wallets.
    pub wallets: Arc<dyn WalletRepository>,
    /// Transfer requests.
    pub transfers: Arc<dyn TransferRepository>,
    /// Sell queue.
    pub sell_orders: Arc<dyn SellOrderRepository>,
    /// Sub-wallets.
    pub sub_wallets: Arc<dyn SubWalletRepository>,
    /// Allocation rules.
    pub allocation_rules: Arc<dyn AllocationRuleRepository>,
    /// Audit log.
    pub events: Arc<dyn EventStore>,
    write_lock: Arc<Mutex<()>>,
}

impl Ledger {
    /// Creates a ledger over the given repositories.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        shares: Arc<dyn ShareRepository>,
        holdings: Arc<dyn HoldingRepository>,
        wallets: Arc<dyn WalletRepository>,
        transfers: Arc<dyn TransferRepository>,
        sell_orders: Arc<dyn SellOrderRepository>,
        sub_wallets: Arc<dyn SubWalletRepository>,
        allocation_rules: Arc<dyn AllocationRuleRepository>,
        events: Arc<dyn EventStore>,
    ) -> Self {
        Self {
            profiles,
            shares,
            holdings,
            wallets,
            transfers,
            sell_orders,
            sub_wallets,
            allocation_rules,
            events,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Creates a ledger backed entirely by in-memory repositories.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryProfileRepository::new()),
            Arc::new(InMemoryShareRepository::new()),
            Arc::new(InMemoryHoldingRepository::new()),
            Arc::new(InMemoryWalletRepository::new()),
            Arc::new(InMemoryTransferRepository::new()),
            Arc::new(InMemorySellOrderRepository::new()),
            Arc::new(InMemorySubWalletRepository::new()),
            Arc::new(InMemoryAllocationRuleRepository::new()),
            Arc::new(InMemoryEventStore::new()),
        )
    }

    /// Replaces the event store, keeping every repository.
    #[must_use]
    pub fn with_event_store(mut self, events: Arc<dyn EventStore>) -> Self {
        self.events = events;
        self
    }

    /// Acquires the ledger write lock.
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::in_memory()
    }
}
