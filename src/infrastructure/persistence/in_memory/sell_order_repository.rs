//! # In-Memory Sell Order Repository
//!
//! In-memory implementation of [`SellOrderRepository`] for testing.

use crate::domain::entities::SellOrder;
use crate::domain::value_objects::{SellOrderId, ShareId, UserId};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, SellOrderRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// In-memory implementation of [`SellOrderRepository`].
///
/// FIFO positions come from an atomic counter shared by all clones.
#[derive(Debug, Clone)]
pub struct InMemorySellOrderRepository {
    storage: Arc<RwLock<HashMap<SellOrderId, SellOrder>>>,
    fifo_sequence: Arc<AtomicU64>,
}

impl InMemorySellOrderRepository {
    /// Creates a new empty in-memory sell order repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            fifo_sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the number of orders in the repository.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySellOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SellOrderRepository for InMemorySellOrderRepository {
    async fn save(&self, order: &SellOrder) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        // Each change bumps the version once, so an update loaded at the
        // stored version arrives exactly one ahead of it.
        if let Some(existing) = storage.get(&order.id())
            && order.version() != existing.version().saturating_add(1)
        {
            return Err(RepositoryError::version_conflict(
                "SellOrder",
                order.id().to_string(),
                order.version().saturating_sub(1),
                existing.version(),
            ));
        }
        storage.insert(order.id(), order.clone());
        Ok(())
    }

    async fn get(&self, id: &SellOrderId) -> RepositoryResult<Option<SellOrder>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_open(&self, share_id: Option<&ShareId>) -> RepositoryResult<Vec<SellOrder>> {
        let storage = self.storage.read().await;
        let mut open: Vec<SellOrder> = storage
            .values()
            .filter(|o| o.is_open())
            .filter(|o| share_id.is_none_or(|s| o.share_id() == *s))
            .cloned()
            .collect();
        open.sort_by_key(SellOrder::fifo_position);
        Ok(open)
    }

    async fn find_by_user(&self, user_id: &UserId) -> RepositoryResult<Vec<SellOrder>> {
        let storage = self.storage.read().await;
        let mut orders: Vec<SellOrder> = storage
            .values()
            .filter(|o| o.user_id() == *user_id)
            .cloned()
            .collect();
        orders.sort_by_key(SellOrder::fifo_position);
        Ok(orders)
    }

    async fn next_fifo_position(&self) -> RepositoryResult<u64> {
        Ok(self.fifo_sequence.fetch_add(1, Ordering::SeqCst).saturating_add(1))
    }
}
