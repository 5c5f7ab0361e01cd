//! # In-Memory Holding Repository
//!
//! In-memory implementation of [`HoldingRepository`] for testing.

use crate::domain::entities::Holding;
use crate::domain::value_objects::{HoldingId, ShareId, UserId};
use crate::infrastructure::persistence::traits::{HoldingRepository, RepositoryResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`HoldingRepository`].
///
/// `save_all` writes under a single lock, so a batch is visible atomically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHoldingRepository {
    storage: Arc<RwLock<HashMap<HoldingId, Holding>>>,
}

impl InMemoryHoldingRepository {
    /// Creates a new empty in-memory holding repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of lots in the repository.
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

    fn oldest_first(mut lots: Vec<Holding>) -> Vec<Holding> {
        lots.sort_by_key(|lot| (lot.acquired_at(), lot.id()));
        lots
    }
}

#[async_trait]
impl HoldingRepository for InMemoryHoldingRepository {
    async fn save(&self, holding: &Holding) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.insert(holding.id(), holding.clone());
        Ok(())
    }

    async fn save_all(&self, holdings: &[Holding]) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        for holding in holdings {
            storage.insert(holding.id(), holding.clone());
        }
        Ok(())
    }

    async fn find_by_owner_and_share(
        &self,
        owner_id: &UserId,
        share_id: &ShareId,
    ) -> RepositoryResult<Vec<Holding>> {
        let storage = self.storage.read().await;
        let lots = storage
            .values()
            .filter(|lot| lot.owner_id() == *owner_id && lot.share_id() == *share_id)
            .cloned()
            .collect();
        Ok(Self::oldest_first(lots))
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> RepositoryResult<Vec<Holding>> {
        let storage = self.storage.read().await;
        let lots = storage
            .values()
            .filter(|lot| lot.owner_id() == *owner_id)
            .cloned()
            .collect();
        Ok(Self::oldest_first(lots))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Money, Timestamp};

    fn lot(owner: UserId, share: ShareId, qty: u64, secs: i64) -> Holding {
        Holding::from_parts(
            HoldingId::new_v4(),
            owner,
            share,
            qty,
            Money::zero(),
            false,
            Timestamp::from_secs(secs).unwrap(),
        )
    }

    #[tokio::test]
    async fn filters_by_owner_and_share() {
        let repo = InMemoryHoldingRepository::new();
        let owner = UserId::new_v4();
        let gold = ShareId::new_v4();
        let tin = ShareId::new_v4();
        repo.save_all(&[
            lot(owner, gold, 10, 1),
            lot(owner, tin, 20, 2),
            lot(UserId::new_v4(), gold, 30, 3),
        ])
        .await
        .unwrap();

        let lots = repo.find_by_owner_and_share(&owner, &gold).await.unwrap();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].quantity(), 10);
        assert_eq!(repo.find_by_owner(&owner).await.unwrap().len(), 2);
        assert_eq!(repo.len(), 3);
    }

    #[tokio::test]
    async fn returns_oldest_first() {
        let repo = InMemoryHoldingRepository::new();
        let owner = UserId::new_v4();
        let share = ShareId::new_v4();
        repo.save(&lot(owner, share, 5, 300)).await.unwrap();
        repo.save(&lot(owner, share, 6, 100)).await.unwrap();
        repo.save(&lot(owner, share, 7, 200)).await.unwrap();

        let quantities: Vec<u64> = repo
            .find_by_owner_and_share(&owner, &share)
            .await
            .unwrap()
            .iter()
            .map(Holding::quantity)
            .collect();
        assert_eq!(quantities, vec![6, 7, 5]);
    }
}
