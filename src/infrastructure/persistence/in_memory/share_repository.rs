//! # In-Memory Share Repository

use crate::domain::entities::Share;
use crate::domain::value_objects::ShareId;
use crate::infrastructure::persistence::traits::{RepositoryResult, ShareRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`ShareRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryShareRepository {
    storage: Arc<RwLock<HashMap<ShareId, Share>>>,
}

impl InMemoryShareRepository {
    /// Creates a new empty in-memory share repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShareRepository for InMemoryShareRepository {
    async fn save(&self, share: &Share) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.insert(share.id(), share.clone());
        Ok(())
    }

    async fn get(&self, id: &ShareId) -> RepositoryResult<Option<Share>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Currency, Money};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn save_replaces_price() {
        let repo = InMemoryShareRepository::new();
        let mut share = Share::new(
            "Kaduna Gold",
            Money::new(Decimal::new(20_000, 0)).unwrap(),
            Currency::new("NGN").unwrap(),
        )
        .unwrap();
        repo.save(&share).await.unwrap();

        share.set_price(Money::new(Decimal::new(25_000, 0)).unwrap()).unwrap();
        repo.save(&share).await.unwrap();

        let stored = repo.get(&share.id()).await.unwrap().unwrap();
        assert_eq!(stored.price_per_share().get(), Decimal::new(25_000, 0));
    }
}
