//! # In-Memory Wallet Repository

use crate::domain::entities::Wallet;
use crate::domain::value_objects::{Currency, UserId};
use crate::infrastructure::persistence::traits::{RepositoryResult, WalletRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`WalletRepository`], keyed by user and
/// currency.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWalletRepository {
    storage: Arc<RwLock<HashMap<(UserId, Currency), Wallet>>>,
}

impl InMemoryWalletRepository {
    /// Creates a new empty in-memory wallet repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    async fn save(&self, wallet: &Wallet) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.insert((wallet.user_id(), wallet.currency().clone()), wallet.clone());
        Ok(())
    }

    async fn get(&self, user_id: &UserId, currency: &Currency) -> RepositoryResult<Option<Wallet>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&(*user_id, currency.clone())).cloned())
    }
}
