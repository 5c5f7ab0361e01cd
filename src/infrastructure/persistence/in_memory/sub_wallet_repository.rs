//! # In-Memory Sub-Wallet Repository

use crate::domain::entities::SubWallet;
use crate::domain::value_objects::{Currency, SubWalletType};
use crate::infrastructure::persistence::traits::{RepositoryResult, SubWalletRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`SubWalletRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemorySubWalletRepository {
    storage: Arc<RwLock<HashMap<(SubWalletType, Currency), SubWallet>>>,
}

impl InMemorySubWalletRepository {
    /// Creates a new empty in-memory sub-wallet repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubWalletRepository for InMemorySubWalletRepository {
    async fn save(&self, wallet: &SubWallet) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.insert(
            (wallet.wallet_type(), wallet.currency().clone()),
            wallet.clone(),
        );
        Ok(())
    }

    async fn get(
        &self,
        wallet_type: SubWalletType,
        currency: &Currency,
    ) -> RepositoryResult<Option<SubWallet>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&(wallet_type, currency.clone())).cloned())
    }

    async fn get_all(&self) -> RepositoryResult<Vec<SubWallet>> {
        let storage = self.storage.read().await;
        let mut all: Vec<SubWallet> = storage.values().cloned().collect();
        all.sort_by(|a, b| {
            a.currency()
                .cmp(b.currency())
                .then_with(|| a.wallet_type().as_str().cmp(b.wallet_type().as_str()))
        });
        Ok(all)
    }
}
