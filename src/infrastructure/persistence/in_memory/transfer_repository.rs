//! # In-Memory Transfer Repository
//!
//! In-memory implementation of [`TransferRepository`] for testing.

use crate::domain::entities::TransferRequest;
use crate::domain::value_objects::{TransferId, TransferStatus, UserId};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, TransferRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`TransferRepository`].
///
/// Rejects saving a request older than the stored one.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransferRepository {
    storage: Arc<RwLock<HashMap<TransferId, TransferRequest>>>,
}

impl InMemoryTransferRepository {
    /// Creates a new empty in-memory transfer repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of requests in the repository.
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

#[async_trait]
impl TransferRepository for InMemoryTransferRepository {
    async fn save(&self, request: &TransferRequest) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        // Each change bumps the version once, so an update loaded at the
        // stored version arrives exactly one ahead of it.
        if let Some(existing) = storage.get(&request.id())
            && request.version() != existing.version().saturating_add(1)
        {
            return Err(RepositoryError::version_conflict(
                "TransferRequest",
                request.id().to_string(),
                request.version().saturating_sub(1),
                existing.version(),
            ));
        }
        storage.insert(request.id(), request.clone());
        Ok(())
    }

    async fn get(&self, id: &TransferId) -> RepositoryResult<Option<TransferRequest>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_by_sender(&self, sender_id: &UserId) -> RepositoryResult<Vec<TransferRequest>> {
        let storage = self.storage.read().await;
        let mut sent: Vec<TransferRequest> = storage
            .values()
            .filter(|r| r.sender_id() == *sender_id)
            .cloned()
            .collect();
        sent.sort_by_key(|r| std::cmp::Reverse(r.created_at()));
        Ok(sent)
    }

    async fn find_pending(&self) -> RepositoryResult<Vec<TransferRequest>> {
        let storage = self.storage.read().await;
        let mut pending: Vec<TransferRequest> = storage
            .values()
            .filter(|r| r.status() == TransferStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(TransferRequest::created_at);
        Ok(pending)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Currency, Money, ShareId};

    fn request(sender: UserId) -> TransferRequest {
        TransferRequest::new(
            sender,
            UserId::new_v4(),
            ShareId::new_v4(),
            5,
            Money::zero(),
            Currency::new("NGN").unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn stale_save_is_a_version_conflict() {
        let repo = InMemoryTransferRepository::new();
        let stale = request(UserId::new_v4());
        let mut fresh = stale.clone();
        fresh.mark_completed().unwrap();

        repo.save(&fresh).await.unwrap();
        let err = repo.save(&stale).await.unwrap_err();
        assert!(err.is_version_conflict());
    }

    #[tokio::test]
    async fn pending_excludes_terminal_requests() {
        let repo = InMemoryTransferRepository::new();
        let sender = UserId::new_v4();
        let open = request(sender);
        let mut done = request(sender);
        done.mark_failed("recipient wallet frozen").unwrap();
        repo.save(&open).await.unwrap();
        repo.save(&done).await.unwrap();

        let pending = repo.find_pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.first().map(TransferRequest::id), Some(open.id()));
        assert_eq!(repo.find_by_sender(&sender).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn second_writer_from_same_version_conflicts() {
        let repo = InMemoryTransferRepository::new();
        let pending = request(UserId::new_v4());
        repo.save(&pending).await.unwrap();

        let mut completing = repo.get(&pending.id()).await.unwrap().unwrap();
        let mut failing = repo.get(&pending.id()).await.unwrap().unwrap();
        completing.mark_completed().unwrap();
        failing.mark_failed("late callback").unwrap();

        repo.save(&completing).await.unwrap();
        let err = repo.save(&failing).await.unwrap_err();
        assert!(err.is_version_conflict());
        assert_eq!(
            repo.get(&pending.id()).await.unwrap().unwrap().status(),
            TransferStatus::Completed
        );
    }
}
