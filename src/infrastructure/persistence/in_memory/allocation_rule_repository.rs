//! # In-Memory Allocation Rule Repository

use crate::domain::entities::AllocationRule;
use crate::infrastructure::persistence::traits::{AllocationRuleRepository, RepositoryResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`AllocationRuleRepository`].
///
/// Rules are kept in insertion order; the last one is in effect.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAllocationRuleRepository {
    storage: Arc<RwLock<Vec<AllocationRule>>>,
}

impl InMemoryAllocationRuleRepository {
    /// Creates a new empty in-memory allocation rule repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AllocationRuleRepository for InMemoryAllocationRuleRepository {
    async fn save(&self, rule: &AllocationRule) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.push(rule.clone());
        Ok(())
    }

    async fn latest(&self) -> RepositoryResult<Option<AllocationRule>> {
        let storage = self.storage.read().await;
        Ok(storage.last().cloned())
    }

    async fn history(&self) -> RepositoryResult<Vec<AllocationRule>> {
        let storage = self.storage.read().await;
        Ok(storage.iter().rev().cloned().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Percentage;
    use rust_decimal::Decimal;

    fn rule(p: i64, a: i64, b: i64) -> AllocationRule {
        let pct = |v| Percentage::new(Decimal::new(v, 0)).unwrap();
        AllocationRule::new(pct(p), pct(a), pct(b)).unwrap()
    }

    #[tokio::test]
    async fn latest_is_last_saved() {
        let repo = InMemoryAllocationRuleRepository::new();
        assert!(repo.latest().await.unwrap().is_none());

        let first = rule(60, 25, 15);
        let second = rule(50, 30, 20);
        repo.save(&first).await.unwrap();
        repo.save(&second).await.unwrap();

        assert_eq!(repo.latest().await.unwrap(), Some(second.clone()));
        assert_eq!(repo.history().await.unwrap(), vec![second, first]);
    }
}
