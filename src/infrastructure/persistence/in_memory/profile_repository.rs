//! # In-Memory Profile Repository
//!
//! In-memory implementation of [`ProfileRepository`] for testing.

use crate::domain::entities::Profile;
use crate::domain::value_objects::{RecipientContact, UserId};
use crate::infrastructure::persistence::traits::{
    ProfileRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`ProfileRepository`].
///
/// Email and phone are unique across profiles, mirroring the unique
/// indexes of the `profiles` table.
#[derive(Debug, Clone)]
pub struct InMemoryProfileRepository {
    storage: Arc<RwLock<HashMap<UserId, Profile>>>,
}

impl InMemoryProfileRepository {
    /// Creates a new empty in-memory profile repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of profiles in the repository.
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

impl Default for InMemoryProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn save(&self, profile: &Profile) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        let clash = storage.values().any(|other| {
            other.id() != profile.id()
                && ((profile.email().is_some() && other.email() == profile.email())
                    || (profile.phone().is_some() && other.phone() == profile.phone()))
        });
        if clash {
            return Err(RepositoryError::duplicate("Profile", profile.id().to_string()));
        }
        storage.insert(profile.id(), profile.clone());
        Ok(())
    }

    async fn get(&self, id: &UserId) -> RepositoryResult<Option<Profile>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_by_contact(
        &self,
        contact: &RecipientContact,
    ) -> RepositoryResult<Option<Profile>> {
        let storage = self.storage.read().await;
        Ok(storage.values().find(|p| p.matches(contact)).cloned())
    }
}
