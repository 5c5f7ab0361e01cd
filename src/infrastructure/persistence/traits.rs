//! # Storage Ports
//!
//! What the ledger needs from storage, one trait per aggregate.
//!
//! The application services depend only on these traits. The crate ships
//! in-memory implementations; a database backend implements the same ports.
//!
//! # Ports
//!
//! - [`ProfileRepository`]: Users and their contact details
//! - [`ShareRepository`]: Share classes and prices
//! - [`HoldingRepository`]: Share lots per owner
//! - [`WalletRepository`]: User currency wallets
//! - [`TransferRepository`]: Share transfer requests
//! - [`SellOrderRepository`]: FIFO sell queue
//! - [`SubWalletRepository`]: Internal fund buckets
//! - [`AllocationRuleRepository`]: Versioned allocation rules
//!
//! ```ignore
//! use mineshare_ledger::infrastructure::persistence::traits::SellOrderRepository;
//!
//! async fn print_queue(repo: &impl SellOrderRepository) {
//!     for order in repo.find_open(None).await.unwrap() {
//!         println!("#{} {}", order.fifo_position(), order.remaining_quantity());
//!     }
//! }
//! ```

use crate::domain::entities::{
    AllocationRule, Holding, Profile, SellOrder, Share, SubWallet, TransferRequest, Wallet,
};
use crate::domain::value_objects::{
    Currency, RecipientContact, SellOrderId, ShareId, SubWalletType, TransferId, UserId,
};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Failure reported by a repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No record under that key.
    #[error("{entity_type} {id} not found")]
    NotFound {
        /// Record kind, e.g. `"Share"`.
        entity_type: &'static str,
        /// Lookup key.
        id: String,
    },

    /// A unique key is already taken.
    #[error("{entity_type} {id} already exists")]
    Duplicate {
        /// Record kind.
        entity_type: &'static str,
        /// Conflicting key.
        id: String,
    },

    /// The stored record changed since it was read.
    #[error("{entity_type} {id} is stale: saved at version {expected}, stored version is {actual}")]
    VersionConflict {
        /// Record kind.
        entity_type: &'static str,
        /// Record key.
        id: String,
        /// Version the caller read.
        expected: u64,
        /// Version found in storage.
        actual: u64,
    },

    /// Storage backend failure.
    #[error("storage failure: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Missing `entity_type` record keyed by `id`.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        let id = id.into();
        Self::NotFound { entity_type, id }
    }

    /// Unique key `id` already used.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        let id = id.into();
        Self::Duplicate { entity_type, id }
    }

    /// `expected` is the version the caller loaded, `actual` the stored one.
    #[must_use]
    pub fn version_conflict(
        entity_type: &'static str,
        id: impl Into<String>,
        expected: u64,
        actual: u64,
    ) -> Self {
        let id = id.into();
        Self::VersionConflict { entity_type, id, expected, actual }
    }

    /// Backend failure with a message.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// No such record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// A unique key collision, surfaced to clients as a conflict.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// A concurrent writer won; the caller may reload and retry.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Result of a repository call.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync + fmt::Debug {
    /// Saves a profile, replacing any previous version.
    async fn save(&self, profile: &Profile) -> RepositoryResult<()>;

    /// Gets a profile by user id.
    async fn get(&self, id: &UserId) -> RepositoryResult<Option<Profile>>;

    /// Finds the profile whose stored email or phone equals the contact.
    ///
    /// Matching is exact on normalized values; no prefix or fuzzy search.
    async fn find_by_contact(&self, contact: &RecipientContact)
    -> RepositoryResult<Option<Profile>>;
}

/// Repository for share classes.
#[async_trait]
pub trait ShareRepository: Send + Sync + fmt::Debug {
    /// Saves a share class.
    async fn save(&self, share: &Share) -> RepositoryResult<()>;

    /// Gets a share class by id.
    async fn get(&self, id: &ShareId) -> RepositoryResult<Option<Share>>;
}

/// Repository for holding lots.
///
/// Lots that reach zero quantity are kept; they still document the
/// acquisition history.
#[async_trait]
pub trait HoldingRepository: Send + Sync + fmt::Debug {
    /// Saves a single lot.
    async fn save(&self, holding: &Holding) -> RepositoryResult<()>;

    /// Saves several lots in one call.
    ///
    /// Either every lot is written or none is.
    async fn save_all(&self, holdings: &[Holding]) -> RepositoryResult<()>;

    /// Finds the lots a user holds of one share class, oldest first.
    async fn find_by_owner_and_share(
        &self,
        owner_id: &UserId,
        share_id: &ShareId,
    ) -> RepositoryResult<Vec<Holding>>;

    /// Finds every lot a user holds, oldest first.
    async fn find_by_owner(&self, owner_id: &UserId) -> RepositoryResult<Vec<Holding>>;
}

/// Repository for user wallets, keyed by user and currency.
#[async_trait]
pub trait WalletRepository: Send + Sync + fmt::Debug {
    /// Saves a wallet.
    async fn save(&self, wallet: &Wallet) -> RepositoryResult<()>;

    /// Gets the wallet of a user in one currency.
    async fn get(&self, user_id: &UserId, currency: &Currency) -> RepositoryResult<Option<Wallet>>;
}

/// Repository for share transfer requests.
#[async_trait]
pub trait TransferRepository: Send + Sync + fmt::Debug {
    /// Saves a transfer request.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::VersionConflict` unless an update carries
    /// exactly one change on top of the stored version, that is, unless it
    /// was loaded at the version still stored.
    async fn save(&self, request: &TransferRequest) -> RepositoryResult<()>;

    /// Gets a transfer request by id.
    async fn get(&self, id: &TransferId) -> RepositoryResult<Option<TransferRequest>>;

    /// Finds the requests a user sent, newest first.
    async fn find_by_sender(&self, sender_id: &UserId) -> RepositoryResult<Vec<TransferRequest>>;

    /// Finds the requests still pending, oldest first.
    async fn find_pending(&self) -> RepositoryResult<Vec<TransferRequest>>;
}

/// Repository for sell orders.
#[async_trait]
pub trait SellOrderRepository: Send + Sync + fmt::Debug {
    /// Saves a sell order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::VersionConflict` unless an update carries
    /// exactly one change on top of the stored version.
    async fn save(&self, order: &SellOrder) -> RepositoryResult<()>;

    /// Gets a sell order by id.
    async fn get(&self, id: &SellOrderId) -> RepositoryResult<Option<SellOrder>>;

    /// Finds pending and processing orders in FIFO order, optionally for
    /// one share class.
    async fn find_open(&self, share_id: Option<&ShareId>) -> RepositoryResult<Vec<SellOrder>>;

    /// Finds every order a user placed, in FIFO order.
    async fn find_by_user(&self, user_id: &UserId) -> RepositoryResult<Vec<SellOrder>>;

    /// Returns the next FIFO position.
    ///
    /// Positions come from a monotonic sequence and are never reused.
    async fn next_fifo_position(&self) -> RepositoryResult<u64>;
}

/// Repository for the internal sub-wallets.
#[async_trait]
pub trait SubWalletRepository: Send + Sync + fmt::Debug {
    /// Saves a sub-wallet.
    async fn save(&self, wallet: &SubWallet) -> RepositoryResult<()>;

    /// Gets a sub-wallet by type and currency.
    async fn get(
        &self,
        wallet_type: SubWalletType,
        currency: &Currency,
    ) -> RepositoryResult<Option<SubWallet>>;

    /// Returns every sub-wallet.
    async fn get_all(&self) -> RepositoryResult<Vec<SubWallet>>;
}

/// Repository for allocation rules.
///
/// Rules are append-only; the newest one is in effect.
#[async_trait]
pub trait AllocationRuleRepository: Send + Sync + fmt::Debug {
    /// Appends a rule as the newest version.
    async fn save(&self, rule: &AllocationRule) -> RepositoryResult<()>;

    /// Returns the rule in effect.
    async fn latest(&self) -> RepositoryResult<Option<AllocationRule>>;

    /// Returns every rule, newest first.
    async fn history(&self) -> RepositoryResult<Vec<AllocationRule>>;
}
