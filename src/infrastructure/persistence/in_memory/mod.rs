//! # In-Memory Repositories
//!
//! In-memory implementations for testing and single-process deployments.
//!
//! ## Available Repositories
//!
//! - [`InMemoryProfileRepository`]: User profiles
//! - [`InMemoryShareRepository`]: Share classes
//! - [`InMemoryHoldingRepository`]: Holding lots
//! - [`InMemoryWalletRepository`]: User wallets
//! - [`InMemoryTransferRepository`]: Transfer requests
//! - [`InMemorySellOrderRepository`]: Sell queue
//! - [`InMemorySubWalletRepository`]: Sub-wallets
//! - [`InMemoryAllocationRuleRepository`]: Allocation rules
//! - [`InMemoryEventStore`]: Event log
//!
//! ## Thread Safety
//!
//! All implementations use `Arc<RwLock<..>>` for thread-safe access.

pub mod allocation_rule_repository;
pub mod event_store;
pub mod holding_repository;
pub mod profile_repository;
pub mod sell_order_repository;
pub mod share_repository;
pub mod sub_wallet_repository;
pub mod transfer_repository;
pub mod wallet_repository;

pub use allocation_rule_repository::InMemoryAllocationRuleRepository;
pub use event_store::InMemoryEventStore;
pub use holding_repository::InMemoryHoldingRepository;
pub use profile_repository::InMemoryProfileRepository;
pub use sell_order_repository::InMemorySellOrderRepository;
pub use share_repository::InMemoryShareRepository;
pub use sub_wallet_repository::InMemorySubWalletRepository;
pub use transfer_repository::InMemoryTransferRepository;
pub use wallet_repository::InMemoryWalletRepository;
