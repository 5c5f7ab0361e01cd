//! # Domain Entities
//!
//! Aggregate roots and entities of the share ledger.
//!
//! ## Aggregates
//!
//! - [`TransferRequest`]: Share transfer with its fee and lifecycle
//! - [`SellOrder`]: Sell request waiting in the FIFO buyback queue
//!
//! ## Entities
//!
//! - [`Profile`]: Registered user reachable by email or phone
//! - [`Share`]: Share class with its current price
//! - [`Holding`]: Lot of shares owned by a user
//! - [`Wallet`]: User cash balance in one currency
//! - [`SubWallet`]: Internal fund bucket
//! - [`AllocationRule`]: Split percentages for share-sale proceeds

pub mod allocation_rule;
pub mod holding;
pub mod profile;
pub mod sell_order;
pub mod share;
pub mod sub_wallet;
pub mod transfer_request;
pub mod wallet;

pub use allocation_rule::AllocationRule;
pub use holding::Holding;
pub use profile::Profile;
pub use sell_order::SellOrder;
pub use share::Share;
pub use sub_wallet::SubWallet;
pub use transfer_request::TransferRequest;
pub use wallet::Wallet;
