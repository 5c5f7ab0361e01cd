//! # Domain Events
//!
//! Events emitted by the ledger workflows for the audit trail.
//!
//! ## Transfer Events
//!
//! - [`TransferRequested`]: Request persisted as pending
//! - [`TransferCompleted`]: Processor applied the transfer
//! - [`TransferFailed`]: Processor rejected the transfer
//!
//! ## Sell Order Events
//!
//! - [`SellOrderPlaced`]: Order joined the queue
//! - [`SellOrderModified`]: Pending order reduced
//! - [`SellOrderCancelled`]: Order withdrawn
//! - [`SellOrderFilled`]: Buyback funds filled an order
//!
//! ## Allocation Events
//!
//! - [`AllocationRuleSaved`]: New rule version
//! - [`FundsAllocated`]: Sale amount split across sub-wallets
//!
//! ## Account Events
//!
//! - [`ProfileRegistered`], [`SharePriced`], [`SharesIssued`],
//!   [`WalletDeposited`]: back-office changes

pub mod account_events;
pub mod allocation_events;
pub mod domain_event;
pub mod sell_order_events;
pub mod transfer_events;

pub use account_events::{ProfileRegistered, SharePriced, SharesIssued, WalletDeposited};
pub use allocation_events::{AllocationEvent, AllocationRuleSaved, FundsAllocated};
pub use domain_event::{DomainEvent, EventMetadata, EventType};
pub use sell_order_events::{
    SellOrderCancelled, SellOrderEvent, SellOrderFilled, SellOrderModified, SellOrderPlaced,
};
pub use transfer_events::{TransferCompleted, TransferEvent, TransferFailed, TransferRequested};
