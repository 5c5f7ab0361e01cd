//! # Application Services
//!
//! Use cases that orchestrate domain rules, repositories and the event log.
//!
//! - [`ShareTransferService`]: Peer-to-peer share transfers with a fee
//! - [`FundAllocationService`]: Allocation rules and sub-wallet credits
//! - [`SellQueueService`]: FIFO sell orders and buyback disbursement
//! - [`PaymentStatusPoller`]: Waits for a payment gateway to settle
//! - [`BackOfficeService`]: Profiles, shares, issued lots and wallet deposits

pub mod back_office;
pub mod fund_allocation;
pub mod payment_polling;
pub mod sell_queue;
pub mod share_transfer;
pub mod transfer_processor;

pub use back_office::BackOfficeService;
pub use fund_allocation::FundAllocationService;
pub use payment_polling::{
    PaymentStatus, PaymentStatusPoller, PaymentStatusSource, PollOutcome, PollingConfig,
};
pub use sell_queue::{BuybackFill, BuybackReport, SellQueueService};
pub use share_transfer::{FeeQuote, ShareTransferService};
pub use transfer_processor::{LedgerTransferProcessor, ProcessOutcome, TransferProcessor};
