//! # Domain Services
//!
//! Pure business rules that span more than one entity.
//!
//! ## Services
//!
//! - [`transfer_fee::FeeSchedule`]: Percentage-plus-flat transfer fee
//! - [`fund_split::split`]: Proportional split of share-sale proceeds
//! - [`holding_ledger`]: Transferable totals and oldest-first debits over lots

pub mod fund_split;
pub mod holding_ledger;
pub mod transfer_fee;

pub use fund_split::{FundSplit, split};
pub use holding_ledger::{debit_oldest_first, total_quantity, transferable_total};
pub use transfer_fee::FeeSchedule;
