//! # mineshare-ledger
//!
//! Share ledger for a mining-investment platform.
//!
//! The crate owns the bookkeeping rules of three workflows:
//!
//! - **Share transfers**: move shares between investors by email or phone,
//!   charging a percentage-plus-flat fee to the sender's wallet
//! - **Fund allocation**: split completed share-sale proceeds across the
//!   project funding, admin fund and share buyback sub-wallets
//! - **Sell queue**: first-in-first-out sell orders, cancellable and
//!   reducible while pending, bought back from the buyback sub-wallet
//!
//! # Architecture
//!
//! ```text
//! api::rest          axum handlers, HTTP error mapping
//!     │
//! application        workflow services, Ledger (repository bundle)
//!     │
//! domain             entities, value objects, events, pure rules
//!     │
//! infrastructure     in-memory repositories, event stores, callbacks
//! ```
//!
//! # Example
//!
//! ```
//! use mineshare_ledger::domain::services::FeeSchedule;
//! use mineshare_ledger::domain::value_objects::{Money, Percentage};
//! use rust_decimal::Decimal;
//!
//! let fees = FeeSchedule::new(
//!     Percentage::new(Decimal::new(2, 0)).unwrap(),
//!     Money::new(Decimal::new(1_000, 0)).unwrap(),
//! );
//! let fee = fees
//!     .fee_for(30, Money::new(Decimal::new(20_000, 0)).unwrap())
//!     .unwrap();
//! assert_eq!(fee.get(), Decimal::new(13_000, 0));
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
