//! # Application Layer
//!
//! Workflow services on top of the domain model.
//!
//! The [`ledger::Ledger`] bundles the repository ports every service works
//! against; services serialize their read-check-write sequences through its
//! write lock.

pub mod error;
pub mod ledger;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use ledger::Ledger;
