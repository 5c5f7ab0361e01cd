//! # API Layer
//!
//! External interfaces of the ledger.

pub mod rest;
