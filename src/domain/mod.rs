//! # Domain Layer
//!
//! Entities, value objects, events and pure business rules of the share
//! ledger. Nothing in this layer performs I/O.

pub mod entities;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;
