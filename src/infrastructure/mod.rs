//! # Infrastructure Layer
//!
//! Adapters behind the application ports: persistence backends and the
//! serverless callback client.

pub mod callbacks;
pub mod persistence;
