//! # Serverless Callbacks
//!
//! HTTP client for serverless endpoints, and the transfer processor and
//! payment status source built on it.

pub mod error;
pub mod http_client;
pub mod remote_payment_status;
pub mod remote_transfer_processor;

pub use error::{CallbackError, CallbackResult};
pub use http_client::HttpClient;
pub use remote_payment_status::RemotePaymentStatusSource;
pub use remote_transfer_processor::RemoteTransferProcessor;
