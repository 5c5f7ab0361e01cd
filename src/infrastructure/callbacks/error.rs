//! # Callback Errors
//!
//! Transport-level failures of calls to serverless callback endpoints.
//!
//! ```
//! use mineshare_ledger::infrastructure::callbacks::error::CallbackError;
//!
//! let error = CallbackError::timeout("no answer after 10000ms");
//! assert!(error.is_transport());
//!
//! let error = CallbackError::authentication("invalid service key");
//! assert!(!error.is_transport());
//! ```

use thiserror::Error;

/// Error type for callback endpoint calls.
///
/// None of these mean the callback rejected the request on business
/// grounds; that case is a successful call with `success: false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    /// Request timed out.
    #[error("callback timeout: {message}")]
    Timeout {
        /// Detail.
        message: String,
    },

    /// Network or connection error, including 5xx answers.
    #[error("callback connection error: {message}")]
    Connection {
        /// Detail.
        message: String,
    },

    /// Endpoint refused our credentials.
    #[error("callback authentication error: {message}")]
    Authentication {
        /// Detail.
        message: String,
    },

    /// Endpoint refused the request body.
    #[error("callback invalid request: {message}")]
    InvalidRequest {
        /// Detail.
        message: String,
    },

    /// Unexpected status or unparseable response.
    #[error("callback protocol error: {message}")]
    Protocol {
        /// Detail.
        message: String,
    },

    /// Client could not be built.
    #[error("callback internal error: {message}")]
    Internal {
        /// Detail.
        message: String,
    },
}

macro_rules! constructors {
    ($($name:ident => $variant:ident),+ $(,)?) => {
        $(
            #[doc = concat!("Builds a `", stringify!($variant), "` error.")]
            #[must_use]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::$variant { message: message.into() }
            }
        )+
    };
}

impl CallbackError {
    constructors! {
        timeout => Timeout,
        connection => Connection,
        authentication => Authentication,
        invalid_request => InvalidRequest,
        protocol => Protocol,
        internal => Internal,
    }

    /// Returns true if the call may never have reached the endpoint.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connection { .. })
    }
}

/// Result of a callback call.
pub type CallbackResult<T> = Result<T, CallbackError>;
