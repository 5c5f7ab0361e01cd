//! # Application Errors
//!
//! Everything a ledger workflow can fail with. The REST layer maps these
//! onto status codes through the predicates below.
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)           - Business rule violations
//! ├── Repository(RepositoryError)   - Persistence failures
//! ├── EventStore(EventStoreError)   - Audit log failures
//! ├── Callback(CallbackError)       - Serverless endpoint failures
//! ├── Validation(String)            - Input validation failures
//! ├── NotFound { .. }               - Resource not found
//! └── ... (workflow-specific variants)
//! ```
//!
//! ```
//! use mineshare_ledger::application::error::ApplicationError;
//! use mineshare_ledger::domain::errors::DomainError;
//!
//! let err = ApplicationError::not_found("Share", "3f1c");
//! assert!(err.is_not_found());
//!
//! let err: ApplicationError = DomainError::SelfTransfer.into();
//! assert!(err.is_business_rule());
//! ```

use crate::application::services::payment_polling::PollOutcome;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{ArithmeticError, TransferId};
use crate::infrastructure::callbacks::error::CallbackError;
use crate::infrastructure::persistence::{EventStoreError, RepositoryError};
use thiserror::Error;

/// Failure of a ledger workflow.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A business rule was broken.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage failed or a record is missing.
    #[error("storage: {0}")]
    Repository(#[from] RepositoryError),

    /// The event log rejected an append.
    #[error("event log: {0}")]
    EventStore(#[from] EventStoreError),

    /// Serverless endpoint unreachable or misbehaving.
    #[error("callback: {0}")]
    Callback(#[from] CallbackError),

    /// Malformed input.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Looked-up record does not exist.
    #[error("{resource_type} {id} not found")]
    NotFound {
        /// Record kind.
        resource_type: String,
        /// Lookup key.
        id: String,
    },

    /// No profile matches the recipient contact.
    #[error("recipient not found: {0}")]
    RecipientNotFound(String),

    /// No allocation rule has been saved yet.
    #[error("no allocation rule configured")]
    NoAllocationRule,

    /// Caller does not own the resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The transfer processor could not be reached or errored.
    ///
    /// The request stays `pending`; nothing was rolled back or retried.
    #[error("transfer {transfer_id} left pending: {message}")]
    TransferProcessingFailed {
        /// The pending request.
        transfer_id: TransferId,
        /// What went wrong.
        message: String,
    },

    /// The gateway did not report the payment as successful.
    #[error("payment {reference} not confirmed: {outcome}")]
    PaymentNotConfirmed {
        /// Gateway payment reference.
        reference: String,
        /// How polling ended.
        outcome: PollOutcome,
    },

    /// Anything else; logged by the REST layer.
    #[error("internal: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// [`ApplicationError::Validation`].
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// [`ApplicationError::NotFound`].
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// [`ApplicationError::Forbidden`].
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// Creates a processing failure for a request left pending.
    #[must_use]
    pub fn processing_failed(transfer_id: TransferId, message: impl Into<String>) -> Self {
        Self::TransferProcessingFailed {
            transfer_id,
            message: message.into(),
        }
    }

    /// [`ApplicationError::Internal`].
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Missing record, recipient or rule (404).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::RecipientNotFound(_) | Self::NoAllocationRule => true,
            Self::Repository(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Bad input (400).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Domain(
                    DomainError::ValidationError(_)
                        | DomainError::InvalidQuantity(_)
                        | DomainError::InvalidContact(_)
                        | DomainError::InvalidAllocationRule { .. }
                )
        )
    }

    /// Returns true if a business rule rejected the operation.
    #[must_use]
    pub fn is_business_rule(&self) -> bool {
        match self {
            Self::PaymentNotConfirmed { .. } => true,
            Self::Domain(_) => !self.is_validation(),
            _ => false,
        }
    }

    /// Returns true if retrying the same call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Callback(e) => e.is_transport(),
            Self::Repository(e) => e.is_version_conflict(),
            _ => false,
        }
    }
}

impl From<ArithmeticError> for ApplicationError {
    fn from(error: ArithmeticError) -> Self {
        Self::Domain(DomainError::Arithmetic(error))
    }
}

/// Result of a ledger workflow.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_split_into_validation_and_rule() {
        let invalid: ApplicationError = DomainError::InvalidQuantity("zero".into()).into();
        assert!(invalid.is_validation());
        assert!(!invalid.is_business_rule());

        let rule: ApplicationError = DomainError::InsufficientHoldings {
            available: 1,
            requested: 2,
        }
        .into();
        assert!(rule.is_business_rule());
    }

    #[test]
    fn recipient_not_found_is_not_found() {
        assert!(ApplicationError::RecipientNotFound("email:x@y.z".into()).is_not_found());
        let repo: ApplicationError = RepositoryError::not_found("Share", "1").into();
        assert!(repo.is_not_found());
    }

    #[test]
    fn transport_failures_are_retryable() {
        let err: ApplicationError = CallbackError::timeout("slow").into();
        assert!(err.is_retryable());
        let err: ApplicationError = CallbackError::authentication("nope").into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn unconfirmed_payment_is_business_rule() {
        let err = ApplicationError::PaymentNotConfirmed {
            reference: "PSK-9".to_string(),
            outcome: PollOutcome::TimedOut,
        };
        assert!(err.is_business_rule());
        assert_eq!(err.to_string(), "payment PSK-9 not confirmed: timed out");
    }

    #[test]
    fn processing_failed_names_transfer() {
        let id = TransferId::new_v4();
        let err = ApplicationError::processing_failed(id, "connection reset");
        assert!(err.to_string().contains(&id.to_string()));
        assert!(err.to_string().contains("pending"));
    }
}
