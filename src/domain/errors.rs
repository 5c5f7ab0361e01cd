//! # Domain Errors
//!
//! Business rule violations raised by entities and domain services.
//!
//! # Examples
//!
//! ```
//! use mineshare_ledger::domain::errors::DomainError;
//!
//! let err = DomainError::InsufficientHoldings { available: 20, requested: 30 };
//! assert!(err.to_string().contains("20"));
//! ```

use crate::domain::value_objects::arithmetic::ArithmeticError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error raised when a domain rule is violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Generic validation failure.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Share quantity is zero or out of the allowed range.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Malformed recipient email or phone.
    #[error("invalid contact: {0}")]
    InvalidContact(String),

    /// Allocation percentages do not add up to 100.
    #[error("allocation percentages must sum to 100, got {total}")]
    InvalidAllocationRule {
        /// The actual sum of the three percentages.
        total: Decimal,
    },

    /// State machine rejected a transition.
    #[error("invalid {entity} transition from {from} to {to}")]
    InvalidStateTransition {
        /// Entity kind (`transfer`, `sell order`).
        entity: &'static str,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// Not enough unlocked shares.
    #[error("insufficient holdings: {available} available, {requested} requested")]
    InsufficientHoldings {
        /// Unlocked shares available.
        available: u64,
        /// Shares requested.
        requested: u64,
    },

    /// Not enough funds in a wallet or sub-wallet.
    #[error("insufficient balance: {available} available, {required} required")]
    InsufficientBalance {
        /// Current balance.
        available: Decimal,
        /// Amount required.
        required: Decimal,
    },

    /// Sender and recipient are the same user.
    #[error("cannot transfer shares to yourself")]
    SelfTransfer,

    /// A sell order quantity may only be reduced while pending.
    #[error("sell order quantity can only be reduced: current {current}, requested {requested}")]
    QuantityIncrease {
        /// Current order quantity.
        current: u64,
        /// Requested new quantity.
        requested: u64,
    },

    /// Currencies of two amounts do not match.
    #[error("currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        /// Expected currency code.
        expected: String,
        /// Actual currency code.
        actual: String,
    },

    /// Arithmetic failure.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Creates an invalid transition error.
    #[must_use]
    pub fn invalid_transition(
        entity: &'static str,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        Self::InvalidStateTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Returns true if the error means the caller lacks shares or funds.
    #[must_use]
    pub fn is_insufficient(&self) -> bool {
        matches!(
            self,
            Self::InsufficientHoldings { .. } | Self::InsufficientBalance { .. }
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_converts() {
        let err: DomainError = ArithmeticError::Overflow.into();
        assert!(matches!(err, DomainError::Arithmetic(ArithmeticError::Overflow)));
    }

    #[test]
    fn invalid_transition_message() {
        let err = DomainError::invalid_transition("transfer", "completed", "failed");
        assert_eq!(
            err.to_string(),
            "invalid transfer transition from completed to failed"
        );
    }

    #[test]
    fn insufficient_classification() {
        assert!(
            DomainError::InsufficientHoldings {
                available: 1,
                requested: 2
            }
            .is_insufficient()
        );
        assert!(!DomainError::SelfTransfer.is_insufficient());
    }

    #[test]
    fn allocation_rule_message_includes_total() {
        let err = DomainError::InvalidAllocationRule {
            total: Decimal::new(99, 0),
        };
        assert!(err.to_string().contains("99"));
    }
}
