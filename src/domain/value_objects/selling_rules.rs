//! # Selling Rules
//!
//! Per-order quantity limits for the sell queue.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Minimum and maximum shares per sell order.
///
/// # Examples
///
/// ```
/// use mineshare_ledger::domain::value_objects::selling_rules::SellingRules;
///
/// let rules = SellingRules::new(1, 1_000).unwrap();
/// assert!(rules.check(500).is_ok());
/// assert!(rules.check(1_001).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellingRules {
    min_quantity: u64,
    max_quantity: u64,
}

impl SellingRules {
    /// Creates selling rules.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if `min_quantity` is zero or
    /// greater than `max_quantity`.
    pub fn new(min_quantity: u64, max_quantity: u64) -> DomainResult<Self> {
        if min_quantity == 0 || min_quantity > max_quantity {
            return Err(DomainError::ValidationError(format!(
                "invalid selling limits: min {min_quantity}, max {max_quantity}"
            )));
        }
        Ok(Self {
            min_quantity,
            max_quantity,
        })
    }

    /// Returns the minimum shares per order.
    #[inline]
    #[must_use]
    pub fn min_quantity(&self) -> u64 {
        self.min_quantity
    }

    /// Returns the maximum shares per order.
    #[inline]
    #[must_use]
    pub fn max_quantity(&self) -> u64 {
        self.max_quantity
    }

    /// Checks an order quantity against the limits.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` when out of range.
    pub fn check(&self, quantity: u64) -> DomainResult<()> {
        if quantity < self.min_quantity || quantity > self.max_quantity {
            return Err(DomainError::InvalidQuantity(format!(
                "sell quantity {quantity} outside allowed range {}..={}",
                self.min_quantity, self.max_quantity
            )));
        }
        Ok(())
    }
}

impl Default for SellingRules {
    fn default() -> Self {
        Self {
            min_quantity: 1,
            max_quantity: u64::MAX,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn invalid_limits_rejected() {
        assert!(SellingRules::new(0, 10).is_err());
        assert!(SellingRules::new(11, 10).is_err());
        assert!(SellingRules::new(10, 10).is_ok());
    }

    #[test]
    fn boundaries_inclusive() {
        let rules = SellingRules::new(5, 10).unwrap();
        assert!(rules.check(5).is_ok());
        assert!(rules.check(10).is_ok());
        assert!(rules.check(4).is_err());
        assert!(rules.check(11).is_err());
    }

    #[test]
    fn default_only_rejects_zero() {
        let rules = SellingRules::default();
        assert!(rules.check(0).is_err());
        assert!(rules.check(u64::MAX).is_ok());
    }
}
