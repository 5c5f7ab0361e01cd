//! # Allocation Rule Entity
//!
//! Percentages used to split share-sale proceeds across the three
//! sub-wallets.
//!
//! Rules are versioned by creation time; the most recent one is in force.
//!
//! # Examples
//!
//! ```
//! use mineshare_ledger::domain::entities::allocation_rule::AllocationRule;
//! use mineshare_ledger::domain::value_objects::Percentage;
//! use rust_decimal::Decimal;
//!
//! let pct = |v| Percentage::new(Decimal::new(v, 0)).unwrap();
//!
//! assert!(AllocationRule::new(pct(60), pct(25), pct(15)).is_ok());
//! assert!(AllocationRule::new(pct(60), pct(25), pct(14)).is_err());
//! assert!(AllocationRule::new(pct(60), pct(25), pct(16)).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::CheckedArithmetic;
use crate::domain::value_objects::{AllocationRuleId, Percentage, SubWalletType, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Split percentages for share-sale proceeds.
///
/// # Invariants
///
/// - `project_funding + admin_fund + buyback == 100` for every rule built
///   through [`AllocationRule::new`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRule {
    id: AllocationRuleId,
    project_funding: Percentage,
    admin_fund: Percentage,
    buyback: Percentage,
    created_at: Timestamp,
}

impl AllocationRule {
    /// Creates a rule, checking the sum-to-100 invariant.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAllocationRule` if the percentages do not
    /// add up to exactly 100.
    pub fn new(
        project_funding: Percentage,
        admin_fund: Percentage,
        buyback: Percentage,
    ) -> DomainResult<Self> {
        let rule = Self {
            id: AllocationRuleId::new_v4(),
            project_funding,
            admin_fund,
            buyback,
            created_at: Timestamp::now(),
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Reconstructs a rule from storage without validation.
    #[must_use]
    pub fn from_parts(
        id: AllocationRuleId,
        project_funding: Percentage,
        admin_fund: Percentage,
        buyback: Percentage,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            project_funding,
            admin_fund,
            buyback,
            created_at,
        }
    }

    /// Sum of the three percentages.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn total(&self) -> DomainResult<Decimal> {
        Ok(self
            .project_funding
            .get()
            .safe_add(self.admin_fund.get())?
            .safe_add(self.buyback.get())?)
    }

    /// Checks the sum-to-100 invariant.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAllocationRule` if it does not hold.
    pub fn validate(&self) -> DomainResult<()> {
        let total = self.total()?;
        if total != Decimal::ONE_HUNDRED {
            return Err(DomainError::InvalidAllocationRule { total });
        }
        Ok(())
    }

    /// Returns the rule id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> AllocationRuleId {
        self.id
    }

    /// Returns the project funding share.
    #[inline]
    #[must_use]
    pub fn project_funding(&self) -> Percentage {
        self.project_funding
    }

    /// Returns the admin fund share.
    #[inline]
    #[must_use]
    pub fn admin_fund(&self) -> Percentage {
        self.admin_fund
    }

    /// Returns the buyback share.
    #[inline]
    #[must_use]
    pub fn buyback(&self) -> Percentage {
        self.buyback
    }

    /// Returns the percentage for a given sub-wallet.
    #[must_use]
    pub fn percentage_for(&self, wallet_type: SubWalletType) -> Percentage {
        match wallet_type {
            SubWalletType::ProjectFunding => self.project_funding,
            SubWalletType::AdminFund => self.admin_fund,
            SubWalletType::ShareBuyback => self.buyback,
        }
    }

    /// Returns when the rule was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

impl fmt::Display for AllocationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AllocationRule(project={}, admin={}, buyback={})",
            self.project_funding, self.admin_fund, self.buyback
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pct(v: i64) -> Percentage {
        Percentage::new(Decimal::new(v, 0)).unwrap()
    }

    #[test]
    fn sum_of_99_rejected() {
        let err = AllocationRule::new(pct(50), pct(30), pct(19)).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidAllocationRule {
                total: Decimal::new(99, 0)
            }
        );
    }

    #[test]
    fn sum_of_101_rejected() {
        assert!(AllocationRule::new(pct(50), pct(30), pct(21)).is_err());
    }

    #[test]
    fn fractional_percentages_summing_to_100_accepted() {
        let a = Percentage::new(Decimal::new(333, 1)).unwrap();
        let b = Percentage::new(Decimal::new(333, 1)).unwrap();
        let c = Percentage::new(Decimal::new(334, 1)).unwrap();
        assert!(AllocationRule::new(a, b, c).is_ok());
    }

    #[test]
    fn from_parts_skips_validation_but_validate_catches_it() {
        let rule = AllocationRule::from_parts(
            AllocationRuleId::new_v4(),
            pct(90),
            pct(90),
            pct(0),
            Timestamp::now(),
        );
        assert!(rule.validate().is_err());
    }

    #[test]
    fn percentage_for_maps_each_wallet() {
        let rule = AllocationRule::new(pct(60), pct(25), pct(15)).unwrap();
        assert_eq!(rule.percentage_for(SubWalletType::ProjectFunding), pct(60));
        assert_eq!(rule.percentage_for(SubWalletType::AdminFund), pct(25));
        assert_eq!(rule.percentage_for(SubWalletType::ShareBuyback), pct(15));
    }
}
