//! # Fund Split
//!
//! Splits a share-sale amount across the three sub-wallets.
//!
//! Project funding and admin fund shares are rounded down to two decimal
//! places; the buyback share takes the remainder, so the three parts always
//! add up to the original amount.

use crate::domain::entities::allocation_rule::AllocationRule;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::{CheckedArithmetic, Rounding, round_money};
use crate::domain::value_objects::{Money, SubWalletType};
use serde::{Deserialize, Serialize};

/// Amounts destined for each sub-wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundSplit {
    /// Project funding share.
    pub project_funding: Money,
    /// Admin fund share.
    pub admin_fund: Money,
    /// Share buyback share.
    pub buyback: Money,
}

impl FundSplit {
    /// Returns the amount for a given sub-wallet.
    #[must_use]
    pub fn amount_for(&self, wallet_type: SubWalletType) -> Money {
        match wallet_type {
            SubWalletType::ProjectFunding => self.project_funding,
            SubWalletType::AdminFund => self.admin_fund,
            SubWalletType::ShareBuyback => self.buyback,
        }
    }

    /// Sum of the three parts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn total(&self) -> DomainResult<Money> {
        Ok(self
            .project_funding
            .safe_add(self.admin_fund)?
            .safe_add(self.buyback)?)
    }
}

/// Splits `amount` according to `rule`.
///
/// # Errors
///
/// Returns `DomainError::InvalidAllocationRule` if the rule does not sum to
/// 100, `DomainError::ValidationError` for a zero amount and
/// `DomainError::Arithmetic` on overflow.
///
/// # Examples
///
/// ```
/// use mineshare_ledger::domain::entities::AllocationRule;
/// use mineshare_ledger::domain::services::fund_split::split;
/// use mineshare_ledger::domain::value_objects::{Money, Percentage};
/// use rust_decimal::Decimal;
///
/// let pct = |v| Percentage::new(Decimal::new(v, 0)).unwrap();
/// let rule = AllocationRule::new(pct(60), pct(25), pct(15)).unwrap();
/// let parts = split(Money::new(Decimal::new(1_000_000, 0)).unwrap(), &rule).unwrap();
///
/// assert_eq!(parts.project_funding.get(), Decimal::new(600_000, 0));
/// assert_eq!(parts.admin_fund.get(), Decimal::new(250_000, 0));
/// assert_eq!(parts.buyback.get(), Decimal::new(150_000, 0));
/// ```
pub fn split(amount: Money, rule: &AllocationRule) -> DomainResult<FundSplit> {
    rule.validate()?;
    if !amount.is_positive() {
        return Err(DomainError::ValidationError(
            "allocation amount must be positive".to_string(),
        ));
    }

    let project = round_money(rule.project_funding().of(amount.get())?, Rounding::Down);
    let admin = round_money(rule.admin_fund().of(amount.get())?, Rounding::Down);
    let buyback = amount.get().safe_sub(project)?.safe_sub(admin)?;

    Ok(FundSplit {
        project_funding: Money::new(project)?,
        admin_fund: Money::new(admin)?,
        buyback: Money::new(buyback)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{AllocationRuleId, Percentage, Timestamp};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn pct(v: i64, scale: u32) -> Percentage {
        Percentage::new(Decimal::new(v, scale)).unwrap()
    }

    fn thirds() -> AllocationRule {
        AllocationRule::new(pct(3333, 2), pct(3333, 2), pct(3334, 2)).unwrap()
    }

    #[test]
    fn remainder_goes_to_buyback() {
        let parts = split(Money::new(Decimal::new(100, 0)).unwrap(), &thirds()).unwrap();
        assert_eq!(parts.project_funding.get(), Decimal::new(3333, 2));
        assert_eq!(parts.admin_fund.get(), Decimal::new(3333, 2));
        assert_eq!(parts.buyback.get(), Decimal::new(3334, 2));
    }

    #[test]
    fn zero_amount_rejected() {
        assert!(matches!(
            split(Money::zero(), &thirds()),
            Err(DomainError::ValidationError(_))
        ));
    }

    #[test]
    fn stale_invalid_rule_rejected() {
        let broken = AllocationRule::from_parts(
            AllocationRuleId::new_v4(),
            pct(50, 0),
            pct(50, 0),
            pct(1, 0),
            Timestamp::now(),
        );
        assert!(matches!(
            split(Money::new(Decimal::ONE).unwrap(), &broken),
            Err(DomainError::InvalidAllocationRule { .. })
        ));
    }

    #[test]
    fn amount_for_matches_fields() {
        let parts = split(Money::new(Decimal::new(300, 0)).unwrap(), &thirds()).unwrap();
        assert_eq!(parts.amount_for(SubWalletType::ProjectFunding), parts.project_funding);
        assert_eq!(parts.amount_for(SubWalletType::AdminFund), parts.admin_fund);
        assert_eq!(parts.amount_for(SubWalletType::ShareBuyback), parts.buyback);
    }

    proptest! {
        #[test]
        fn parts_always_sum_to_amount(
            cents in 1i64..10_000_000_000,
            project in 0i64..=100,
            admin_share in 0i64..=100,
        ) {
            let admin = admin_share.min(100 - project);
            let buyback = 100 - project - admin;
            let rule = AllocationRule::new(pct(project, 0), pct(admin, 0), pct(buyback, 0)).unwrap();
            let amount = Money::new(Decimal::new(cents, 2)).unwrap();
            let parts = split(amount, &rule).unwrap();
            prop_assert_eq!(parts.total().unwrap(), amount);
        }
    }
}
