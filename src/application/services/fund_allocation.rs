//! # Fund Allocation Service
//!
//! Maintains the versioned allocation rule and splits share-sale proceeds
//! across the project funding, admin fund and share buyback sub-wallets.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::ledger::Ledger;
use crate::domain::entities::{AllocationRule, SubWallet};
use crate::domain::events::{AllocationRuleSaved, FundsAllocated};
use crate::domain::services::fund_split::{FundSplit, split};
use crate::domain::value_objects::{Currency, Money, Percentage, SubWalletType};
use crate::infrastructure::persistence::record_committed;
use tracing::info;

/// Allocation rule and fund split use cases.
#[derive(Debug, Clone)]
pub struct FundAllocationService {
    ledger: Ledger,
}

impl FundAllocationService {
    /// Creates the service.
    #[must_use]
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// Saves a new rule version; it takes effect immediately.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAllocationRule` unless the three
    /// percentages sum to exactly 100.
    pub async fn save_rule(
        &self,
        project_funding: Percentage,
        admin_fund: Percentage,
        buyback: Percentage,
    ) -> ApplicationResult<AllocationRule> {
        let rule = AllocationRule::new(project_funding, admin_fund, buyback)?;
        self.ledger.allocation_rules.save(&rule).await?;
        record_committed(
            self.ledger.events.as_ref(),
            &AllocationRuleSaved::new(rule.id(), project_funding, admin_fund, buyback),
        )
        .await;
        info!(rule_id = %rule.id(), %project_funding, %admin_fund, %buyback, "allocation rule saved");
        Ok(rule)
    }

    /// Returns the rule in effect.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NoAllocationRule` if none was saved.
    pub async fn current_rule(&self) -> ApplicationResult<AllocationRule> {
        self.ledger
            .allocation_rules
            .latest()
            .await?
            .ok_or(ApplicationError::NoAllocationRule)
    }

    /// Returns every rule version, newest first.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn rule_history(&self) -> ApplicationResult<Vec<AllocationRule>> {
        Ok(self.ledger.allocation_rules.history().await?)
    }

    /// Splits a completed share-sale `amount` by the current rule and
    /// credits each sub-wallet.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NoAllocationRule` without a rule,
    /// `DomainError::ValidationError` for a zero amount and
    /// `DomainError::InvalidAllocationRule` if the stored rule is broken.
    pub async fn allocate(&self, amount: Money, currency: Currency) -> ApplicationResult<FundSplit> {
        let rule = self.current_rule().await?;
        let parts = split(amount, &rule)?;

        let _guard = self.ledger.lock_writes().await;
        let mut credited = Vec::with_capacity(SubWalletType::ALL.len());
        for wallet_type in SubWalletType::ALL {
            let mut wallet = self
                .ledger
                .sub_wallets
                .get(wallet_type, &currency)
                .await?
                .unwrap_or_else(|| SubWallet::new(wallet_type, currency.clone()));
            wallet.credit(parts.amount_for(wallet_type))?;
            credited.push(wallet);
        }
        for wallet in &credited {
            self.ledger.sub_wallets.save(wallet).await?;
        }

        record_committed(
            self.ledger.events.as_ref(),
            &FundsAllocated::new(rule.id(), amount, currency.clone(), parts),
        )
        .await;
        info!(
            rule_id = %rule.id(),
            %amount,
            %currency,
            project_funding = %parts.project_funding,
            admin_fund = %parts.admin_fund,
            buyback = %parts.buyback,
            "funds allocated"
        );
        Ok(parts)
    }

    /// Lists every sub-wallet balance.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn sub_wallets(&self) -> ApplicationResult<Vec<SubWallet>> {
        Ok(self.ledger.sub_wallets.get_all().await?)
    }
}
