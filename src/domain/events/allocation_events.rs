//! # Allocation Events
//!
//! Domain events for allocation rules and fund splits.

use crate::domain::events::domain_event::{
    DomainEvent, EventMetadata, EventType, impl_domain_event,
};
use crate::domain::services::fund_split::FundSplit;
use crate::domain::value_objects::{
    AllocationRuleId, Currency, EventId, Money, Percentage, Timestamp,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event emitted when an administrator saves a new allocation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRuleSaved {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The new rule version.
    pub rule_id: AllocationRuleId,
    /// Project funding percentage.
    pub project_funding: Percentage,
    /// Admin fund percentage.
    pub admin_fund: Percentage,
    /// Share buyback percentage.
    pub buyback: Percentage,
}

impl AllocationRuleSaved {
    /// Creates a new AllocationRuleSaved event.
    #[must_use]
    pub fn new(
        rule_id: AllocationRuleId,
        project_funding: Percentage,
        admin_fund: Percentage,
        buyback: Percentage,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(rule_id),
            rule_id,
            project_funding,
            admin_fund,
            buyback,
        }
    }
}

impl_domain_event!(AllocationRuleSaved, EventType::Allocation, "AllocationRuleSaved");

/// Event emitted when a share-sale amount is split into the sub-wallets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsAllocated {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Rule the split used.
    pub rule_id: AllocationRuleId,
    /// Amount that was split.
    pub amount: Money,
    /// Currency of the amount.
    pub currency: Currency,
    /// Resulting parts.
    pub split: FundSplit,
}

impl FundsAllocated {
    /// Creates a new FundsAllocated event.
    #[must_use]
    pub fn new(rule_id: AllocationRuleId, amount: Money, currency: Currency, split: FundSplit) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(rule_id),
            rule_id,
            amount,
            currency,
            split,
        }
    }
}

impl_domain_event!(FundsAllocated, EventType::Allocation, "FundsAllocated");

/// Any allocation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationEvent {
    /// Rule saved.
    RuleSaved(AllocationRuleSaved),
    /// Funds split.
    FundsAllocated(FundsAllocated),
}

impl DomainEvent for AllocationEvent {
    fn event_id(&self) -> EventId {
        match self {
            Self::RuleSaved(e) => e.event_id(),
            Self::FundsAllocated(e) => e.event_id(),
        }
    }

    fn aggregate_id(&self) -> Option<Uuid> {
        match self {
            Self::RuleSaved(e) => e.aggregate_id(),
            Self::FundsAllocated(e) => e.aggregate_id(),
        }
    }

    fn timestamp(&self) -> Timestamp {
        match self {
            Self::RuleSaved(e) => e.timestamp(),
            Self::FundsAllocated(e) => e.timestamp(),
        }
    }

    fn event_type(&self) -> EventType {
        EventType::Allocation
    }

    fn event_name(&self) -> &'static str {
        match self {
            Self::RuleSaved(e) => e.event_name(),
            Self::FundsAllocated(e) => e.event_name(),
        }
    }
}
