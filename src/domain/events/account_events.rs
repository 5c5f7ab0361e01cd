//! # Account Events
//!
//! Back-office changes that put shares and money into the ledger: new
//! profiles, listed shares, price changes, issued lots and wallet deposits.

use crate::domain::events::domain_event::{EventMetadata, EventType, impl_domain_event};
use crate::domain::value_objects::{Currency, HoldingId, Money, ShareId, UserId};
use serde::{Deserialize, Serialize};

/// A user profile was registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRegistered {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// New user.
    pub user_id: UserId,
}

impl ProfileRegistered {
    /// Creates the event.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(user_id),
            user_id,
        }
    }
}

impl_domain_event!(ProfileRegistered, EventType::Account, "ProfileRegistered");

/// A share class was listed, or its price changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePriced {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Share class.
    pub share_id: ShareId,
    /// Price per share from now on.
    pub price_per_share: Money,
    /// Currency of the price.
    pub currency: Currency,
}

impl SharePriced {
    /// Creates the event.
    #[must_use]
    pub fn new(share_id: ShareId, price_per_share: Money, currency: Currency) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(share_id),
            share_id,
            price_per_share,
            currency,
        }
    }
}

impl_domain_event!(SharePriced, EventType::Account, "SharePriced");

/// A new lot of shares was issued to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharesIssued {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The new lot.
    pub holding_id: HoldingId,
    /// Owner of the lot.
    pub owner_id: UserId,
    /// Share class.
    pub share_id: ShareId,
    /// Shares in the lot.
    pub quantity: u64,
    /// Price the lot was recorded at.
    pub purchase_price: Money,
}

impl SharesIssued {
    /// Creates the event.
    #[must_use]
    pub fn new(
        holding_id: HoldingId,
        owner_id: UserId,
        share_id: ShareId,
        quantity: u64,
        purchase_price: Money,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(holding_id),
            holding_id,
            owner_id,
            share_id,
            quantity,
            purchase_price,
        }
    }
}

impl_domain_event!(SharesIssued, EventType::Account, "SharesIssued");

/// Money was credited to a user wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletDeposited {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Wallet owner.
    pub user_id: UserId,
    /// Amount credited.
    pub amount: Money,
    /// Wallet currency.
    pub currency: Currency,
    /// Gateway reference when the deposit was confirmed by a payment.
    pub payment_reference: Option<String>,
}

impl WalletDeposited {
    /// Creates the event.
    #[must_use]
    pub fn new(
        user_id: UserId,
        amount: Money,
        currency: Currency,
        payment_reference: Option<String>,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(user_id),
            user_id,
            amount,
            currency,
            payment_reference,
        }
    }
}

impl_domain_event!(WalletDeposited, EventType::Account, "WalletDeposited");
