//! # Sell Queue Service
//!
//! First-in-first-out queue of sell orders, disbursed from the share
//! buyback sub-wallet.
//!
//! Orders are served strictly by FIFO position: an order later in the
//! queue is never filled while an earlier open order of the same share is
//! still waiting for funds, even if the later order is smaller.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::ledger::Ledger;
use crate::domain::entities::{SellOrder, Share, SubWallet, Wallet};
use crate::domain::errors::DomainError;
use crate::domain::events::{
    SellOrderCancelled, SellOrderFilled, SellOrderModified, SellOrderPlaced,
};
use crate::domain::services::holding_ledger::{debit_oldest_first, transferable_total};
use crate::domain::value_objects::arithmetic::CheckedArithmetic;
use crate::domain::value_objects::{
    Currency, Money, SellOrderId, SellOrderStatus, SellingRules, ShareId, SubWalletType, UserId,
};
use crate::infrastructure::persistence::record_committed;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// One fill made by [`SellQueueService::process_buybacks`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuybackFill {
    /// Order filled.
    pub order_id: SellOrderId,
    /// Seller paid.
    pub user_id: UserId,
    /// Shares bought back.
    pub quantity: u64,
    /// Amount paid to the seller.
    pub proceeds: Money,
    /// Shares the order still waits for.
    pub remaining_quantity: u64,
}

/// Outcome of a buyback run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuybackReport {
    /// Share class processed.
    pub share_id: ShareId,
    /// Currency disbursed.
    pub currency: Currency,
    /// Buyback balance before the run.
    pub budget_before: Money,
    /// Buyback balance after the run.
    pub budget_after: Money,
    /// Fills in queue order.
    pub fills: Vec<BuybackFill>,
    /// Orders cancelled because the seller no longer held the shares.
    pub voided: Vec<SellOrderId>,
}

impl BuybackReport {
    /// Total shares bought back.
    #[must_use]
    pub fn shares_bought(&self) -> u64 {
        self.fills.iter().map(|f| f.quantity).sum()
    }
}

/// Sell queue use cases.
#[derive(Debug, Clone)]
pub struct SellQueueService {
    ledger: Ledger,
    rules: SellingRules,
}

impl SellQueueService {
    /// Creates the service.
    #[must_use]
    pub fn new(ledger: Ledger, rules: SellingRules) -> Self {
        Self { ledger, rules }
    }

    /// Returns the selling rules in use.
    #[must_use]
    pub fn rules(&self) -> SellingRules {
        self.rules
    }

    /// Places a sell order at the back of the queue.
    ///
    /// The user's unlocked holdings, minus what their open orders already
    /// offer, must cover `quantity`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` outside the selling rules,
    /// `ApplicationError::NotFound` for an unknown share and
    /// `DomainError::InsufficientHoldings` when the shares are not free.
    pub async fn place_order(
        &self,
        user_id: UserId,
        share_id: ShareId,
        quantity: u64,
    ) -> ApplicationResult<SellOrder> {
        self.rules.check(quantity)?;
        self.require_share(share_id).await?;

        let _guard = self.ledger.lock_writes().await;
        let lots = self
            .ledger
            .holdings
            .find_by_owner_and_share(&user_id, &share_id)
            .await?;
        let unlocked = transferable_total(&lots)?;
        let committed = self
            .ledger
            .sell_orders
            .find_by_user(&user_id)
            .await?
            .iter()
            .filter(|o| o.is_open() && o.share_id() == share_id)
            .try_fold(0u64, |acc, o| acc.safe_add(o.remaining_quantity()))?;
        let available = unlocked.saturating_sub(committed);
        if quantity > available {
            return Err(DomainError::InsufficientHoldings {
                available,
                requested: quantity,
            }
            .into());
        }

        let position = self.ledger.sell_orders.next_fifo_position().await?;
        let order = SellOrder::new(user_id, share_id, quantity, position)?;
        self.ledger.sell_orders.save(&order).await?;
        record_committed(
            self.ledger.events.as_ref(),
            &SellOrderPlaced::new(order.id(), user_id, share_id, quantity, position),
        )
        .await;
        info!(order_id = %order.id(), user_id = %user_id, quantity, fifo_position = position, "sell order placed");
        Ok(order)
    }

    /// Lists open orders in FIFO order, optionally for one share class.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn queue(&self, share_id: Option<ShareId>) -> ApplicationResult<Vec<SellOrder>> {
        Ok(self.ledger.sell_orders.find_open(share_id.as_ref()).await?)
    }

    /// Lists every order a user placed.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn orders_for_user(&self, user_id: UserId) -> ApplicationResult<Vec<SellOrder>> {
        Ok(self.ledger.sell_orders.find_by_user(&user_id).await?)
    }

    /// Cancels a pending order. Holdings are not touched.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound`, `ApplicationError::Forbidden`
    /// if `user_id` does not own the order, and
    /// `DomainError::InvalidStateTransition` unless it is pending.
    pub async fn cancel(&self, order_id: SellOrderId, user_id: UserId) -> ApplicationResult<SellOrder> {
        let _guard = self.ledger.lock_writes().await;
        let mut order = self.owned_order(order_id, user_id).await?;
        order.cancel()?;
        self.ledger.sell_orders.save(&order).await?;
        record_committed(
            self.ledger.events.as_ref(),
            &SellOrderCancelled::new(order_id, user_id),
        )
        .await;
        info!(order_id = %order_id, "sell order cancelled");
        Ok(order)
    }

    /// Reduces the quantity of a pending order, keeping its queue position.
    ///
    /// # Errors
    ///
    /// As [`SellQueueService::cancel`], plus `DomainError::QuantityIncrease`
    /// for an increase and `DomainError::InvalidQuantity` outside the
    /// selling rules.
    pub async fn modify_quantity(
        &self,
        order_id: SellOrderId,
        user_id: UserId,
        new_quantity: u64,
    ) -> ApplicationResult<SellOrder> {
        self.rules.check(new_quantity)?;
        let _guard = self.ledger.lock_writes().await;
        let mut order = self.owned_order(order_id, user_id).await?;
        let previous = order.quantity();
        order.modify_quantity(new_quantity)?;
        self.ledger.sell_orders.save(&order).await?;
        record_committed(
            self.ledger.events.as_ref(),
            &SellOrderModified::new(order_id, previous, new_quantity),
        )
        .await;
        info!(order_id = %order_id, previous, new_quantity, "sell order modified");
        Ok(order)
    }

    /// Buys back queued shares of `share_id` with the `currency` buyback
    /// sub-wallet, in FIFO order.
    ///
    /// Each order gets `min(remaining, floor(budget / price))` shares at the
    /// current price. The run stops at the first order the budget cannot
    /// buy a single share of. A pending order whose seller no longer holds
    /// the shares is cancelled; such orders do not block the queue.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` for an unknown share and
    /// `DomainError::CurrencyMismatch` if `currency` is not the share's
    /// currency.
    pub async fn process_buybacks(
        &self,
        share_id: ShareId,
        currency: Currency,
    ) -> ApplicationResult<BuybackReport> {
        let share = self.require_share(share_id).await?;
        if share.currency() != &currency {
            return Err(DomainError::CurrencyMismatch {
                expected: share.currency().to_string(),
                actual: currency.to_string(),
            }
            .into());
        }
        let price = share.price_per_share();

        let _guard = self.ledger.lock_writes().await;
        let mut fund = self
            .ledger
            .sub_wallets
            .get(SubWalletType::ShareBuyback, &currency)
            .await?
            .unwrap_or_else(|| SubWallet::new(SubWalletType::ShareBuyback, currency.clone()));
        let budget_before = fund.balance();
        let mut fills = Vec::new();
        let mut voided = Vec::new();

        for mut order in self.ledger.sell_orders.find_open(Some(&share_id)).await? {
            let affordable = fund
                .balance()
                .get()
                .safe_div(price.get())?
                .floor()
                .to_u64()
                .unwrap_or(u64::MAX);
            let wanted = order.remaining_quantity().min(affordable);
            if wanted == 0 {
                debug!(order_id = %order.id(), "buyback budget exhausted");
                break;
            }

            let mut lots = self
                .ledger
                .holdings
                .find_by_owner_and_share(&order.user_id(), &share_id)
                .await?;
            let quantity = wanted.min(transferable_total(&lots)?);
            if quantity == 0 {
                if order.status() != SellOrderStatus::Pending {
                    warn!(order_id = %order.id(), "seller holds no shares, partially filled order skipped");
                    continue;
                }
                order.cancel()?;
                self.ledger.sell_orders.save(&order).await?;
                record_committed(
                    self.ledger.events.as_ref(),
                    &SellOrderCancelled::new(order.id(), order.user_id()),
                )
                .await;
                warn!(order_id = %order.id(), "seller holds no shares, order voided");
                voided.push(order.id());
                continue;
            }

            let proceeds = price.times(quantity)?;
            let touched = debit_oldest_first(&mut lots, quantity)?;
            fund.debit(proceeds)?;
            let mut wallet = self
                .ledger
                .wallets
                .get(&order.user_id(), &currency)
                .await?
                .unwrap_or_else(|| Wallet::new(order.user_id(), currency.clone()));
            wallet.deposit(proceeds)?;
            order.fill(quantity)?;

            let changed: Vec<_> = lots
                .into_iter()
                .filter(|lot| touched.contains(&lot.id()))
                .collect();
            self.ledger.holdings.save_all(&changed).await?;
            self.ledger.wallets.save(&wallet).await?;
            self.ledger.sell_orders.save(&order).await?;
            self.ledger.sub_wallets.save(&fund).await?;
            record_committed(
                self.ledger.events.as_ref(),
                &SellOrderFilled::new(
                    order.id(),
                    order.user_id(),
                    quantity,
                    order.remaining_quantity(),
                    proceeds,
                    currency.clone(),
                ),
            )
            .await;
            info!(order_id = %order.id(), quantity, %proceeds, "sell order filled");

            fills.push(BuybackFill {
                order_id: order.id(),
                user_id: order.user_id(),
                quantity,
                proceeds,
                remaining_quantity: order.remaining_quantity(),
            });
        }

        Ok(BuybackReport {
            share_id,
            currency,
            budget_before,
            budget_after: fund.balance(),
            fills,
            voided,
        })
    }

    async fn require_share(&self, share_id: ShareId) -> ApplicationResult<Share> {
        self.ledger
            .shares
            .get(&share_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Share", share_id.to_string()))
    }

    async fn owned_order(&self, order_id: SellOrderId, user_id: UserId) -> ApplicationResult<SellOrder> {
        let order = self
            .ledger
            .sell_orders
            .get(&order_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("SellOrder", order_id.to_string()))?;
        if order.user_id() != user_id {
            return Err(ApplicationError::forbidden(format!(
                "sell order {order_id} belongs to another user"
            )));
        }
        Ok(order)
    }
}
