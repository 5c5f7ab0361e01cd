//! # Transfer Processor
//!
//! The server-side step that applies a pending transfer to the ledger.
//!
//! A processor answers in one of three ways, and the caller treats each
//! differently:
//!
//! - `Ok(ProcessOutcome::Completed)`: the ledger was updated
//! - `Ok(ProcessOutcome::Rejected { .. })`: nothing changed, the request fails
//! - `Err(_)`: the outcome is unknown, the request stays pending

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::ledger::Ledger;
use crate::domain::entities::{Holding, TransferRequest, Wallet};
use crate::domain::errors::DomainError;
use crate::domain::services::holding_ledger::{debit_oldest_first, transferable_total};
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info};

/// What the processor did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Holdings and fee were applied.
    Completed,
    /// The processor refused the transfer; no ledger row changed.
    Rejected {
        /// Reason reported back to the sender.
        reason: String,
    },
}

impl ProcessOutcome {
    /// Creates a rejection.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Returns true if the transfer was applied.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Applies pending transfer requests.
#[async_trait]
pub trait TransferProcessor: Send + Sync + fmt::Debug {
    /// Processes a pending request.
    ///
    /// # Errors
    ///
    /// Returns an error when the outcome is unknown (transport failure,
    /// repository failure). The caller leaves the request pending.
    async fn process(&self, request: &TransferRequest) -> ApplicationResult<ProcessOutcome>;
}

/// Processor that applies transfers directly against the repositories.
///
/// Debits the sender's unlocked lots oldest first, credits the recipient
/// with a new lot at the current share price and takes the fee from the
/// sender's wallet. Holdings and the wallet are re-checked under the ledger
/// write lock before anything is written.
#[derive(Debug, Clone)]
pub struct LedgerTransferProcessor {
    ledger: Ledger,
}

impl LedgerTransferProcessor {
    /// Creates a processor over the given ledger.
    #[must_use]
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl TransferProcessor for LedgerTransferProcessor {
    async fn process(&self, request: &TransferRequest) -> ApplicationResult<ProcessOutcome> {
        let _guard = self.ledger.lock_writes().await;

        let share = self
            .ledger
            .shares
            .get(&request.share_id())
            .await?
            .ok_or_else(|| ApplicationError::not_found("Share", request.share_id().to_string()))?;

        let mut sender_lots = self
            .ledger
            .holdings
            .find_by_owner_and_share(&request.sender_id(), &request.share_id())
            .await?;
        let mut wallet = self
            .ledger
            .wallets
            .get(&request.sender_id(), request.fee_currency())
            .await?
            .unwrap_or_else(|| Wallet::new(request.sender_id(), request.fee_currency().clone()));

        let available = transferable_total(&sender_lots)?;
        if available < request.quantity() {
            let reason = DomainError::InsufficientHoldings {
                available,
                requested: request.quantity(),
            };
            return Ok(ProcessOutcome::rejected(reason.to_string()));
        }
        if let Err(reason) = wallet.withdraw(request.fee()) {
            return Ok(ProcessOutcome::rejected(reason.to_string()));
        }

        let touched = debit_oldest_first(&mut sender_lots, request.quantity())?;
        let received = Holding::new(
            request.recipient_id(),
            request.share_id(),
            request.quantity(),
            share.price_per_share(),
        )?;

        let mut changed: Vec<Holding> = sender_lots
            .into_iter()
            .filter(|lot| touched.contains(&lot.id()))
            .collect();
        changed.push(received);

        self.ledger.holdings.save_all(&changed).await?;
        self.ledger.wallets.save(&wallet).await?;

        debug!(
            transfer_id = %request.id(),
            lots_debited = touched.len(),
            "ledger updated"
        );
        info!(
            transfer_id = %request.id(),
            quantity = request.quantity(),
            fee = %request.fee(),
            "transfer applied"
        );
        Ok(ProcessOutcome::Completed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::Share;
    use crate::domain::services::holding_ledger::total_quantity;
    use crate::domain::value_objects::{Currency, Money, UserId};
    use rust_decimal::Decimal;

    struct Fixture {
        ledger: Ledger,
        share: Share,
        sender: UserId,
        recipient: UserId,
    }

    async fn fixture(sender_shares: u64, wallet_balance: i64) -> Fixture {
        let ledger = Ledger::in_memory();
        let ngn = Currency::new("NGN").unwrap();
        let share = Share::new(
            "Jos Tin",
            Money::new(Decimal::new(20_000, 0)).unwrap(),
            ngn.clone(),
        )
        .unwrap();
        ledger.shares.save(&share).await.unwrap();

        let sender = UserId::new_v4();
        let recipient = UserId::new_v4();
        ledger
            .holdings
            .save(&Holding::new(sender, share.id(), sender_shares, share.price_per_share()).unwrap())
            .await
            .unwrap();
        ledger
            .wallets
            .save(&Wallet::with_balance(
                sender,
                ngn,
                Money::new(Decimal::new(wallet_balance, 0)).unwrap(),
            ))
            .await
            .unwrap();
        Fixture {
            ledger,
            share,
            sender,
            recipient,
        }
    }

    fn request(f: &Fixture, quantity: u64, fee: i64) -> TransferRequest {
        TransferRequest::new(
            f.sender,
            f.recipient,
            f.share.id(),
            quantity,
            Money::new(Decimal::new(fee, 0)).unwrap(),
            f.share.currency().clone(),
        )
        .unwrap()
    }

    async fn shares_of(f: &Fixture, user: UserId) -> u64 {
        let lots = f
            .ledger
            .holdings
            .find_by_owner_and_share(&user, &f.share.id())
            .await
            .unwrap();
        total_quantity(&lots).unwrap()
    }

    #[tokio::test]
    async fn moves_shares_and_charges_fee() {
        let f = fixture(100, 50_000).await;
        let processor = LedgerTransferProcessor::new(f.ledger.clone());

        let outcome = processor.process(&request(&f, 30, 13_000)).await.unwrap();

        assert!(outcome.is_completed());
        assert_eq!(shares_of(&f, f.sender).await, 70);
        assert_eq!(shares_of(&f, f.recipient).await, 30);
        let wallet = f
            .ledger
            .wallets
            .get(&f.sender, f.share.currency())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(wallet.balance().get(), Decimal::new(37_000, 0));
    }

    #[tokio::test]
    async fn rejects_when_holdings_shrank() {
        let f = fixture(10, 50_000).await;
        let processor = LedgerTransferProcessor::new(f.ledger.clone());

        let outcome = processor.process(&request(&f, 30, 0)).await.unwrap();

        assert!(matches!(outcome, ProcessOutcome::Rejected { .. }));
        assert_eq!(shares_of(&f, f.sender).await, 10);
        assert_eq!(shares_of(&f, f.recipient).await, 0);
    }

    #[tokio::test]
    async fn rejects_when_wallet_cannot_cover_fee() {
        let f = fixture(100, 100).await;
        let processor = LedgerTransferProcessor::new(f.ledger.clone());

        let outcome = processor.process(&request(&f, 30, 13_000)).await.unwrap();

        assert!(!outcome.is_completed());
        assert_eq!(shares_of(&f, f.sender).await, 100);
    }

    #[tokio::test]
    async fn missing_share_is_an_error() {
        let f = fixture(100, 100).await;
        let processor = LedgerTransferProcessor::new(Ledger::in_memory());

        let err = processor.process(&request(&f, 1, 0)).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
