//! # Share Transfer Service
//!
//! Validates and records share transfers between users, then hands them to
//! a [`TransferProcessor`].
//!
//! # Workflow
//!
//! ```text
//! validate quantity -> resolve recipient -> check holdings -> quote fee
//!     -> check wallet -> persist pending -> process
//!                                            ├── Completed -> completed
//!                                            ├── Rejected  -> failed
//!                                            └── Err       -> stays pending
//! ```
//!
//! Nothing is written until every check has passed. A processor error
//! leaves the request pending with no retry and no rollback; resolving it
//! is a manual administrative step.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::ledger::Ledger;
use crate::application::services::transfer_processor::{ProcessOutcome, TransferProcessor};
use crate::domain::entities::TransferRequest;
use crate::domain::errors::DomainError;
use crate::domain::events::{TransferCompleted, TransferFailed, TransferRequested};
use crate::domain::services::holding_ledger::transferable_total;
use crate::domain::services::transfer_fee::FeeSchedule;
use crate::domain::value_objects::{
    Currency, Money, RecipientContact, ShareId, TransferId, UserId,
};
use crate::infrastructure::persistence::record_committed;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Fee a transfer would cost, without creating anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    /// Share class.
    pub share_id: ShareId,
    /// Number of shares.
    pub quantity: u64,
    /// Market value of the shares at the current price.
    pub gross_value: Money,
    /// Fee charged to the sender.
    pub fee: Money,
    /// Currency of both amounts.
    pub currency: Currency,
}

/// Share transfer use cases.
#[derive(Debug, Clone)]
pub struct ShareTransferService {
    ledger: Ledger,
    fee_schedule: FeeSchedule,
    processor: Arc<dyn TransferProcessor>,
}

impl ShareTransferService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        ledger: Ledger,
        fee_schedule: FeeSchedule,
        processor: Arc<dyn TransferProcessor>,
    ) -> Self {
        Self {
            ledger,
            fee_schedule,
            processor,
        }
    }

    /// Returns the fee schedule in use.
    #[must_use]
    pub fn fee_schedule(&self) -> FeeSchedule {
        self.fee_schedule
    }

    /// Requests a transfer of `quantity` shares to the user identified by
    /// `recipient_contact` (an email address or a phone number).
    ///
    /// Returns the request in its final state: `completed`, or `failed`
    /// when the processor rejected it.
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidQuantity` for a zero quantity
    /// - `DomainError::InvalidContact` for a malformed contact
    /// - `ApplicationError::RecipientNotFound` when no profile matches
    /// - `DomainError::SelfTransfer` when the recipient is the sender
    /// - `DomainError::InsufficientHoldings` / `InsufficientBalance`
    /// - `ApplicationError::TransferProcessingFailed` when the processor
    ///   errored; the request is left pending
    #[instrument(skip_all, fields(sender_id = %sender_id, share_id = %share_id, quantity))]
    pub async fn request_transfer(
        &self,
        sender_id: UserId,
        recipient_contact: &str,
        share_id: ShareId,
        quantity: u64,
    ) -> ApplicationResult<TransferRequest> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity(
                "transfer quantity must be positive".to_string(),
            )
            .into());
        }

        let contact = RecipientContact::parse(recipient_contact)?;
        let recipient = self
            .ledger
            .profiles
            .find_by_contact(&contact)
            .await?
            .ok_or_else(|| ApplicationError::RecipientNotFound(contact.to_string()))?;
        if recipient.id() == sender_id {
            return Err(DomainError::SelfTransfer.into());
        }

        let quote = self.quote_fee(share_id, quantity).await?;

        let lots = self
            .ledger
            .holdings
            .find_by_owner_and_share(&sender_id, &share_id)
            .await?;
        let available = transferable_total(&lots)?;
        if available < quantity {
            return Err(DomainError::InsufficientHoldings {
                available,
                requested: quantity,
            }
            .into());
        }

        let balance = self
            .ledger
            .wallets
            .get(&sender_id, &quote.currency)
            .await?
            .map(|w| w.balance())
            .unwrap_or_default();
        if balance < quote.fee {
            return Err(DomainError::InsufficientBalance {
                available: balance.get(),
                required: quote.fee.get(),
            }
            .into());
        }

        let mut request = TransferRequest::new(
            sender_id,
            recipient.id(),
            share_id,
            quantity,
            quote.fee,
            quote.currency.clone(),
        )?;
        self.ledger.transfers.save(&request).await?;
        record_committed(
            self.ledger.events.as_ref(),
            &TransferRequested::new(
                request.id(),
                sender_id,
                recipient.id(),
                share_id,
                quantity,
                quote.fee,
                quote.currency,
            ),
        )
        .await;
        info!(transfer_id = %request.id(), recipient_id = %recipient.id(), quantity, "transfer requested");

        match self.processor.process(&request).await {
            Ok(ProcessOutcome::Completed) => {
                request.mark_completed()?;
                self.ledger.transfers.save(&request).await?;
                record_committed(
                    self.ledger.events.as_ref(),
                    &TransferCompleted::new(request.id()),
                )
                .await;
                info!(transfer_id = %request.id(), "transfer completed");
                Ok(request)
            }
            Ok(ProcessOutcome::Rejected { reason }) => {
                request.mark_failed(reason.clone())?;
                self.ledger.transfers.save(&request).await?;
                record_committed(
                    self.ledger.events.as_ref(),
                    &TransferFailed::new(request.id(), reason.clone()),
                )
                .await;
                warn!(transfer_id = %request.id(), %reason, "transfer rejected by processor");
                Ok(request)
            }
            Err(e) => {
                error!(transfer_id = %request.id(), error = %e, "transfer processor failed, request left pending");
                Err(ApplicationError::processing_failed(
                    request.id(),
                    e.to_string(),
                ))
            }
        }
    }

    /// Quotes the fee for moving `quantity` shares of `share_id`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` for an unknown share and
    /// `DomainError::InvalidQuantity` for a zero quantity.
    pub async fn quote_fee(&self, share_id: ShareId, quantity: u64) -> ApplicationResult<FeeQuote> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity(
                "transfer quantity must be positive".to_string(),
            )
            .into());
        }
        let share = self
            .ledger
            .shares
            .get(&share_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Share", share_id.to_string()))?;

        Ok(FeeQuote {
            share_id,
            quantity,
            gross_value: share.value_of(quantity)?,
            fee: self.fee_schedule.fee_for(quantity, share.price_per_share())?,
            currency: share.currency().clone(),
        })
    }

    /// Gets a transfer request by id.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if it does not exist.
    pub async fn get_transfer(&self, id: TransferId) -> ApplicationResult<TransferRequest> {
        self.ledger
            .transfers
            .get(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("TransferRequest", id.to_string()))
    }

    /// Lists the transfers a user sent, newest first.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn transfers_for_user(&self, user_id: UserId) -> ApplicationResult<Vec<TransferRequest>> {
        Ok(self.ledger.transfers.find_by_sender(&user_id).await?)
    }

    /// Lists requests still waiting for a processor outcome, oldest first.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn pending_transfers(&self) -> ApplicationResult<Vec<TransferRequest>> {
        Ok(self.ledger.transfers.find_pending().await?)
    }
}
