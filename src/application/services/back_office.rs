//! # Back-Office Service
//!
//! Administrative entry points that put users, shares and money into the
//! ledger: profile registration, share listing and pricing, issuing lots and
//! crediting wallets.
//!
//! A wallet can be credited directly, or against a gateway payment. In the
//! second case the payment is polled until it settles and the wallet is
//! credited only on success; a payment reference credits at most once.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::ledger::Ledger;
use crate::application::services::payment_polling::{PaymentStatusPoller, PollOutcome};
use crate::domain::entities::{Holding, Profile, Share, Wallet};
use crate::domain::errors::DomainError;
use crate::domain::events::{ProfileRegistered, SharePriced, SharesIssued, WalletDeposited};
use crate::domain::value_objects::{Currency, Money, ShareId, UserId};
use crate::infrastructure::persistence::{RepositoryError, record_committed};
use tracing::{info, instrument, warn};

const DEPOSIT_EVENT: &str = "WalletDeposited";

/// Back-office use cases.
#[derive(Debug, Clone)]
pub struct BackOfficeService {
    ledger: Ledger,
    payments: Option<PaymentStatusPoller>,
}

impl BackOfficeService {
    /// Creates the service. Without a poller, payment-backed deposits are
    /// refused.
    #[must_use]
    pub fn new(ledger: Ledger, payments: Option<PaymentStatusPoller>) -> Self {
        Self { ledger, payments }
    }

    /// Returns true if payment-backed deposits are available.
    #[must_use]
    pub fn confirms_payments(&self) -> bool {
        self.payments.is_some()
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, a missing or malformed
    /// contact, and `RepositoryError::Duplicate` when the email or phone is
    /// already registered.
    pub async fn register_profile(
        &self,
        full_name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> ApplicationResult<Profile> {
        let profile = Profile::new(full_name, email, phone)?;
        self.ledger.profiles.save(&profile).await?;
        record_committed(
            self.ledger.events.as_ref(),
            &ProfileRegistered::new(profile.id()),
        )
        .await;
        info!(user_id = %profile.id(), "profile registered");
        Ok(profile)
    }

    /// Gets a profile.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if it does not exist.
    pub async fn profile(&self, user_id: UserId) -> ApplicationResult<Profile> {
        self.ledger
            .profiles
            .get(&user_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Profile", user_id.to_string()))
    }

    /// Lists a new share class.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name or a zero price.
    pub async fn list_share(
        &self,
        name: &str,
        price_per_share: Money,
        currency: Currency,
    ) -> ApplicationResult<Share> {
        let share = Share::new(name, price_per_share, currency)?;
        self.ledger.shares.save(&share).await?;
        record_committed(
            self.ledger.events.as_ref(),
            &SharePriced::new(share.id(), price_per_share, share.currency().clone()),
        )
        .await;
        info!(share_id = %share.id(), %price_per_share, "share listed");
        Ok(share)
    }

    /// Gets a share class.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if it does not exist.
    pub async fn share(&self, share_id: ShareId) -> ApplicationResult<Share> {
        self.ledger
            .shares
            .get(&share_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Share", share_id.to_string()))
    }

    /// Sets the price used for fees, new lots and buybacks from now on.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` for an unknown share and a
    /// validation error for a zero price.
    pub async fn set_share_price(
        &self,
        share_id: ShareId,
        price_per_share: Money,
    ) -> ApplicationResult<Share> {
        let _guard = self.ledger.lock_writes().await;
        let mut share = self.share(share_id).await?;
        share.set_price(price_per_share)?;
        self.ledger.shares.save(&share).await?;
        record_committed(
            self.ledger.events.as_ref(),
            &SharePriced::new(share_id, price_per_share, share.currency().clone()),
        )
        .await;
        info!(share_id = %share_id, %price_per_share, "share repriced");
        Ok(share)
    }

    /// Issues `quantity` shares to a user as a new lot at the current price.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` for an unknown user or share and
    /// `DomainError::InvalidQuantity` for a zero quantity.
    pub async fn issue_shares(
        &self,
        owner_id: UserId,
        share_id: ShareId,
        quantity: u64,
    ) -> ApplicationResult<Holding> {
        self.profile(owner_id).await?;
        let _guard = self.ledger.lock_writes().await;
        let share = self.share(share_id).await?;
        let lot = Holding::new(owner_id, share_id, quantity, share.price_per_share())?;
        self.ledger.holdings.save(&lot).await?;
        record_committed(
            self.ledger.events.as_ref(),
            &SharesIssued::new(lot.id(), owner_id, share_id, quantity, lot.purchase_price()),
        )
        .await;
        info!(holding_id = %lot.id(), owner_id = %owner_id, quantity, "shares issued");
        Ok(lot)
    }

    /// Lists a user's lots, locked ones included.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn holdings_of(&self, user_id: UserId) -> ApplicationResult<Vec<Holding>> {
        Ok(self.ledger.holdings.find_by_owner(&user_id).await?)
    }

    /// Returns a user's wallet; a missing wallet reads as empty.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn wallet(&self, user_id: UserId, currency: Currency) -> ApplicationResult<Wallet> {
        Ok(self
            .ledger
            .wallets
            .get(&user_id, &currency)
            .await?
            .unwrap_or_else(|| Wallet::new(user_id, currency)))
    }

    /// Credits a wallet directly.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` for an unknown user and a
    /// validation error for a zero amount.
    pub async fn deposit(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Money,
    ) -> ApplicationResult<Wallet> {
        self.check_deposit(user_id, amount, None).await?;
        let _guard = self.ledger.lock_writes().await;
        self.credit(user_id, currency, amount, None).await
    }

    /// Checks everything a deposit needs before any polling or writing.
    ///
    /// # Errors
    ///
    /// As [`BackOfficeService::deposit`]. With a `payment_reference`, also
    /// a validation error when payments are not configured and
    /// `RepositoryError::Duplicate` when the reference was already credited.
    pub async fn check_deposit(
        &self,
        user_id: UserId,
        amount: Money,
        payment_reference: Option<&str>,
    ) -> ApplicationResult<()> {
        if amount.is_zero() {
            return Err(DomainError::ValidationError(
                "deposit amount must be positive".to_string(),
            )
            .into());
        }
        self.profile(user_id).await?;
        if let Some(reference) = payment_reference {
            if reference.trim().is_empty() {
                return Err(ApplicationError::validation("payment reference must not be empty"));
            }
            if self.payments.is_none() {
                return Err(ApplicationError::validation(
                    "payment confirmation is not configured",
                ));
            }
            self.ensure_not_credited(user_id, reference).await?;
        }
        Ok(())
    }

    /// Polls the gateway for `payment_reference` and credits the wallet
    /// once the payment is successful.
    ///
    /// # Errors
    ///
    /// As [`BackOfficeService::check_deposit`], plus
    /// `ApplicationError::PaymentNotConfirmed` when the payment failed or
    /// polling timed out. Nothing is credited in those cases.
    #[instrument(skip_all, fields(user_id = %user_id, payment_reference = %payment_reference))]
    pub async fn deposit_on_payment(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Money,
        payment_reference: &str,
    ) -> ApplicationResult<Wallet> {
        self.check_deposit(user_id, amount, Some(payment_reference))
            .await?;
        let poller = self
            .payments
            .as_ref()
            .ok_or_else(|| ApplicationError::validation("payment confirmation is not configured"))?;

        let outcome = poller.poll(payment_reference).await;
        if outcome != PollOutcome::Successful {
            warn!(%outcome, "payment not confirmed, wallet not credited");
            return Err(ApplicationError::PaymentNotConfirmed {
                reference: payment_reference.to_string(),
                outcome,
            });
        }

        let _guard = self.ledger.lock_writes().await;
        self.ensure_not_credited(user_id, payment_reference).await?;
        self.credit(user_id, currency, amount, Some(payment_reference.to_string()))
            .await
    }

    async fn ensure_not_credited(&self, user_id: UserId, reference: &str) -> ApplicationResult<()> {
        let credited = self
            .ledger
            .events
            .get_events(&user_id.get())
            .await?
            .iter()
            .any(|e| {
                e.event_name == DEPOSIT_EVENT
                    && e.payload["payment_reference"].as_str() == Some(reference)
            });
        if credited {
            return Err(RepositoryError::duplicate("PaymentReference", reference).into());
        }
        Ok(())
    }

    async fn credit(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Money,
        payment_reference: Option<String>,
    ) -> ApplicationResult<Wallet> {
        let mut wallet = self
            .ledger
            .wallets
            .get(&user_id, &currency)
            .await?
            .unwrap_or_else(|| Wallet::new(user_id, currency.clone()));
        wallet.deposit(amount)?;
        self.ledger.wallets.save(&wallet).await?;
        record_committed(
            self.ledger.events.as_ref(),
            &WalletDeposited::new(user_id, amount, currency, payment_reference),
        )
        .await;
        info!(user_id = %user_id, %amount, balance = %wallet.balance(), "wallet credited");
        Ok(wallet)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::payment_polling::{
        PaymentStatus, PaymentStatusSource, PollingConfig,
    };
    use crate::domain::services::holding_ledger::total_quantity;
    use crate::infrastructure::persistence::in_memory::InMemoryEventStore;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    #[derive(Debug)]
    struct FixedStatus(PaymentStatus);

    #[async_trait]
    impl PaymentStatusSource for FixedStatus {
        async fn status(&self, _reference: &str) -> ApplicationResult<PaymentStatus> {
            Ok(self.0)
        }
    }

    fn money(v: i64) -> Money {
        Money::new(Decimal::new(v, 0)).unwrap()
    }

    fn ngn() -> Currency {
        Currency::new("NGN").unwrap()
    }

    fn ledger() -> (Ledger, Arc<InMemoryEventStore>) {
        let events = Arc::new(InMemoryEventStore::new());
        (Ledger::in_memory().with_event_store(events.clone()), events)
    }

    fn with_gateway(ledger: Ledger, status: PaymentStatus) -> BackOfficeService {
        let poller = PaymentStatusPoller::new(Arc::new(FixedStatus(status)), PollingConfig::new(5, 30));
        BackOfficeService::new(ledger, Some(poller))
    }

    mod registry {
        use super::*;

        #[tokio::test]
        async fn profile_contacts_are_unique() {
            let (ledger, events) = ledger();
            let svc = BackOfficeService::new(ledger, None);

            let ada = svc
                .register_profile("Ada Obi", Some("Ada@Example.com"), None)
                .await
                .unwrap();
            assert_eq!(ada.email(), Some("ada@example.com"));

            let err = svc
                .register_profile("Ada Twin", Some("ada@example.com"), None)
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::Repository(ref e) if e.is_duplicate()));
            assert_eq!(events.event_names().await, vec!["ProfileRegistered"]);
        }

        #[tokio::test]
        async fn repricing_keeps_currency() {
            let (ledger, _) = ledger();
            let svc = BackOfficeService::new(ledger, None);
            let share = svc.list_share("Jos Tin", money(20_000), ngn()).await.unwrap();

            let repriced = svc.set_share_price(share.id(), money(25_000)).await.unwrap();
            assert_eq!(repriced.price_per_share(), money(25_000));
            assert_eq!(repriced.currency(), &ngn());
            assert!(svc.set_share_price(share.id(), Money::zero()).await.unwrap_err().is_validation());
        }

        #[tokio::test]
        async fn issued_lot_uses_current_price() {
            let (ledger, _) = ledger();
            let svc = BackOfficeService::new(ledger, None);
            let ada = svc.register_profile("Ada Obi", None, Some("08011111111")).await.unwrap();
            let share = svc.list_share("Jos Tin", money(20_000), ngn()).await.unwrap();

            let lot = svc.issue_shares(ada.id(), share.id(), 40).await.unwrap();
            assert_eq!(lot.purchase_price(), money(20_000));
            svc.issue_shares(ada.id(), share.id(), 10).await.unwrap();
            assert_eq!(total_quantity(&svc.holdings_of(ada.id()).await.unwrap()).unwrap(), 50);
        }

        #[tokio::test]
        async fn issuing_to_unknown_user_fails() {
            let (ledger, _) = ledger();
            let svc = BackOfficeService::new(ledger, None);
            let share = svc.list_share("Jos Tin", money(20_000), ngn()).await.unwrap();

            let err = svc
                .issue_shares(UserId::new_v4(), share.id(), 1)
                .await
                .unwrap_err();
            assert!(err.is_not_found());
        }
    }

    mod deposits {
        use super::*;

        #[tokio::test]
        async fn direct_deposit_accumulates() {
            let (ledger, _) = ledger();
            let svc = BackOfficeService::new(ledger, None);
            let ada = svc.register_profile("Ada Obi", Some("ada@example.com"), None).await.unwrap();

            svc.deposit(ada.id(), ngn(), money(30_000)).await.unwrap();
            let wallet = svc.deposit(ada.id(), ngn(), money(20_000)).await.unwrap();
            assert_eq!(wallet.balance(), money(50_000));
            assert_eq!(svc.wallet(ada.id(), ngn()).await.unwrap().balance(), money(50_000));
        }

        #[tokio::test]
        async fn zero_deposit_rejected() {
            let (ledger, _) = ledger();
            let svc = BackOfficeService::new(ledger, None);
            let ada = svc.register_profile("Ada Obi", Some("ada@example.com"), None).await.unwrap();

            let err = svc.deposit(ada.id(), ngn(), Money::zero()).await.unwrap_err();
            assert!(err.is_validation());
        }

        #[tokio::test]
        async fn payment_deposit_needs_a_gateway() {
            let (ledger, _) = ledger();
            let svc = BackOfficeService::new(ledger, None);
            let ada = svc.register_profile("Ada Obi", Some("ada@example.com"), None).await.unwrap();

            let err = svc
                .deposit_on_payment(ada.id(), ngn(), money(5_000), "PSK-1")
                .await
                .unwrap_err();
            assert!(err.is_validation());
        }

        #[tokio::test(start_paused = true)]
        async fn successful_payment_credits_once() {
            let (ledger, _) = ledger();
            let svc = with_gateway(ledger, PaymentStatus::Successful);
            let ada = svc.register_profile("Ada Obi", Some("ada@example.com"), None).await.unwrap();

            let wallet = svc
                .deposit_on_payment(ada.id(), ngn(), money(5_000), "PSK-1")
                .await
                .unwrap();
            assert_eq!(wallet.balance(), money(5_000));

            let err = svc
                .deposit_on_payment(ada.id(), ngn(), money(5_000), "PSK-1")
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::Repository(ref e) if e.is_duplicate()));
            assert_eq!(svc.wallet(ada.id(), ngn()).await.unwrap().balance(), money(5_000));
        }

        #[tokio::test(start_paused = true)]
        async fn failed_payment_credits_nothing() {
            let (ledger, events) = ledger();
            let svc = with_gateway(ledger, PaymentStatus::Failed);
            let ada = svc.register_profile("Ada Obi", Some("ada@example.com"), None).await.unwrap();

            let err = svc
                .deposit_on_payment(ada.id(), ngn(), money(5_000), "PSK-2")
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                ApplicationError::PaymentNotConfirmed {
                    outcome: PollOutcome::Failed,
                    ..
                }
            ));
            assert!(svc.wallet(ada.id(), ngn()).await.unwrap().balance().is_zero());
            assert_eq!(events.event_names().await, vec!["ProfileRegistered"]);
        }

        #[tokio::test(start_paused = true)]
        async fn pending_payment_times_out() {
            let (ledger, _) = ledger();
            let svc = with_gateway(ledger, PaymentStatus::Pending);
            let ada = svc.register_profile("Ada Obi", Some("ada@example.com"), None).await.unwrap();

            let err = svc
                .deposit_on_payment(ada.id(), ngn(), money(5_000), "PSK-3")
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                ApplicationError::PaymentNotConfirmed {
                    outcome: PollOutcome::TimedOut,
                    ..
                }
            ));
        }
    }
}
