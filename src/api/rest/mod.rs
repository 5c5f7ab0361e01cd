//! # REST API
//!
//! JSON endpoints over the ledger workflows, built with axum.
//!
//! # Endpoints
//!
//! ## Transfers
//! - `POST /api/v1/transfers` - Request a share transfer
//! - `GET /api/v1/transfers/fee?share_id&quantity` - Quote the transfer fee
//! - `GET /api/v1/transfers/{id}` - Get a transfer request
//! - `GET /api/v1/users/{id}/transfers` - Transfers sent by a user
//!
//! ## Sell queue
//! - `POST /api/v1/sell-orders` - Place a sell order
//! - `GET /api/v1/sell-orders?share_id` - Open orders in FIFO order
//! - `PATCH /api/v1/sell-orders/{id}` - Reduce a pending order
//! - `DELETE /api/v1/sell-orders/{id}?user_id` - Cancel a pending order
//! - `POST /api/v1/sell-orders/process` - Run buybacks
//!
//! ## Allocation
//! - `GET /api/v1/allocation-rules` - Rule history, newest first
//! - `POST /api/v1/allocation-rules` - Save a new rule
//! - `POST /api/v1/allocations` - Split a share-sale amount
//! - `GET /api/v1/sub-wallets` - Sub-wallet balances
//!
//! ## Back office
//! - `POST /api/v1/profiles` - Register a user
//! - `GET /api/v1/profiles/{id}` - Get a profile
//! - `POST /api/v1/shares` - List a share class
//! - `GET /api/v1/shares/{id}` - Get a share class
//! - `PUT /api/v1/shares/{id}/price` - Reprice a share class
//! - `POST /api/v1/holdings` - Issue a lot to a user
//! - `GET /api/v1/users/{id}/holdings` - Lots owned by a user
//! - `GET /api/v1/users/{id}/wallets/{currency}` - Wallet balance
//! - `POST /api/v1/wallets/deposits` - Credit a wallet, optionally once a payment settles
//!
//! ## Health
//! - `GET /api/v1/health`
//!
//! # Usage
//!
//! ```ignore
//! use mineshare_ledger::api::rest::{AppState, create_router};
//! use std::sync::Arc;
//!
//! let router = create_router(Arc::new(AppState { transfers, allocations, sell_queue, back_office }));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod error;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use handlers::{AppState, HealthResponse};
pub use routes::create_router;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::Ledger;
    use crate::application::services::{
        BackOfficeService, FundAllocationService, LedgerTransferProcessor, PaymentStatusPoller,
        SellQueueService, ShareTransferService,
    };
    use crate::domain::entities::{Holding, Profile, Share, Wallet};
    use crate::domain::services::FeeSchedule;
    use crate::domain::value_objects::{Currency, Money, Percentage, SellingRules};
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Fixture {
        router: Router,
        share: Share,
        sender: Profile,
    }

    fn money(v: i64) -> Money {
        Money::new(Decimal::new(v, 0)).unwrap()
    }

    async fn fixture() -> Fixture {
        let ledger = Ledger::in_memory();
        let ngn = Currency::new("NGN").unwrap();
        let share = Share::new("Jos Tin", money(20_000), ngn.clone()).unwrap();
        let sender = Profile::new("Ada Obi", Some("ada@example.com"), None).unwrap();
        let recipient = Profile::new("Musa Bello", Some("musa@example.com"), None).unwrap();
        ledger.shares.save(&share).await.unwrap();
        ledger.profiles.save(&sender).await.unwrap();
        ledger.profiles.save(&recipient).await.unwrap();
        ledger
            .holdings
            .save(&Holding::new(sender.id(), share.id(), 100, money(20_000)).unwrap())
            .await
            .unwrap();
        ledger
            .wallets
            .save(&Wallet::with_balance(sender.id(), ngn, money(50_000)))
            .await
            .unwrap();

        Fixture {
            router: app(ledger, None),
            share,
            sender,
        }
    }

    fn app(ledger: Ledger, payments: Option<PaymentStatusPoller>) -> Router {
        let fees = FeeSchedule::new(Percentage::new(Decimal::new(2, 0)).unwrap(), money(1_000));
        let state = AppState {
            transfers: ShareTransferService::new(
                ledger.clone(),
                fees,
                Arc::new(LedgerTransferProcessor::new(ledger.clone())),
            ),
            allocations: FundAllocationService::new(ledger.clone()),
            sell_queue: SellQueueService::new(ledger.clone(), SellingRules::default()),
            back_office: BackOfficeService::new(ledger, payments),
        };
        create_router(Arc::new(state))
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health() {
        let f = fixture().await;
        let (status, body) = send(&f.router, "GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    mod transfers {
        use super::*;

        #[tokio::test]
        async fn completed_transfer_is_created() {
            let f = fixture().await;
            let (status, body) = send(
                &f.router,
                "POST",
                "/api/v1/transfers",
                Some(json!({
                    "sender_id": f.sender.id(),
                    "recipient_contact": "MUSA@example.com",
                    "share_id": f.share.id(),
                    "quantity": 30
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["status"], "completed");

            let uri = format!("/api/v1/transfers/{}", body["id"].as_str().unwrap());
            let (status, fetched) = send(&f.router, "GET", &uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(fetched["id"], body["id"]);
        }

        #[tokio::test]
        async fn unknown_recipient_is_404() {
            let f = fixture().await;
            let (status, body) = send(
                &f.router,
                "POST",
                "/api/v1/transfers",
                Some(json!({
                    "sender_id": f.sender.id(),
                    "recipient_contact": "nobody@example.com",
                    "share_id": f.share.id(),
                    "quantity": 30
                })),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["code"], "NOT_FOUND");
        }

        #[tokio::test]
        async fn fee_quote() {
            let f = fixture().await;
            let uri = format!("/api/v1/transfers/fee?share_id={}&quantity=30", f.share.id());
            let (status, body) = send(&f.router, "GET", &uri, None).await;
            assert_eq!(status, StatusCode::OK);
            let fee: Decimal = serde_json::from_value(body["fee"].clone()).unwrap();
            assert_eq!(fee, Decimal::new(13_000, 0));
        }
    }

    mod sell_orders {
        use super::*;

        async fn place(f: &Fixture, quantity: u64) -> (StatusCode, Value) {
            send(
                &f.router,
                "POST",
                "/api/v1/sell-orders",
                Some(json!({
                    "user_id": f.sender.id(),
                    "share_id": f.share.id(),
                    "quantity": quantity
                })),
            )
            .await
        }

        #[tokio::test]
        async fn place_list_and_cancel() {
            let f = fixture().await;
            let (status, order) = place(&f, 10).await;
            assert_eq!(status, StatusCode::CREATED);

            let (_, queue) = send(&f.router, "GET", "/api/v1/sell-orders", None).await;
            assert_eq!(queue.as_array().map(Vec::len), Some(1));

            let uri = format!(
                "/api/v1/sell-orders/{}?user_id={}",
                order["id"].as_str().unwrap(),
                f.sender.id()
            );
            let (status, cancelled) = send(&f.router, "DELETE", &uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(cancelled["status"], "cancelled");
        }

        #[tokio::test]
        async fn stranger_cannot_modify() {
            let f = fixture().await;
            let (_, order) = place(&f, 10).await;
            let uri = format!("/api/v1/sell-orders/{}", order["id"].as_str().unwrap());
            let (status, body) = send(
                &f.router,
                "PATCH",
                &uri,
                Some(json!({ "user_id": uuid::Uuid::new_v4(), "quantity": 5 })),
            )
            .await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body["code"], "FORBIDDEN");
        }

        #[tokio::test]
        async fn oversell_is_422() {
            let f = fixture().await;
            let (status, body) = place(&f, 101).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body["code"], "BUSINESS_RULE_VIOLATION");
        }
    }

    mod allocation {
        use super::*;

        #[tokio::test]
        async fn rule_must_sum_to_100() {
            let f = fixture().await;
            let (status, _) = send(
                &f.router,
                "POST",
                "/api/v1/allocation-rules",
                Some(json!({ "project_funding": "60", "admin_fund": "25", "buyback": "14" })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);

            let (status, _) = send(
                &f.router,
                "POST",
                "/api/v1/allocation-rules",
                Some(json!({ "project_funding": "60", "admin_fund": "25", "buyback": "15" })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        #[tokio::test]
        async fn allocate_without_rule_is_404() {
            let f = fixture().await;
            let (status, _) = send(
                &f.router,
                "POST",
                "/api/v1/allocations",
                Some(json!({ "amount": "1000", "currency": "NGN" })),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        #[tokio::test]
        async fn allocate_credits_sub_wallets() {
            let f = fixture().await;
            send(
                &f.router,
                "POST",
                "/api/v1/allocation-rules",
                Some(json!({ "project_funding": "60", "admin_fund": "25", "buyback": "15" })),
            )
            .await;
            let (status, _) = send(
                &f.router,
                "POST",
                "/api/v1/allocations",
                Some(json!({ "amount": "1000000", "currency": "NGN" })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);

            let (_, wallets) = send(&f.router, "GET", "/api/v1/sub-wallets", None).await;
            assert_eq!(wallets.as_array().map(Vec::len), Some(3));
        }
    }

    mod back_office {
        use super::*;
        use crate::application::error::ApplicationResult;
        use crate::application::services::{PaymentStatus, PaymentStatusSource, PollingConfig};
        use async_trait::async_trait;

        #[derive(Debug)]
        struct Settled;

        #[async_trait]
        impl PaymentStatusSource for Settled {
            async fn status(&self, _reference: &str) -> ApplicationResult<PaymentStatus> {
                Ok(PaymentStatus::Successful)
            }
        }

        async fn post(router: &Router, uri: &str, body: Value) -> Value {
            let (status, value) = send(router, "POST", uri, Some(body)).await;
            assert_eq!(status, StatusCode::CREATED, "{uri}: {value}");
            value
        }

        #[tokio::test]
        async fn seeded_ledger_supports_transfer_and_sale() {
            let router = app(Ledger::in_memory(), None);

            let ada = post(
                &router,
                "/api/v1/profiles",
                json!({ "full_name": "Ada Obi", "email": "ada@example.com" }),
            )
            .await;
            post(
                &router,
                "/api/v1/profiles",
                json!({ "full_name": "Musa Bello", "phone": "+2348031234567" }),
            )
            .await;
            let share = post(
                &router,
                "/api/v1/shares",
                json!({ "name": "Jos Tin", "price_per_share": "20000", "currency": "NGN" }),
            )
            .await;
            let lot = post(
                &router,
                "/api/v1/holdings",
                json!({ "owner_id": ada["id"], "share_id": share["id"], "quantity": 100 }),
            )
            .await;
            assert_eq!(lot["quantity"], 100);
            post(
                &router,
                "/api/v1/wallets/deposits",
                json!({ "user_id": ada["id"], "currency": "NGN", "amount": "50000" }),
            )
            .await;

            let transfer = post(
                &router,
                "/api/v1/transfers",
                json!({
                    "sender_id": ada["id"],
                    "recipient_contact": "+2348031234567",
                    "share_id": share["id"],
                    "quantity": 30
                }),
            )
            .await;
            assert_eq!(transfer["status"], "completed");

            let order = post(
                &router,
                "/api/v1/sell-orders",
                json!({ "user_id": ada["id"], "share_id": share["id"], "quantity": 70 }),
            )
            .await;
            assert_eq!(order["status"], "pending");

            let uri = format!("/api/v1/users/{}/wallets/NGN", ada["id"].as_str().unwrap());
            let (status, wallet) = send(&router, "GET", &uri, None).await;
            assert_eq!(status, StatusCode::OK);
            let balance: Decimal = serde_json::from_value(wallet["balance"].clone()).unwrap();
            assert_eq!(balance, Decimal::new(37_000, 0));
        }

        #[tokio::test]
        async fn reprice_and_read_share() {
            let router = app(Ledger::in_memory(), None);
            let share = post(
                &router,
                "/api/v1/shares",
                json!({ "name": "Jos Tin", "price_per_share": "20000", "currency": "NGN" }),
            )
            .await;
            let uri = format!("/api/v1/shares/{}/price", share["id"].as_str().unwrap());
            let (status, _) = send(&router, "PUT", &uri, Some(json!({ "price_per_share": "25000" }))).await;
            assert_eq!(status, StatusCode::OK);

            let uri = format!("/api/v1/shares/{}", share["id"].as_str().unwrap());
            let (_, fetched) = send(&router, "GET", &uri, None).await;
            let price: Decimal = serde_json::from_value(fetched["price_per_share"].clone()).unwrap();
            assert_eq!(price, Decimal::new(25_000, 0));
        }

        #[tokio::test]
        async fn duplicate_contact_is_409() {
            let router = app(Ledger::in_memory(), None);
            let body = json!({ "full_name": "Ada Obi", "email": "ada@example.com" });
            post(&router, "/api/v1/profiles", body.clone()).await;
            let (status, _) = send(&router, "POST", "/api/v1/profiles", Some(body)).await;
            assert_eq!(status, StatusCode::CONFLICT);
        }

        #[tokio::test]
        async fn payment_deposit_without_gateway_is_400() {
            let router = app(Ledger::in_memory(), None);
            let ada = post(
                &router,
                "/api/v1/profiles",
                json!({ "full_name": "Ada Obi", "email": "ada@example.com" }),
            )
            .await;
            let (status, _) = send(
                &router,
                "POST",
                "/api/v1/wallets/deposits",
                Some(json!({
                    "user_id": ada["id"],
                    "currency": "NGN",
                    "amount": "5000",
                    "payment_reference": "PSK-77"
                })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        #[tokio::test]
        async fn payment_deposit_is_credited_after_settlement() {
            let poller = PaymentStatusPoller::new(Arc::new(Settled), PollingConfig::new(1, 30));
            let router = app(Ledger::in_memory(), Some(poller));
            let ada = post(
                &router,
                "/api/v1/profiles",
                json!({ "full_name": "Ada Obi", "email": "ada@example.com" }),
            )
            .await;
            let (status, accepted) = send(
                &router,
                "POST",
                "/api/v1/wallets/deposits",
                Some(json!({
                    "user_id": ada["id"],
                    "currency": "NGN",
                    "amount": "5000",
                    "payment_reference": "PSK-77"
                })),
            )
            .await;
            assert_eq!(status, StatusCode::ACCEPTED);
            assert_eq!(accepted["status"], "awaiting_payment");

            let uri = format!("/api/v1/users/{}/wallets/NGN", ada["id"].as_str().unwrap());
            let mut balance = Decimal::ZERO;
            for _ in 0..50 {
                let (_, wallet) = send(&router, "GET", &uri, None).await;
                balance = serde_json::from_value(wallet["balance"].clone()).unwrap();
                if !balance.is_zero() {
                    break;
                }
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
            assert_eq!(balance, Decimal::new(5_000, 0));
        }
    }
}
