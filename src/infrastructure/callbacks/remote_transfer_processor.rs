//! # Remote Transfer Processor
//!
//! [`TransferProcessor`] that hands pending transfers to a serverless
//! endpoint.
//!
//! The endpoint receives the request as JSON and answers
//! `{"success": bool, "error": "..."}`. A `success: false` answer is a
//! rejection; a transport or HTTP failure leaves the outcome unknown.

use crate::application::error::ApplicationResult;
use crate::application::services::transfer_processor::{ProcessOutcome, TransferProcessor};
use crate::domain::entities::TransferRequest;
use crate::domain::value_objects::{Currency, Money, ShareId, TransferId, UserId};
use crate::infrastructure::callbacks::http_client::HttpClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Body posted to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCallbackRequest {
    /// Request being processed.
    pub transfer_id: TransferId,
    /// Sender.
    pub sender_id: UserId,
    /// Recipient.
    pub recipient_id: UserId,
    /// Share class.
    pub share_id: ShareId,
    /// Shares to move.
    pub quantity: u64,
    /// Fee charged to the sender.
    pub fee: Money,
    /// Currency of the fee.
    pub fee_currency: Currency,
}

impl From<&TransferRequest> for TransferCallbackRequest {
    fn from(request: &TransferRequest) -> Self {
        Self {
            transfer_id: request.id(),
            sender_id: request.sender_id(),
            recipient_id: request.recipient_id(),
            share_id: request.share_id(),
            quantity: request.quantity(),
            fee: request.fee(),
            fee_currency: request.fee_currency().clone(),
        }
    }
}

/// Answer from the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCallbackResponse {
    /// Whether the transfer was applied.
    pub success: bool,
    /// Reason for a refusal.
    #[serde(default)]
    pub error: Option<String>,
}

/// Processor backed by a serverless endpoint.
#[derive(Debug, Clone)]
pub struct RemoteTransferProcessor {
    client: HttpClient,
    endpoint: String,
}

impl RemoteTransferProcessor {
    /// Creates a processor posting to `endpoint`.
    #[must_use]
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TransferProcessor for RemoteTransferProcessor {
    #[instrument(skip_all, fields(transfer_id = %request.id()))]
    async fn process(&self, request: &TransferRequest) -> ApplicationResult<ProcessOutcome> {
        let body = TransferCallbackRequest::from(request);
        let answer: TransferCallbackResponse = self.client.post(&self.endpoint, &body).await?;
        debug!(success = answer.success, "transfer callback answered");

        if answer.success {
            Ok(ProcessOutcome::Completed)
        } else {
            Ok(ProcessOutcome::rejected(
                answer
                    .error
                    .unwrap_or_else(|| "transfer rejected by processor".to_string()),
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;
    use crate::infrastructure::callbacks::error::CallbackError;
    use rust_decimal::Decimal;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> TransferRequest {
        TransferRequest::new(
            UserId::new_v4(),
            UserId::new_v4(),
            ShareId::new_v4(),
            30,
            Money::new(Decimal::new(13_000, 0)).unwrap(),
            Currency::new("NGN").unwrap(),
        )
        .unwrap()
    }

    async fn processor(server: &MockServer) -> RemoteTransferProcessor {
        let client = HttpClient::new(2_000, Some("service-key")).unwrap();
        RemoteTransferProcessor::new(client, format!("{}/process-transfer", server.uri()))
    }

    #[tokio::test]
    async fn success_completes() {
        let server = MockServer::start().await;
        let req = request();
        Mock::given(method("POST"))
            .and(path("/process-transfer"))
            .and(body_partial_json(serde_json::json!({
                "transfer_id": req.id(),
                "quantity": 30
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = processor(&server).await.process(&req).await.unwrap();
        assert!(outcome.is_completed());
    }

    #[tokio::test]
    async fn refusal_rejects_with_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"success": false, "error": "Insufficient shares"}),
            ))
            .mount(&server)
            .await;

        let outcome = processor(&server).await.process(&request()).await.unwrap();
        assert_eq!(outcome, ProcessOutcome::rejected("Insufficient shares"));
    }

    #[tokio::test]
    async fn refusal_without_reason_gets_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": false})))
            .mount(&server)
            .await;

        let outcome = processor(&server).await.process(&request()).await.unwrap();
        assert!(matches!(outcome, ProcessOutcome::Rejected { .. }));
    }

    #[tokio::test]
    async fn server_error_is_unknown_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = processor(&server).await.process(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Callback(CallbackError::Connection { .. })
        ));
        assert!(err.is_retryable());
    }
}
