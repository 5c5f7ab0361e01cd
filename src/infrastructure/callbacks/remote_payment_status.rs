//! # Remote Payment Status
//!
//! [`PaymentStatusSource`] that asks a serverless endpoint for the status of
//! a gateway payment.
//!
//! `GET {base_url}/{reference}` answers `{"status": "pending"}`,
//! `"successful"` or `"failed"`. The endpoint owns the gateway specifics.

use crate::application::error::ApplicationResult;
use crate::application::services::payment_polling::{PaymentStatus, PaymentStatusSource};
use crate::infrastructure::callbacks::error::{CallbackError, CallbackResult};
use crate::infrastructure::callbacks::http_client::HttpClient;
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Answer from the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    /// Current gateway status.
    pub status: PaymentStatus,
}

/// Payment status lookups over HTTP.
#[derive(Debug, Clone)]
pub struct RemotePaymentStatusSource {
    client: HttpClient,
    base_url: Url,
}

impl RemotePaymentStatusSource {
    /// Creates a source querying below `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `CallbackError::InvalidRequest` if `base_url` is not an
    /// absolute http(s) URL.
    pub fn new(client: HttpClient, base_url: &str) -> CallbackResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CallbackError::invalid_request(format!("payment status url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CallbackError::invalid_request(
                "payment status url cannot take a path",
            ));
        }
        Ok(Self { client, base_url })
    }

    /// Returns the lookup URL for `reference`, percent-encoded.
    #[must_use]
    pub fn status_url(&self, reference: &str) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(reference);
        }
        url.into()
    }
}

#[async_trait]
impl PaymentStatusSource for RemotePaymentStatusSource {
    #[instrument(skip(self))]
    async fn status(&self, reference: &str) -> ApplicationResult<PaymentStatus> {
        let answer: PaymentStatusResponse = self.client.get(&self.status_url(reference)).await?;
        debug!(status = %answer.status, "payment status answered");
        Ok(answer.status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer) -> RemotePaymentStatusSource {
        let client = HttpClient::new(2_000, Some("service-key")).unwrap();
        RemotePaymentStatusSource::new(client, &format!("{}/payments/", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn reads_gateway_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/payments/PSK-1001"))
            .and(header("authorization", "Bearer service-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "successful"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let status = source(&server).status("PSK-1001").await.unwrap();
        assert_eq!(status, PaymentStatus::Successful);
    }

    #[tokio::test]
    async fn unknown_status_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "abandoned"})),
            )
            .mount(&server)
            .await;

        let err = source(&server).status("PSK-1002").await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Callback(CallbackError::Protocol { .. })
        ));
    }

    #[test]
    fn reference_is_encoded_as_one_segment() {
        let client = HttpClient::new(1_000, None).unwrap();
        let source = RemotePaymentStatusSource::new(client, "https://fn.example.com/payments").unwrap();
        assert_eq!(
            source.status_url("ref/with space"),
            "https://fn.example.com/payments/ref%2Fwith%20space"
        );
    }

    #[test]
    fn relative_url_rejected() {
        let client = HttpClient::new(1_000, None).unwrap();
        assert!(RemotePaymentStatusSource::new(client, "payments").is_err());
    }
}
