//! # HTTP Client
//!
//! JSON-over-HTTP client used to invoke serverless callback endpoints.
//!
//! # Examples
//!
//! ```ignore
//! use mineshare_ledger::infrastructure::callbacks::http_client::HttpClient;
//!
//! let client = HttpClient::new(10_000, Some("service-key"))?;
//! let answer: Answer = client.post("https://functions.example.com/process", &body).await?;
//! ```

use crate::infrastructure::callbacks::error::{CallbackError, CallbackResult};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper for callback endpoints.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a client with the given timeout and optional bearer token.
    ///
    /// # Errors
    ///
    /// Returns `CallbackError::Internal` if the token is not a valid header
    /// value or the client cannot be built.
    pub fn new(timeout_ms: u64, bearer_token: Option<&str>) -> CallbackResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| CallbackError::internal(format!("Invalid token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| CallbackError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a POST request with a JSON body and deserializes the JSON
    /// response.
    ///
    /// # Errors
    ///
    /// Returns `CallbackError::Timeout` or `CallbackError::Connection` if
    /// the request fails, and a status-specific error for non-2xx answers.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> CallbackResult<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::post`].
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> CallbackResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> CallbackResult<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| CallbackError::protocol(format!("Failed to parse response: {e}")))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(self.map_status_error(status, &error_body))
        }
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> CallbackError {
        if error.is_timeout() {
            CallbackError::timeout(format!("Request timed out after {}ms", self.timeout_ms))
        } else if error.is_connect() {
            CallbackError::connection(format!("Connection failed: {error}"))
        } else {
            CallbackError::connection(format!("HTTP request failed: {error}"))
        }
    }

    fn map_status_error(&self, status: StatusCode, body: &str) -> CallbackError {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                CallbackError::invalid_request(format!("Bad request: {body}"))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                CallbackError::authentication(format!("Authentication failed: {body}"))
            }
            StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => {
                CallbackError::connection(format!("Server error ({status}): {body}"))
            }
            _ => CallbackError::protocol(format!("HTTP error ({status}): {body}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pong {
        ok: bool,
    }

    #[test]
    fn new_client() {
        let client = HttpClient::new(5000, None).unwrap();
        assert_eq!(client.timeout_ms(), 5000);
    }

    #[test]
    fn rejects_token_with_newline() {
        let err = HttpClient::new(5000, Some("bad\ntoken")).unwrap_err();
        assert!(matches!(err, CallbackError::Internal { .. }));
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ping"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = HttpClient::new(2000, Some("secret")).unwrap();
        let pong: Pong = client
            .post(&format!("{}/ping", server.uri()), &serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(pong, Pong { ok: true });
    }

    #[tokio::test]
    async fn server_errors_are_transport_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let client = HttpClient::new(2000, None).unwrap();
        let err = client.get::<Pong>(&server.uri()).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn unauthorized_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = HttpClient::new(2000, None).unwrap();
        let err = client.get::<Pong>(&server.uri()).await.unwrap_err();
        assert!(matches!(err, CallbackError::Authentication { .. }));
    }
}
