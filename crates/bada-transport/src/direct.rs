//! Direct transport: one POST per call with the envelope as body.

use async_trait::async_trait;
use bada_core::{ApiResult, Envelope, Transport, TransportError};
use reqwest::{Client, header};

use crate::protocol::{decode_result, encode_envelope};

/// Direct request/response transport.
///
/// The body is sent as `text/plain` so browsers-facing backends (Apps Script
/// web apps) accept it without a preflight; redirects are followed.
#[derive(Debug, Clone)]
pub struct DirectTransport {
    api_url: String,
    client: Client,
}

impl DirectTransport {
    /// Create a transport for `api_url`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::Transport(e.to_string()))?;
        Ok(Self::with_client(api_url, client))
    }

    /// Create a transport using an existing HTTP client.
    #[must_use]
    pub fn with_client(api_url: impl Into<String>, client: Client) -> Self {
        Self {
            api_url: api_url.into(),
            client,
        }
    }
}

#[async_trait]
impl Transport for DirectTransport {
    async fn send(&self, envelope: &Envelope) -> Result<ApiResult, TransportError> {
        let body = encode_envelope(envelope)?;

        let response = self
            .client
            .post(&self.api_url)
            .header(header::CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Network(format!(
                "Network response was not ok: {status}"
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        decode_result(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bada_core::Payload;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    #[tokio::test]
    async fn test_posts_envelope_and_decodes_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/exec"))
            .and(body_json(json!({
                "action": "announcement.list",
                "data": {},
                "token": "t1"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = DirectTransport::new(format!("{}/exec", server.uri())).unwrap();
        let envelope = Envelope::new("announcement.list", Payload::new(), Some("t1".into()));
        let result = transport.send(&envelope).await.unwrap();
        assert_eq!(result, ApiResult::ok(json!([])));
    }

    #[tokio::test]
    async fn test_non_success_status_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = DirectTransport::new(server.uri()).unwrap();
        let err = transport
            .send(&Envelope::new("auth.validate", Payload::new(), None))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }

    #[tokio::test]
    async fn test_failure_body_passes_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": false, "error": "Invalid or expired session"})),
            )
            .mount(&server)
            .await;

        let transport = DirectTransport::new(server.uri()).unwrap();
        let result = transport
            .send(&Envelope::new("auth.validate", Payload::new(), Some("old".into())))
            .await
            .unwrap();
        assert_eq!(result.message(), Some("Invalid or expired session"));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let transport = DirectTransport::new("http://127.0.0.1:1/exec").unwrap();
        let err = transport
            .send(&Envelope::new("auth.validate", Payload::new(), None))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
