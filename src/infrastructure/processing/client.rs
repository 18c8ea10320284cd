//! HTTP client for the downstream processing microservices
//!
//! Authorized calls are delegated with the resolved client identifier in the
//! payload. The credential itself (raw or hashed) never leaves the gateway.

use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::domain::DomainError;

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Client for the email NLP and invoice parsing services
#[derive(Debug, Clone)]
pub struct ProcessingClient {
    http: reqwest::Client,
    email_base_url: String,
    invoice_base_url: String,
}

impl ProcessingClient {
    pub fn new(email_base_url: impl Into<String>, invoice_base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            email_base_url: email_base_url.into(),
            invoice_base_url: invoice_base_url.into(),
        }
    }

    /// Submit email content to the NLP extraction service
    pub async fn process_email(
        &self,
        client_id: Uuid,
        payload: Value,
    ) -> Result<Value, DomainError> {
        let url = format!("{}/process", self.email_base_url);
        self.forward("email-nlp", &url, client_id, payload).await
    }

    /// Submit an invoice document to the parsing service
    pub async fn parse_invoice(
        &self,
        client_id: Uuid,
        payload: Value,
    ) -> Result<Value, DomainError> {
        let url = format!("{}/parse", self.invoice_base_url);
        self.forward("invoice-parser", &url, client_id, payload).await
    }

    async fn forward(
        &self,
        service: &str,
        url: &str,
        client_id: Uuid,
        payload: Value,
    ) -> Result<Value, DomainError> {
        let body = inject_client_id(client_id, payload);

        debug!(service = %service, url = %url, client_id = %client_id, "forwarding request");

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::downstream(service, format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::downstream(
                service,
                format!("HTTP {status}: {error_body}"),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::downstream(service, format!("failed to parse response: {e}")))
    }
}

/// Attach the resolved owner to the forwarded payload. Non-object payloads
/// are wrapped so the identifier always travels as an explicit field.
fn inject_client_id(client_id: Uuid, payload: Value) -> Value {
    match payload {
        Value::Object(mut map) => {
            map.insert("client_id".to_string(), json!(client_id));
            Value::Object(map)
        }
        other => json!({
            "client_id": client_id,
            "payload": other,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_inject_client_id_into_object() {
        let client_id = Uuid::new_v4();
        let body = inject_client_id(client_id, json!({"subject": "hello"}));

        assert_eq!(body["client_id"], json!(client_id));
        assert_eq!(body["subject"], json!("hello"));
    }

    #[test]
    fn test_inject_client_id_wraps_non_object() {
        let client_id = Uuid::new_v4();
        let body = inject_client_id(client_id, json!("raw text"));

        assert_eq!(body["client_id"], json!(client_id));
        assert_eq!(body["payload"], json!("raw text"));
    }

    #[tokio::test]
    async fn test_process_email_forwards_client_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/process"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "j-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ProcessingClient::new(server.uri(), server.uri());
        let client_id = Uuid::new_v4();

        let result = client
            .process_email(client_id, json!({"body": "invoice attached"}))
            .await
            .unwrap();

        assert_eq!(result["job_id"], json!("j-1"));

        let requests = server.received_requests().await.unwrap();
        let forwarded: Value = serde_json::from_slice(&requests[0].body).unwrap();

        // The owner travels as an explicit field; the credential never does
        assert_eq!(forwarded["client_id"], json!(client_id));
        assert!(forwarded.get("api_key").is_none());
    }

    #[tokio::test]
    async fn test_parse_invoice_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/parse"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ProcessingClient::new(server.uri(), server.uri());

        let result = client.parse_invoice(Uuid::new_v4(), json!({})).await;
        assert!(matches!(result, Err(DomainError::Downstream { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Nothing listens on this port
        let client = ProcessingClient::new("http://127.0.0.1:9", "http://127.0.0.1:9");

        let result = client.process_email(Uuid::new_v4(), json!({})).await;
        assert!(matches!(result, Err(DomainError::Downstream { .. })));
    }
}
