//! Client registration and account endpoints

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::client::Client;
use crate::domain::AuthIdentity;

use super::api_keys::{ApiKeyResponse, IssuedApiKeyResponse};

/// Request to register a new client
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterClientRequest {
    pub name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
}

/// Client account information
#[derive(Debug, Clone, Serialize)]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Client> for ClientResponse {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id(),
            name: client.name().to_string(),
            contact_email: client.contact_email().map(String::from),
            created_at: client.created_at(),
        }
    }
}

/// Registration result: the new account plus its initial API key
#[derive(Debug, Clone, Serialize)]
pub struct RegisterClientResponse {
    pub client: ClientResponse,
    pub api_key: IssuedApiKeyResponse,
}

/// POST /v1/auth/register (exempt from the authentication gate)
pub async fn register_client(
    State(state): State<AppState>,
    Json(request): Json<RegisterClientRequest>,
) -> Result<(StatusCode, Json<RegisterClientResponse>), ApiError> {
    let client = state
        .client_service
        .register(request.name, request.contact_email)
        .await?;

    let issued = state
        .api_key_service
        .issue(client.id(), "Initial key", None, None)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterClientResponse {
            client: ClientResponse::from(&client),
            api_key: IssuedApiKeyResponse {
                api_key: ApiKeyResponse::from(&issued.record),
                secret: issued.secret,
            },
        }),
    ))
}

/// GET /v1/auth/client
pub async fn client_info(
    State(state): State<AppState>,
    identity: AuthIdentity,
) -> Result<Json<ClientResponse>, ApiError> {
    let client = state
        .client_service
        .get(identity.client_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("client '{}' not found", identity.client_id))
        })?;

    Ok(Json(ClientResponse::from(&client)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_minimal() {
        let json = r#"{"name": "Acme Corp"}"#;

        let request: RegisterClientRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Acme Corp");
        assert!(request.contact_email.is_none());
    }

    #[test]
    fn test_register_request_with_email() {
        let json = r#"{"name": "Acme Corp", "contact_email": "ops@acme.example"}"#;

        let request: RegisterClientRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.contact_email, Some("ops@acme.example".to_string()));
    }

    #[test]
    fn test_client_response_from_entity() {
        let client = Client::new("Acme Corp").with_contact_email("ops@acme.example");

        let response = ClientResponse::from(&client);

        assert_eq!(response.id, client.id());
        assert_eq!(response.name, "Acme Corp");
        assert_eq!(response.contact_email, Some("ops@acme.example".to_string()));
    }

    #[test]
    fn test_client_response_serialization_omits_missing_email() {
        let client = Client::new("Solo");
        let json = serde_json::to_string(&ClientResponse::from(&client)).unwrap();

        assert!(!json.contains("contact_email"));
    }
}
