//! API key management endpoints for the authenticated client

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::ApiKeyRecord;
use crate::domain::AuthIdentity;

/// Request to issue a new API key
#[derive(Debug, Clone, Deserialize)]
pub struct IssueApiKeyRequest {
    pub label: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Scopes for the new key; the configured defaults apply when omitted
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// API key metadata; never includes the secret or its digest
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyResponse {
    pub id: Uuid,
    pub label: String,
    pub permissions: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<&ApiKeyRecord> for ApiKeyResponse {
    fn from(record: &ApiKeyRecord) -> Self {
        let mut permissions: Vec<String> = record.permissions().iter().cloned().collect();
        permissions.sort();

        Self {
            id: record.id(),
            label: record.label().to_string(),
            permissions,
            active: record.is_active(),
            created_at: record.created_at(),
            expires_at: record.expires_at(),
            last_used_at: record.last_used_at(),
        }
    }
}

/// Response carrying the raw secret; only ever returned at issuance
#[derive(Debug, Clone, Serialize)]
pub struct IssuedApiKeyResponse {
    #[serde(flatten)]
    pub api_key: ApiKeyResponse,
    pub secret: String,
}

/// List of the caller's keys
#[derive(Debug, Clone, Serialize)]
pub struct ListApiKeysResponse {
    pub api_keys: Vec<ApiKeyResponse>,
    pub total: usize,
}

/// POST /v1/keys
pub async fn issue_api_key(
    State(state): State<AppState>,
    identity: AuthIdentity,
    Json(request): Json<IssueApiKeyRequest>,
) -> Result<(StatusCode, Json<IssuedApiKeyResponse>), ApiError> {
    debug!(client_id = %identity.client_id, label = %request.label, "issuing API key");

    let issued = state
        .api_key_service
        .issue(
            identity.client_id,
            request.label,
            request.expires_at,
            request.permissions,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(IssuedApiKeyResponse {
            api_key: ApiKeyResponse::from(&issued.record),
            secret: issued.secret,
        }),
    ))
}

/// GET /v1/keys
pub async fn list_api_keys(
    State(state): State<AppState>,
    identity: AuthIdentity,
) -> Result<Json<ListApiKeysResponse>, ApiError> {
    let mut records = state
        .api_key_service
        .list_for_client(identity.client_id)
        .await?;
    records.sort_by_key(|r| r.created_at());

    let api_keys: Vec<ApiKeyResponse> = records.iter().map(ApiKeyResponse::from).collect();
    let total = api_keys.len();

    Ok(Json(ListApiKeysResponse { api_keys, total }))
}

/// DELETE /v1/keys/{key_id}
pub async fn revoke_api_key(
    State(state): State<AppState>,
    identity: AuthIdentity,
    Path(key_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    // Another client's key is reported as absent, not as forbidden
    let owned = state
        .api_key_service
        .get(key_id)
        .await?
        .is_some_and(|record| record.client_id() == identity.client_id);

    if !owned {
        return Err(ApiError::not_found(format!("API key '{key_id}' not found")));
    }

    state.api_key_service.revoke(key_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_issue_request_minimal() {
        let json = r#"{"label": "CI key"}"#;

        let request: IssueApiKeyRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.label, "CI key");
        assert!(request.expires_at.is_none());
        assert!(request.permissions.is_none());
    }

    #[test]
    fn test_issue_request_full() {
        let json = r#"{
            "label": "Scoped key",
            "expires_at": "2030-01-01T00:00:00Z",
            "permissions": ["email:extract"]
        }"#;

        let request: IssueApiKeyRequest = serde_json::from_str(json).unwrap();
        assert!(request.expires_at.is_some());
        assert_eq!(request.permissions, Some(vec!["email:extract".to_string()]));
    }

    #[test]
    fn test_api_key_response_from_record() {
        let permissions: HashSet<String> =
            ["invoice:parse".to_string(), "email:extract".to_string()]
                .into_iter()
                .collect();
        let record = ApiKeyRecord::new(Uuid::new_v4(), "ab".repeat(32), "Key", permissions);

        let response = ApiKeyResponse::from(&record);

        // Sorted for stable output
        assert_eq!(response.permissions, vec!["email:extract", "invoice:parse"]);
        assert!(response.active);
    }

    #[test]
    fn test_response_never_contains_digest() {
        let record = ApiKeyRecord::new(
            Uuid::new_v4(),
            "feedface".repeat(8),
            "Key",
            HashSet::new(),
        );

        let response = ApiKeyResponse::from(&record);
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("feedface"));
        assert!(!json.contains("digest"));
    }

    #[test]
    fn test_issued_response_flattens_metadata() {
        let record = ApiKeyRecord::new(Uuid::new_v4(), "ab".repeat(32), "Key", HashSet::new());
        let response = IssuedApiKeyResponse {
            api_key: ApiKeyResponse::from(&record),
            secret: "dk_secret-value".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"secret\":\"dk_secret-value\""));
        assert!(json.contains("\"label\":\"Key\""));
    }
}
