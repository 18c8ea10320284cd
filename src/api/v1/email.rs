//! Email processing endpoint: scope check, then delegation to the NLP service

use axum::{extract::State, Json};
use serde_json::Value;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::permissions;
use crate::domain::AuthIdentity;

/// POST /v1/email/process
pub async fn process_email(
    State(state): State<AppState>,
    identity: AuthIdentity,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    if !state
        .api_key_service
        .has_permission(identity.client_id, permissions::EMAIL_EXTRACT)
        .await
    {
        return Err(ApiError::forbidden(format!(
            "permission '{}' required",
            permissions::EMAIL_EXTRACT
        )));
    }

    debug!(client_id = %identity.client_id, "delegating email processing");

    let result = state
        .processing
        .process_email(identity.client_id, payload)
        .await?;

    Ok(Json(result))
}
