//! Invoice parsing endpoint: scope check, then delegation to the parser service

use axum::{extract::State, Json};
use serde_json::Value;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::permissions;
use crate::domain::AuthIdentity;

/// POST /v1/invoice/parse
pub async fn parse_invoice(
    State(state): State<AppState>,
    identity: AuthIdentity,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    if !state
        .api_key_service
        .has_permission(identity.client_id, permissions::INVOICE_PARSE)
        .await
    {
        return Err(ApiError::forbidden(format!(
            "permission '{}' required",
            permissions::INVOICE_PARSE
        )));
    }

    debug!(client_id = %identity.client_id, "delegating invoice parsing");

    let result = state
        .processing
        .parse_invoice(identity.client_id, payload)
        .await?;

    Ok(Json(result))
}
