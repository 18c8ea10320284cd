//! v1 API surface

pub mod api_keys;
pub mod auth;
pub mod email;
pub mod invoice;

use axum::routing::{delete, get, post};
use axum::Router;

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register_client))
        .route("/auth/client", get(auth::client_info))
        .route("/keys", post(api_keys::issue_api_key).get(api_keys::list_api_keys))
        .route("/keys/{key_id}", delete(api_keys::revoke_api_key))
        .route("/email/process", post(email::process_email))
        .route("/invoice/parse", post(invoice::parse_invoice))
}
