//! API key authentication middleware
//!
//! Every inbound request passes through here before it reaches a handler.
//! Exempt paths skip the gate; everything else must present a valid API key
//! via the `X-API-Key` header or, as a fallback, the `api_key` query
//! parameter. Rejections are plain-text 401s carrying only the coarse
//! rejection reason.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, info, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::{AuthIdentity, RejectReason, ValidationVerdict};

/// Header carrying the API key (primary transport)
pub const API_KEY_HEADER: &str = "x-api-key";

/// Query parameter carrying the API key (fallback transport)
pub const API_KEY_QUERY_PARAM: &str = "api_key";

/// Path prefixes that bypass authentication: health probes, docs and the
/// public registration endpoint
const EXEMPT_PATH_PREFIXES: &[&str] = &["/health", "/ready", "/live", "/docs", "/v1/auth/register"];

/// Check whether a request path skips the authentication gate
pub fn is_exempt_path(path: &str) -> bool {
    EXEMPT_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Authentication gate applied to the whole router.
///
/// On success the resolved [`AuthIdentity`] is attached to the request
/// extensions and the usage timestamp update is spawned detached, off the
/// response path. If the connection drops mid-validation this future is
/// simply dropped and nothing is recorded.
pub async fn api_key_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if is_exempt_path(request.uri().path()) {
        return next.run(request).await;
    }

    let raw_key = match extract_api_key(request.headers(), request.uri().query()) {
        Some(key) => key,
        None => {
            warn!(path = %request.uri().path(), "request without API key");
            return reject(RejectReason::MissingKey);
        }
    };

    debug!(
        key_prefix = %raw_key.chars().take(8).collect::<String>(),
        "validating API key"
    );

    match state.api_key_service.validate(&raw_key).await {
        ValidationVerdict::Valid(identity) => {
            info!(client_id = %identity.client_id, "API key validated");

            let service = state.api_key_service.clone();
            let key_id = identity.key_id;

            request.extensions_mut().insert(identity);

            // Fire and forget: usage tracking never delays or fails the call
            tokio::spawn(async move {
                service.record_usage(key_id).await;
            });

            next.run(request).await
        }
        ValidationVerdict::Invalid(reason) => {
            warn!(reason = %reason, "API key rejected");
            reject(reason)
        }
    }
}

fn reject(reason: RejectReason) -> Response {
    (StatusCode::UNAUTHORIZED, reason.to_string()).into_response()
}

/// Extract the raw key from the designated header, falling back to the query
/// parameter. Returns None when neither is present or the value is empty.
fn extract_api_key(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    if let Some(value) = headers.get(API_KEY_HEADER) {
        let key = value.to_str().ok()?.trim();
        if !key.is_empty() {
            return Some(key.to_string());
        }
    }

    // Generated secrets are URL-safe, so a plain split is enough here; no
    // percent-decoding is required.
    let query = query?;
    query
        .split('&')
        .find_map(|pair| {
            pair.strip_prefix(API_KEY_QUERY_PARAM)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|key| !key.is_empty())
        .map(|key| key.to_string())
}

impl<S: Send + Sync> FromRequestParts<S> for AuthIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthIdentity>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized(RejectReason::MissingKey.to_string()))
    }
}
