//! API middleware components

pub mod auth;
pub mod logging;

pub use auth::{api_key_auth, API_KEY_HEADER, API_KEY_QUERY_PARAM};
pub use logging::logging_middleware;
