//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::client::ClientService;
use crate::infrastructure::processing::ProcessingClient;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub api_key_service: Arc<ApiKeyService>,
    pub client_service: Arc<ClientService>,
    pub processing: Arc<ProcessingClient>,
}

impl AppState {
    pub fn new(
        api_key_service: Arc<ApiKeyService>,
        client_service: Arc<ClientService>,
        processing: Arc<ProcessingClient>,
    ) -> Self {
        Self {
            api_key_service,
            client_service,
            processing,
        }
    }
}
