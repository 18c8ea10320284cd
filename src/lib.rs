//! Docgate - document processing gateway
//!
//! Authenticates inbound requests with opaque API keys, enforces per-key
//! permission scopes, tracks key usage and forwards authorized requests to
//! the downstream email NLP and invoice parsing services.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use config::StorageBackend;
use domain::api_key::ApiKeyRepository;
use domain::client::ClientRepository;
use infrastructure::api_key::{ApiKeyService, InMemoryApiKeyRepository, PgApiKeyRepository};
use infrastructure::client::{ClientService, InMemoryClientRepository, PgClientRepository};
use infrastructure::processing::ProcessingClient;

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let (api_key_repo, client_repo): (Arc<dyn ApiKeyRepository>, Arc<dyn ClientRepository>) =
        match config.storage.backend {
            StorageBackend::Postgres => {
                let database_url = std::env::var("DATABASE_URL").map_err(|_| {
                    anyhow::anyhow!(
                        "DATABASE_URL environment variable is required for the postgres backend"
                    )
                })?;

                info!("Connecting to PostgreSQL...");
                let pool = sqlx::PgPool::connect(&database_url)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;

                let api_key_repo = PgApiKeyRepository::new(pool.clone());
                api_key_repo.migrate().await?;

                let client_repo = PgClientRepository::new(pool);
                client_repo.migrate().await?;

                info!("PostgreSQL storage ready");
                (Arc::new(api_key_repo), Arc::new(client_repo))
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                (
                    Arc::new(InMemoryApiKeyRepository::new()),
                    Arc::new(InMemoryClientRepository::new()),
                )
            }
        };

    let api_key_service = Arc::new(ApiKeyService::new(
        api_key_repo,
        client_repo.clone(),
        config.api_keys.default_permissions.clone(),
    ));

    let client_service = Arc::new(ClientService::new(client_repo));

    let processing = Arc::new(ProcessingClient::new(
        &config.processing.email_service_url,
        &config.processing.invoice_service_url,
    ));

    Ok(AppState::new(api_key_service, client_service, processing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_app_state_in_memory() {
        let config = AppConfig::default();

        let state = create_app_state(&config).await.unwrap();

        // Fresh in-memory storage is immediately ready
        state.api_key_service.storage_ready().await.unwrap();
    }
}
