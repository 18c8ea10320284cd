//! Client service

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::client::{Client, ClientRepository};
use crate::domain::DomainError;

/// Client registration and lookup
#[derive(Debug)]
pub struct ClientService {
    repository: Arc<dyn ClientRepository>,
}

impl ClientService {
    pub fn new(repository: Arc<dyn ClientRepository>) -> Self {
        Self { repository }
    }

    /// Register a new client
    pub async fn register(
        &self,
        name: impl Into<String>,
        contact_email: Option<String>,
    ) -> Result<Client, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("client name is required"));
        }

        let mut client = Client::new(&name);
        if let Some(email) = contact_email {
            client = client.with_contact_email(email);
        }

        let client = self.repository.create(client).await?;
        info!(client_id = %client.id(), name = %name, "client registered");

        Ok(client)
    }

    /// Get a client by its identifier
    pub async fn get(&self, id: Uuid) -> Result<Option<Client>, DomainError> {
        self.repository.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::client::InMemoryClientRepository;

    #[tokio::test]
    async fn test_register_and_get() {
        let service = ClientService::new(Arc::new(InMemoryClientRepository::new()));

        let client = service
            .register("Acme Corp", Some("ops@acme.example".to_string()))
            .await
            .unwrap();

        let found = service.get(client.id()).await.unwrap().unwrap();
        assert_eq!(found.name(), "Acme Corp");
        assert_eq!(found.contact_email(), Some("ops@acme.example"));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_name() {
        let service = ClientService::new(Arc::new(InMemoryClientRepository::new()));

        let result = service.register("  ", None).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let service = ClientService::new(Arc::new(InMemoryClientRepository::new()));

        assert!(service.get(Uuid::new_v4()).await.unwrap().is_none());
    }
}
