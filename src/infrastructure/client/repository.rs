//! In-memory client repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::client::{Client, ClientRepository};
use crate::domain::DomainError;

/// In-memory implementation of ClientRepository
#[derive(Debug, Default)]
pub struct InMemoryClientRepository {
    clients: Arc<RwLock<HashMap<Uuid, Client>>>,
}

impl InMemoryClientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, DomainError> {
        let clients = self.clients.read().await;
        Ok(clients.get(&id).cloned())
    }

    async fn create(&self, client: Client) -> Result<Client, DomainError> {
        let mut clients = self.clients.write().await;

        if clients.contains_key(&client.id()) {
            return Err(DomainError::conflict(format!(
                "client with ID '{}' already exists",
                client.id()
            )));
        }

        clients.insert(client.id(), client.clone());
        Ok(client)
    }
}
