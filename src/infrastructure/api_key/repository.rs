//! In-memory API key repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::codec::constant_time_eq;
use crate::domain::api_key::{ApiKeyRecord, ApiKeyRepository};
use crate::domain::DomainError;

/// In-memory implementation of ApiKeyRepository.
///
/// Every mutation runs inside a single write-lock critical section, so the
/// atomicity the contract asks of `revoke` and `record_usage` holds trivially.
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    keys: Arc<RwLock<HashMap<Uuid, ApiKeyRecord>>>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn find_by_digest(&self, digest: &str) -> Result<Option<ApiKeyRecord>, DomainError> {
        let keys = self.keys.read().await;

        // Constant-shape comparison per candidate; the scan itself is fine
        // since key counts per deployment are small.
        Ok(keys
            .values()
            .find(|k| constant_time_eq(k.digest(), digest))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ApiKeyRecord>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.get(&id).cloned())
    }

    async fn find_active_by_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let keys = self.keys.read().await;

        Ok(keys
            .values()
            .filter(|k| k.client_id() == client_id && k.is_active())
            .cloned()
            .collect())
    }

    async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let keys = self.keys.read().await;

        Ok(keys
            .values()
            .filter(|k| k.client_id() == client_id)
            .cloned()
            .collect())
    }

    async fn create(&self, record: ApiKeyRecord) -> Result<ApiKeyRecord, DomainError> {
        let mut keys = self.keys.write().await;

        if keys.contains_key(&record.id()) {
            return Err(DomainError::conflict(format!(
                "API key with ID '{}' already exists",
                record.id()
            )));
        }

        if keys.values().any(|k| k.digest() == record.digest()) {
            return Err(DomainError::conflict("API key digest already exists"));
        }

        keys.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn revoke(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut keys = self.keys.write().await;

        match keys.get_mut(&id) {
            Some(key) => {
                key.revoke();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_usage(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut keys = self.keys.write().await;

        match keys.get_mut(&id) {
            Some(key) => {
                key.record_usage(at);
                Ok(())
            }
            None => Err(DomainError::not_found(format!("API key '{id}' not found"))),
        }
    }
}
