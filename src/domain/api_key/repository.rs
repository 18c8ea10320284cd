//! API key repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;
use uuid::Uuid;

use super::entity::ApiKeyRecord;
use crate::domain::DomainError;

/// Repository trait for API key storage.
///
/// `revoke` and `record_usage` are dedicated single-field updates rather than
/// whole-record saves: a racing usage-timestamp write must never overwrite a
/// concurrent revocation.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Look up a key by the digest of its secret (authentication path)
    async fn find_by_digest(&self, digest: &str) -> Result<Option<ApiKeyRecord>, DomainError>;

    /// Look up a key by its identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ApiKeyRecord>, DomainError>;

    /// All active keys for a client, regardless of expiry (callers apply the
    /// expiry predicate per record)
    async fn find_active_by_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ApiKeyRecord>, DomainError>;

    /// All keys for a client, including revoked and expired ones
    async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<ApiKeyRecord>, DomainError>;

    /// Persist a newly issued key
    async fn create(&self, record: ApiKeyRecord) -> Result<ApiKeyRecord, DomainError>;

    /// Atomically clear the active flag. Returns false if the key was never
    /// found; true otherwise, including when it was already revoked.
    async fn revoke(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Atomically set the last-used timestamp
    async fn record_usage(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError>;
}
