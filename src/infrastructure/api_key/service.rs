//! API key service
//!
//! High-level operations over the key repository: validation, issuance,
//! revocation, permission checks and usage tracking.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::api_key::{
    ApiKeyRecord, ApiKeyRepository, AuthIdentity, RejectReason, ValidationVerdict,
};
use crate::domain::client::ClientRepository;
use crate::domain::DomainError;

use super::codec::KeyCodec;

/// Result of issuing a new API key. The raw secret exists only in this value;
/// it is never persisted and cannot be recovered later.
#[derive(Debug)]
pub struct IssuedApiKey {
    /// The persisted record (digest only, no secret)
    pub record: ApiKeyRecord,
    /// The raw secret, returned to the caller exactly once
    pub secret: String,
}

/// API key service
#[derive(Debug)]
pub struct ApiKeyService {
    repository: Arc<dyn ApiKeyRepository>,
    clients: Arc<dyn ClientRepository>,
    codec: KeyCodec,
    default_permissions: Vec<String>,
}

impl ApiKeyService {
    pub fn new(
        repository: Arc<dyn ApiKeyRepository>,
        clients: Arc<dyn ClientRepository>,
        default_permissions: Vec<String>,
    ) -> Self {
        Self {
            repository,
            clients,
            codec: KeyCodec::new(),
            default_permissions,
        }
    }

    /// Validate a raw API key.
    ///
    /// Fail-closed: any storage failure along the way produces an invalid
    /// verdict with the coarse `validation error` reason; the underlying
    /// fault goes to the log, never to the caller.
    pub async fn validate(&self, raw_key: &str) -> ValidationVerdict {
        match self.try_validate(raw_key).await {
            Ok(verdict) => verdict,
            Err(e) => {
                error!(error = %e, "API key validation failed");
                ValidationVerdict::Invalid(RejectReason::ValidationError)
            }
        }
    }

    async fn try_validate(&self, raw_key: &str) -> Result<ValidationVerdict, DomainError> {
        let digest = self.codec.digest(raw_key);

        let Some(record) = self.repository.find_by_digest(&digest).await? else {
            return Ok(ValidationVerdict::Invalid(RejectReason::InvalidKey));
        };

        if !record.is_active() {
            debug!(key_id = %record.id(), "rejected revoked API key");
            return Ok(ValidationVerdict::Invalid(RejectReason::Revoked));
        }

        if record.is_expired() {
            debug!(key_id = %record.id(), "rejected expired API key");
            return Ok(ValidationVerdict::Invalid(RejectReason::Expired));
        }

        Ok(ValidationVerdict::Valid(AuthIdentity {
            client_id: record.client_id(),
            key_id: record.id(),
            permissions: record.permissions().clone(),
        }))
    }

    /// Issue a new API key for an existing client and return the raw secret.
    ///
    /// A digest conflict on insert means the 256-bit entropy guarantee was
    /// violated somehow; it is reported as an internal fault rather than
    /// silently overwriting the existing record.
    pub async fn issue(
        &self,
        client_id: Uuid,
        label: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
        permissions: Option<Vec<String>>,
    ) -> Result<IssuedApiKey, DomainError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(DomainError::validation("API key label is required"));
        }

        self.clients
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("client '{client_id}' not found")))?;

        let secret = self.codec.generate_secret();
        let digest = self.codec.digest(&secret);

        let permissions: HashSet<String> = permissions
            .unwrap_or_else(|| self.default_permissions.clone())
            .into_iter()
            .collect();

        let mut record = ApiKeyRecord::new(client_id, digest, &label, permissions);
        if let Some(expires_at) = expires_at {
            record = record.with_expiry(expires_at);
        }

        let record = match self.repository.create(record).await {
            Ok(record) => record,
            Err(DomainError::Conflict { message }) => {
                return Err(DomainError::internal(format!(
                    "digest collision on key insert: {message}"
                )));
            }
            Err(e) => return Err(e),
        };

        info!(key_id = %record.id(), client_id = %client_id, label = %label, "API key issued");

        Ok(IssuedApiKey { record, secret })
    }

    /// Revoke a key. Returns false only when the key was never found;
    /// revoking an already-revoked key returns true.
    pub async fn revoke(&self, key_id: Uuid) -> Result<bool, DomainError> {
        let found = self.repository.revoke(key_id).await?;

        if found {
            info!(key_id = %key_id, "API key revoked");
        } else {
            debug!(key_id = %key_id, "revoke requested for unknown API key");
        }

        Ok(found)
    }

    /// Check whether any of the client's active, non-expired keys carries the
    /// given permission. Storage failures resolve to false (fail-closed).
    pub async fn has_permission(&self, client_id: Uuid, permission: &str) -> bool {
        let keys = match self.repository.find_active_by_client(client_id).await {
            Ok(keys) => keys,
            Err(e) => {
                error!(
                    client_id = %client_id,
                    permission = %permission,
                    error = %e,
                    "permission check failed"
                );
                return false;
            }
        };

        keys.iter()
            .filter(|k| !k.is_expired())
            .any(|k| k.permissions().contains(permission))
    }

    /// Best-effort usage timestamp update. Failures are logged and swallowed;
    /// this must never affect the request that triggered it.
    pub async fn record_usage(&self, key_id: Uuid) {
        if let Err(e) = self.repository.record_usage(key_id, Utc::now()).await {
            warn!(key_id = %key_id, error = %e, "failed to record API key usage");
        }
    }

    /// Get a key by its identifier
    pub async fn get(&self, key_id: Uuid) -> Result<Option<ApiKeyRecord>, DomainError> {
        self.repository.find_by_id(key_id).await
    }

    /// All keys owned by a client, including revoked and expired ones
    pub async fn list_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ApiKeyRecord>, DomainError> {
        self.repository.list_by_client(client_id).await
    }

    /// Cheap storage probe for readiness checks
    pub async fn storage_ready(&self) -> Result<(), DomainError> {
        self.repository.find_by_id(Uuid::nil()).await.map(|_| ())
    }
}
