//! API key entity

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted API key record.
///
/// The raw secret is never part of this record; only its one-way digest is
/// stored. Revocation is one-way: once `active` is cleared there is no
/// mutator that sets it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    /// Unique identifier, generated at creation
    id: Uuid,
    /// Owning client; immutable after creation
    client_id: Uuid,
    /// SHA-256 digest of the raw secret, lowercase hex
    digest: String,
    /// Human-readable name, chosen by the owner
    label: String,
    /// Granted permission scopes; duplicates collapse
    permissions: HashSet<String>,
    /// Cleared on revocation, never restored
    active: bool,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Expiration timestamp (None = never expires)
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    /// Last time the key authenticated a request; advisory telemetry only
    #[serde(skip_serializing_if = "Option::is_none")]
    last_used_at: Option<DateTime<Utc>>,
}

impl ApiKeyRecord {
    /// Create a new active API key record
    pub fn new(
        client_id: Uuid,
        digest: impl Into<String>,
        label: impl Into<String>,
        permissions: HashSet<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            digest: digest.into(),
            label: label.into(),
            permissions,
            active: true,
            created_at: Utc::now(),
            expires_at: None,
            last_used_at: None,
        }
    }

    /// Set an expiration timestamp
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Rebuild a record from its stored fields
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_storage(
        id: Uuid,
        client_id: Uuid,
        digest: String,
        label: String,
        permissions: HashSet<String>,
        active: bool,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        last_used_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            client_id,
            digest,
            label,
            permissions,
            active,
            created_at,
            expires_at,
            last_used_at,
        }
    }

    // Getters

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn client_id(&self) -> Uuid {
        self.client_id
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn permissions(&self) -> &HashSet<String> {
        &self.permissions
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    // Status checks

    /// Check if the key has expired. Keys without an expiry never expire.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expiry predicate against an explicit clock; shared by validation and
    /// permission checking so both paths agree on the boundary.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at < now,
            None => false,
        }
    }

    /// Check if the key is active and not expired
    pub fn is_usable(&self) -> bool {
        self.active && !self.is_expired()
    }

    // Mutators

    /// Update the label
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Revoke the key. There is deliberately no inverse operation.
    pub fn revoke(&mut self) {
        self.active = false;
    }

    /// Record that the key authenticated a request
    pub fn record_usage(&mut self, at: DateTime<Utc>) {
        self.last_used_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn permissions(perms: &[&str]) -> HashSet<String> {
        perms.iter().map(|p| p.to_string()).collect()
    }

    fn create_test_record() -> ApiKeyRecord {
        ApiKeyRecord::new(
            Uuid::new_v4(),
            "0f".repeat(32),
            "Test Key",
            permissions(&["email:extract"]),
        )
    }

    #[test]
    fn test_new_record_is_active() {
        let record = create_test_record();

        assert!(record.is_active());
        assert!(record.is_usable());
        assert!(!record.is_expired());
        assert!(record.last_used_at().is_none());
    }

    #[test]
    fn test_permissions_collapse_duplicates() {
        let record = ApiKeyRecord::new(
            Uuid::new_v4(),
            "ab".repeat(32),
            "Dup Key",
            permissions(&["email:extract", "email:extract", "invoice:parse"]),
        );

        assert_eq!(record.permissions().len(), 2);
    }

    #[test]
    fn test_expiry_in_past() {
        let record = create_test_record().with_expiry(Utc::now() - Duration::seconds(1));

        assert!(record.is_expired());
        assert!(!record.is_usable());
        // Expiry does not touch the active flag
        assert!(record.is_active());
    }

    #[test]
    fn test_expiry_in_future() {
        let record = create_test_record().with_expiry(Utc::now() + Duration::hours(1));

        assert!(!record.is_expired());
        assert!(record.is_usable());
    }

    #[test]
    fn test_no_expiry_never_expires() {
        let record = create_test_record();
        let far_future = Utc::now() + Duration::days(365 * 100);

        assert!(!record.is_expired_at(far_future));
    }

    #[test]
    fn test_revoke_is_one_way() {
        let mut record = create_test_record();

        record.revoke();
        assert!(!record.is_active());
        assert!(!record.is_usable());
    }

    #[test]
    fn test_record_usage() {
        let mut record = create_test_record();
        let now = Utc::now();

        record.record_usage(now);
        assert_eq!(record.last_used_at(), Some(now));
    }

    #[test]
    fn test_set_label() {
        let mut record = create_test_record();

        record.set_label("Renamed");
        assert_eq!(record.label(), "Renamed");
    }
}
