//! Client (key owner) entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account that owns API keys. Keys reference their client by id; issuance
/// requires the client to exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    id: Uuid,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_email: Option<String>,
    created_at: DateTime<Utc>,
}

impl Client {
    /// Register a new client
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            contact_email: None,
            created_at: Utc::now(),
        }
    }

    /// Set the contact email
    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_email = Some(email.into());
        self
    }

    /// Rebuild a client from its stored fields
    pub(crate) fn from_storage(
        id: Uuid,
        name: String,
        contact_email: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            contact_email,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact_email(&self) -> Option<&str> {
        self.contact_email.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Client::new("Acme Corp").with_contact_email("ops@acme.example");

        assert_eq!(client.name(), "Acme Corp");
        assert_eq!(client.contact_email(), Some("ops@acme.example"));
    }

    #[test]
    fn test_client_without_email() {
        let client = Client::new("Solo");

        assert!(client.contact_email().is_none());
    }
}
