//! Client repository trait

use async_trait::async_trait;
use std::fmt::Debug;
use uuid::Uuid;

use super::entity::Client;
use crate::domain::DomainError;

/// Repository trait for client storage
#[async_trait]
pub trait ClientRepository: Send + Sync + Debug {
    /// Look up a client by its identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, DomainError>;

    /// Persist a newly registered client
    async fn create(&self, client: Client) -> Result<Client, DomainError>;
}
