//! PostgreSQL client repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::client::{Client, ClientRepository};
use crate::domain::DomainError;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    contact_email TEXT,
    created_at TIMESTAMPTZ NOT NULL
);
"#;

/// PostgreSQL implementation of ClientRepository
#[derive(Debug, Clone)]
pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not exist yet
    pub async fn migrate(&self) -> Result<(), DomainError> {
        sqlx::raw_sql(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("clients migration failed: {e}")))?;
        Ok(())
    }
}

fn client_from_row(row: &PgRow) -> Result<Client, DomainError> {
    Ok(Client::from_storage(
        row.try_get("id")?,
        row.try_get("name")?,
        row.try_get("contact_email")?,
        row.try_get("created_at")?,
    ))
}

#[async_trait]
impl ClientRepository for PgClientRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, DomainError> {
        let row = sqlx::query("SELECT id, name, contact_email, created_at FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(client_from_row).transpose()
    }

    async fn create(&self, client: Client) -> Result<Client, DomainError> {
        sqlx::query(
            "INSERT INTO clients (id, name, contact_email, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(client.id())
        .bind(client.name())
        .bind(client.contact_email())
        .bind(client.created_at())
        .execute(&self.pool)
        .await?;

        Ok(client)
    }
}
