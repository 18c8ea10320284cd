//! PostgreSQL API key repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::api_key::{ApiKeyRecord, ApiKeyRepository};
use crate::domain::DomainError;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS api_keys (
    id UUID PRIMARY KEY,
    client_id UUID NOT NULL,
    digest TEXT NOT NULL UNIQUE,
    label TEXT NOT NULL,
    permissions TEXT[] NOT NULL,
    active BOOLEAN NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    expires_at TIMESTAMPTZ,
    last_used_at TIMESTAMPTZ
);
CREATE INDEX IF NOT EXISTS idx_api_keys_client_id ON api_keys (client_id);
"#;

const SELECT_COLUMNS: &str =
    "id, client_id, digest, label, permissions, active, created_at, expires_at, last_used_at";

/// PostgreSQL implementation of ApiKeyRepository.
///
/// `revoke` and `record_usage` are single UPDATE statements touching only
/// their own column, so they cannot clobber each other under concurrency.
#[derive(Debug, Clone)]
pub struct PgApiKeyRepository {
    pool: PgPool,
}

impl PgApiKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not exist yet
    pub async fn migrate(&self) -> Result<(), DomainError> {
        sqlx::raw_sql(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("api_keys migration failed: {e}")))?;
        Ok(())
    }
}

fn record_from_row(row: &PgRow) -> Result<ApiKeyRecord, DomainError> {
    let permissions: Vec<String> = row.try_get("permissions")?;

    Ok(ApiKeyRecord::from_storage(
        row.try_get("id")?,
        row.try_get("client_id")?,
        row.try_get("digest")?,
        row.try_get("label")?,
        permissions.into_iter().collect(),
        row.try_get("active")?,
        row.try_get("created_at")?,
        row.try_get("expires_at")?,
        row.try_get("last_used_at")?,
    ))
}

#[async_trait]
impl ApiKeyRepository for PgApiKeyRepository {
    async fn find_by_digest(&self, digest: &str) -> Result<Option<ApiKeyRecord>, DomainError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM api_keys WHERE digest = $1");

        let row = sqlx::query(&sql)
            .bind(digest)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ApiKeyRecord>, DomainError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM api_keys WHERE id = $1");

        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn find_active_by_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM api_keys WHERE client_id = $1 AND active");

        let rows = sqlx::query(&sql)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM api_keys WHERE client_id = $1 ORDER BY created_at"
        );

        let rows = sqlx::query(&sql)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn create(&self, record: ApiKeyRecord) -> Result<ApiKeyRecord, DomainError> {
        let permissions: Vec<String> = record.permissions().iter().cloned().collect();

        sqlx::query(
            "INSERT INTO api_keys \
             (id, client_id, digest, label, permissions, active, created_at, expires_at, last_used_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(record.id())
        .bind(record.client_id())
        .bind(record.digest())
        .bind(record.label())
        .bind(&permissions)
        .bind(record.is_active())
        .bind(record.created_at())
        .bind(record.expires_at())
        .bind(record.last_used_at())
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::conflict("API key digest already exists")
            }
            _ => DomainError::from(e),
        })?;

        Ok(record)
    }

    async fn revoke(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE api_keys SET active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_usage(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE api_keys SET last_used_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("API key '{id}' not found")));
        }

        Ok(())
    }
}
