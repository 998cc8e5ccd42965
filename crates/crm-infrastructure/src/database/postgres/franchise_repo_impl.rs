// ============================================================================
// CRM Infrastructure - PostgreSQL Franchise Repository
// File: crates/crm-infrastructure/src/database/postgres/franchise_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};

use crm_core::domain::{Franchise, NewFranchise};
use crm_core::error::DomainError;
use crm_core::repositories::FranchiseRepository;
use crm_shared::{FranchiseId, Pagination};

pub struct PgFranchiseRepository {
    pool: PgPool,
}

impl PgFranchiseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct FranchiseRow {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub modules_enabled: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<FranchiseRow> for Franchise {
    fn from(row: FranchiseRow) -> Self {
        Franchise {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
            modules_enabled: row.modules_enabled,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

#[async_trait]
impl FranchiseRepository for PgFranchiseRepository {
    async fn find_by_id(&self, id: FranchiseId) -> Result<Option<Franchise>, DomainError> {
        let row: Option<FranchiseRow> = sqlx::query_as(
            r#"
            SELECT id, name, is_active, modules_enabled, created_at, modified_at
            FROM franchises
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding franchise by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self, pagination: Pagination) -> Result<Vec<Franchise>, DomainError> {
        let rows: Vec<FranchiseRow> = sqlx::query_as(
            r#"
            SELECT id, name, is_active, modules_enabled, created_at, modified_at
            FROM franchises
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing franchises: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, franchise: &NewFranchise) -> Result<Franchise, DomainError> {
        info!("Creating franchise: {}", franchise.name);

        let row: FranchiseRow = sqlx::query_as(
            r#"
            INSERT INTO franchises (name, modules_enabled)
            VALUES ($1, $2)
            RETURNING id, name, is_active, modules_enabled, created_at, modified_at
            "#
        )
        .bind(&franchise.name)
        .bind(&franchise.modules_enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating franchise: {}", e);
            let msg = e.to_string();
            if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::FranchiseNameAlreadyExists(franchise.name.clone())
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        info!("Franchise created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn add_module(&self, id: FranchiseId, module_key: &str) -> Result<Option<Franchise>, DomainError> {
        let row: Option<FranchiseRow> = sqlx::query_as(
            r#"
            UPDATE franchises
            SET modules_enabled = array_append(modules_enabled, $2::text), modified_at = NOW()
            WHERE id = $1 AND NOT ($2::text = ANY(modules_enabled))
            RETURNING id, name, is_active, modules_enabled, created_at, modified_at
            "#
        )
        .bind(id)
        .bind(module_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error enabling {} for franchise {}: {}", module_key, id, e);
            DomainError::DatabaseError(e.to_string())
        })?;

        // No row: either already enabled or no such franchise.
        match row {
            Some(row) => Ok(Some(row.into())),
            None => self.find_by_id(id).await,
        }
    }

    async fn remove_module(&self, id: FranchiseId, module_key: &str) -> Result<Option<Franchise>, DomainError> {
        let row: Option<FranchiseRow> = sqlx::query_as(
            r#"
            UPDATE franchises
            SET modules_enabled = array_remove(modules_enabled, $2::text), modified_at = NOW()
            WHERE id = $1 AND $2::text = ANY(modules_enabled)
            RETURNING id, name, is_active, modules_enabled, created_at, modified_at
            "#
        )
        .bind(id)
        .bind(module_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error disabling {} for franchise {}: {}", module_key, id, e);
            DomainError::DatabaseError(e.to_string())
        })?;

        match row {
            Some(row) => Ok(Some(row.into())),
            None => self.find_by_id(id).await,
        }
    }
}
