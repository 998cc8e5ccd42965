// ============================================================================
// CRM Infrastructure - PostgreSQL User Repository
// File: crates/crm-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

use crm_core::domain::CrmUser;
use crm_core::error::DomainError;
use crm_core::repositories::UserRepository;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct CrmUserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub group_id: Option<i64>,
    pub franchise_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CrmUserRow> for CrmUser {
    fn from(row: CrmUserRow) -> Self {
        CrmUser {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            group_id: row.group_id,
            franchise_id: row.franchise_id,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CrmUser>, DomainError> {
        let row: Option<CrmUserRow> = sqlx::query_as(
            r#"
            SELECT id, email, display_name, group_id, franchise_id, is_active, created_at
            FROM crm_users
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding user by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }
}
