// ============================================================================
// CRM Infrastructure - PostgreSQL Permission Group Repository
// File: crates/crm-infrastructure/src/database/postgres/group_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{error, info, warn};

use crm_core::domain::{GroupStatus, NewPermissionGroup, PermissionGroup, PermissionMap, PermissionValue};
use crm_core::error::DomainError;
use crm_core::repositories::PermissionGroupRepository;
use crm_shared::{FranchiseId, GroupId};

pub struct PgPermissionGroupRepository {
    pool: PgPool,
}

impl PgPermissionGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping. `permissions` is read as raw JSON so
// historical rows of any shape load without failing the query.
#[derive(Debug, FromRow)]
struct PermissionGroupRow {
    pub id: i64,
    pub franchise_id: i64,
    pub name: String,
    pub status: String,
    pub permissions: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<PermissionGroupRow> for PermissionGroup {
    fn from(row: PermissionGroupRow) -> Self {
        let status = GroupStatus::from_str(&row.status).unwrap_or_else(|| {
            warn!("Group {} has unknown status {:?}; treating as inactive", row.id, row.status);
            GroupStatus::Inactive
        });

        PermissionGroup {
            id: row.id,
            franchise_id: row.franchise_id,
            name: row.name,
            status,
            permissions: PermissionMap::from_json(row.permissions.0),
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

fn map_write_error(e: sqlx::Error, franchise_id: FranchiseId, name: &str) -> DomainError {
    let msg = e.to_string();
    if msg.contains("unique") || msg.contains("duplicate") {
        DomainError::GroupNameAlreadyExists {
            franchise_id,
            name: name.to_string(),
        }
    } else {
        DomainError::DatabaseError(msg)
    }
}

#[async_trait]
impl PermissionGroupRepository for PgPermissionGroupRepository {
    async fn find_by_id(&self, id: GroupId) -> Result<Option<PermissionGroup>, DomainError> {
        let row: Option<PermissionGroupRow> = sqlx::query_as(
            r#"
            SELECT id, franchise_id, name, status, permissions, created_at, modified_at
            FROM permission_groups
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding group by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_franchise(&self, franchise_id: FranchiseId) -> Result<Vec<PermissionGroup>, DomainError> {
        let rows: Vec<PermissionGroupRow> = sqlx::query_as(
            r#"
            SELECT id, franchise_id, name, status, permissions, created_at, modified_at
            FROM permission_groups
            WHERE franchise_id = $1
            ORDER BY name
            "#
        )
        .bind(franchise_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing groups of franchise {}: {}", franchise_id, e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, group: &NewPermissionGroup) -> Result<PermissionGroup, DomainError> {
        info!("Creating group {} in franchise {}", group.name, group.franchise_id);

        let row: PermissionGroupRow = sqlx::query_as(
            r#"
            INSERT INTO permission_groups (franchise_id, name, status, permissions)
            VALUES ($1, $2, $3, $4)
            RETURNING id, franchise_id, name, status, permissions, created_at, modified_at
            "#
        )
        .bind(group.franchise_id)
        .bind(&group.name)
        .bind(group.status.as_str())
        .bind(Json(group.permissions.to_json()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating group: {}", e);
            map_write_error(e, group.franchise_id, &group.name)
        })?;

        info!("Group created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn set_status(&self, id: GroupId, status: GroupStatus) -> Result<Option<PermissionGroup>, DomainError> {
        let row: Option<PermissionGroupRow> = sqlx::query_as(
            r#"
            UPDATE permission_groups
            SET status = $2, modified_at = NOW()
            WHERE id = $1
            RETURNING id, franchise_id, name, status, permissions, created_at, modified_at
            "#
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating status of group {}: {}", id, e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(Into::into))
    }

    async fn put_grant(
        &self,
        id: GroupId,
        module_key: &str,
        value: &PermissionValue,
    ) -> Result<Option<PermissionGroup>, DomainError> {
        // Merges one key in place; other grants keep their stored JSON.
        let row: Option<PermissionGroupRow> = sqlx::query_as(
            r#"
            UPDATE permission_groups
            SET
                permissions = (CASE WHEN jsonb_typeof(permissions) = 'object'
                                    THEN permissions ELSE '{}'::jsonb END)
                              || jsonb_build_object($2::text, $3::jsonb),
                modified_at = NOW()
            WHERE id = $1
            RETURNING id, franchise_id, name, status, permissions, created_at, modified_at
            "#
        )
        .bind(id)
        .bind(module_key)
        .bind(Json(value.clone()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error granting {} to group {}: {}", module_key, id, e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(Into::into))
    }

    async fn remove_grant(&self, id: GroupId, module_key: &str) -> Result<Option<PermissionGroup>, DomainError> {
        let row: Option<PermissionGroupRow> = sqlx::query_as(
            r#"
            UPDATE permission_groups
            SET
                permissions = CASE WHEN jsonb_typeof(permissions) = 'object'
                                   THEN permissions - $2::text ELSE permissions END,
                modified_at = NOW()
            WHERE id = $1
            RETURNING id, franchise_id, name, status, permissions, created_at, modified_at
            "#
        )
        .bind(id)
        .bind(module_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error revoking {} from group {}: {}", module_key, id, e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(Into::into))
    }
}
