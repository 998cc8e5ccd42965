// ============================================================================
// CRM API - Group Handlers
// File: crates/crm-api/src/handlers/groups.rs
// ============================================================================
//! Permission group administration, scoped to the caller's own franchise

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crm_core::domain::{module, GroupStatus, PermissionGroup, PermissionMap, PermissionValue};
use crm_core::{AccessContext, Action};
use crm_shared::{FranchiseId, GroupId};

use crate::error::ApiError;
use crate::middleware::{require_access, CurrentSubject};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub permissions: PermissionMap,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: GroupStatus,
}

fn own_franchise(context: &AccessContext) -> Result<FranchiseId, ApiError> {
    context.franchise_id.ok_or(ApiError::Forbidden)
}

/// Loads a group, hiding groups of other franchises as not found.
async fn load_own_group(
    state: &AppState,
    context: &AccessContext,
    id: GroupId,
) -> Result<PermissionGroup, ApiError> {
    let franchise_id = own_franchise(context)?;
    let group = state.groups.get(id).await?;
    if group.franchise_id != franchise_id {
        return Err(ApiError::NotFound(format!("Group not found: {}", id)));
    }
    Ok(group)
}

/// Create group - POST /api/v1/groups
pub async fn create_group(
    State(state): State<AppState>,
    CurrentSubject(context): CurrentSubject,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PermissionGroup>>), ApiError> {
    require_access(&context, module::GROUPS, Action::Edit)?;
    let franchise_id = own_franchise(&context)?;

    let group = state
        .groups
        .create(franchise_id, &payload.name, payload.permissions)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(group))))
}

/// List groups - GET /api/v1/groups
pub async fn list_groups(
    State(state): State<AppState>,
    CurrentSubject(context): CurrentSubject,
) -> Result<Json<ApiResponse<Vec<PermissionGroup>>>, ApiError> {
    require_access(&context, module::GROUPS, Action::View)?;
    let franchise_id = own_franchise(&context)?;

    let groups = state.groups.list_by_franchise(franchise_id).await?;
    Ok(Json(ApiResponse::success(groups)))
}

/// List groups of any franchise - GET /api/v1/franchises/{id}/groups
///
/// Cross-franchise read for headquarters, so it is gated on both modules.
pub async fn list_franchise_groups(
    State(state): State<AppState>,
    CurrentSubject(context): CurrentSubject,
    Path(franchise_id): Path<FranchiseId>,
) -> Result<Json<ApiResponse<Vec<PermissionGroup>>>, ApiError> {
    require_access(&context, module::FRANCHISES, Action::View)?;
    require_access(&context, module::GROUPS, Action::View)?;

    let franchise = state.franchises.get(franchise_id).await?;
    let groups = state.groups.list_by_franchise(franchise.id).await?;
    Ok(Json(ApiResponse::success(groups)))
}

/// Get group - GET /api/v1/groups/{id}
pub async fn get_group(
    State(state): State<AppState>,
    CurrentSubject(context): CurrentSubject,
    Path(id): Path<GroupId>,
) -> Result<Json<ApiResponse<PermissionGroup>>, ApiError> {
    require_access(&context, module::GROUPS, Action::View)?;

    let group = load_own_group(&state, &context, id).await?;
    Ok(Json(ApiResponse::success(group)))
}

/// Update status - PUT /api/v1/groups/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    CurrentSubject(context): CurrentSubject,
    Path(id): Path<GroupId>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<PermissionGroup>>, ApiError> {
    require_access(&context, module::GROUPS, Action::Edit)?;
    load_own_group(&state, &context, id).await?;

    let group = state.groups.set_status(id, payload.status).await?;
    Ok(Json(ApiResponse::success(group)))
}

/// Set grant - PUT /api/v1/groups/{id}/permissions/{module}
///
/// Body is either a boolean or `{"can_view": .., "can_edit": .., "can_delete": ..}`.
pub async fn set_grant(
    State(state): State<AppState>,
    CurrentSubject(context): CurrentSubject,
    Path((id, module_name)): Path<(GroupId, String)>,
    Json(value): Json<PermissionValue>,
) -> Result<Json<ApiResponse<PermissionGroup>>, ApiError> {
    require_access(&context, module::GROUPS, Action::Edit)?;
    load_own_group(&state, &context, id).await?;

    let group = state.groups.set_grant(id, &module_name, value).await?;
    Ok(Json(ApiResponse::success(group)))
}

/// Revoke grant - DELETE /api/v1/groups/{id}/permissions/{module}
pub async fn revoke_grant(
    State(state): State<AppState>,
    CurrentSubject(context): CurrentSubject,
    Path((id, module_name)): Path<(GroupId, String)>,
) -> Result<Json<ApiResponse<PermissionGroup>>, ApiError> {
    require_access(&context, module::GROUPS, Action::Edit)?;
    load_own_group(&state, &context, id).await?;

    let group = state.groups.revoke_grant(id, &module_name).await?;
    Ok(Json(ApiResponse::success(group)))
}
