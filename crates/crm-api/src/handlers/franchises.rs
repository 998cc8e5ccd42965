// ============================================================================
// CRM API - Franchise Handlers
// File: crates/crm-api/src/handlers/franchises.rs
// ============================================================================
//! Franchise administration (module enablement)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crm_core::domain::{module, Franchise};
use crm_core::Action;
use crm_shared::{FranchiseId, Pagination};

use crate::error::ApiError;
use crate::middleware::{require_access, CurrentSubject};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateFranchiseRequest {
    pub name: String,
    #[serde(default)]
    pub modules_enabled: Vec<String>,
}

/// Create franchise - POST /api/v1/franchises
pub async fn create_franchise(
    State(state): State<AppState>,
    CurrentSubject(context): CurrentSubject,
    Json(payload): Json<CreateFranchiseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Franchise>>), ApiError> {
    require_access(&context, module::FRANCHISES, Action::Edit)?;

    let franchise = state
        .franchises
        .create(&payload.name, &payload.modules_enabled)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(franchise))))
}

/// List franchises - GET /api/v1/franchises
pub async fn list_franchises(
    State(state): State<AppState>,
    CurrentSubject(context): CurrentSubject,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<Vec<Franchise>>>, ApiError> {
    require_access(&context, module::FRANCHISES, Action::View)?;

    let franchises = state.franchises.list(pagination).await?;
    Ok(Json(ApiResponse::success(franchises)))
}

/// Get franchise - GET /api/v1/franchises/{id}
pub async fn get_franchise(
    State(state): State<AppState>,
    CurrentSubject(context): CurrentSubject,
    Path(id): Path<FranchiseId>,
) -> Result<Json<ApiResponse<Franchise>>, ApiError> {
    require_access(&context, module::FRANCHISES, Action::View)?;

    let franchise = state.franchises.get(id).await?;
    Ok(Json(ApiResponse::success(franchise)))
}

/// Enable module - PUT /api/v1/franchises/{id}/modules/{module}
pub async fn enable_module(
    State(state): State<AppState>,
    CurrentSubject(context): CurrentSubject,
    Path((id, module_name)): Path<(FranchiseId, String)>,
) -> Result<Json<ApiResponse<Franchise>>, ApiError> {
    require_access(&context, module::FRANCHISES, Action::Edit)?;

    let franchise = state.franchises.enable_module(id, &module_name).await?;
    Ok(Json(ApiResponse::success(franchise)))
}

/// Disable module - DELETE /api/v1/franchises/{id}/modules/{module}
pub async fn disable_module(
    State(state): State<AppState>,
    CurrentSubject(context): CurrentSubject,
    Path((id, module_name)): Path<(FranchiseId, String)>,
) -> Result<Json<ApiResponse<Franchise>>, ApiError> {
    require_access(&context, module::FRANCHISES, Action::Edit)?;

    let franchise = state.franchises.disable_module(id, &module_name).await?;
    Ok(Json(ApiResponse::success(franchise)))
}
