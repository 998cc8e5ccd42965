// ============================================================================
// CRM API - Access Handlers
// File: crates/crm-api/src/handlers/access.rs
// ============================================================================
//! Access checks for the calling subject

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crm_core::{Action, ModulePermissions};

use crate::middleware::CurrentSubject;
use crate::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    /// Module key, compared exactly. Omitted means no module gate.
    pub module: Option<String>,
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub allowed: bool,
}

/// Access check - GET /api/v1/access/check?module=&action=
pub async fn check(
    CurrentSubject(context): CurrentSubject,
    Query(query): Query<CheckQuery>,
) -> Json<ApiResponse<CheckResponse>> {
    let decision = context.evaluate(query.module.as_deref(), Action::from_str(&query.action));
    debug!(
        "Access check for user {}: {:?}/{} -> {}",
        context.user_id,
        query.module,
        query.action,
        decision.as_str()
    );

    Json(ApiResponse::success(CheckResponse {
        allowed: decision.is_allowed(),
    }))
}

/// Effective permissions - GET /api/v1/access/permissions
pub async fn permissions(
    CurrentSubject(context): CurrentSubject,
) -> Json<ApiResponse<Vec<ModulePermissions>>> {
    Json(ApiResponse::success(context.permission_matrix()))
}
