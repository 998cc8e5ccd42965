use axum::{extract::State, Json};

use crm_core::domain::Module;

use crate::response::ApiResponse;
use crate::state::AppState;

/// Module catalogue - GET /api/v1/modules
pub async fn list_modules(State(state): State<AppState>) -> Json<ApiResponse<Vec<Module>>> {
    Json(ApiResponse::success(state.registry.iter().cloned().collect()))
}
