//! Liveness endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: String,
    version: &'static str,
    modules: usize,
}

/// Health check - GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            service: state.app_name.clone(),
            version: env!("CARGO_PKG_VERSION"),
            modules: state.registry.len(),
        }),
    )
}
