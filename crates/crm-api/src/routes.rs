//! Router assembly

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{access, franchises, groups, health, modules};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Module catalogue
        .route("/api/v1/modules", get(modules::list_modules))
        // Access checks
        .route("/api/v1/access/check", get(access::check))
        .route("/api/v1/access/permissions", get(access::permissions))
        // Franchise administration
        .route(
            "/api/v1/franchises",
            post(franchises::create_franchise).get(franchises::list_franchises),
        )
        .route("/api/v1/franchises/{id}", get(franchises::get_franchise))
        .route(
            "/api/v1/franchises/{id}/modules/{module}",
            put(franchises::enable_module).delete(franchises::disable_module),
        )
        .route(
            "/api/v1/franchises/{id}/groups",
            get(groups::list_franchise_groups),
        )
        // Group administration
        .route(
            "/api/v1/groups",
            post(groups::create_group).get(groups::list_groups),
        )
        .route("/api/v1/groups/{id}", get(groups::get_group))
        .route("/api/v1/groups/{id}/status", put(groups::update_status))
        .route(
            "/api/v1/groups/{id}/permissions/{module}",
            put(groups::set_grant).delete(groups::revoke_grant),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
