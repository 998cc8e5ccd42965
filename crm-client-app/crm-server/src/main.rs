use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crm_api::{build_router, AppState};
use crm_core::domain::ModuleRegistry;
use crm_core::services::{FranchiseService, GroupService, SessionResolver};
use crm_infrastructure::{
    create_pool, run_migrations, PgFranchiseRepository, PgPermissionGroupRepository,
    PgUserRepository,
};
use crm_security::JwtService;
use crm_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Initialize telemetry; the guard flushes file logs on shutdown
    let _log_guard = crm_shared::telemetry::init_telemetry(&config.log)?;

    info!("{} starting ({})...", config.app.name, config.app.env);

    // Connect to Database
    let pool = match create_pool(&config.database.url, config.database.max_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };
    info!("Database connection established.");

    if config.database.run_migrations {
        run_migrations(&pool).await?;
        info!("Migrations applied.");
    }

    // Wire repositories and services
    let registry = Arc::new(ModuleRegistry::default());
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let groups = Arc::new(PgPermissionGroupRepository::new(pool.clone()));
    let franchises = Arc::new(PgFranchiseRepository::new(pool));

    let state = AppState {
        app_name: config.app.name.clone(),
        jwt: Arc::new(JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry,
        )),
        registry: registry.clone(),
        sessions: Arc::new(SessionResolver::new(
            users,
            groups.clone(),
            franchises.clone(),
        )),
        franchises: Arc::new(FranchiseService::new(franchises.clone(), registry.clone())),
        groups: Arc::new(GroupService::new(groups, franchises, registry)),
    };

    let origin: HeaderValue = config
        .app
        .cors_origin
        .parse()
        .context("invalid app.cors_origin")?;

    // Build router
    let app = build_router(state).layer(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    );

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
