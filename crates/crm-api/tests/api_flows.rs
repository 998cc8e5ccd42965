//! End-to-end request flows against the router with in-memory storage

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crm_api::{build_router, AppState};
use crm_core::domain::{CrmUser, ModuleRegistry, NewFranchise, NewPermissionGroup, PermissionMap};
use crm_core::repositories::FranchiseRepository;
use crm_core::services::{FranchiseService, GroupService, SessionResolver};
use crm_infrastructure::{
    InMemoryFranchiseRepository, InMemoryPermissionGroupRepository, InMemoryUserRepository,
};
use crm_security::JwtService;

struct TestApp {
    router: Router,
    jwt: Arc<JwtService>,
    users: Arc<InMemoryUserRepository>,
    groups: Arc<InMemoryPermissionGroupRepository>,
    franchises: Arc<InMemoryFranchiseRepository>,
}

impl TestApp {
    async fn new() -> Self {
        let jwt = Arc::new(JwtService::new("test-secret", 900));
        let registry = Arc::new(ModuleRegistry::default());
        let users = Arc::new(InMemoryUserRepository::new());
        let groups = Arc::new(InMemoryPermissionGroupRepository::new());
        let franchises = Arc::new(InMemoryFranchiseRepository::new());

        let state = AppState {
            app_name: "crm-test".to_string(),
            jwt: jwt.clone(),
            registry: registry.clone(),
            sessions: Arc::new(SessionResolver::new(
                users.clone(),
                groups.clone(),
                franchises.clone(),
            )),
            franchises: Arc::new(FranchiseService::new(franchises.clone(), registry.clone())),
            groups: Arc::new(GroupService::new(groups.clone(), franchises.clone(), registry)),
        };

        Self {
            router: build_router(state),
            jwt,
            users,
            groups,
            franchises,
        }
    }

    async fn franchise(&self, name: &str, modules: &[&str]) -> i64 {
        let new = NewFranchise::new(
            name.to_string(),
            modules.iter().map(|m| m.to_string()).collect(),
        )
        .unwrap();
        self.franchises.create(&new).await.unwrap().id
    }

    /// Seeds a group with raw stored grants and a user in it; returns a token.
    fn user(&self, franchise_id: i64, group_id: i64, grants: Value) -> String {
        self.groups.insert(
            NewPermissionGroup::new(
                franchise_id,
                format!("Grupo {}", group_id),
                PermissionMap::from_json(grants),
            )
            .unwrap()
            .into_group(group_id),
        );

        let id = Uuid::new_v4();
        self.users.insert(CrmUser {
            id,
            email: format!("{}@example.com", id),
            display_name: "Operador".to_string(),
            group_id: Some(group_id),
            franchise_id: Some(franchise_id),
            is_active: true,
            created_at: Utc::now(),
        });
        self.jwt.generate_access_token(&id).unwrap()
    }

    async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.call(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "crm-test");
    assert_eq!(body["modules"], 11);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call(Method::GET, "/api/v1/access/check?module=produtos&action=view", None, None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_check_follows_grant_shapes() {
    let app = TestApp::new().await;
    let franchise = app.franchise("Loja Centro", &["produtos", "leads"]).await;
    let token = app.user(
        franchise,
        1,
        json!({
            "produtos": { "can_view": true, "can_edit": true, "can_delete": false },
            "leads": true,
            "pedidos": true
        }),
    );

    let cases = [
        ("module=produtos&action=edit", true),
        ("module=produtos&action=delete", false),
        ("module=leads&action=delete", true),
        ("module=pedidos&action=view", false),
        ("module=lojas&action=view", false),
        ("action=delete", true),
    ];
    for (query, expected) in cases {
        let (status, body) = app
            .call(Method::GET, &format!("/api/v1/access/check?{}", query), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["allowed"], expected, "{}", query);
    }
}

#[tokio::test]
async fn test_permission_matrix_only_lists_enabled_modules() {
    let app = TestApp::new().await;
    let franchise = app.franchise("Loja Centro", &["produtos"]).await;
    let token = app.user(franchise, 1, json!({ "produtos": true, "usuarios": true }));

    let (status, body) = app
        .call(Method::GET, "/api/v1/access/permissions", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let matrix = body["data"].as_array().unwrap();
    assert_eq!(matrix.len(), 1);
    assert_eq!(matrix[0]["module_key"], "produtos");
    assert_eq!(matrix[0]["can_delete"], true);
}

#[tokio::test]
async fn test_tenant_veto_blocks_group_admin() {
    let app = TestApp::new().await;
    let franchise = app.franchise("Loja Sul", &["produtos"]).await;
    let token = app.user(franchise, 1, json!({ "grupos": true }));

    let (status, body) = app.call(Method::GET, "/api/v1/groups", Some(&token), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "Access denied");
}

#[tokio::test]
async fn test_group_admin_flow() {
    let app = TestApp::new().await;
    let franchise = app.franchise("Loja Centro", &["grupos", "produtos"]).await;
    let token = app.user(franchise, 1, json!({ "grupos": true }));

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/groups",
            Some(&token),
            Some(json!({ "name": "Vendas", "permissions": { "Produtos": true } })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["permissions"]["produtos"], true);

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/api/v1/groups/{}/permissions/produtos", id),
            Some(&token),
            Some(json!({ "can_view": true, "can_edit": false, "can_delete": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["permissions"]["produtos"]["can_view"], true);

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/v1/groups/{}/permissions/produtos", id),
            Some(&token),
            Some(json!("everything")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(
            Method::DELETE,
            &format!("/api/v1/groups/{}/permissions/produtos", id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["permissions"].get("produtos").is_none());

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/api/v1/groups/{}/status", id),
            Some(&token),
            Some(json!({ "status": "inactive" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "inactive");

    let (status, body) = app.call(Method::GET, "/api/v1/groups", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_read_only_group_admin_cannot_write() {
    let app = TestApp::new().await;
    let franchise = app.franchise("Loja Centro", &["grupos"]).await;
    let token = app.user(franchise, 1, json!({ "grupos": { "can_view": true } }));

    let (status, _) = app.call(Method::GET, "/api/v1/groups/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/groups",
            Some(&token),
            Some(json!({ "name": "Financeiro" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_foreign_group_is_hidden() {
    let app = TestApp::new().await;
    let home = app.franchise("Loja Centro", &["grupos"]).await;
    let other = app.franchise("Loja Norte", &["grupos"]).await;
    let token = app.user(home, 1, json!({ "grupos": true }));
    app.user(other, 2, json!({ "grupos": true }));

    let (status, _) = app.call(Method::GET, "/api/v1/groups/2", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inactive_group_loses_access() {
    let app = TestApp::new().await;
    let franchise = app.franchise("Loja Centro", &["grupos", "produtos"]).await;
    let admin = app.user(franchise, 1, json!({ "grupos": true }));
    let seller = app.user(franchise, 2, json!({ "produtos": true }));

    let check = "/api/v1/access/check?module=produtos&action=view";
    let (_, body) = app.call(Method::GET, check, Some(&seller), None).await;
    assert_eq!(body["data"]["allowed"], true);

    let (status, _) = app
        .call(
            Method::PUT,
            "/api/v1/groups/2/status",
            Some(&admin),
            Some(json!({ "status": "inactive" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.call(Method::GET, check, Some(&seller), None).await;
    assert_eq!(body["data"]["allowed"], false);
}

#[tokio::test]
async fn test_franchise_module_toggle() {
    let app = TestApp::new().await;
    let hq = app.franchise("Matriz", &["franquias", "produtos"]).await;
    let token = app.user(hq, 1, json!({ "franquias": true, "produtos": true }));

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/franchises",
            Some(&token),
            Some(json!({ "name": "Loja Leste", "modules_enabled": ["Usuários"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["modules_enabled"], json!(["usuarios"]));

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/api/v1/franchises/{}/modules/Pedidos", id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["modules_enabled"], json!(["usuarios", "pedidos"]));

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/v1/franchises/{}/modules/webhooks", id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let check = "/api/v1/access/check?module=produtos&action=view";
    let (_, body) = app.call(Method::GET, check, Some(&token), None).await;
    assert_eq!(body["data"]["allowed"], true);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/v1/franchises/{}/modules/produtos", hq),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.call(Method::GET, check, Some(&token), None).await;
    assert_eq!(body["data"]["allowed"], false);
}

#[tokio::test]
async fn test_headquarters_reads_other_franchise_groups() {
    let app = TestApp::new().await;
    let hq = app.franchise("Matriz", &["franquias", "grupos"]).await;
    let store = app.franchise("Loja Oeste", &["grupos"]).await;
    let admin = app.user(hq, 1, json!({ "franquias": { "can_view": true }, "grupos": true }));
    let store_admin = app.user(store, 2, json!({ "grupos": true }));

    let uri = format!("/api/v1/franchises/{}/groups", store);
    let (status, body) = app.call(Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], 2);

    let (status, _) = app.call(Method::GET, &uri, Some(&store_admin), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call(Method::GET, "/api/v1/franchises/99/groups", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
