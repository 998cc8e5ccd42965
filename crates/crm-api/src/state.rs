use std::sync::Arc;

use crm_core::domain::ModuleRegistry;
use crm_core::services::{FranchiseService, GroupService, SessionResolver};
use crm_security::JwtService;

#[derive(Clone)]
pub struct AppState {
    /// Service name reported by the health check.
    pub app_name: String,
    pub jwt: Arc<JwtService>,
    pub registry: Arc<ModuleRegistry>,
    pub sessions: Arc<SessionResolver>,
    pub franchises: Arc<FranchiseService>,
    pub groups: Arc<GroupService>,
}
