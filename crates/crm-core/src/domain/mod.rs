//! # CRM Core - Domain Module
//! 
//! Domain entities for franchise-scoped access control.

pub mod permission;
pub mod permission_group;
pub mod franchise;
pub mod module;
pub mod user;

// Re-export all entities and enums
pub use permission::{Action, GranularPermission, PermissionMap, PermissionValue};
pub use permission_group::{GroupStatus, NewPermissionGroup, PermissionGroup};
pub use franchise::{Franchise, NewFranchise};
pub use module::{normalize_module_key, Module, ModuleRegistry};
pub use user::CrmUser;
