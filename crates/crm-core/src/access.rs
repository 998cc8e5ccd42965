// ============================================================================
// CRM Core - Access Decision Evaluator
// File: crates/crm-core/src/access.rs
// Description: Franchise module enablement combined with group grants
// ============================================================================
//! Allow/deny decisions for a (module, action) pair.
//!
//! Tenant enablement is an absolute veto checked before any group grant; a
//! group can never open a module its franchise has not licensed. Everything
//! here is pure: no I/O, no logging, no shared state.

use serde::Serialize;
use uuid::Uuid;

use crm_shared::{FranchiseId, GroupId};

use crate::domain::{Action, PermissionMap, PermissionValue};

/// Outcome of an access check, with the reason folded in.
///
/// Only [`AccessDecision::is_allowed`] is meant for callers' control flow; the
/// reason exists for audit logs and must not be echoed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    /// No module key was supplied, so no gate applies.
    NotRequired,
    Granted,
    /// The franchise has not enabled the module.
    TenantDisabled,
    /// The group holds no entry for the module.
    NoGrant,
    /// The entry exists but does not cover the action.
    ActionDenied,
    /// The entry has a shape that is neither boolean nor granular record.
    UnrecognizedGrant,
}

impl AccessDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, AccessDecision::NotRequired | AccessDecision::Granted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessDecision::NotRequired => "not_required",
            AccessDecision::Granted => "granted",
            AccessDecision::TenantDisabled => "tenant_disabled",
            AccessDecision::NoGrant => "no_grant",
            AccessDecision::ActionDenied => "action_denied",
            AccessDecision::UnrecognizedGrant => "unrecognized_grant",
        }
    }
}

/// Decides access and reports why.
///
/// `action` is `None` when the caller asked for an action name outside
/// view/edit/delete: granular grants then deny, legacy booleans still answer
/// with their own value.
pub fn evaluate<S: AsRef<str>>(
    module_key: Option<&str>,
    action: Option<Action>,
    group_permissions: &PermissionMap,
    tenant_enabled_modules: &[S],
) -> AccessDecision {
    let module_key = match module_key {
        Some(key) if !key.is_empty() => key,
        _ => return AccessDecision::NotRequired,
    };

    if !tenant_enabled_modules.iter().any(|m| m.as_ref() == module_key) {
        return AccessDecision::TenantDisabled;
    }

    let granted = match group_permissions.get(module_key) {
        None => return AccessDecision::NoGrant,
        Some(PermissionValue::Unrecognized(_)) => return AccessDecision::UnrecognizedGrant,
        Some(PermissionValue::Unrestricted(flag)) => *flag,
        Some(PermissionValue::Granular(permission)) => {
            action.is_some_and(|action| permission.allows(action))
        }
    };

    if granted {
        AccessDecision::Granted
    } else {
        AccessDecision::ActionDenied
    }
}

/// Returns whether `action` on `module_key` is allowed.
///
/// A missing or empty `module_key` always passes. Otherwise the module must be
/// enabled for the tenant and the group must hold a grant covering `action`.
pub fn is_allowed<S: AsRef<str>>(
    module_key: Option<&str>,
    action: Action,
    group_permissions: &PermissionMap,
    tenant_enabled_modules: &[S],
) -> bool {
    evaluate(module_key, Some(action), group_permissions, tenant_enabled_modules).is_allowed()
}

/// Same as [`is_allowed`] for an untyped action name such as `"view"`.
pub fn is_allowed_for_action_name<S: AsRef<str>>(
    module_key: Option<&str>,
    action: &str,
    group_permissions: &PermissionMap,
    tenant_enabled_modules: &[S],
) -> bool {
    evaluate(module_key, Action::from_str(action), group_permissions, tenant_enabled_modules)
        .is_allowed()
}

/// Effective view/edit/delete flags for one enabled module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePermissions {
    pub module_key: String,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

/// Effective flags for every module the tenant has enabled, in tenant order.
pub fn permission_matrix<S: AsRef<str>>(
    group_permissions: &PermissionMap,
    tenant_enabled_modules: &[S],
) -> Vec<ModulePermissions> {
    let mut matrix: Vec<ModulePermissions> = Vec::with_capacity(tenant_enabled_modules.len());
    for module in tenant_enabled_modules {
        let key = module.as_ref();
        if key.is_empty() || matrix.iter().any(|m| m.module_key == key) {
            continue;
        }
        let allowed =
            |action| is_allowed(Some(key), action, group_permissions, tenant_enabled_modules);
        matrix.push(ModulePermissions {
            module_key: key.to_string(),
            can_view: allowed(Action::View),
            can_edit: allowed(Action::Edit),
            can_delete: allowed(Action::Delete),
        });
    }
    matrix
}

/// Request-scoped snapshot of what a subject may reach.
///
/// Built once per inbound call by the session resolver and passed explicitly
/// to whatever needs to gate a feature.
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    pub user_id: Uuid,
    pub franchise_id: Option<FranchiseId>,
    pub group_id: Option<GroupId>,
    pub group_permissions: PermissionMap,
    pub enabled_modules: Vec<String>,
}

impl AccessContext {
    pub fn is_allowed(&self, module_key: Option<&str>, action: Action) -> bool {
        is_allowed(module_key, action, &self.group_permissions, &self.enabled_modules)
    }

    pub fn evaluate(&self, module_key: Option<&str>, action: Option<Action>) -> AccessDecision {
        evaluate(module_key, action, &self.group_permissions, &self.enabled_modules)
    }

    pub fn permission_matrix(&self) -> Vec<ModulePermissions> {
        permission_matrix(&self.group_permissions, &self.enabled_modules)
    }
}
