// ============================================================================
// CRM Core - Session Resolver
// File: crates/crm-core/src/services/session_resolver.rs
// ============================================================================
//! Resolves an authenticated subject into its access context

use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::access::AccessContext;
use crate::domain::{CrmUser, PermissionMap};
use crate::error::DomainError;
use crate::repositories::{FranchiseRepository, PermissionGroupRepository, UserRepository};

/// Joins user -> group and user -> franchise into an [`AccessContext`].
pub struct SessionResolver {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn PermissionGroupRepository>,
    franchises: Arc<dyn FranchiseRepository>,
}

impl SessionResolver {
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn PermissionGroupRepository>,
        franchises: Arc<dyn FranchiseRepository>,
    ) -> Self {
        Self {
            users,
            groups,
            franchises,
        }
    }

    /// Builds the context for `user_id`.
    ///
    /// Missing, inactive, or foreign-franchise groups contribute no
    /// permissions; a missing or inactive franchise contributes no enabled
    /// modules.
    pub async fn resolve(&self, user_id: &Uuid) -> Result<AccessContext, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        if !user.is_active {
            warn!("Session rejected: user {} is not active", user_id);
            return Err(DomainError::UserNotActive);
        }

        let enabled_modules = self.enabled_modules(&user).await?;
        let group_permissions = self.group_permissions(&user).await?;

        debug!(
            "Resolved session for user {}: {} enabled modules, {} grants",
            user_id,
            enabled_modules.len(),
            group_permissions.len()
        );

        Ok(AccessContext {
            user_id: user.id,
            franchise_id: user.franchise_id,
            group_id: user.group_id,
            group_permissions,
            enabled_modules,
        })
    }

    async fn enabled_modules(&self, user: &CrmUser) -> Result<Vec<String>, DomainError> {
        let Some(franchise_id) = user.franchise_id else {
            return Ok(Vec::new());
        };

        match self.franchises.find_by_id(franchise_id).await? {
            Some(franchise) if franchise.is_active => Ok(franchise.modules_enabled),
            Some(_) => {
                debug!("Franchise {} is inactive; user {} gets no modules", franchise_id, user.id);
                Ok(Vec::new())
            }
            None => {
                warn!("User {} references missing franchise {}", user.id, franchise_id);
                Ok(Vec::new())
            }
        }
    }

    async fn group_permissions(&self, user: &CrmUser) -> Result<PermissionMap, DomainError> {
        let Some(group_id) = user.group_id else {
            return Ok(PermissionMap::new());
        };

        let Some(group) = self.groups.find_by_id(group_id).await? else {
            warn!("User {} references missing group {}", user.id, group_id);
            return Ok(PermissionMap::new());
        };

        if !group.is_active() {
            debug!("Group {} is inactive; user {} gets no grants", group_id, user.id);
            return Ok(PermissionMap::new());
        }

        if Some(group.franchise_id) != user.franchise_id {
            warn!(
                "Group {} belongs to franchise {}, not to user {}'s franchise {:?}",
                group_id, group.franchise_id, user.id, user.franchise_id
            );
            return Ok(PermissionMap::new());
        }

        Ok(group.permissions)
    }
}
