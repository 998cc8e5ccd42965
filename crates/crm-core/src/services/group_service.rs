// ============================================================================
// CRM Core - Group Administration Service
// File: crates/crm-core/src/services/group_service.rs
// ============================================================================
//! Permission group definitions and per-module grants

use std::sync::Arc;
use tracing::{info, warn};

use crm_shared::{FranchiseId, GroupId};

use crate::domain::{
    GroupStatus, ModuleRegistry, NewPermissionGroup, PermissionGroup, PermissionMap,
    PermissionValue,
};
use crate::error::DomainError;
use crate::repositories::{FranchiseRepository, PermissionGroupRepository};

pub struct GroupService {
    groups: Arc<dyn PermissionGroupRepository>,
    franchises: Arc<dyn FranchiseRepository>,
    registry: Arc<ModuleRegistry>,
}

impl GroupService {
    pub fn new(
        groups: Arc<dyn PermissionGroupRepository>,
        franchises: Arc<dyn FranchiseRepository>,
        registry: Arc<ModuleRegistry>,
    ) -> Self {
        Self {
            groups,
            franchises,
            registry,
        }
    }

    /// Creates a group inside an existing franchise.
    ///
    /// Grant keys are normalized through the module registry; values are
    /// stored in whichever shape they arrive in.
    pub async fn create(
        &self,
        franchise_id: FranchiseId,
        name: &str,
        permissions: PermissionMap,
    ) -> Result<PermissionGroup, DomainError> {
        if self.franchises.find_by_id(franchise_id).await?.is_none() {
            return Err(DomainError::FranchiseNotFound(franchise_id));
        }

        let mut normalized = PermissionMap::new();
        for (module, value) in permissions.iter() {
            let key = self.module_key(module)?;
            Self::check_writable(&key, value)?;
            if normalized.insert(key.clone(), value.clone()).is_some() {
                return Err(DomainError::ValidationError(format!(
                    "More than one grant names module {}",
                    key
                )));
            }
        }

        let group = NewPermissionGroup::new(franchise_id, name.to_string(), normalized)?;

        let lowered = group.name.to_lowercase();
        let existing = self.groups.list_by_franchise(franchise_id).await?;
        if existing.iter().any(|g| g.name.to_lowercase() == lowered) {
            warn!("Group name {} already used in franchise {}", group.name, franchise_id);
            return Err(DomainError::GroupNameAlreadyExists {
                franchise_id,
                name: group.name,
            });
        }

        let created = self.groups.create(&group).await?;
        info!(
            "Group {} ({}) created in franchise {} with {} grants",
            created.id,
            created.name,
            franchise_id,
            created.permissions.len()
        );
        Ok(created)
    }

    pub async fn get(&self, id: GroupId) -> Result<PermissionGroup, DomainError> {
        self.groups
            .find_by_id(id)
            .await?
            .ok_or(DomainError::GroupNotFound(id))
    }

    pub async fn list_by_franchise(
        &self,
        franchise_id: FranchiseId,
    ) -> Result<Vec<PermissionGroup>, DomainError> {
        self.groups.list_by_franchise(franchise_id).await
    }

    pub async fn set_status(
        &self,
        id: GroupId,
        status: GroupStatus,
    ) -> Result<PermissionGroup, DomainError> {
        let updated = self
            .groups
            .set_status(id, status)
            .await?
            .ok_or(DomainError::GroupNotFound(id))?;

        info!("Group {} is now {}", id, status.as_str());
        Ok(updated)
    }

    /// Stores `value` as the group's grant for `module`, replacing any
    /// previous grant. Both the legacy boolean and the granular record are
    /// accepted as given. Grants on other modules are left untouched.
    pub async fn set_grant(
        &self,
        id: GroupId,
        module: &str,
        value: PermissionValue,
    ) -> Result<PermissionGroup, DomainError> {
        let key = self.module_key(module)?;
        Self::check_writable(&key, &value)?;

        let updated = self
            .groups
            .put_grant(id, &key, &value)
            .await?
            .ok_or(DomainError::GroupNotFound(id))?;

        info!(
            "Group {} (franchise {}) granted {} as {}",
            id,
            updated.franchise_id,
            key,
            value.shape()
        );
        Ok(updated)
    }

    pub async fn revoke_grant(&self, id: GroupId, module: &str) -> Result<PermissionGroup, DomainError> {
        let key = self.module_key(module)?;
        let updated = self
            .groups
            .remove_grant(id, &key)
            .await?
            .ok_or(DomainError::GroupNotFound(id))?;

        info!("Group {} lost grant on {}", id, key);
        Ok(updated)
    }

    fn module_key(&self, input: &str) -> Result<String, DomainError> {
        self.registry
            .resolve(input)
            .map(|m| m.key.clone())
            .ok_or_else(|| DomainError::UnknownModule(input.to_string()))
    }

    fn check_writable(key: &str, value: &PermissionValue) -> Result<(), DomainError> {
        if value.is_recognized() {
            Ok(())
        } else {
            Err(DomainError::ValidationError(format!(
                "Grant for {} must be a boolean or a can_view/can_edit/can_delete record",
                key
            )))
        }
    }
}
