//! Permission group repository trait (port)

use async_trait::async_trait;
use crm_shared::{FranchiseId, GroupId};
use crate::domain::{GroupStatus, NewPermissionGroup, PermissionGroup, PermissionValue};
use crate::error::DomainError;

/// Single-field writes are applied by the store itself, so concurrent edits
/// on different modules of the same group never overwrite each other.
/// Writes return `None` when the group does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionGroupRepository: Send + Sync {
    async fn find_by_id(&self, id: GroupId) -> Result<Option<PermissionGroup>, DomainError>;
    async fn list_by_franchise(&self, franchise_id: FranchiseId) -> Result<Vec<PermissionGroup>, DomainError>;
    async fn create(&self, group: &NewPermissionGroup) -> Result<PermissionGroup, DomainError>;
    async fn set_status(&self, id: GroupId, status: GroupStatus) -> Result<Option<PermissionGroup>, DomainError>;
    async fn put_grant(
        &self,
        id: GroupId,
        module_key: &str,
        value: &PermissionValue,
    ) -> Result<Option<PermissionGroup>, DomainError>;
    async fn remove_grant(&self, id: GroupId, module_key: &str) -> Result<Option<PermissionGroup>, DomainError>;
}
