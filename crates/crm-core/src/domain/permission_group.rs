// ============================================================================
// CRM Core - Permission Group Entity
// File: crates/crm-core/src/domain/permission_group.rs
// Description: Franchise-scoped group carrying per-module grants
// ============================================================================

use chrono::{DateTime, Utc};
use crm_shared::{FranchiseId, GroupId};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::permission::{PermissionMap, PermissionValue};

/// Group lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    #[default]
    Active,
    Inactive,
}

impl GroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Active => "active",
            GroupStatus::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(GroupStatus::Active),
            "inactive" => Some(GroupStatus::Inactive),
            _ => None,
        }
    }
}

/// Permission Group entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub id: GroupId,
    pub franchise_id: FranchiseId,
    pub name: String,
    pub status: GroupStatus,
    pub permissions: PermissionMap,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl PermissionGroup {
    pub fn is_active(&self) -> bool {
        self.status == GroupStatus::Active
    }

    pub fn set_status(&mut self, status: GroupStatus) {
        self.status = status;
        self.modified_at = Some(Utc::now());
    }

    /// Stores `value` for `module_key` as given, replacing any previous grant.
    pub fn set_grant(&mut self, module_key: &str, value: PermissionValue) -> Option<PermissionValue> {
        self.modified_at = Some(Utc::now());
        self.permissions.insert(module_key, value)
    }

    pub fn revoke_grant(&mut self, module_key: &str) -> Option<PermissionValue> {
        let previous = self.permissions.remove(module_key);
        if previous.is_some() {
            self.modified_at = Some(Utc::now());
        }
        previous
    }
}

/// Validated input for a group that has not been persisted yet.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPermissionGroup {
    pub franchise_id: FranchiseId,

    #[validate(length(min = 2, max = 100, message = "Group name must be between 2 and 100 characters"))]
    pub name: String,

    pub status: GroupStatus,
    pub permissions: PermissionMap,
}

impl NewPermissionGroup {
    pub fn new(
        franchise_id: FranchiseId,
        name: String,
        permissions: PermissionMap,
    ) -> Result<Self, validator::ValidationErrors> {
        let group = Self {
            franchise_id,
            name: name.trim().to_string(),
            status: GroupStatus::Active,
            permissions,
        };

        group.validate()?;
        Ok(group)
    }

    /// Materializes the record with a storage-assigned id.
    pub fn into_group(self, id: GroupId) -> PermissionGroup {
        PermissionGroup {
            id,
            franchise_id: self.franchise_id,
            name: self.name,
            status: self.status,
            permissions: self.permissions,
            created_at: Utc::now(),
            modified_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GranularPermission;

    #[test]
    fn test_create_group() {
        let group = NewPermissionGroup::new(1, "  Vendedores ".to_string(), PermissionMap::new());
        assert!(group.is_ok());
        assert_eq!(group.unwrap().name, "Vendedores");
    }

    #[test]
    fn test_group_name_too_short() {
        let group = NewPermissionGroup::new(1, "A".to_string(), PermissionMap::new());
        assert!(group.is_err());
    }

    #[test]
    fn test_set_and_revoke_grant() {
        let mut group = NewPermissionGroup::new(1, "Gerentes".to_string(), PermissionMap::new())
            .unwrap()
            .into_group(7);

        assert!(group.set_grant("produtos", true.into()).is_none());
        let previous = group.set_grant("produtos", GranularPermission::read_only().into());
        assert_eq!(previous, Some(PermissionValue::Unrestricted(true)));

        assert!(group.revoke_grant("produtos").is_some());
        assert!(group.revoke_grant("produtos").is_none());
        assert!(group.permissions.is_empty());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(GroupStatus::from_str("inactive"), Some(GroupStatus::Inactive));
        assert_eq!(GroupStatus::from_str("archived"), None);
        assert_eq!(GroupStatus::Active.as_str(), "active");
    }
}
