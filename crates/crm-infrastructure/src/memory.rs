//! In-memory repository adapters
//!
//! Backed by `DashMap`; ids come from per-repository counters. Nothing is
//! persisted across restarts.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crm_core::domain::{
    CrmUser, Franchise, GroupStatus, NewFranchise, NewPermissionGroup, PermissionGroup,
    PermissionValue,
};
use crm_core::error::DomainError;
use crm_core::repositories::{FranchiseRepository, PermissionGroupRepository, UserRepository};
use crm_shared::{FranchiseId, GroupId, Pagination};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<Uuid, CrmUser>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: CrmUser) {
        self.users.insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CrmUser>, DomainError> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }
}

pub struct InMemoryFranchiseRepository {
    franchises: DashMap<FranchiseId, Franchise>,
    next_id: AtomicI64,
}

impl Default for InMemoryFranchiseRepository {
    fn default() -> Self {
        Self {
            franchises: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryFranchiseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FranchiseRepository for InMemoryFranchiseRepository {
    async fn find_by_id(&self, id: FranchiseId) -> Result<Option<Franchise>, DomainError> {
        Ok(self.franchises.get(&id).map(|f| f.value().clone()))
    }

    async fn list(&self, pagination: Pagination) -> Result<Vec<Franchise>, DomainError> {
        let mut all: Vec<Franchise> = self.franchises.iter().map(|f| f.value().clone()).collect();
        all.sort_by_key(|f| f.id);
        Ok(all
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect())
    }

    async fn create(&self, franchise: &NewFranchise) -> Result<Franchise, DomainError> {
        let lowered = franchise.name.to_lowercase();
        if self.franchises.iter().any(|f| f.name.to_lowercase() == lowered) {
            return Err(DomainError::FranchiseNameAlreadyExists(franchise.name.clone()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = franchise.clone().into_franchise(id);
        self.franchises.insert(id, created.clone());
        Ok(created)
    }

    async fn add_module(&self, id: FranchiseId, module_key: &str) -> Result<Option<Franchise>, DomainError> {
        Ok(self.franchises.get_mut(&id).map(|mut f| {
            f.enable_module(module_key);
            f.clone()
        }))
    }

    async fn remove_module(&self, id: FranchiseId, module_key: &str) -> Result<Option<Franchise>, DomainError> {
        Ok(self.franchises.get_mut(&id).map(|mut f| {
            f.disable_module(module_key);
            f.clone()
        }))
    }
}

pub struct InMemoryPermissionGroupRepository {
    groups: DashMap<GroupId, PermissionGroup>,
    next_id: AtomicI64,
}

impl Default for InMemoryPermissionGroupRepository {
    fn default() -> Self {
        Self {
            groups: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryPermissionGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a group as-is, bypassing validation. Lets callers load
    /// historical records, including malformed grants.
    pub fn insert(&self, group: PermissionGroup) {
        self.next_id.fetch_max(group.id + 1, Ordering::SeqCst);
        self.groups.insert(group.id, group);
    }
}

#[async_trait]
impl PermissionGroupRepository for InMemoryPermissionGroupRepository {
    async fn find_by_id(&self, id: GroupId) -> Result<Option<PermissionGroup>, DomainError> {
        Ok(self.groups.get(&id).map(|g| g.value().clone()))
    }

    async fn list_by_franchise(&self, franchise_id: FranchiseId) -> Result<Vec<PermissionGroup>, DomainError> {
        let mut groups: Vec<PermissionGroup> = self
            .groups
            .iter()
            .filter(|g| g.franchise_id == franchise_id)
            .map(|g| g.value().clone())
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    async fn create(&self, group: &NewPermissionGroup) -> Result<PermissionGroup, DomainError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = group.clone().into_group(id);
        self.groups.insert(id, created.clone());
        Ok(created)
    }

    async fn set_status(&self, id: GroupId, status: GroupStatus) -> Result<Option<PermissionGroup>, DomainError> {
        Ok(self.groups.get_mut(&id).map(|mut g| {
            g.set_status(status);
            g.clone()
        }))
    }

    async fn put_grant(
        &self,
        id: GroupId,
        module_key: &str,
        value: &PermissionValue,
    ) -> Result<Option<PermissionGroup>, DomainError> {
        Ok(self.groups.get_mut(&id).map(|mut g| {
            g.set_grant(module_key, value.clone());
            g.clone()
        }))
    }

    async fn remove_grant(&self, id: GroupId, module_key: &str) -> Result<Option<PermissionGroup>, DomainError> {
        Ok(self.groups.get_mut(&id).map(|mut g| {
            g.revoke_grant(module_key);
            g.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::domain::{PermissionMap, PermissionValue};

    #[tokio::test]
    async fn test_franchise_ids_are_sequential() {
        let repo = InMemoryFranchiseRepository::new();
        let a = repo
            .create(&NewFranchise::new("Loja A".to_string(), vec![]).unwrap())
            .await
            .unwrap();
        let b = repo
            .create(&NewFranchise::new("Loja B".to_string(), vec![]).unwrap())
            .await
            .unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(repo.list(Pagination::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_franchise_name() {
        let repo = InMemoryFranchiseRepository::new();
        let new = NewFranchise::new("Loja A".to_string(), vec![]).unwrap();
        repo.create(&new).await.unwrap();

        assert!(matches!(
            repo.create(&new).await,
            Err(DomainError::FranchiseNameAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_put_grant_persists() {
        let repo = InMemoryPermissionGroupRepository::new();
        let group = repo
            .create(&NewPermissionGroup::new(1, "Vendas".to_string(), PermissionMap::new()).unwrap())
            .await
            .unwrap();

        repo.put_grant(group.id, "leads", &PermissionValue::Unrestricted(true))
            .await
            .unwrap();

        let stored = repo.find_by_id(group.id).await.unwrap().unwrap();
        assert_eq!(stored.permissions.get("leads"), Some(&PermissionValue::Unrestricted(true)));
        assert!(stored.modified_at.is_some());
    }

    #[tokio::test]
    async fn test_writes_to_missing_group() {
        let repo = InMemoryPermissionGroupRepository::new();

        assert!(repo.put_grant(99, "leads", &true.into()).await.unwrap().is_none());
        assert!(repo.remove_grant(99, "leads").await.unwrap().is_none());
        assert!(repo.set_status(99, GroupStatus::Inactive).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_franchise_name_unique_ignoring_accented_case() {
        let repo = InMemoryFranchiseRepository::new();
        repo.create(&NewFranchise::new("Gestão Sul".to_string(), vec![]).unwrap())
            .await
            .unwrap();

        assert!(matches!(
            repo.create(&NewFranchise::new("GESTÃO SUL".to_string(), vec![]).unwrap())
                .await,
            Err(DomainError::FranchiseNameAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_advances_id_counter() {
        let repo = InMemoryPermissionGroupRepository::new();
        repo.insert(
            NewPermissionGroup::new(1, "Legado".to_string(), PermissionMap::new())
                .unwrap()
                .into_group(10),
        );

        let created = repo
            .create(&NewPermissionGroup::new(1, "Nova".to_string(), PermissionMap::new()).unwrap())
            .await
            .unwrap();
        assert_eq!(created.id, 11);
    }
}
