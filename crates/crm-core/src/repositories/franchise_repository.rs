//! Franchise repository trait (port)

use async_trait::async_trait;
use crm_shared::{FranchiseId, Pagination};
use crate::domain::{Franchise, NewFranchise};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FranchiseRepository: Send + Sync {
    async fn find_by_id(&self, id: FranchiseId) -> Result<Option<Franchise>, DomainError>;
    async fn list(&self, pagination: Pagination) -> Result<Vec<Franchise>, DomainError>;
    async fn create(&self, franchise: &NewFranchise) -> Result<Franchise, DomainError>;
    /// Adds `module_key` unless already present. `None` when the franchise
    /// does not exist.
    async fn add_module(&self, id: FranchiseId, module_key: &str) -> Result<Option<Franchise>, DomainError>;
    async fn remove_module(&self, id: FranchiseId, module_key: &str) -> Result<Option<Franchise>, DomainError>;
}
