// ============================================================================
// CRM Core - Franchise Administration Service
// File: crates/crm-core/src/services/franchise_service.rs
// ============================================================================
//! Tenant module enablement

use std::sync::Arc;
use tracing::info;

use crm_shared::{FranchiseId, Pagination};

use crate::domain::{Franchise, ModuleRegistry, NewFranchise};
use crate::error::DomainError;
use crate::repositories::FranchiseRepository;

pub struct FranchiseService {
    franchises: Arc<dyn FranchiseRepository>,
    registry: Arc<ModuleRegistry>,
}

impl FranchiseService {
    pub fn new(franchises: Arc<dyn FranchiseRepository>, registry: Arc<ModuleRegistry>) -> Self {
        Self {
            franchises,
            registry,
        }
    }

    /// Creates a franchise with the given modules, accepted as keys or
    /// display names.
    pub async fn create(&self, name: &str, modules: &[String]) -> Result<Franchise, DomainError> {
        let keys = modules
            .iter()
            .map(|m| self.module_key(m))
            .collect::<Result<Vec<_>, _>>()?;

        let franchise = NewFranchise::new(name.to_string(), keys)?;
        let created = self.franchises.create(&franchise).await?;

        info!(
            "Franchise {} created with modules {:?}",
            created.id, created.modules_enabled
        );
        Ok(created)
    }

    pub async fn get(&self, id: FranchiseId) -> Result<Franchise, DomainError> {
        self.franchises
            .find_by_id(id)
            .await?
            .ok_or(DomainError::FranchiseNotFound(id))
    }

    pub async fn list(&self, pagination: Pagination) -> Result<Vec<Franchise>, DomainError> {
        self.franchises.list(pagination).await
    }

    /// Enables a module. Enabling an already enabled module is a no-op.
    pub async fn enable_module(&self, id: FranchiseId, module: &str) -> Result<Franchise, DomainError> {
        let key = self.module_key(module)?;
        let franchise = self
            .franchises
            .add_module(id, &key)
            .await?
            .ok_or(DomainError::FranchiseNotFound(id))?;

        info!("Module {} enabled for franchise {}", key, id);
        Ok(franchise)
    }

    pub async fn disable_module(&self, id: FranchiseId, module: &str) -> Result<Franchise, DomainError> {
        let key = self.module_key(module)?;
        let franchise = self
            .franchises
            .remove_module(id, &key)
            .await?
            .ok_or(DomainError::FranchiseNotFound(id))?;

        info!("Module {} disabled for franchise {}", key, id);
        Ok(franchise)
    }

    fn module_key(&self, input: &str) -> Result<String, DomainError> {
        self.registry
            .resolve(input)
            .map(|m| m.key.clone())
            .ok_or_else(|| DomainError::UnknownModule(input.to_string()))
    }
}
