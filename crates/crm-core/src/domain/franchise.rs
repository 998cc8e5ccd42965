// ============================================================================
// CRM Core - Franchise Entity
// File: crates/crm-core/src/domain/franchise.rs
// Description: Tenant record with its licensed modules
// ============================================================================

use chrono::{DateTime, Utc};
use crm_shared::FranchiseId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Franchise (tenant) entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Franchise {
    pub id: FranchiseId,
    pub name: String,
    pub is_active: bool,
    /// Module keys licensed for this tenant.
    pub modules_enabled: Vec<String>,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Franchise {
    pub fn has_module(&self, module_key: &str) -> bool {
        self.modules_enabled.iter().any(|m| m == module_key)
    }

    /// Returns `false` when the module was already enabled.
    pub fn enable_module(&mut self, module_key: &str) -> bool {
        if self.has_module(module_key) {
            return false;
        }
        self.modules_enabled.push(module_key.to_string());
        self.modified_at = Some(Utc::now());
        true
    }

    /// Returns `false` when the module was not enabled.
    pub fn disable_module(&mut self, module_key: &str) -> bool {
        let before = self.modules_enabled.len();
        self.modules_enabled.retain(|m| m != module_key);
        let changed = self.modules_enabled.len() != before;
        if changed {
            self.modified_at = Some(Utc::now());
        }
        changed
    }
}

/// Validated input for a franchise that has not been persisted yet.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewFranchise {
    #[validate(length(min = 2, max = 100, message = "Franchise name must be between 2 and 100 characters"))]
    pub name: String,

    pub modules_enabled: Vec<String>,
}

impl NewFranchise {
    pub fn new(name: String, modules_enabled: Vec<String>) -> Result<Self, validator::ValidationErrors> {
        let mut unique: Vec<String> = Vec::with_capacity(modules_enabled.len());
        for key in modules_enabled {
            if !unique.contains(&key) {
                unique.push(key);
            }
        }

        let franchise = Self {
            name: name.trim().to_string(),
            modules_enabled: unique,
        };

        franchise.validate()?;
        Ok(franchise)
    }

    pub fn into_franchise(self, id: FranchiseId) -> Franchise {
        Franchise {
            id,
            name: self.name,
            is_active: true,
            modules_enabled: self.modules_enabled,
            created_at: Utc::now(),
            modified_at: None,
        }
    }
}
