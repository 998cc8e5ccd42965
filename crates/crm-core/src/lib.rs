//! # CRM Core
//! 
//! Domain entities, the access decision evaluator, repository ports, and
//! services for franchise-scoped permissions.

pub mod domain;
pub mod access;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use access::{evaluate, is_allowed, is_allowed_for_action_name, permission_matrix, AccessContext, AccessDecision, ModulePermissions};
pub use error::DomainError;
