//! Domain errors

use crm_shared::{FranchiseId, GroupId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found")]
    UserNotFound,

    #[error("User not active")]
    UserNotActive,

    #[error("Franchise not found: {0}")]
    FranchiseNotFound(FranchiseId),

    #[error("Franchise name already exists: {0}")]
    FranchiseNameAlreadyExists(String),

    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    #[error("Group name already exists in franchise {franchise_id}: {name}")]
    GroupNameAlreadyExists { franchise_id: FranchiseId, name: String },

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}
