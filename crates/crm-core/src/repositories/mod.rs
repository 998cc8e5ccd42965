//! Repository traits (ports)

pub mod user_repository;
pub mod franchise_repository;
pub mod group_repository;

pub use user_repository::UserRepository;
pub use franchise_repository::FranchiseRepository;
pub use group_repository::PermissionGroupRepository;

#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use franchise_repository::MockFranchiseRepository;
#[cfg(test)]
pub use group_repository::MockPermissionGroupRepository;
