//! # CRM Infrastructure
//! 
//! Persistence adapters for the repository ports: PostgreSQL for deployments,
//! in-memory maps for local runs and tests.

pub mod database;
pub mod memory;

pub use database::{create_pool, run_migrations, PgFranchiseRepository, PgPermissionGroupRepository, PgUserRepository};
pub use memory::{InMemoryFranchiseRepository, InMemoryPermissionGroupRepository, InMemoryUserRepository};
