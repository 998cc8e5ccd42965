//! Domain services (business logic)

pub mod session_resolver;
pub mod franchise_service;
pub mod group_service;

pub use session_resolver::SessionResolver;
pub use franchise_service::FranchiseService;
pub use group_service::GroupService;
