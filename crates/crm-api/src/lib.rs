//! # CRM API
//! 
//! HTTP handlers, request-scoped subject extraction, and response envelopes.

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
