//! # CRM Security
//! 
//! Bearer token handling used to identify the session subject.

pub mod jwt;

pub use jwt::{Claims, JwtError, JwtService};
