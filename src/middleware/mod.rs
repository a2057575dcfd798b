//! HTTP middleware

pub mod auth;
pub mod logging;
pub mod rate_limit;
pub mod roles;

pub use auth::{AuthenticatedUser, auth_middleware};
pub use logging::logging_middleware;
pub use rate_limit::rate_limit_middleware;
