//! Middleware for the Wanderwise API
//!
//! Request tracing, rate limiting, security headers, and the bearer-token
//! authentication extractors.

pub mod auth;
mod rate_limiter;
mod security;
mod tracing;

pub use auth::{require_roles, AdminUser, AuthenticatedUser, OptionalUser};
pub use rate_limiter::{rate_limit_layer, RateLimiter};
pub use security::security_headers;
pub use tracing::request_tracing;
