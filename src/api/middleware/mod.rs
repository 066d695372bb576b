//! API middleware.

mod auth;

pub use auth::{require_roles, session_middleware, session_token};
