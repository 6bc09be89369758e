//! API middleware.

mod auth;

pub use auth::{admin_middleware, auth_middleware, authorize, ensure_owner, CurrentUser};
