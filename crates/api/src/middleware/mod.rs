//! HTTP middleware.

pub mod auth;

pub use auth::{AuthUser, MaybeAuthUser, auth_middleware, require_admin};
