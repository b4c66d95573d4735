//! HTTP middleware for authentication and CSRF protection

pub mod auth;
pub mod csrf;

pub use auth::{auth_middleware, require_admin, AuthUser, CurrentUser};
pub use csrf::{csrf_cookie, csrf_middleware, generate_csrf_token, CSRF_COOKIE_NAME};
