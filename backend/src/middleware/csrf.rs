//! CSRF protection middleware
//!
//! Double-submit cookie pattern: the server issues a `csrf-token` cookie the
//! frontend can read, and every state-changing request must echo the same
//! value in the `x-csrf-token` header. Tokens are rotated on login.

use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::error::AppError;

/// Name of the cookie carrying the CSRF token (readable by the frontend)
pub const CSRF_COOKIE_NAME: &str = "csrf-token";

/// Header the frontend sends the token back in
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";

/// Generate a CSRF token (256 bits of randomness, hex encoded)
pub fn generate_csrf_token() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

/// Build the CSRF cookie for a token
///
/// Deliberately not `HttpOnly`: the frontend must be able to read it to echo
/// it in the header.
pub fn csrf_cookie(token: String) -> Cookie<'static> {
    Cookie::build((CSRF_COOKIE_NAME, token))
        .path("/")
        .http_only(false)
        .same_site(SameSite::Lax)
        .build()
}

/// CSRF validation middleware for state-changing methods
///
/// Safe methods pass through untouched; anything else must carry a cookie
/// and a header with identical tokens. Runs behind the admin gate, so
/// authorization failures short-circuit first.
pub async fn csrf_middleware(request: Request, next: Next) -> Response {
    if is_safe_method(request.method()) {
        return next.run(request).await;
    }

    let jar = CookieJar::from_headers(request.headers());
    let cookie_token = jar.get(CSRF_COOKIE_NAME).map(|c| c.value().to_string());
    let header_token = request
        .headers()
        .get(CSRF_HEADER_NAME)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    match (cookie_token, header_token) {
        (Some(cookie), Some(header)) if constant_time_eq(cookie.as_bytes(), header.as_bytes()) => {
            next.run(request).await
        }
        _ => AppError::CsrfRejected.into_response(),
    }
}

fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Compare two tokens without early exit, so response timing does not leak
/// how many leading bytes matched
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_hex() {
        let a = generate_csrf_token();
        let b = generate_csrf_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn constant_time_comparison() {
        assert!(constant_time_eq(b"abc123", b"abc123"));
        assert!(!constant_time_eq(b"abc123", b"abc124"));
        assert!(!constant_time_eq(b"abc", b"abc123"));
    }
}
