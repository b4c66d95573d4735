//! Authentication handlers

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::{csrf_cookie, generate_csrf_token, CurrentUser, CSRF_COOKIE_NAME};
use crate::models::User;
use crate::services::AuthService;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Serialize)]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

/// Login endpoint handler
///
/// A successful login also rotates the CSRF cookie, invalidating any token
/// issued for the previous session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let tokens = auth_service.login(&body.email, &body.password).await?;

    let jar = jar.add(csrf_cookie(generate_csrf_token()));

    Ok((
        jar,
        Json(LoginResponse {
            access_token: tokens.access_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        }),
    ))
}

/// Issue (or return the existing) CSRF token
///
/// Called by the frontend, and by externally-scheduled jobs before they hit
/// any state-changing admin endpoint.
pub async fn issue_csrf_token(jar: CookieJar) -> (CookieJar, Json<CsrfTokenResponse>) {
    if let Some(existing) = jar.get(CSRF_COOKIE_NAME) {
        let token = existing.value().to_string();
        return (jar, Json(CsrfTokenResponse { csrf_token: token }));
    }

    let token = generate_csrf_token();
    let jar = jar.add(csrf_cookie(token.clone()));
    (jar, Json(CsrfTokenResponse { csrf_token: token }))
}

/// Current user profile
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let user = auth_service.me(current_user.0.user_id).await?;
    Ok(Json(user))
}
