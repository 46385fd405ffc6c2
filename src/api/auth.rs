use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::services::token::Claims;
use crate::services::{ROLE_ADMIN, ROLE_SUPER_ADMIN};

/// Name of the HTTP-only cookie carrying the JWT.
pub const COOKIE_NAME: &str = "bEDUCookie";

/// Verified identity of the caller, inserted into request extensions by the
/// auth middleware.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            username: claims.username,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Token lookup order:
/// 1. `Authorization: Bearer <token>` header
/// 2. the `bEDUCookie` cookie
fn extract_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    jar.get(COOKIE_NAME).map(|c| c.value().to_string())
}

fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    jar: &CookieJar,
) -> Result<AuthContext, ApiError> {
    let token = extract_token(headers, jar)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let claims = state.tokens.verify(&token)?;
    Ok(claims.into())
}

/// Middleware for administrator routes.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = authenticate(&state, request.headers(), &jar)?;

    if ctx.role != ROLE_ADMIN && ctx.role != ROLE_SUPER_ADMIN {
        return Err(ApiError::Forbidden(
            "Administrator access required".to_string(),
        ));
    }

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Middleware for regular-user routes.
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = authenticate(&state, request.headers(), &jar)?;

    if ctx.role != "User" {
        return Err(ApiError::Forbidden("User access required".to_string()));
    }

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Builds the auth cookie set on login.
pub fn auth_cookie(token: String, ttl: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

/// Builds an expired cookie that removes the auth cookie on logout.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .build()
}
