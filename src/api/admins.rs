use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use super::auth::{AuthContext, auth_cookie, removal_cookie};
use super::validation::{validate_email, validate_username};
use super::{ApiError, ApiResponse, AppState};
use crate::services::admin_service::{RegisterAdmin, UpdateAdmin};
use crate::services::{AdminInfo, AdminLoginResult};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub photo_profile: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

/// POST /admin/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AdminInfo>>), ApiError> {
    validate_username(&payload.username)?;
    validate_email(&payload.email)?;

    let info = state
        .admin_service
        .register(RegisterAdmin {
            name: payload.name,
            username: payload.username,
            email: payload.email,
            password: payload.password,
            password_confirm: payload.password_confirm,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Registration successful, please verify your email",
            info,
        )),
    ))
}

/// GET /admin/verifyemail/{code}
pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.admin_service.verify_email(&code).await?;
    Ok(Json(ApiResponse::message_only("Email verified successfully")))
}

/// POST /admin/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<AdminLoginResult>>), ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let result = state
        .admin_service
        .login(&payload.username, &payload.password)
        .await?;

    let cookie = auth_cookie(
        result.token.clone(),
        state.tokens.ttl(),
        state.config.server.secure_cookies,
    );

    Ok((
        jar.add(cookie),
        Json(ApiResponse::success("Login successful", result)),
    ))
}

/// GET /admin/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<()>>) {
    (
        jar.add(removal_cookie()),
        Json(ApiResponse::message_only("Logged out")),
    )
}

/// POST /admin/change-password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .admin_service
        .change_password(
            ctx.id,
            &payload.old_password,
            &payload.new_password,
            &payload.confirm_password,
        )
        .await?;

    tracing::info!("Password changed for administrator: {}", ctx.username);
    Ok(Json(ApiResponse::message_only("Password updated successfully")))
}

/// GET /admin
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AdminInfo>>>, ApiError> {
    let admins = state.admin_service.get_all().await?;
    Ok(Json(ApiResponse::success("Administrators fetched", admins)))
}

/// GET /admin/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<AdminInfo>>, ApiError> {
    let info = state.admin_service.get_by_id(ctx.id).await?;
    Ok(Json(ApiResponse::success("Profile fetched", info)))
}

/// PUT /admin
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<AdminInfo>>, ApiError> {
    if let Some(email) = payload.email.as_deref() {
        validate_email(email)?;
    }

    let info = state
        .admin_service
        .update(
            ctx.id,
            UpdateAdmin {
                name: payload.name,
                email: payload.email,
                role: payload.role,
                photo_profile: payload.photo_profile,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success("Profile updated", info)))
}

/// DELETE /admin
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    jar: CookieJar,
    Json(payload): Json<DeleteAccountRequest>,
) -> Result<(CookieJar, Json<ApiResponse<()>>), ApiError> {
    state.admin_service.delete(ctx.id, &payload.password).await?;

    tracing::info!("Account deleted for administrator: {}", ctx.username);
    Ok((
        jar.add(removal_cookie()),
        Json(ApiResponse::message_only("Account deleted")),
    ))
}
