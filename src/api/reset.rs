//! OTP password-reset endpoints.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_email;
use super::{ApiError, ApiResponse, AppState};

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub password_confirm: String,
}

/// POST /forgot-password
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validate_email(&payload.email)?;

    state.password_reset.forgot_password(&payload.email).await?;
    Ok(Json(ApiResponse::message_only(
        "A reset code has been sent to your email",
    )))
}

/// POST /change-password/{otp}
pub async fn reset_user_password(
    State(state): State<Arc<AppState>>,
    Path(otp): Path<i32>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .password_reset
        .reset_user_password(otp, &payload.password, &payload.password_confirm)
        .await?;
    Ok(Json(ApiResponse::message_only("Password reset successfully")))
}

/// POST /admin/change-password/{otp}
pub async fn reset_admin_password(
    State(state): State<Arc<AppState>>,
    Path(otp): Path<i32>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .password_reset
        .reset_admin_password(otp, &payload.password, &payload.password_confirm)
        .await?;
    Ok(Json(ApiResponse::message_only("Password reset successfully")))
}
