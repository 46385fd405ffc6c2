use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::AuthContext;
use super::validation::validate_record_id;
use super::{ApiError, ApiResponse, AppState};
use crate::services::{ArticleInfo, ToggleOutcome};

/// GET /article/like/{id}
///
/// Toggles the bookmark edge for the authenticated user.
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(article_id): Path<i32>,
) -> Result<Json<ApiResponse<ToggleOutcome>>, ApiError> {
    validate_record_id(article_id)?;

    let outcome = state.like_service.toggle(ctx.id, article_id).await?;
    let message = match outcome {
        ToggleOutcome::Liked => "Article liked",
        ToggleOutcome::Unliked => "Article unliked",
    };

    Ok(Json(ApiResponse::success(message, outcome)))
}

/// GET /user/liked
pub async fn list_liked(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<Vec<ArticleInfo>>>, ApiError> {
    let articles = state.like_service.list_by_user(ctx.id).await?;
    Ok(Json(ApiResponse::success("Liked articles fetched", articles)))
}
