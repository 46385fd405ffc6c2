use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::AuthContext;
use super::types::{PageMeta, PaginatedResponse};
use super::validation::validate_record_id;
use super::{ApiError, ApiResponse, AppState};
use crate::services::ArticleInfo;
use crate::services::article_service::{CreateArticle, UpdateArticle, Upload};

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Collected multipart form fields for create/update.
#[derive(Default)]
struct ArticleForm {
    title: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    label: Option<String>,
    image: Option<Upload>,
    thumbnail: Option<Upload>,
}

async fn read_form(mut multipart: Multipart) -> Result<ArticleForm, ApiError> {
    let mut form = ArticleForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        match name.as_str() {
            "title" | "abstract" | "description" | "label" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Invalid field '{name}': {e}")))?;
                match name.as_str() {
                    "title" => form.title = Some(value),
                    "abstract" => form.summary = Some(value),
                    "description" => form.description = Some(value),
                    _ => form.label = Some(value),
                }
            }
            "image" | "thumbnail" => {
                let filename = field
                    .file_name()
                    .map(ToString::to_string)
                    .ok_or_else(|| ApiError::validation(format!("Field '{name}' must be a file")))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Invalid upload '{name}': {e}")))?;
                let upload = Upload {
                    filename,
                    bytes: bytes.to_vec(),
                };
                if name == "image" {
                    form.image = Some(upload);
                } else {
                    form.thumbnail = Some(upload);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// GET /article
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<ArticleInfo>>, ApiError> {
    // Unparsable page/limit fall back to the defaults rather than erroring.
    let page = query.page.and_then(|p| p.parse().ok());
    let limit = query.limit.and_then(|l| l.parse().ok());

    let result = state.article_service.list(page, limit).await?;

    Ok(Json(PaginatedResponse::new(
        "Articles fetched",
        result.items,
        PageMeta {
            page: result.page,
            limit: result.limit,
            total: result.total,
        },
    )))
}

/// GET /article/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ArticleInfo>>, ApiError> {
    validate_record_id(id)?;
    let article = state.article_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success("Article fetched", article)))
}

/// POST /admin/article
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ArticleInfo>>), ApiError> {
    let form = read_form(multipart).await?;

    let title = form
        .title
        .ok_or_else(|| ApiError::validation("Title is required"))?;

    let article = state
        .article_service
        .create(
            ctx.id,
            CreateArticle {
                title,
                summary: form.summary.unwrap_or_default(),
                description: form.description.unwrap_or_default(),
                label: form.label.unwrap_or_default(),
                image: form.image,
                thumbnail: form.thumbnail,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Article created", article)),
    ))
}

/// PUT /admin/article/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ArticleInfo>>, ApiError> {
    validate_record_id(id)?;
    let form = read_form(multipart).await?;

    let article = state
        .article_service
        .update(
            id,
            UpdateArticle {
                title: form.title,
                summary: form.summary,
                description: form.description,
                label: form.label,
                image: form.image,
                thumbnail: form.thumbnail,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success("Article updated", article)))
}

/// DELETE /admin/article/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validate_record_id(id)?;
    state.article_service.delete(id).await?;
    Ok(Json(ApiResponse::message_only("Article deleted")))
}
