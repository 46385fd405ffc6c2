//! Domain service for articles.

use serde::Serialize;
use thiserror::Error;

use crate::entities::articles;

#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("Article not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for ArticleError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleInfo {
    pub id: i32,
    pub administrator_id: i32,
    pub title: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub description: String,
    pub image: String,
    pub thumbnail: String,
    pub label: String,
    pub slug: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<articles::Model> for ArticleInfo {
    fn from(m: articles::Model) -> Self {
        Self {
            id: m.id,
            administrator_id: m.administrator_id,
            title: m.title,
            summary: m.summary,
            description: m.description,
            image: m.image,
            thumbnail: m.thumbnail,
            label: m.label,
            slug: m.slug,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// An uploaded file as it came out of the multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CreateArticle {
    pub title: String,
    pub summary: String,
    pub description: String,
    pub label: String,
    pub image: Option<Upload>,
    pub thumbnail: Option<Upload>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub label: Option<String>,
    pub image: Option<Upload>,
    pub thumbnail: Option<Upload>,
}

/// A single page of articles with its pagination numbers.
#[derive(Debug, Clone)]
pub struct ArticlePage {
    pub items: Vec<ArticleInfo>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

/// Domain service trait for articles.
#[async_trait::async_trait]
pub trait ArticleService: Send + Sync {
    /// Lists active articles. Missing or zero page/limit fall back to
    /// page 1 / limit 10; limit is capped at the configured maximum.
    async fn list(&self, page: Option<u64>, limit: Option<u64>)
    -> Result<ArticlePage, ArticleError>;

    async fn get_by_id(&self, id: i32) -> Result<ArticleInfo, ArticleError>;

    /// Creates an article owned by `administrator_id`, deriving the slug
    /// from the title and persisting any uploaded assets.
    async fn create(
        &self,
        administrator_id: i32,
        req: CreateArticle,
    ) -> Result<ArticleInfo, ArticleError>;

    /// Updates an article. A replaced asset file is removed from disk only
    /// when no other active article still references it.
    async fn update(&self, id: i32, req: UpdateArticle) -> Result<ArticleInfo, ArticleError>;

    /// Soft-deletes the article and removes its asset files under the same
    /// reference-count rule as `update`.
    async fn delete(&self, id: i32) -> Result<(), ArticleError>;
}

/// Derives a URL slug from an article title: lowercase, runs of
/// non-alphanumeric characters collapsed to a single hyphen.
#[must_use]
pub fn create_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;

    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
