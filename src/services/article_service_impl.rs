//! `SeaORM` implementation of the `ArticleService` trait.

use async_trait::async_trait;
use tracing::warn;

use crate::db::{NewArticle, Store};
use crate::services::article_service::{
    ArticleError, ArticleInfo, ArticlePage, ArticleService, CreateArticle, UpdateArticle, Upload,
    create_slug,
};
use crate::services::assets::AssetStore;

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;

pub struct SeaOrmArticleService {
    store: Store,
    assets: AssetStore,
    max_page_size: u64,
}

impl SeaOrmArticleService {
    #[must_use]
    pub const fn new(store: Store, assets: AssetStore, max_page_size: u64) -> Self {
        Self {
            store,
            assets,
            max_page_size,
        }
    }

    async fn save_upload(&self, upload: Upload) -> Result<String, ArticleError> {
        AssetStore::validate_extension(&upload.filename).map_err(ArticleError::Validation)?;
        self.assets
            .save(&upload.filename, &upload.bytes)
            .await
            .map_err(Into::into)
    }

    /// Removes `filename` from disk unless another active article (other
    /// than `exclude_id`) still references it.
    async fn remove_asset_if_unreferenced(&self, filename: &str, exclude_id: i32) {
        if filename.is_empty() {
            return;
        }
        match self
            .store
            .count_articles_referencing_asset(filename, exclude_id)
            .await
        {
            Ok(0) => {
                if let Err(e) = self.assets.delete(filename).await {
                    warn!("Failed to remove asset file {filename}: {e:#}");
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to count references for {filename}: {e:#}"),
        }
    }
}

#[async_trait]
impl ArticleService for SeaOrmArticleService {
    async fn list(
        &self,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> Result<ArticlePage, ArticleError> {
        let page = match page {
            Some(p) if p >= 1 => p,
            _ => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(l) if l >= 1 => l.min(self.max_page_size),
            _ => DEFAULT_LIMIT,
        };

        let (items, total) = self.store.list_articles(page, limit).await?;

        Ok(ArticlePage {
            items: items.into_iter().map(Into::into).collect(),
            page,
            limit,
            total,
        })
    }

    async fn get_by_id(&self, id: i32) -> Result<ArticleInfo, ArticleError> {
        let article = self
            .store
            .get_article_by_id(id)
            .await?
            .ok_or(ArticleError::NotFound)?;
        Ok(article.into())
    }

    async fn create(
        &self,
        administrator_id: i32,
        req: CreateArticle,
    ) -> Result<ArticleInfo, ArticleError> {
        if req.title.trim().is_empty() {
            return Err(ArticleError::Validation("Title must not be empty".to_string()));
        }

        let image = match req.image {
            Some(upload) => self.save_upload(upload).await?,
            None => String::new(),
        };
        let thumbnail = match req.thumbnail {
            Some(upload) => self.save_upload(upload).await?,
            None => String::new(),
        };

        let slug = create_slug(&req.title);
        let article = NewArticle {
            administrator_id,
            title: req.title,
            summary: req.summary,
            description: req.description,
            image,
            thumbnail,
            label: req.label,
            slug,
        };

        let model = self.store.create_article(article).await?;
        Ok(model.into())
    }

    async fn update(&self, id: i32, req: UpdateArticle) -> Result<ArticleInfo, ArticleError> {
        let mut article = self
            .store
            .get_article_by_id(id)
            .await?
            .ok_or(ArticleError::NotFound)?;

        if let Some(title) = req.title {
            if title.trim().is_empty() {
                return Err(ArticleError::Validation("Title must not be empty".to_string()));
            }
            article.slug = create_slug(&title);
            article.title = title;
        }
        if let Some(summary) = req.summary {
            article.summary = summary;
        }
        if let Some(description) = req.description {
            article.description = description;
        }
        if let Some(label) = req.label {
            article.label = label;
        }

        let mut replaced_assets = Vec::new();
        if let Some(upload) = req.image {
            let new_image = self.save_upload(upload).await?;
            if article.image != new_image {
                replaced_assets.push(std::mem::replace(&mut article.image, new_image));
            }
        }
        if let Some(upload) = req.thumbnail {
            let new_thumbnail = self.save_upload(upload).await?;
            if article.thumbnail != new_thumbnail {
                replaced_assets.push(std::mem::replace(&mut article.thumbnail, new_thumbnail));
            }
        }

        let updated = self.store.update_article(article).await?;

        for old in replaced_assets {
            self.remove_asset_if_unreferenced(&old, updated.id).await;
        }

        Ok(updated.into())
    }

    async fn delete(&self, id: i32) -> Result<(), ArticleError> {
        let article = self
            .store
            .get_article_by_id(id)
            .await?
            .ok_or(ArticleError::NotFound)?;

        let (article_id, image, thumbnail) =
            (article.id, article.image.clone(), article.thumbnail.clone());

        self.store.soft_delete_article(article).await?;

        self.remove_asset_if_unreferenced(&image, article_id).await;
        if thumbnail != image {
            self.remove_asset_if_unreferenced(&thumbnail, article_id).await;
        }

        Ok(())
    }
}
