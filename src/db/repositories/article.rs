use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::articles::{self, Column, Entity};

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub administrator_id: i32,
    pub title: String,
    pub summary: String,
    pub description: String,
    pub image: String,
    pub thumbnail: String,
    pub label: String,
    pub slug: String,
}

pub struct ArticleRepository {
    conn: DatabaseConnection,
}

impl ArticleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn active() -> sea_orm::Select<Entity> {
        Entity::find().filter(Column::DeletedAt.is_null())
    }

    /// Offset/limit page over active articles plus the total active count.
    pub async fn list(&self, page: u64, limit: u64) -> Result<(Vec<articles::Model>, u64)> {
        let total = Self::active()
            .count(&self.conn)
            .await
            .context("Failed to count articles")?;

        let offset = page.saturating_sub(1).saturating_mul(limit);
        if offset >= total {
            return Ok((Vec::new(), total));
        }

        let items = Self::active()
            .order_by_asc(Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list articles")?;

        Ok((items, total))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<articles::Model>> {
        Self::active()
            .filter(Column::Id.eq(id))
            .one(&self.conn)
            .await
            .context("Failed to query article by id")
    }

    pub async fn create(&self, article: NewArticle) -> Result<articles::Model> {
        let now = chrono::Utc::now();
        let active = articles::ActiveModel {
            administrator_id: Set(article.administrator_id),
            title: Set(article.title),
            summary: Set(article.summary),
            description: Set(article.description),
            image: Set(article.image),
            thumbnail: Set(article.thumbnail),
            label: Set(article.label),
            slug: Set(article.slug),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(&self.conn).await.context("Failed to insert article")
    }

    pub async fn update(&self, model: articles::Model) -> Result<articles::Model> {
        let mut active = model.into_active_model().reset_all();
        active.updated_at = Set(chrono::Utc::now());
        active
            .update(&self.conn)
            .await
            .context("Failed to update article")
    }

    pub async fn soft_delete(&self, model: articles::Model) -> Result<()> {
        let now = chrono::Utc::now();
        let mut active = model.into_active_model();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(&self.conn)
            .await
            .context("Failed to soft-delete article")?;
        Ok(())
    }

    /// How many other active articles still reference `filename` as either
    /// image or thumbnail. Used before removing an asset file from disk.
    pub async fn count_referencing_asset(&self, filename: &str, exclude_id: i32) -> Result<u64> {
        Self::active()
            .filter(Column::Id.ne(exclude_id))
            .filter(
                Condition::any()
                    .add(Column::Image.eq(filename))
                    .add(Column::Thumbnail.eq(filename)),
            )
            .count(&self.conn)
            .await
            .context("Failed to count asset references")
    }
}
