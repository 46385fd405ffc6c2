use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::article_likes::{self, Column, Entity};
use crate::entities::articles;

pub struct ArticleLikeRepository {
    conn: DatabaseConnection,
}

impl ArticleLikeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn active() -> sea_orm::Select<Entity> {
        Entity::find().filter(Column::DeletedAt.is_null())
    }

    pub async fn get_active(
        &self,
        user_id: i32,
        article_id: i32,
    ) -> Result<Option<article_likes::Model>> {
        Self::active()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::ArticleId.eq(article_id))
            .one(&self.conn)
            .await
            .context("Failed to query article like")
    }

    pub async fn create(&self, user_id: i32, article_id: i32) -> Result<article_likes::Model> {
        let now = chrono::Utc::now();
        let active = article_likes::ActiveModel {
            user_id: Set(user_id),
            article_id: Set(article_id),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert article like")
    }

    pub async fn soft_delete(&self, model: article_likes::Model) -> Result<()> {
        let now = chrono::Utc::now();
        let mut active = model.into_active_model();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(&self.conn)
            .await
            .context("Failed to soft-delete article like")?;
        Ok(())
    }

    /// Likes for a user joined with their (still active) articles.
    pub async fn list_by_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<(article_likes::Model, articles::Model)>> {
        let rows = Self::active()
            .filter(Column::UserId.eq(user_id))
            .find_also_related(articles::Entity)
            .filter(articles::Column::DeletedAt.is_null())
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list liked articles")?;

        Ok(rows
            .into_iter()
            .filter_map(|(like, article)| article.map(|a| (like, a)))
            .collect())
    }
}
