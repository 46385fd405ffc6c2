//! Article like ("bookmark") toggle and listing.

use serde::Serialize;

use crate::db::Store;
use crate::services::article_service::{ArticleError, ArticleInfo};

/// Outcome of a toggle call, reported back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Liked,
    Unliked,
}

pub struct LikeService {
    store: Store,
}

impl LikeService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Creates the like edge when absent, soft-deletes it when present.
    pub async fn toggle(
        &self,
        user_id: i32,
        article_id: i32,
    ) -> Result<ToggleOutcome, ArticleError> {
        // The article must exist and be active before an edge can be made.
        self.store
            .get_article_by_id(article_id)
            .await?
            .ok_or(ArticleError::NotFound)?;

        match self.store.get_active_like(user_id, article_id).await? {
            Some(existing) => {
                self.store.soft_delete_like(existing).await?;
                Ok(ToggleOutcome::Unliked)
            }
            None => {
                self.store.create_like(user_id, article_id).await?;
                Ok(ToggleOutcome::Liked)
            }
        }
    }

    /// All active likes for a user, joined with the liked article.
    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<ArticleInfo>, ArticleError> {
        let rows = self.store.list_likes_by_user(user_id).await?;
        Ok(rows.into_iter().map(|(_, article)| article.into()).collect())
    }
}
