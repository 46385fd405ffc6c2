use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{administrators, article_likes, articles, users};

pub mod migrator;
pub mod repositories;

pub use repositories::admin::{IdentityConflict, NewAdmin};
pub use repositories::article::NewArticle;
pub use repositories::user::NewUser;

/// Owns the connection pool and hands out per-entity repositories.
/// Constructed once at startup and injected everywhere; there is no global
/// database handle.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn admin_repo(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn article_repo(&self) -> repositories::article::ArticleRepository {
        repositories::article::ArticleRepository::new(self.conn.clone())
    }

    fn like_repo(&self) -> repositories::article_like::ArticleLikeRepository {
        repositories::article_like::ArticleLikeRepository::new(self.conn.clone())
    }

    // ---- administrators ----

    pub async fn get_admin_by_id(&self, id: i32) -> Result<Option<administrators::Model>> {
        self.admin_repo().get_by_id(id).await
    }

    pub async fn get_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<administrators::Model>> {
        self.admin_repo().get_by_username(username).await
    }

    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<administrators::Model>> {
        self.admin_repo().get_by_email(email).await
    }

    pub async fn get_admin_by_verification_code(
        &self,
        code: &str,
    ) -> Result<Option<administrators::Model>> {
        self.admin_repo().get_by_verification_code(code).await
    }

    pub async fn get_admin_by_otp(&self, otp: i32) -> Result<Option<administrators::Model>> {
        self.admin_repo().get_by_otp(otp).await
    }

    pub async fn list_admins(&self) -> Result<Vec<administrators::Model>> {
        self.admin_repo().list().await
    }

    pub async fn register_admin(
        &self,
        admin: NewAdmin,
        include_deleted: bool,
    ) -> Result<std::result::Result<administrators::Model, IdentityConflict>> {
        self.admin_repo().register(admin, include_deleted).await
    }

    pub async fn update_admin(
        &self,
        model: administrators::Model,
    ) -> Result<administrators::Model> {
        self.admin_repo().update(model).await
    }

    pub async fn soft_delete_admin(&self, model: administrators::Model) -> Result<()> {
        self.admin_repo().soft_delete(model).await
    }

    // ---- users ----

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_verification_code(
        &self,
        code: &str,
    ) -> Result<Option<users::Model>> {
        self.user_repo().get_by_verification_code(code).await
    }

    pub async fn get_user_by_otp(&self, otp: i32) -> Result<Option<users::Model>> {
        self.user_repo().get_by_otp(otp).await
    }

    pub async fn list_users(&self) -> Result<Vec<users::Model>> {
        self.user_repo().list().await
    }

    pub async fn register_user(
        &self,
        user: NewUser,
        include_deleted: bool,
    ) -> Result<std::result::Result<users::Model, IdentityConflict>> {
        self.user_repo().register(user, include_deleted).await
    }

    pub async fn update_user(&self, model: users::Model) -> Result<users::Model> {
        self.user_repo().update(model).await
    }

    pub async fn soft_delete_user(&self, model: users::Model) -> Result<()> {
        self.user_repo().soft_delete(model).await
    }

    // ---- articles ----

    pub async fn list_articles(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<articles::Model>, u64)> {
        self.article_repo().list(page, limit).await
    }

    pub async fn get_article_by_id(&self, id: i32) -> Result<Option<articles::Model>> {
        self.article_repo().get_by_id(id).await
    }

    pub async fn create_article(&self, article: NewArticle) -> Result<articles::Model> {
        self.article_repo().create(article).await
    }

    pub async fn update_article(&self, model: articles::Model) -> Result<articles::Model> {
        self.article_repo().update(model).await
    }

    pub async fn soft_delete_article(&self, model: articles::Model) -> Result<()> {
        self.article_repo().soft_delete(model).await
    }

    pub async fn count_articles_referencing_asset(
        &self,
        filename: &str,
        exclude_id: i32,
    ) -> Result<u64> {
        self.article_repo()
            .count_referencing_asset(filename, exclude_id)
            .await
    }

    // ---- article likes ----

    pub async fn get_active_like(
        &self,
        user_id: i32,
        article_id: i32,
    ) -> Result<Option<article_likes::Model>> {
        self.like_repo().get_active(user_id, article_id).await
    }

    pub async fn create_like(&self, user_id: i32, article_id: i32) -> Result<article_likes::Model> {
        self.like_repo().create(user_id, article_id).await
    }

    pub async fn soft_delete_like(&self, model: article_likes::Model) -> Result<()> {
        self.like_repo().soft_delete(model).await
    }

    pub async fn list_likes_by_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<(article_likes::Model, articles::Model)>> {
        self.like_repo().list_by_user(user_id).await
    }
}
