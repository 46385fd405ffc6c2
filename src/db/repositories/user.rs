use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::entities::users::{self, Column, Entity};

pub use super::admin::IdentityConflict;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub verification_code: String,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn active() -> sea_orm::Select<Entity> {
        Entity::find().filter(Column::DeletedAt.is_null())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        Self::active()
            .filter(Column::Id.eq(id))
            .one(&self.conn)
            .await
            .context("Failed to query user by id")
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        Self::active()
            .filter(Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        Self::active()
            .filter(Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")
    }

    pub async fn get_by_verification_code(&self, code: &str) -> Result<Option<users::Model>> {
        Self::active()
            .filter(Column::VerificationCode.eq(code))
            .one(&self.conn)
            .await
            .context("Failed to query user by verification code")
    }

    pub async fn get_by_otp(&self, otp: i32) -> Result<Option<users::Model>> {
        Self::active()
            .filter(Column::Otp.eq(otp))
            .filter(Column::OtpRequested.eq(true))
            .filter(Column::Verified.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query user by OTP")
    }

    pub async fn list(&self) -> Result<Vec<users::Model>> {
        Self::active()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")
    }

    /// Transactional check-then-insert; see [`super::admin::AdminRepository::register`].
    pub async fn register(
        &self,
        user: NewUser,
        include_deleted: bool,
    ) -> Result<std::result::Result<users::Model, IdentityConflict>> {
        let txn = self.conn.begin().await.context("Failed to open transaction")?;

        let mut by_username = Entity::find().filter(Column::Username.eq(user.username.as_str()));
        let mut by_email = Entity::find().filter(Column::Email.eq(user.email.as_str()));
        if !include_deleted {
            by_username = by_username.filter(Column::DeletedAt.is_null());
            by_email = by_email.filter(Column::DeletedAt.is_null());
        }

        if by_username.one(&txn).await?.is_some() {
            txn.rollback().await.ok();
            return Ok(Err(IdentityConflict::Username));
        }
        if by_email.one(&txn).await?.is_some() {
            txn.rollback().await.ok();
            return Ok(Err(IdentityConflict::Email));
        }

        let now = chrono::Utc::now();
        let active = users::ActiveModel {
            username: Set(user.username),
            full_name: Set(user.full_name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            role: Set("User".to_string()),
            verification_code: Set(Some(user.verification_code)),
            verified: Set(false),
            otp: Set(None),
            otp_requested: Set(false),
            photo_profile: Set(crate::entities::DEFAULT_PHOTO_PROFILE.to_string()),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&txn).await.context("Failed to insert user")?;

        txn.commit().await.context("Failed to commit registration")?;

        Ok(Ok(model))
    }

    pub async fn update(&self, model: users::Model) -> Result<users::Model> {
        let mut active = model.into_active_model().reset_all();
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.conn).await.context("Failed to update user")
    }

    pub async fn soft_delete(&self, model: users::Model) -> Result<()> {
        let now = chrono::Utc::now();
        let mut active = model.into_active_model();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(&self.conn)
            .await
            .context("Failed to soft-delete user")?;
        Ok(())
    }
}
