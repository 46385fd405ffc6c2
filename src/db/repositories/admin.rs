use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::entities::administrators::{self, Column, Entity};

/// Which identity field collided during registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityConflict {
    Username,
    Email,
}

/// Input for a new administrator row. Role defaults to `Admin`; promotion to
/// `Super Admin` happens through the update path.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verification_code: String,
}

pub struct AdminRepository {
    conn: DatabaseConnection,
}

impl AdminRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All lookups go through this predicate so soft-deleted rows never leak.
    fn active() -> sea_orm::Select<Entity> {
        Entity::find().filter(Column::DeletedAt.is_null())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<administrators::Model>> {
        Self::active()
            .filter(Column::Id.eq(id))
            .one(&self.conn)
            .await
            .context("Failed to query administrator by id")
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<administrators::Model>> {
        Self::active()
            .filter(Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query administrator by username")
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<administrators::Model>> {
        Self::active()
            .filter(Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query administrator by email")
    }

    pub async fn get_by_verification_code(
        &self,
        code: &str,
    ) -> Result<Option<administrators::Model>> {
        Self::active()
            .filter(Column::VerificationCode.eq(code))
            .one(&self.conn)
            .await
            .context("Failed to query administrator by verification code")
    }

    /// OTP lookups only match verified accounts with an outstanding request.
    pub async fn get_by_otp(&self, otp: i32) -> Result<Option<administrators::Model>> {
        Self::active()
            .filter(Column::Otp.eq(otp))
            .filter(Column::OtpRequested.eq(true))
            .filter(Column::Verified.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query administrator by OTP")
    }

    pub async fn list(&self) -> Result<Vec<administrators::Model>> {
        Self::active()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list administrators")
    }

    /// Inserts a new administrator, checking username/email uniqueness inside
    /// the same transaction as the insert. When `include_deleted` is set the
    /// check also counts soft-deleted rows, so a removed identity cannot be
    /// reclaimed.
    pub async fn register(
        &self,
        admin: NewAdmin,
        include_deleted: bool,
    ) -> Result<std::result::Result<administrators::Model, IdentityConflict>> {
        let txn = self.conn.begin().await.context("Failed to open transaction")?;

        let mut by_username = Entity::find().filter(Column::Username.eq(admin.username.as_str()));
        let mut by_email = Entity::find().filter(Column::Email.eq(admin.email.as_str()));
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
        let active = administrators::ActiveModel {
            name: Set(admin.name),
            username: Set(admin.username),
            email: Set(admin.email),
            password_hash: Set(admin.password_hash),
            role: Set("Admin".to_string()),
            verification_code: Set(Some(admin.verification_code)),
            verified: Set(false),
            otp: Set(None),
            otp_requested: Set(false),
            photo_profile: Set(crate::entities::DEFAULT_PHOTO_PROFILE.to_string()),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&txn)
            .await
            .context("Failed to insert administrator")?;

        txn.commit().await.context("Failed to commit registration")?;

        Ok(Ok(model))
    }

    /// Persists a mutated model as-is, bumping `updated_at`.
    pub async fn update(&self, model: administrators::Model) -> Result<administrators::Model> {
        let mut active = model.into_active_model().reset_all();
        active.updated_at = Set(chrono::Utc::now());
        active
            .update(&self.conn)
            .await
            .context("Failed to update administrator")
    }

    pub async fn soft_delete(&self, model: administrators::Model) -> Result<()> {
        let now = chrono::Utc::now();
        let mut active = model.into_active_model();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(&self.conn)
            .await
            .context("Failed to soft-delete administrator")?;
        Ok(())
    }
}
