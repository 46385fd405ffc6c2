use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "administrators")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Unique among active rows; enforced by the transactional check in
    /// the registration path, not a database index, so a soft-deleted
    /// identity can be reclaimed when the config allows it.
    pub username: String,

    /// Stored lowercase. Same uniqueness rule as `username`.
    pub email: String,

    /// Bcrypt password hash
    pub password_hash: String,

    /// `Admin` or `Super Admin`
    pub role: String,

    /// One-time email verification code, cleared on successful verification.
    pub verification_code: Option<String>,

    pub verified: bool,

    /// 6-digit password-reset code, cleared on use.
    pub otp: Option<i32>,

    pub otp_requested: bool,

    pub photo_profile: String,

    pub deleted_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::articles::Entity")]
    Articles,
}

impl Related<super::articles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Articles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
