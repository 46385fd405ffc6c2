use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Unique among active rows; enforced by the transactional check in
    /// the registration path, not a database index, so a soft-deleted
    /// identity can be reclaimed when the config allows it.
    pub username: String,

    pub full_name: String,

    /// Stored lowercase. Same uniqueness rule as `username`.
    pub email: String,

    /// Bcrypt password hash
    pub password_hash: String,

    /// Always `User`; kept as a column so token claims read uniformly.
    pub role: String,

    pub verification_code: Option<String>,

    pub verified: bool,

    pub otp: Option<i32>,

    pub otp_requested: bool,

    pub photo_profile: String,

    pub deleted_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::article_likes::Entity")]
    ArticleLikes,
}

impl Related<super::article_likes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticleLikes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
