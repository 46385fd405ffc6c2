use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub administrator_id: i32,

    pub title: String,

    /// Short abstract shown on listing pages (serialized as `abstract`).
    #[sea_orm(column_name = "abstract")]
    pub summary: String,

    /// Full article body.
    pub description: String,

    /// Stored filename of the uploaded hero image, relative to the images dir.
    pub image: String,

    pub thumbnail: String,

    pub label: String,

    /// Derived from the title; not guaranteed unique.
    pub slug: String,

    pub deleted_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::administrators::Entity",
        from = "Column::AdministratorId",
        to = "super::administrators::Column::Id"
    )]
    Administrator,

    #[sea_orm(has_many = "super::article_likes::Entity")]
    ArticleLikes,
}

impl Related<super::administrators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Administrator.def()
    }
}

impl Related<super::article_likes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticleLikes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
