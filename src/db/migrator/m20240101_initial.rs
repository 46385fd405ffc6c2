use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Bootstrap credentials; change the password after first login.
const SEED_USERNAME: &str = "superadmin";
const SEED_EMAIL: &str = "superadmin@bedu.local";

fn hash_seed_password() -> String {
    bcrypt::hash("password", bcrypt::DEFAULT_COST).expect("Failed to hash seed password")
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Administrators)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Articles)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(ArticleLikes)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Seed a verified Super Admin so a fresh install can log in and
        // create further accounts.
        let now = chrono::Utc::now();
        let password_hash = hash_seed_password();

        use crate::entities::administrators::Column;

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Administrators)
            .columns([
                Column::Name,
                Column::Username,
                Column::Email,
                Column::PasswordHash,
                Column::Role,
                Column::Verified,
                Column::OtpRequested,
                Column::PhotoProfile,
                Column::CreatedAt,
                Column::UpdatedAt,
            ])
            .values_panic([
                "Super Admin".into(),
                SEED_USERNAME.into(),
                SEED_EMAIL.into(),
                password_hash.into(),
                "Super Admin".into(),
                true.into(),
                false.into(),
                crate::entities::DEFAULT_PHOTO_PROFILE.into(),
                now.into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ArticleLikes).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Articles).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Administrators).to_owned())
            .await?;

        Ok(())
    }
}
