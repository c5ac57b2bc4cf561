use sea_orm_migration::prelude::*;

use crate::m20251220_000001_create_photos::Photos;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_photos_user_created")
                    .table(Photos::Table)
                    .col(Photos::UserId)
                    .col(Photos::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_photos_status")
                    .table(Photos::Table)
                    .col(Photos::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_photos_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_photos_user_created").to_owned())
            .await
    }
}
