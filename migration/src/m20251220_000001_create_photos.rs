use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create photos table
        manager
            .create_table(
                Table::create()
                    .table(Photos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Photos::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Photos::UserId).string().not_null())
                    .col(ColumnDef::new(Photos::Title).string().not_null())
                    .col(ColumnDef::new(Photos::AiTool).string().not_null())
                    .col(ColumnDef::new(Photos::OriginalUrl).string().not_null())
                    .col(ColumnDef::new(Photos::EditedUrl).string())
                    .col(ColumnDef::new(Photos::ThumbnailUrl).string())
                    .col(ColumnDef::new(Photos::EditingSettings).json().not_null())
                    .col(
                        ColumnDef::new(Photos::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Photos::PrintSize).string().not_null())
                    .col(
                        ColumnDef::new(Photos::Status)
                            .string()
                            .not_null()
                            .default("uploaded"),
                    )
                    .col(
                        ColumnDef::new(Photos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Photos::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Photos::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Photos {
    Table,
    Id,
    UserId,
    Title,
    AiTool,
    OriginalUrl,
    EditedUrl,
    ThumbnailUrl,
    EditingSettings,
    Price,
    PrintSize,
    Status,
    CreatedAt,
    UpdatedAt,
}
