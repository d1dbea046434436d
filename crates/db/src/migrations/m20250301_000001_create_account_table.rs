//! Create account table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Account::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Account::ProviderId).string_len(64).not_null())
                    .col(ColumnDef::new(Account::Username).string_len(128).not_null())
                    .col(ColumnDef::new(Account::DisplayName).string_len(256))
                    .col(ColumnDef::new(Account::AvatarUrl).string_len(1024))
                    .col(ColumnDef::new(Account::Token).string_len(64))
                    .col(
                        ColumnDef::new(Account::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Account::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: provider_id (one mirror row per provider identity)
        manager
            .create_index(
                Index::create()
                    .name("idx_account_provider_id")
                    .table(Account::Table)
                    .col(Account::ProviderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: username
        manager
            .create_index(
                Index::create()
                    .name("idx_account_username")
                    .table(Account::Table)
                    .col(Account::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: token (session lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_account_token")
                    .table(Account::Table)
                    .col(Account::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
    ProviderId,
    Username,
    DisplayName,
    AvatarUrl,
    Token,
    CreatedAt,
    UpdatedAt,
}
