//! Create transition table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transition::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transition::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transition::AccountId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transition::Track1Id).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Transition::Track1Name)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transition::Track1Artist)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transition::Track1Image).string_len(1024))
                    .col(ColumnDef::new(Transition::Track2Id).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Transition::Track2Name)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transition::Track2Artist)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transition::Track2Image).string_len(1024))
                    .col(
                        ColumnDef::new(Transition::CrossfadeSeconds)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transition::Description).text())
                    .col(
                        ColumnDef::new(Transition::Tags)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Transition::ViewsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transition::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transition_account")
                            .from(Transition::Table, Transition::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: account_id (for an account's submissions)
        manager
            .create_index(
                Index::create()
                    .name("idx_transition_account_id")
                    .table(Transition::Table)
                    .col(Transition::AccountId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for recency ordering)
        manager
            .create_index(
                Index::create()
                    .name("idx_transition_created_at")
                    .table(Transition::Table)
                    .col(Transition::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Indexes: artist columns (for recommendation matching)
        manager
            .create_index(
                Index::create()
                    .name("idx_transition_track1_artist")
                    .table(Transition::Table)
                    .col(Transition::Track1Artist)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transition_track2_artist")
                    .table(Transition::Table)
                    .col(Transition::Track2Artist)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transition::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Transition {
    Table,
    Id,
    AccountId,
    Track1Id,
    Track1Name,
    Track1Artist,
    Track1Image,
    Track2Id,
    Track2Name,
    Track2Artist,
    Track2Image,
    CrossfadeSeconds,
    Description,
    Tags,
    ViewsCount,
    CreatedAt,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
}
