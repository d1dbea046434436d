//! Create favorite table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Favorite::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Favorite::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Favorite::AccountId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Favorite::TransitionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Favorite::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_account")
                            .from(Favorite::Table, Favorite::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_transition")
                            .from(Favorite::Table, Favorite::TransitionId)
                            .to(Transition::Table, Transition::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (account_id, transition_id) - one favorite per pair
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_account_transition")
                    .table(Favorite::Table)
                    .col(Favorite::AccountId)
                    .col(Favorite::TransitionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: account_id (for the favorites page)
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_account_id")
                    .table(Favorite::Table)
                    .col(Favorite::AccountId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Favorite::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Favorite {
    Table,
    Id,
    AccountId,
    TransitionId,
    CreatedAt,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
}

#[derive(Iden)]
enum Transition {
    Table,
    Id,
}
