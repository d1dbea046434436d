//! Create rating table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rating::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rating::AccountId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Rating::TransitionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rating::Value).small_integer().not_null())
                    .col(
                        ColumnDef::new(Rating::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Rating::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_account")
                            .from(Rating::Table, Rating::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_transition")
                            .from(Rating::Table, Rating::TransitionId)
                            .to(Transition::Table, Transition::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (account_id, transition_id) - one rating per account
        // per transition; the conflict target of the vote upsert
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_account_transition")
                    .table(Rating::Table)
                    .col(Rating::AccountId)
                    .col(Rating::TransitionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: transition_id (for tallying a transition's ratings)
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_transition_id")
                    .table(Rating::Table)
                    .col(Rating::TransitionId)
                    .to_owned(),
            )
            .await?;

        // Index: account_id (for listing an account's ratings)
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_account_id")
                    .table(Rating::Table)
                    .col(Rating::AccountId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rating::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Rating {
    Table,
    Id,
    AccountId,
    TransitionId,
    Value,
    CreatedAt,
    UpdatedAt,
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
