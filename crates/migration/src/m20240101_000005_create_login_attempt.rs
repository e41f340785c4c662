//! Create `login_attempt` table: append-only audit rows behind the lockout
//! policy. There is no FK to `user`, attempts against unknown emails count too.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoginAttempt::Table)
                    .if_not_exists()
                    .col(big_integer(LoginAttempt::Id).primary_key().auto_increment())
                    .col(string_len(LoginAttempt::Email, 255).not_null())
                    .col(string_len(LoginAttempt::Outcome, 16).not_null())
                    .col(
                        ColumnDef::new(LoginAttempt::ClientAddr)
                            .string_len(64)
                            .null(),
                    )
                    .col(timestamp_with_time_zone(LoginAttempt::AttemptedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoginAttempt::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LoginAttempt { Table, Id, Email, Outcome, ClientAddr, AttemptedAt }
