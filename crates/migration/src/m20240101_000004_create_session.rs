//! Create `session` table for refresh-token sessions.
//!
//! `family_id` groups a rotation lineage; `status` carries the
//! active/rotated/revoked state machine and is only ever advanced by
//! conditional updates.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Session::Table)
                    .if_not_exists()
                    .col(uuid(Session::Id).primary_key())
                    .col(uuid(Session::UserId).not_null())
                    .col(uuid(Session::FamilyId).not_null())
                    .col(string_len(Session::RefreshTokenHash, 64).unique_key().not_null())
                    .col(string_len(Session::Status, 16).not_null())
                    .col(timestamp_with_time_zone(Session::IssuedAt).not_null())
                    .col(timestamp_with_time_zone(Session::ExpiresAt).not_null())
                    .col(
                        ColumnDef::new(Session::RevokedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_user")
                            .from(Session::Table, Session::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Session::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Session { Table, Id, UserId, FamilyId, RefreshTokenHash, Status, IssuedAt, ExpiresAt, RevokedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
