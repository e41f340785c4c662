//! Create `technician` table: one profile per user account.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Technician::Table)
                    .if_not_exists()
                    .col(uuid(Technician::Id).primary_key())
                    .col(uuid(Technician::UserId).unique_key().not_null())
                    .col(string_len(Technician::DisplayName, 128).not_null())
                    .col(ColumnDef::new(Technician::Phone).string_len(32).null())
                    .col(timestamp_with_time_zone(Technician::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Technician::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_technician_user")
                            .from(Technician::Table, Technician::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Technician::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Technician { Table, Id, UserId, DisplayName, Phone, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
