//! Create `work_note` table: free-form notes attached to a work order.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkNote::Table)
                    .if_not_exists()
                    .col(uuid(WorkNote::Id).primary_key())
                    .col(uuid(WorkNote::WorkOrderId).not_null())
                    .col(uuid(WorkNote::AuthorUserId).not_null())
                    .col(text(WorkNote::Body).not_null())
                    .col(timestamp_with_time_zone(WorkNote::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_note_work_order")
                            .from(WorkNote::Table, WorkNote::WorkOrderId)
                            .to(WorkOrder::Table, WorkOrder::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_note_author")
                            .from(WorkNote::Table, WorkNote::AuthorUserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WorkNote::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WorkNote { Table, Id, WorkOrderId, AuthorUserId, Body, CreatedAt }

#[derive(DeriveIden)]
enum WorkOrder { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
