//! Create `work_order_line_item` table: billable items on a work order.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkOrderLineItem::Table)
                    .if_not_exists()
                    .col(uuid(WorkOrderLineItem::Id).primary_key())
                    .col(uuid(WorkOrderLineItem::WorkOrderId).not_null())
                    .col(string_len(WorkOrderLineItem::Description, 255).not_null())
                    .col(integer(WorkOrderLineItem::Quantity).not_null())
                    .col(big_integer(WorkOrderLineItem::UnitPriceCents).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_line_item_work_order")
                            .from(WorkOrderLineItem::Table, WorkOrderLineItem::WorkOrderId)
                            .to(WorkOrder::Table, WorkOrder::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkOrderLineItem::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WorkOrderLineItem { Table, Id, WorkOrderId, Description, Quantity, UnitPriceCents }

#[derive(DeriveIden)]
enum WorkOrder { Table, Id }
