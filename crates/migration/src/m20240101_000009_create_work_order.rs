//! Create `work_order` table with FKs to customer, location, and the
//! optionally assigned technician.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkOrder::Table)
                    .if_not_exists()
                    .col(uuid(WorkOrder::Id).primary_key())
                    .col(uuid(WorkOrder::CustomerId).not_null())
                    .col(uuid(WorkOrder::ServiceLocationId).not_null())
                    .col(ColumnDef::new(WorkOrder::AssignedTechnicianId).uuid().null())
                    .col(string_len(WorkOrder::Summary, 255).not_null())
                    .col(ColumnDef::new(WorkOrder::Description).text().null())
                    .col(string_len(WorkOrder::Status, 16).not_null())
                    .col(string_len(WorkOrder::Priority, 16).not_null())
                    .col(
                        ColumnDef::new(WorkOrder::ScheduledStart)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WorkOrder::ScheduledEnd)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WorkOrder::ActualStart)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WorkOrder::ActualEnd)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(WorkOrder::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(WorkOrder::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_order_customer")
                            .from(WorkOrder::Table, WorkOrder::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_order_location")
                            .from(WorkOrder::Table, WorkOrder::ServiceLocationId)
                            .to(ServiceLocation::Table, ServiceLocation::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_order_technician")
                            .from(WorkOrder::Table, WorkOrder::AssignedTechnicianId)
                            .to(Technician::Table, Technician::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WorkOrder::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WorkOrder {
    Table,
    Id,
    CustomerId,
    ServiceLocationId,
    AssignedTechnicianId,
    Summary,
    Description,
    Status,
    Priority,
    ScheduledStart,
    ScheduledEnd,
    ActualStart,
    ActualEnd,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customer { Table, Id }

#[derive(DeriveIden)]
enum ServiceLocation { Table, Id }

#[derive(DeriveIden)]
enum Technician { Table, Id }
