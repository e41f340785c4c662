//! Create `service_location` table with FK to `customer`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceLocation::Table)
                    .if_not_exists()
                    .col(uuid(ServiceLocation::Id).primary_key())
                    .col(uuid(ServiceLocation::CustomerId).not_null())
                    .col(ColumnDef::new(ServiceLocation::Label).string_len(128).null())
                    .col(string_len(ServiceLocation::AddressLine1, 255).not_null())
                    .col(ColumnDef::new(ServiceLocation::AddressLine2).string_len(255).null())
                    .col(string_len(ServiceLocation::City, 128).not_null())
                    .col(string_len(ServiceLocation::Province, 64).not_null())
                    .col(string_len(ServiceLocation::PostalCode, 16).not_null())
                    .col(string_len(ServiceLocation::Country, 2).not_null())
                    .col(ColumnDef::new(ServiceLocation::Latitude).double().null())
                    .col(ColumnDef::new(ServiceLocation::Longitude).double().null())
                    .col(timestamp_with_time_zone(ServiceLocation::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ServiceLocation::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_location_customer")
                            .from(ServiceLocation::Table, ServiceLocation::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceLocation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceLocation {
    Table,
    Id,
    CustomerId,
    Label,
    AddressLine1,
    AddressLine2,
    City,
    Province,
    PostalCode,
    Country,
    Latitude,
    Longitude,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customer { Table, Id }
