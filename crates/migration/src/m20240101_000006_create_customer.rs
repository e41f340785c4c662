//! Create `customer` table with billing contact fields.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(uuid(Customer::Id).primary_key())
                    .col(string_len(Customer::Name, 255).not_null())
                    .col(ColumnDef::new(Customer::Email).string_len(255).null())
                    .col(ColumnDef::new(Customer::Phone).string_len(32).null())
                    .col(ColumnDef::new(Customer::BillingAddressLine1).string_len(255).null())
                    .col(ColumnDef::new(Customer::BillingAddressLine2).string_len(255).null())
                    .col(ColumnDef::new(Customer::BillingCity).string_len(128).null())
                    .col(ColumnDef::new(Customer::BillingProvince).string_len(64).null())
                    .col(ColumnDef::new(Customer::BillingPostalCode).string_len(16).null())
                    .col(ColumnDef::new(Customer::BillingCountry).string_len(2).null())
                    .col(timestamp_with_time_zone(Customer::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Customer::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customer {
    Table,
    Id,
    Name,
    Email,
    Phone,
    BillingAddressLine1,
    BillingAddressLine2,
    BillingCity,
    BillingProvince,
    BillingPostalCode,
    BillingCountry,
    CreatedAt,
    UpdatedAt,
}
