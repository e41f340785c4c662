//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user;
mod m20240101_000002_create_verification_token;
mod m20240101_000003_create_password_reset_token;
mod m20240101_000004_create_session;
mod m20240101_000005_create_login_attempt;
mod m20240101_000006_create_customer;
mod m20240101_000007_create_service_location;
mod m20240101_000008_create_technician;
mod m20240101_000009_create_work_order;
mod m20240101_000010_create_work_note;
mod m20240101_000011_create_work_order_line_item;
mod m20240101_000012_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user::Migration),
            Box::new(m20240101_000002_create_verification_token::Migration),
            Box::new(m20240101_000003_create_password_reset_token::Migration),
            Box::new(m20240101_000004_create_session::Migration),
            Box::new(m20240101_000005_create_login_attempt::Migration),
            Box::new(m20240101_000006_create_customer::Migration),
            Box::new(m20240101_000007_create_service_location::Migration),
            Box::new(m20240101_000008_create_technician::Migration),
            Box::new(m20240101_000009_create_work_order::Migration),
            Box::new(m20240101_000010_create_work_note::Migration),
            Box::new(m20240101_000011_create_work_order_line_item::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000012_add_indexes::Migration),
        ]
    }
}
