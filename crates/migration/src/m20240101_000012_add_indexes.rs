use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Tokens: lookup by user for invalidate-outstanding
        manager
            .create_index(
                Index::create()
                    .name("idx_verification_token_user")
                    .table(VerificationToken::Table)
                    .col(VerificationToken::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_password_reset_token_user")
                    .table(PasswordResetToken::Table)
                    .col(PasswordResetToken::UserId)
                    .to_owned(),
            )
            .await?;

        // Sessions: revoke-by-family and revoke-by-user scans
        manager
            .create_index(
                Index::create()
                    .name("idx_session_family")
                    .table(Session::Table)
                    .col(Session::FamilyId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_session_user")
                    .table(Session::Table)
                    .col(Session::UserId)
                    .to_owned(),
            )
            .await?;

        // Login attempts: the lockout query filters by email + time
        manager
            .create_index(
                Index::create()
                    .name("idx_login_attempt_email_time")
                    .table(LoginAttempt::Table)
                    .col(LoginAttempt::Email)
                    .col(LoginAttempt::AttemptedAt)
                    .to_owned(),
            )
            .await?;

        // Work orders: common list filters
        manager
            .create_index(
                Index::create()
                    .name("idx_work_order_customer")
                    .table(WorkOrder::Table)
                    .col(WorkOrder::CustomerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_work_order_technician")
                    .table(WorkOrder::Table)
                    .col(WorkOrder::AssignedTechnicianId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_location_customer")
                    .table(ServiceLocation::Table)
                    .col(ServiceLocation::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_verification_token_user")
                    .table(VerificationToken::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_password_reset_token_user")
                    .table(PasswordResetToken::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_session_family").table(Session::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_session_user").table(Session::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_login_attempt_email_time")
                    .table(LoginAttempt::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("idx_work_order_customer").table(WorkOrder::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("idx_work_order_technician").table(WorkOrder::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_service_location_customer")
                    .table(ServiceLocation::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum VerificationToken { Table, UserId }

#[derive(DeriveIden)]
enum PasswordResetToken { Table, UserId }

#[derive(DeriveIden)]
enum Session { Table, UserId, FamilyId }

#[derive(DeriveIden)]
enum LoginAttempt { Table, Email, AttemptedAt }

#[derive(DeriveIden)]
enum WorkOrder { Table, CustomerId, AssignedTechnicianId }

#[derive(DeriveIden)]
enum ServiceLocation { Table, CustomerId }
