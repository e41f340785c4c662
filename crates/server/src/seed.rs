//! Development seeder. Resets the domain tables and loads a small,
//! deterministic data set for local work. Guarded so it can never run
//! against a production database by accident.

use anyhow::{anyhow, Context};
use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::info;

use migration::{Migrator, MigratorTrait};
use models::user::Role;
use models::work_order::{NewWorkOrder, WorkOrderPriority, WorkOrderStatus};
use models::{
    customer, login_attempt, password_reset_token, service_location, session, technician, user,
    verification_token, work_note, work_order, work_order_line_item,
};
use service::auth::hasher::PasswordHasher;

pub struct SeedSummary {
    pub users: usize,
    pub customers: usize,
    pub locations: usize,
    pub work_orders: usize,
}

pub async fn run() -> anyhow::Result<SeedSummary> {
    if std::env::var("APP_ENV").map(|v| v.eq_ignore_ascii_case("production")).unwrap_or(false) {
        return Err(anyhow!("refusing to seed: APP_ENV=production"));
    }
    if !std::env::var("ALLOW_DB_SEED").map(|v| v == "true").unwrap_or(false) {
        return Err(anyhow!("refusing to seed: set ALLOW_DB_SEED=true to confirm"));
    }

    let cfg = configs::AppConfig::load_and_validate()?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    Migrator::up(&db, None).await?;

    reset_tables(&db).await?;

    let hasher = PasswordHasher::from_settings(&cfg.auth)
        .map_err(|e| anyhow!("hasher setup failed: {e}"))?;
    let password = std::env::var("SEED_PASSWORD").unwrap_or_else(|_| "FieldServe!1".to_string());
    let hash = hasher.hash(&password).map_err(|e| anyhow!("hashing failed: {e}"))?;

    // Accounts come pre-verified so login works straight away.
    let _admin = user::upsert_by_email(&db, "admin@example.com", &hash, Role::Admin, true).await?;
    let tech1_user = user::upsert_by_email(&db, "tech1@example.com", &hash, Role::User, true).await?;
    let tech2_user = user::upsert_by_email(&db, "tech2@example.com", &hash, Role::User, true).await?;

    let tech1 =
        technician::upsert_by_user(&db, tech1_user.id, "Sam Rivera", Some("+1-555-0101")).await?;
    let tech2 =
        technician::upsert_by_user(&db, tech2_user.id, "Alex Chen", Some("+1-555-0102")).await?;

    let acme = customer::create(
        &db,
        customer::NewCustomer {
            name: "Acme Property Group".into(),
            email: Some("facilities@acme.example".into()),
            phone: Some("+1-555-0200".into()),
            billing_address_line1: Some("100 Main St".into()),
            billing_city: Some("Springfield".into()),
            billing_province: Some("ON".into()),
            billing_postal_code: Some("K1A 0B1".into()),
            billing_country: Some("CA".into()),
            ..Default::default()
        },
    )
    .await?;
    let harbor = customer::create(
        &db,
        customer::NewCustomer {
            name: "Harbor Medical Clinic".into(),
            email: Some("ops@harbormed.example".into()),
            phone: Some("+1-555-0300".into()),
            ..Default::default()
        },
    )
    .await?;

    let acme_hq = location(&db, acme.id, Some("HQ"), "100 Main St", "Springfield").await?;
    let acme_annex = location(&db, acme.id, Some("Annex"), "102 Main St", "Springfield").await?;
    let acme_depot = location(&db, acme.id, Some("Depot"), "40 Rail Yard Rd", "Springfield").await?;
    let harbor_clinic = location(&db, harbor.id, None, "7 Harbor Way", "Portsmouth").await?;

    let now = Utc::now();
    let orders = vec![
        order(acme.id, acme_hq.id, Some(tech1.id), "Quarterly HVAC inspection")
            .status(WorkOrderStatus::Scheduled)
            .window(now + Duration::days(2), Duration::hours(3)),
        order(acme.id, acme_hq.id, Some(tech1.id), "Replace lobby door closer")
            .status(WorkOrderStatus::InProgress)
            .priority(WorkOrderPriority::High),
        order(acme.id, acme_annex.id, Some(tech2.id), "Annual backflow test")
            .status(WorkOrderStatus::Completed),
        order(acme.id, acme_depot.id, None, "Loading dock light out")
            .priority(WorkOrderPriority::Low),
        order(harbor.id, harbor_clinic.id, Some(tech2.id), "Exam room 3 outlet dead")
            .status(WorkOrderStatus::Scheduled)
            .priority(WorkOrderPriority::Urgent)
            .window(now + Duration::days(1), Duration::hours(2)),
        order(harbor.id, harbor_clinic.id, None, "Waiting room repaint estimate"),
    ];
    let order_count = orders.len();

    for input in orders {
        let wo = work_order::create(&db, input.0).await?;
        if wo.status == WorkOrderStatus::InProgress {
            work_note::create(&db, wo.id, tech1_user.id, "Parts picked up, on site before noon.")
                .await?;
            work_order_line_item::create(&db, wo.id, "Door closer, grade 1", 1, 14500).await?;
            work_order_line_item::create(&db, wo.id, "Labor (hours)", 2, 9500).await?;
        }
        if wo.status == WorkOrderStatus::Completed {
            work_note::create(&db, wo.id, tech2_user.id, "Test passed, tag attached.").await?;
            work_order_line_item::create(&db, wo.id, "Backflow test certification", 1, 12000)
                .await?;
        }
    }

    let summary =
        SeedSummary { users: 3, customers: 2, locations: 4, work_orders: order_count };
    info!(
        users = summary.users,
        customers = summary.customers,
        locations = summary.locations,
        work_orders = summary.work_orders,
        "seed data loaded"
    );
    Ok(summary)
}

/// Delete children before parents so the FK constraints hold.
async fn reset_tables(db: &DatabaseConnection) -> anyhow::Result<()> {
    work_order_line_item::Entity::delete_many().exec(db).await.context("line items")?;
    work_note::Entity::delete_many().exec(db).await.context("work notes")?;
    work_order::Entity::delete_many().exec(db).await.context("work orders")?;
    service_location::Entity::delete_many().exec(db).await.context("locations")?;
    customer::Entity::delete_many().exec(db).await.context("customers")?;
    session::Entity::delete_many().exec(db).await.context("sessions")?;
    login_attempt::Entity::delete_many().exec(db).await.context("login attempts")?;
    verification_token::Entity::delete_many().exec(db).await.context("verification tokens")?;
    password_reset_token::Entity::delete_many().exec(db).await.context("reset tokens")?;
    Ok(())
}

async fn location(
    db: &DatabaseConnection,
    customer_id: uuid::Uuid,
    label: Option<&str>,
    address: &str,
    city: &str,
) -> anyhow::Result<service_location::Model> {
    Ok(service_location::create(
        db,
        customer_id,
        service_location::NewServiceLocation {
            label: label.map(|l| l.to_string()),
            address_line1: address.into(),
            city: city.into(),
            province: "ON".into(),
            postal_code: "K1A 0B1".into(),
            country: "CA".into(),
            ..Default::default()
        },
    )
    .await?)
}

struct OrderBuilder(NewWorkOrder);

fn order(
    customer_id: uuid::Uuid,
    service_location_id: uuid::Uuid,
    technician_id: Option<uuid::Uuid>,
    summary: &str,
) -> OrderBuilder {
    OrderBuilder(NewWorkOrder {
        customer_id,
        service_location_id,
        assigned_technician_id: technician_id,
        summary: summary.into(),
        description: None,
        status: WorkOrderStatus::Draft,
        priority: WorkOrderPriority::Normal,
        scheduled_start: None,
        scheduled_end: None,
    })
}

impl OrderBuilder {
    fn status(mut self, status: WorkOrderStatus) -> Self {
        self.0.status = status;
        self
    }

    fn priority(mut self, priority: WorkOrderPriority) -> Self {
        self.0.priority = priority;
        self
    }

    fn window(mut self, start: chrono::DateTime<Utc>, length: Duration) -> Self {
        self.0.scheduled_start = Some(start.into());
        self.0.scheduled_end = Some((start + length).into());
        self
    }
}
