//! Work order CRUD plus nested notes and line items.

use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use models::{service_location, technician, work_note, work_order, work_order_line_item};

use crate::errors::ServiceError;

/// Create a work order. The location must belong to the named customer.
pub async fn create_work_order(
    db: &DatabaseConnection,
    input: work_order::NewWorkOrder,
) -> Result<work_order::Model, ServiceError> {
    let location = service_location::Entity::find_by_id(input.service_location_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("service location"))?;
    if location.customer_id != input.customer_id {
        return Err(ServiceError::Validation(
            "service location does not belong to customer".into(),
        ));
    }
    if let Some(technician_id) = input.assigned_technician_id {
        ensure_technician(db, technician_id).await?;
    }
    Ok(work_order::create(db, input).await?)
}

pub async fn get_work_order(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<work_order::Model>, ServiceError> {
    Ok(work_order::find_by_id(db, id).await?)
}

pub async fn list_work_orders(
    db: &DatabaseConnection,
    filter: work_order::WorkOrderFilter,
) -> Result<Vec<work_order::Model>, ServiceError> {
    Ok(work_order::list(db, filter).await?)
}

pub async fn update_work_order(
    db: &DatabaseConnection,
    id: Uuid,
    changes: work_order::WorkOrderChanges,
) -> Result<work_order::Model, ServiceError> {
    work_order::update(db, id, changes)
        .await?
        .ok_or_else(|| ServiceError::not_found("work order"))
}

/// Assign (or with `None`, unassign) a technician.
pub async fn assign_technician(
    db: &DatabaseConnection,
    id: Uuid,
    technician_id: Option<Uuid>,
) -> Result<work_order::Model, ServiceError> {
    if let Some(technician_id) = technician_id {
        ensure_technician(db, technician_id).await?;
    }
    work_order::assign_technician(db, id, technician_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("work order"))
}

pub async fn delete_work_order(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    work_order::hard_delete(db, id).await?;
    Ok(())
}

pub async fn add_note(
    db: &DatabaseConnection,
    work_order_id: Uuid,
    author_user_id: Uuid,
    body: &str,
) -> Result<work_note::Model, ServiceError> {
    ensure_work_order(db, work_order_id).await?;
    Ok(work_note::create(db, work_order_id, author_user_id, body).await?)
}

pub async fn list_notes(
    db: &DatabaseConnection,
    work_order_id: Uuid,
) -> Result<Vec<work_note::Model>, ServiceError> {
    Ok(work_note::list_for_work_order(db, work_order_id).await?)
}

pub async fn add_line_item(
    db: &DatabaseConnection,
    work_order_id: Uuid,
    description: &str,
    quantity: i32,
    unit_price_cents: i64,
) -> Result<work_order_line_item::Model, ServiceError> {
    ensure_work_order(db, work_order_id).await?;
    Ok(work_order_line_item::create(db, work_order_id, description, quantity, unit_price_cents)
        .await?)
}

pub async fn list_line_items(
    db: &DatabaseConnection,
    work_order_id: Uuid,
) -> Result<Vec<work_order_line_item::Model>, ServiceError> {
    Ok(work_order_line_item::list_for_work_order(db, work_order_id).await?)
}

pub async fn delete_line_item(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    work_order_line_item::hard_delete(db, id).await?;
    Ok(())
}

async fn ensure_work_order(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    get_work_order(db, id).await?.ok_or_else(|| ServiceError::not_found("work order"))?;
    Ok(())
}

async fn ensure_technician(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    technician::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("technician"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::customer;
    use models::work_order::{NewWorkOrder, WorkOrderChanges, WorkOrderFilter, WorkOrderPriority, WorkOrderStatus};

    async fn fixture(db: &DatabaseConnection) -> (customer::Model, service_location::Model) {
        let c = customer::create(
            db,
            customer::NewCustomer {
                name: format!("wo_customer_{}", Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let loc = service_location::create(
            db,
            c.id,
            service_location::NewServiceLocation {
                address_line1: "7 Duct Ave".into(),
                city: "Springfield".into(),
                province: "ON".into(),
                postal_code: "A1A 1A1".into(),
                country: "CA".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        (c, loc)
    }

    fn draft(customer_id: Uuid, location_id: Uuid) -> NewWorkOrder {
        NewWorkOrder {
            customer_id,
            service_location_id: location_id,
            assigned_technician_id: None,
            summary: "Furnace inspection".into(),
            description: None,
            status: WorkOrderStatus::Draft,
            priority: WorkOrderPriority::Normal,
            scheduled_start: None,
            scheduled_end: None,
        }
    }

    #[tokio::test]
    async fn work_order_lifecycle() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let (c, loc) = fixture(&db).await;

        let wo = create_work_order(&db, draft(c.id, loc.id)).await?;
        assert_eq!(wo.status, WorkOrderStatus::Draft);

        let updated = update_work_order(
            &db,
            wo.id,
            WorkOrderChanges {
                status: Some(WorkOrderStatus::Scheduled),
                priority: Some(WorkOrderPriority::High),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.status, WorkOrderStatus::Scheduled);
        assert_eq!(updated.priority, WorkOrderPriority::High);

        let listed = list_work_orders(
            &db,
            WorkOrderFilter { customer_id: Some(c.id), ..Default::default() },
        )
        .await?;
        assert!(listed.iter().any(|w| w.id == wo.id));

        delete_work_order(&db, wo.id).await?;
        delete_customer_fixture(&db, c.id).await;
        Ok(())
    }

    #[tokio::test]
    async fn location_must_belong_to_customer() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let (c1, _) = fixture(&db).await;
        let (c2, loc2) = fixture(&db).await;

        let err = create_work_order(&db, draft(c1.id, loc2.id)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        delete_customer_fixture(&db, c1.id).await;
        delete_customer_fixture(&db, c2.id).await;
        Ok(())
    }

    #[tokio::test]
    async fn notes_and_line_items_attach() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let (c, loc) = fixture(&db).await;
        let wo = create_work_order(&db, draft(c.id, loc.id)).await?;

        let email = format!("author+{}@example.com", Uuid::new_v4());
        let author =
            models::user::create(&db, &email, "$argon2id$stub", models::user::Role::User).await?;

        add_note(&db, wo.id, author.id, "Filter replaced on site.").await?;
        assert_eq!(list_notes(&db, wo.id).await?.len(), 1);

        add_line_item(&db, wo.id, "Filter, 20x25x1", 2, 1299).await?;
        let items = list_line_items(&db, wo.id).await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price_cents, 1299);

        let err = add_line_item(&db, wo.id, "Bad quantity", 0, 100).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));

        delete_work_order(&db, wo.id).await?;
        delete_customer_fixture(&db, c.id).await;
        Ok(())
    }

    async fn delete_customer_fixture(db: &DatabaseConnection, id: Uuid) {
        let _ = customer::hard_delete(db, id).await;
    }
}
