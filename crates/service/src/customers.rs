//! Customer and service-location CRUD.

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};
use uuid::Uuid;

use models::{customer, service_location};

use crate::errors::ServiceError;
use crate::pagination::Pagination;

pub async fn create_customer(
    db: &DatabaseConnection,
    input: customer::NewCustomer,
) -> Result<customer::Model, ServiceError> {
    Ok(customer::create(db, input).await?)
}

pub async fn get_customer(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<customer::Model>, ServiceError> {
    Ok(customer::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?)
}

pub async fn list_customers(
    db: &DatabaseConnection,
    page: Pagination,
) -> Result<Vec<customer::Model>, ServiceError> {
    let (page_idx, per_page) = page.normalize();
    customer::Entity::find()
        .order_by_asc(customer::Column::Name)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn update_customer(
    db: &DatabaseConnection,
    id: Uuid,
    input: customer::NewCustomer,
) -> Result<customer::Model, ServiceError> {
    Ok(customer::update(db, id, input).await?)
}

pub async fn delete_customer(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    customer::hard_delete(db, id).await?;
    Ok(())
}

pub async fn add_location(
    db: &DatabaseConnection,
    customer_id: Uuid,
    input: service_location::NewServiceLocation,
) -> Result<service_location::Model, ServiceError> {
    if get_customer(db, customer_id).await?.is_none() {
        return Err(ServiceError::not_found("customer"));
    }
    Ok(service_location::create(db, customer_id, input).await?)
}

pub async fn list_locations(
    db: &DatabaseConnection,
    customer_id: Uuid,
) -> Result<Vec<service_location::Model>, ServiceError> {
    Ok(service_location::list_for_customer(db, customer_id).await?)
}

pub async fn delete_location(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    service_location::hard_delete(db, id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn new_customer(name: &str) -> customer::NewCustomer {
        customer::NewCustomer {
            name: name.to_string(),
            email: Some("billing@example.com".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn customer_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;

        let name = format!("svc_customer_{}", Uuid::new_v4());
        let c = create_customer(&db, new_customer(&name)).await?;
        assert_eq!(c.name, name);

        let found = get_customer(&db, c.id).await?.unwrap();
        assert_eq!(found.id, c.id);

        let loc = add_location(
            &db,
            c.id,
            service_location::NewServiceLocation {
                label: Some("HQ".into()),
                address_line1: "12 Main St".into(),
                city: "Springfield".into(),
                province: "ON".into(),
                postal_code: "A1A 1A1".into(),
                country: "CA".into(),
                ..Default::default()
            },
        )
        .await?;
        let locations = list_locations(&db, c.id).await?;
        assert!(locations.iter().any(|l| l.id == loc.id));

        delete_location(&db, loc.id).await?;
        delete_customer(&db, c.id).await?;
        assert!(get_customer(&db, c.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn location_requires_existing_customer() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let err = add_location(
            &db,
            Uuid::new_v4(),
            service_location::NewServiceLocation {
                address_line1: "1 Nowhere".into(),
                city: "X".into(),
                province: "Y".into(),
                postal_code: "0".into(),
                country: "CA".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }
}
