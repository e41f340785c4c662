//! Technician profile CRUD. A technician row is a profile hanging off a
//! user account; the unique user FK keeps it one-to-one.

use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use uuid::Uuid;

use models::technician;

use crate::errors::ServiceError;

pub async fn create_technician(
    db: &DatabaseConnection,
    user_id: Uuid,
    display_name: &str,
    phone: Option<&str>,
) -> Result<technician::Model, ServiceError> {
    Ok(technician::create(db, user_id, display_name, phone).await?)
}

pub async fn get_technician(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<technician::Model>, ServiceError> {
    Ok(technician::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?)
}

pub async fn get_technician_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<technician::Model>, ServiceError> {
    Ok(technician::find_by_user(db, user_id).await?)
}

pub async fn list_technicians(
    db: &DatabaseConnection,
) -> Result<Vec<technician::Model>, ServiceError> {
    technician::Entity::find()
        .order_by_asc(technician::Column::DisplayName)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn update_technician(
    db: &DatabaseConnection,
    id: Uuid,
    display_name: &str,
    phone: Option<&str>,
) -> Result<technician::Model, ServiceError> {
    technician::validate_display_name(display_name)?;
    let existing = get_technician(db, id).await?.ok_or_else(|| ServiceError::not_found("technician"))?;
    Ok(technician::upsert_by_user(db, existing.user_id, display_name, phone).await?)
}

pub async fn delete_technician(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    technician::hard_delete(db, id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn technician_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;

        let email = format!("tech+{}@example.com", Uuid::new_v4());
        let user = models::user::create(&db, &email, "$argon2id$stub", models::user::Role::User)
            .await?;

        let t = create_technician(&db, user.id, "Dana Field", Some("+1-555-0100")).await?;
        assert_eq!(t.user_id, user.id);

        let updated = update_technician(&db, t.id, "Dana F.", None).await?;
        assert_eq!(updated.display_name, "Dana F.");

        let by_user = get_technician_for_user(&db, user.id).await?.unwrap();
        assert_eq!(by_user.id, t.id);

        delete_technician(&db, t.id).await?;
        assert!(get_technician(&db, t.id).await?.is_none());
        Ok(())
    }
}
